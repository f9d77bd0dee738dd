//! A haunted late-1990s desktop simulator for the terminal.
//!
//! Two halves: a floating window manager (stacking, focus, minimize, drag,
//! a taskbar) and a narrative engine driving a scripted chat entity through
//! a pure reducer plus a delayed-effect schedule. The engine runs on its
//! own millisecond timeline, so tests drive time explicitly and never
//! sleep.

pub mod app;
pub mod chance;
pub mod constants;
pub mod content;
pub mod error;
pub mod game;
pub mod render;
pub mod runner;
pub mod schedule;
pub mod taskbar;
pub mod tracing_sub;
pub mod ui;
pub mod window;
