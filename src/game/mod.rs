//! Narrative core: aggregate state, pure reducer, and the scheduling
//! session engine on top.

mod reducer;
mod session;
mod state;

pub use reducer::{Action, MessageDraft, reduce};
pub use session::{Choice, Session, WindowCommand};
pub use state::{ChatMessage, HauntingEvent, Sender, SessionState, StatePatch};
