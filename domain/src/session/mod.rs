//! Session / Story state machine.
//!
//! - [`entities`]: statuses, [`entities::Story`] and [`entities::StoryCursor`]
//! - [`machine::Session`]: the aggregate and every state transition
//! - [`view`]: read models and operation reports handed to clients

pub mod entities;
pub mod machine;
pub mod view;

pub use entities::{SessionStatus, Story, StoryCursor, StoryStatus};
pub use machine::Session;
pub use view::{
    CloseReport, CurrentStoryView, Finalization, JoinOutcome, ParticipantView, SessionResults,
    SessionSummary, SessionView, StorySummary, VoteReceipt,
};
