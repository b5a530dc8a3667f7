pub mod clock;
pub mod counts;
pub mod reply;
pub mod search;
pub mod seed;
pub mod selection;
pub mod snooze;
pub mod store;
pub mod types;
pub mod undo;
pub mod view;

#[cfg(test)]
pub(crate) mod fixtures;

pub use clock::{Clock, ManualClock, SystemClock, Ticker};
pub use counts::{snoozed_count, unread_counts, UnreadCounts};
pub use search::{derive, SearchOutcome, ViewState};
pub use store::ThreadStore;
pub use types::*;
pub use undo::{UndoController, UndoToken};
