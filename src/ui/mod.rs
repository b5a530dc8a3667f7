mod filters;
mod help;
mod onboarding;
mod pane;
mod reader;
mod sidebar;
mod snooze;
mod threads;

pub use filters::*;
pub use help::*;
pub use onboarding::*;
pub use pane::*;
pub use reader::*;
pub use sidebar::*;
pub use snooze::*;
pub use threads::*;
