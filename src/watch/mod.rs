//! Post count watching
//!
//! # Components
//!
//! - `PollState`: the per-user state machine (Uninitialized → Tracking → Stopped)
//! - `ChangeDetector`: runs ticks against a `ForumClient` and drives the state
//! - `PollHandle`: owner's handle to a spawned detector, used to stop it

mod detector;
mod state;

pub use detector::{start_polling, ChangeDetector, PollHandle};
pub use state::{PollState, TickOutcome};
