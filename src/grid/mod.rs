mod classify;
mod slot;
mod state;
mod sync;

pub use classify::{Consensus, Tier};
pub use slot::*;
pub use state::{EditMode, GridState};
pub use sync::{SyncPhase, SyncState};
