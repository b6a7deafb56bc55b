pub mod format;
pub mod state;
pub mod store;

pub use state::{Mode, SelectionState};
pub use store::{SelectionError, SelectionStore};
