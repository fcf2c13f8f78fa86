pub mod config_io;
pub mod state;
pub mod store;

pub use state::FoldState;
pub use store::{Store, StoreError};
