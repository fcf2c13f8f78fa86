pub mod node;
pub mod instruction;
pub mod log;
pub mod config;

pub use node::*;
pub use instruction::*;
pub use log::*;
pub use config::*;
