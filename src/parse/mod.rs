pub mod command;
pub mod when;

pub use command::{Command, parse_command};
pub use when::{Inferred, infer_target_date};
