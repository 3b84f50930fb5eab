pub mod args;
pub mod consistency;

pub use args::{validate_args, validate_pair, HostPolicy, ValidatedArgs, ELECTIONS_HOST};
pub use consistency::{check_consistency, ConsistencyError};
