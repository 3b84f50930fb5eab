pub mod error;
pub mod municipality;
pub mod table;

pub use error::*;
pub use municipality::*;
pub use table::*;
