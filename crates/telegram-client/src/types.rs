//! Bot API data types.

mod send;
mod update;

pub use send::*;
pub use update::*;
