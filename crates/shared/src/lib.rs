mod calendar;
mod date;
mod error;

pub use calendar::*;
pub use date::*;
pub use error::*;
