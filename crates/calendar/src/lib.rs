mod cache;
mod coverage;
mod grouping;
mod state;

pub use cache::*;
pub use coverage::*;
pub use grouping::*;
