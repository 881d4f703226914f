mod backend;
mod envelope;
mod fixture;
mod http;

pub use backend::*;
pub use envelope::*;
pub use fixture::*;
pub use http::*;
