//! Rules document sources
//!
//! - [`HttpSource`] reads from the live rules API over HTTP
//! - [`DirSource`] reads from a local mirror of the same paths

mod dir;
mod http;

pub use dir::DirSource;
pub use http::HttpSource;
