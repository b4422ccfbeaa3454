pub mod client;
pub mod error;

pub use client::{ComicClient, DEFAULT_BASE_URL};
pub use error::FetchError;
