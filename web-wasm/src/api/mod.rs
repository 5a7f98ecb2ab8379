pub mod client;

pub use client::{download_url, FetchBackend};
