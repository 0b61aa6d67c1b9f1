mod client;
mod types;

pub use client::StoreClient;
pub use types::*;
