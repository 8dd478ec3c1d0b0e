pub mod client;
pub mod schema;

pub use client::{AzureSearchClient, DocumentAck, SearchOptions, SearchPage, SearchService};
