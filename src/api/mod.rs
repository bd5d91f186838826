mod cache;
pub mod client;
pub mod error;
pub mod types;

pub use client::RentalApiClient;
