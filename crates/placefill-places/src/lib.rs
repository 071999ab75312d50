pub mod client;
pub mod error;

pub use client::GooglePlacesClient;
pub use error::PlacesError;
