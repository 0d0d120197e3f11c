pub mod area_cache;
pub mod client;
pub mod error;
pub mod model;
pub mod params;
mod retry;
pub mod transform;
pub mod types;

pub use area_cache::{AreaCatalog, FanOut};
pub use client::{ClientOptions, Endpoint, HotpepperClient};
pub use error::HotpepperError;
pub use params::{QueryValue, ShopSearchParams};
