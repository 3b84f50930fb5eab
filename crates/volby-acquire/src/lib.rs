pub mod detail;
pub mod district;
pub mod fetch;
pub mod index;
pub mod normalize;

pub use district::scrape_district;
pub use fetch::{FetchConfig, HttpFetcher, PageFetcher};
