mod config;
mod crawler;
mod error;
mod scrapable;

pub use config::{CrawlerConfig, OnError};
pub use crawler::crawl_site;
pub use error::FetchError;
pub use scrapable::{PageLocation, Scrapable, ScrapingContext};

pub use anyhow;
