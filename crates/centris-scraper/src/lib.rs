mod centris;
pub mod extract;
pub mod fields;
pub mod financial;
pub mod page;
pub mod photos;
pub mod record;
pub mod resume;
pub mod schema;
pub mod text;
pub mod writer;

pub use crate::centris::{pending_urls, scrap_page, CentrisScraper, CentrisScraperConfig};
pub use crate::extract::extract;
pub use crate::financial::{extract_financial, parse_amount};
pub use crate::page::{listing_id, ListingPage};
pub use crate::photos::{extract_photos, PhotoList, MAX_PHOTOS};
pub use crate::record::{FieldRecord, FieldValue};
pub use crate::resume::ProcessedIdSet;
pub use crate::schema::{reconcile, CanonicalSchema, LISTING_SCHEMA};
pub use crate::writer::{
    parse_ascii_char, CsvTerminator, CsvWriterConfig, OutputFormat, RecordWriter,
};

pub use anyhow;
