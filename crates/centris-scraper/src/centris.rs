use std::path::PathBuf;

use anyhow::anyhow;
use centris_crawler::{PageLocation, Scrapable, ScrapingContext};
use serde::{Deserialize, Serialize};

use crate::extract::extract;
use crate::page::{listing_id, ListingPage};
use crate::record::FieldRecord;
use crate::resume::ProcessedIdSet;
use crate::schema::{reconcile, LISTING_SCHEMA};
use crate::writer::{CsvWriterConfig, OutputFormat, RecordWriter};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CentrisScraperConfig {
    /// One listing URL per line
    pub urls_file: PathBuf,
    pub output_file: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub csv_writer: CsvWriterConfig,
}

pub struct CentrisScraper {
    config: CentrisScraperConfig,
    writer: RecordWriter<fs_err::File>,
}

impl Scrapable for CentrisScraper {
    type Config = CentrisScraperConfig;

    fn new(config: &CentrisScraperConfig) -> anyhow::Result<Self> {
        let writer = RecordWriter::append_to(&config.output_file, config.format, &config.csv_writer)?;
        Ok(Self {
            config: config.clone(),
            writer,
        })
    }

    fn seed(&self) -> anyhow::Result<Vec<String>> {
        let processed = ProcessedIdSet::load(
            &self.config.output_file,
            self.config.format,
            &self.config.csv_writer,
        )?;
        let urls = fs_err::read_to_string(&self.config.urls_file)?;
        Ok(pending_urls(&urls, &processed))
    }

    fn scrap(&mut self, page: String, ctx: ScrapingContext) -> anyhow::Result<()> {
        let record = scrap_page(&page, &ctx)?;
        self.writer.write(&record)?;
        log::debug!("Wrote listing {}", ctx.location());
        Ok(())
    }

    fn finalizer(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::error!("Couldn't flush {}: {e}", self.config.output_file.display());
        }
    }
}

/// URLs of `urls` (one per line) whose listing isn't in `processed` yet.
pub fn pending_urls(urls: &str, processed: &ProcessedIdSet) -> Vec<String> {
    urls.lines()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .filter(|url| match listing_id(url) {
            Some(id) if !processed.should_fetch(id) => {
                log::info!("[SKIP] Already processed ID: {id}");
                false
            }
            Some(_) => true,
            None => {
                log::warn!("[SKIP] No listing ID in URL: {url}");
                false
            }
        })
        .map(String::from)
        .collect()
}

/// Extracts and reconciles the record of a single listing page.
pub fn scrap_page(page: &str, ctx: &ScrapingContext) -> anyhow::Result<FieldRecord> {
    let id = match ctx.location() {
        PageLocation::Url(url) => listing_id(url).map(String::from),
        PageLocation::Path(path) => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned()),
    }
    .ok_or_else(|| anyhow!("No listing ID in {}", ctx.location()))?;

    let page = ListingPage::parse(page, ctx.final_url(), id);
    Ok(reconcile(extract(&page), &LISTING_SCHEMA, page.url()))
}
