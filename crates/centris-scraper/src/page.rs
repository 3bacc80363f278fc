use scraper::Html;

/// A downloaded listing page, parsed and ready for extraction.
pub struct ListingPage {
    document: Html,
    url: String,
    id: String,
}

impl ListingPage {
    pub fn new(document: Html, url: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            document,
            url: url.into(),
            id: id.into(),
        }
    }

    pub fn parse(page: &str, url: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(Html::parse_document(page), url, id)
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Listing ID of a listing URL: its last path segment, ignoring trailing slashes.
pub fn listing_id(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}
