use std::fmt;
use std::path::PathBuf;

pub trait Scrapable {
    type Config: Clone + Send + 'static;

    fn new(config: &Self::Config) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// URLs to download, in dispatch order
    fn seed(&self) -> anyhow::Result<Vec<String>>;

    fn scrap(&mut self, page: String, ctx: ScrapingContext) -> anyhow::Result<()>;

    fn finalizer(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLocation {
    Url(String),
    Path(PathBuf),
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapingContext {
    location: PageLocation,
    final_url: Option<String>,
}

impl ScrapingContext {
    pub fn with_location(location: PageLocation) -> Self {
        Self {
            location,
            final_url: None,
        }
    }

    pub fn redirected_to(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = Some(final_url.into());
        self
    }

    /// Where the page was requested from
    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    /// URL the page was served from, after redirects
    pub fn final_url(&self) -> String {
        match &self.final_url {
            Some(url) => url.clone(),
            None => self.location.to_string(),
        }
    }
}
