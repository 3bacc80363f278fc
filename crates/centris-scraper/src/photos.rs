use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::fields;

pub const MAX_PHOTOS: usize = 35;

lazy_static! {
    static ref SCRIPT: Selector = Selector::parse("script").unwrap();
    static ref MOSAIC_PHOTO_URLS: Regex = Regex::new(r"MosaicPhotoUrls\s*=\s*(\[.*?\])\s*;?").unwrap();
}

/// Photo URLs of a listing, always exactly [`MAX_PHOTOS`] slots long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoList(Vec<Option<String>>);

impl PhotoList {
    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut slots = urls.into_iter().take(MAX_PHOTOS).collect::<Vec<_>>();
        slots.resize(MAX_PHOTOS, None);
        Self(slots)
    }

    pub fn empty() -> Self {
        Self::from_urls(std::iter::empty())
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.0.get(slot).and_then(Option::as_deref)
    }

    /// Number of slots holding a URL
    pub fn count(&self) -> usize {
        self.0.iter().filter(|url| url.is_some()).count()
    }

    /// `(photo_N, url)` pairs, one per slot
    pub fn columns(&self) -> impl Iterator<Item = (String, Option<&str>)> {
        self.0
            .iter()
            .enumerate()
            .map(|(slot, url)| (fields::photo(slot), url.as_deref()))
    }
}

/// Reads the `MosaicPhotoUrls = [...]` array embedded in the page scripts, `;` optional.
///
/// A missing or malformed array yields an empty list.
pub fn extract_photos(doc: &Html) -> PhotoList {
    let payload = doc.select(&SCRIPT).find_map(|script| {
        let code = script.text().collect::<String>();
        MOSAIC_PHOTO_URLS
            .captures(&code)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    });

    match payload {
        Some(payload) => match parse_payload(&payload) {
            Some(urls) => PhotoList::from_urls(urls),
            None => {
                log::debug!("Ignoring malformed photo list: {payload}");
                PhotoList::empty()
            }
        },
        None => PhotoList::empty(),
    }
}

fn parse_payload(payload: &str) -> Option<Vec<Option<String>>> {
    let values: Vec<Value> = serde_json::from_str(payload).ok()?;
    let urls = values
        .into_iter()
        .map(|value| match value {
            Value::Null => None,
            Value::String(url) => Some(url),
            other => Some(other.to_string()),
        })
        .collect();
    Some(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shapes() {
        assert_eq!(
            Some(vec![Some("a.jpg".to_string()), None]),
            parse_payload(r#"["a.jpg", null]"#)
        );
        assert_eq!(Some(vec![]), parse_payload("[]"));
        assert_eq!(None, parse_payload("['a.jpg']"));
        assert_eq!(None, parse_payload(r#"{"a": 1}"#));
    }

    #[test]
    fn slots_are_fixed() {
        let photos = PhotoList::from_urls((0..50).map(|i| Some(format!("{i}.jpg"))));

        assert_eq!(MAX_PHOTOS, photos.columns().count());
        assert_eq!(MAX_PHOTOS, photos.count());
        assert_eq!(Some("34.jpg"), photos.get(34));
        assert_eq!(None, photos.get(35));
    }
}
