use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::fields;
use crate::financial::extract_financial;
use crate::page::ListingPage;
use crate::photos::extract_photos;
use crate::record::FieldRecord;
use crate::text::{clean_text, first_own_text, join_fragments, normalize_title, own_texts};

macro_rules! selector {
    ($css:literal) => {
        Selector::parse($css).unwrap()
    };
}

lazy_static! {
    static ref PAGE_TITLE: Selector = selector!(r#"span[data-id="PageTitle"]"#);
    static ref ADDRESS: Selector = selector!(r#"h2[itemprop="address"]"#);
    static ref PRICE: Selector = selector!(r#"meta[itemprop="price"]"#);
    static ref ROOMS: Selector = selector!("div.row.teaser .piece");
    static ref BEDROOMS: Selector = selector!("div.row.teaser .cac");
    static ref BATHROOMS: Selector = selector!("div.row.teaser .sdb");
    static ref MATCH_SCORE: Selector = selector!(".row.teaser .lifestyle .ll-match-score");
    static ref DESCRIPTION: Selector = selector!(r#"div[itemprop="description"]"#);
    static ref CARAC: Selector = selector!("div.row div.carac-container");
    static ref CARAC_TITLE: Selector = selector!("div.carac-title");
    static ref CARAC_VALUE: Selector = selector!("div.carac-value span");
    static ref WALKSCORE: Selector = selector!("div.walkscore span");
    static ref CITY: Regex = Regex::new(r"\((.*?)\)").unwrap();
}

/// Builds the raw record of a listing page.
///
/// Fields whose element is missing from the page are left out of the record,
/// the photo slots are always all there.
pub fn extract(page: &ListingPage) -> FieldRecord {
    let doc = page.document();
    let mut record = FieldRecord::new();

    record.insert(fields::ID, page.id());

    if let Some(kind) = first_text(doc, &PAGE_TITLE) {
        record.insert(fields::PROPERTY_TYPE, kind);
    }

    if let Some(address) = first_own_text(doc.select(&ADDRESS)) {
        record.insert(fields::ADDRESS, clean_text(address));
        if let Some(city) = city_of(address) {
            record.insert(fields::CITY, city);
        }
    }

    if let Some(price) = doc
        .select(&PRICE)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .filter(|price| !price.is_empty())
    {
        record.insert(fields::PRICE, price);
    }

    for (selector, field) in [
        (&*ROOMS, fields::ROOMS),
        (&*BEDROOMS, fields::BEDROOMS),
        (&*BATHROOMS, fields::BATHROOMS),
    ] {
        if let Some(count) = first_text(doc, selector) {
            record.insert(field, count);
        }
    }

    for carac in doc.select(&CARAC) {
        extract_characteristic(carac, &mut record);
    }

    let description = doc.select(&DESCRIPTION).flat_map(own_texts).collect::<Vec<_>>();
    if !description.is_empty() {
        record.insert(fields::DESCRIPTION, clean_text(&join_fragments(description)));
    }

    if let Some(score) = doc.select(&MATCH_SCORE).next() {
        for (attr, field) in [("data-lat", fields::LATITUDE), ("data-lng", fields::LONGITUDE)] {
            if let Some(coord) = score.value().attr(attr).filter(|c| !c.is_empty()) {
                record.insert(field, coord);
            }
        }
    }

    for (field, amount) in extract_financial(doc) {
        record.insert(field, amount);
    }

    for (column, url) in extract_photos(doc).columns() {
        record.insert(column, url);
    }

    record
}

/// City written between parentheses in an address, e.g. `123 Rue Example (Montréal)`
pub fn city_of(address: &str) -> Option<String> {
    CITY.captures(address)
        .and_then(|caps| caps.get(1))
        .map(|city| clean_text(city.as_str()))
}

/// A characteristic block: its title becomes a field name, its value fragments the value.
fn extract_characteristic(carac: ElementRef, record: &mut FieldRecord) {
    let title = first_own_text(carac.select(&CARAC_TITLE))
        .map(normalize_title)
        .filter(|title| !title.is_empty());

    if let Some(title) = title {
        let value = join_fragments(carac.select(&CARAC_VALUE).flat_map(own_texts));
        record.insert(title, clean_text(&value));
    }

    if let Some(walkscore) = first_own_text(carac.select(&WALKSCORE)) {
        record.insert(fields::WALKSCORE, clean_text(walkscore));
    }
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    first_own_text(doc.select(selector))
        .map(clean_text)
        .filter(|text| !text.is_empty())
}
