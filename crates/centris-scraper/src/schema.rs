use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::fields::{self, financial};
use crate::photos::MAX_PHOTOS;
use crate::record::{FieldRecord, FieldValue};

lazy_static! {
    /// Columns every listing record starts with
    pub static ref LISTING_SCHEMA: CanonicalSchema = CanonicalSchema::listing();
}

/// Fixed, ordered set of output columns.
#[derive(Debug, Clone)]
pub struct CanonicalSchema {
    columns: Vec<String>,
    index: HashSet<String>,
}

impl CanonicalSchema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self {
            columns: Vec::new(),
            index: HashSet::new(),
        };
        for col in columns {
            let col = col.into();
            if schema.index.insert(col.clone()) {
                schema.columns.push(col);
            }
        }
        schema
    }

    fn listing() -> Self {
        let named = [
            fields::ID,
            fields::URL,
            fields::PROPERTY_TYPE,
            fields::ADDRESS,
            fields::CITY,
            fields::PRICE,
            fields::ROOMS,
            fields::BEDROOMS,
            fields::BATHROOMS,
            fields::LATITUDE,
            fields::LONGITUDE,
        ]
        .into_iter()
        .chain(fields::CHARACTERISTICS)
        .chain([
            fields::WALKSCORE,
            fields::DESCRIPTION,
            financial::LAND_ASSESSMENT,
            financial::BUILDING_ASSESSMENT,
            financial::MUNICIPAL_TAXES,
            financial::SCHOOL_TAXES,
            financial::CONDO_FEES,
        ])
        .map(String::from);

        Self::new(named.chain((0..MAX_PHOTOS).map(fields::photo)))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Lays `record` out along `schema`, then appends the fields the schema doesn't know about.
///
/// The `url` column always holds `url`, whatever the record says.
pub fn reconcile(record: FieldRecord, schema: &CanonicalSchema, url: &str) -> FieldRecord {
    let mut out = FieldRecord::with_capacity(schema.len().max(record.len()));

    for col in schema.columns() {
        let value = if col == fields::URL {
            FieldValue::from(url)
        } else {
            record.get(col).cloned().unwrap_or(FieldValue::Null)
        };
        out.insert(col, value);
    }

    for (key, value) in record {
        if !schema.contains(&key) {
            out.insert(key, value);
        }
    }

    out
}
