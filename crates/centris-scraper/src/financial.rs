use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::fields::financial;
use crate::text::{clean_text, own_texts};

lazy_static! {
    static ref TABLE: Selector = Selector::parse(r#"div[class*="financial-details-table"]"#).unwrap();
    static ref TH: Selector = Selector::parse("th").unwrap();
    static ref TR: Selector = Selector::parse("tr").unwrap();
}

const YEARLY: &str = "financial-details-table-yearly";
const MONTHLY: &str = "financial-details-table-monthly";

/// Cell values meaning "no amount"
const BLANK_AMOUNTS: [&str; 3] = ["non émise", "-", ""];

struct Region {
    /// Table classes to try, in order, until one yields rows
    classes: &'static [&'static str],
    heading: &'static str,
    /// Label substring to field, first match wins
    rules: &'static [(&'static str, &'static str)],
}

const REGIONS: [Region; 3] = [
    Region {
        classes: &["financial-details-table"],
        heading: "Évaluation municipale",
        rules: &[
            ("terrain", financial::LAND_ASSESSMENT),
            ("bâtiment", financial::BUILDING_ASSESSMENT),
        ],
    },
    Region {
        classes: &[YEARLY, MONTHLY],
        heading: "Taxes",
        rules: &[
            ("municipales", financial::MUNICIPAL_TAXES),
            ("scolaires", financial::SCHOOL_TAXES),
        ],
    },
    Region {
        classes: &[YEARLY, MONTHLY],
        heading: "Dépenses",
        rules: &[("copropriété", financial::CONDO_FEES)],
    },
];

/// Parses an amount cell such as `"123 456 $"`.
///
/// Returns `None` for blank markers (`"non émise"`, `"-"`) and for anything that
/// is not an integer once spaces, `$` and `,` are removed.
pub fn parse_amount(cell: &str) -> Option<i64> {
    let clean = clean_text(cell);
    if BLANK_AMOUNTS.contains(&clean.to_lowercase().as_str()) {
        return None;
    }
    let digits = clean.replace([' ', '$', ','], "");
    match digits.parse() {
        Ok(amount) => Some(amount),
        Err(_) => {
            log::debug!("Ignoring unparsable amount: {cell:?}");
            None
        }
    }
}

/// Reads assessments, taxes and condo fees out of the financial details tables.
///
/// Pairs come out in document order; when several rows map to the same field the
/// last one is meant to win.
pub fn extract_financial(doc: &Html) -> Vec<(&'static str, i64)> {
    let mut amounts = vec![];

    for region in REGIONS.iter() {
        let rows = region
            .classes
            .iter()
            .map(|class| region_rows(doc, class, region.heading))
            .find(|rows| !rows.is_empty())
            .unwrap_or_default();

        for row in rows {
            let Some((label, amount)) = read_row(row) else {
                continue;
            };
            let label = clean_text(&label.to_lowercase());
            if let Some((_, field)) = region
                .rules
                .iter()
                .find(|(needle, _)| label.contains(needle))
            {
                amounts.push((*field, amount));
            }
        }
    }

    amounts
}

/// Rows of the tables whose class contains `class` and with a heading containing `heading`.
fn region_rows<'a>(doc: &'a Html, class: &str, heading: &str) -> Vec<ElementRef<'a>> {
    let mut rows: Vec<ElementRef> = vec![];

    let tables = doc.select(&TABLE).filter(|table| {
        table.value().attr("class").unwrap_or_default().contains(class)
            && table
                .select(&TH)
                .any(|th| own_texts(th).next().unwrap_or_default().contains(heading))
    });

    for table in tables {
        for row in table.select(&TR) {
            // Nested tables would list the same rows twice
            if !rows.iter().any(|seen| seen.id() == row.id()) {
                rows.push(row);
            }
        }
    }

    rows
}

/// Label and amount of a row, when both are present
fn read_row(row: ElementRef) -> Option<(&str, i64)> {
    let mut cells = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td");

    let label = own_texts(cells.next()?).next()?;
    let amount = cells.next()?.text().next().and_then(parse_amount)?;

    Some((label, amount))
}
