use centris_scraper::{reconcile, CanonicalSchema, FieldRecord, FieldValue, LISTING_SCHEMA};

fn schema() -> CanonicalSchema {
    CanonicalSchema::new(["ID", "url", "Prix", "Ville"])
}

#[test]
fn canonical_prefix_then_extras() {
    let record = [
        ("Ascenseur", FieldValue::from("Oui")),
        ("Ville", FieldValue::from("Laval")),
        ("ID", FieldValue::from("42")),
        ("Piscine creusée", FieldValue::from("Oui")),
    ]
    .into_iter()
    .collect::<FieldRecord>();

    let out = reconcile(record, &schema(), "https://example.com/42");

    assert_eq!(
        vec!["ID", "url", "Prix", "Ville", "Ascenseur", "Piscine creusée"],
        out.keys().collect::<Vec<_>>()
    );
    assert_eq!(Some(&FieldValue::from("42")), out.get("ID"));
    assert_eq!(Some(&FieldValue::Null), out.get("Prix"));
    assert_eq!(Some(&FieldValue::from("Laval")), out.get("Ville"));
}

#[test]
fn url_comes_from_the_page() {
    let record = [("url", "https://stale.example.com")]
        .into_iter()
        .collect::<FieldRecord>();

    let out = reconcile(record, &schema(), "https://example.com/42");

    assert_eq!(Some(&FieldValue::from("https://example.com/42")), out.get("url"));
    assert_eq!(4, out.len());
}

#[test]
fn empty_record() {
    let out = reconcile(FieldRecord::new(), &LISTING_SCHEMA, "https://example.com/1");

    assert_eq!(LISTING_SCHEMA.len(), out.len());
    assert_eq!(
        1,
        out.iter().filter(|(_, value)| !value.is_null()).count()
    );
}

#[test]
fn idempotent() {
    let record = [
        ("Zonage", FieldValue::from("Résidentiel")),
        ("Taxes scolaires", FieldValue::from(310_i64)),
        ("Ascenseur", FieldValue::from("Oui")),
    ]
    .into_iter()
    .collect::<FieldRecord>();

    let once = reconcile(record, &LISTING_SCHEMA, "https://example.com/1");
    let twice = reconcile(once.clone(), &LISTING_SCHEMA, "https://example.com/1");

    assert_eq!(once, twice);
    assert_eq!(
        once.keys().collect::<Vec<_>>(),
        twice.keys().collect::<Vec<_>>()
    );
}

#[test]
fn listing_columns() {
    let columns = LISTING_SCHEMA.columns().collect::<Vec<_>>();

    assert_eq!(41 + 35, columns.len());
    assert_eq!(["ID", "url", "Type de propriété"], columns[..3]);
    assert_eq!("Frais de copropriété", columns[40]);
    assert_eq!("photo_1", columns[41]);
    assert_eq!("photo_35", columns[75]);
}

#[test]
fn duplicate_columns_are_kept_once() {
    let schema = CanonicalSchema::new(["ID", "url", "ID"]);

    assert_eq!(vec!["ID", "url"], schema.columns().collect::<Vec<_>>());
}
