use std::fs;

use centris_scraper::{
    parse_ascii_char, CsvWriterConfig, FieldRecord, FieldValue, OutputFormat, ProcessedIdSet,
    RecordWriter,
};

fn listing(id: &str, extra: Option<(&str, &str)>) -> FieldRecord {
    let mut record = FieldRecord::new();
    record.insert("ID", id);
    record.insert("url", format!("https://x/{id}"));
    record.insert("Prix", FieldValue::Null);
    record.insert("Taxes scolaires", 310_i64);
    if let Some((k, v)) = extra {
        record.insert(k, v);
    }
    record
}

#[test]
fn header_from_first_record() {
    let mut wtr = RecordWriter::csv(vec![], &CsvWriterConfig::default(), None);
    wtr.write(&listing("1", Some(("Ascenseur", "Oui")))).unwrap();
    wtr.write(&listing("2", Some(("Piscine creusée", "Oui")))).unwrap();
    wtr.write(&listing("3", None)).unwrap();

    let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

    assert_eq!(
        "ID,url,Prix,Taxes scolaires,Ascenseur\n\
         1,https://x/1,,310,Oui\n\
         2,https://x/2,,310,\n\
         3,https://x/3,,310,\n",
        out
    );
}

#[test]
fn json_lines_keep_everything() {
    let mut wtr = RecordWriter::json_lines(vec![]);
    wtr.write(&listing("1", Some(("Ascenseur", "Oui")))).unwrap();

    let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

    assert_eq!(
        "{\"ID\":\"1\",\"url\":\"https://x/1\",\"Prix\":null,\"Taxes scolaires\":310,\"Ascenseur\":\"Oui\"}\n",
        out
    );
    let back: FieldRecord = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(listing("1", Some(("Ascenseur", "Oui"))), back);
}

#[test]
fn append_keeps_existing_header() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    fs::write(&out, "ID,url,Taxes scolaires\n1,https://x/1,300\n").unwrap();

    let mut wtr =
        RecordWriter::append_to(&out, OutputFormat::Csv, &CsvWriterConfig::default()).unwrap();
    wtr.write(&listing("2", None)).unwrap();
    drop(wtr);

    assert_eq!(
        "ID,url,Taxes scolaires\n1,https://x/1,300\n2,https://x/2,310\n",
        fs::read_to_string(&out).unwrap()
    );
}

#[test]
fn appended_ids_are_resumable() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let csv_config = CsvWriterConfig::default();

    for id in ["1", "2"] {
        let mut wtr = RecordWriter::append_to(&out, OutputFormat::JsonLines, &csv_config).unwrap();
        wtr.write(&listing(id, None)).unwrap();
    }

    let ids = ProcessedIdSet::load(&out, OutputFormat::JsonLines, &csv_config).unwrap();
    assert_eq!(ProcessedIdSet::from_iter(["1", "2"]), ids);
}

#[test]
fn new_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let csv_config = CsvWriterConfig::default();

    let mut wtr = RecordWriter::append_to(&out, OutputFormat::Csv, &csv_config).unwrap();
    wtr.write(&listing("1", None)).unwrap();
    drop(wtr);
    let mut wtr = RecordWriter::append_to(&out, OutputFormat::Csv, &csv_config).unwrap();
    wtr.write(&listing("2", None)).unwrap();
    drop(wtr);

    assert_eq!(
        "ID,url,Prix,Taxes scolaires\n1,https://x/1,,310\n2,https://x/2,,310\n",
        fs::read_to_string(&out).unwrap()
    );
}

#[test]
fn csv_characters_must_be_ascii() {
    let conf: CsvWriterConfig = serde_json::from_str(r#"{"delimiter": ";"}"#).unwrap();
    assert_eq!(';', conf.delimiter);
    assert_eq!(None, conf.escape);

    for json in [
        r#"{"delimiter": "é"}"#,
        r#"{"escape": "é"}"#,
        r#"{"terminator": {"Any": "é"}}"#,
    ] {
        assert!(serde_json::from_str::<CsvWriterConfig>(json).is_err(), "{json}");
    }

    assert_eq!(Ok('\t'), parse_ascii_char("\t"));
    assert!(parse_ascii_char("é").is_err());
    assert!(parse_ascii_char(";;").is_err());
    assert!(parse_ascii_char("").is_err());
}
