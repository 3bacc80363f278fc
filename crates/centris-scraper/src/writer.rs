use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;

use anyhow::anyhow;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::record::FieldRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ArgEnum))]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    #[default]
    Csv,
    #[cfg_attr(feature = "clap", clap(name = "jsonl"))]
    JsonLines,
}

/// Every character here must be ASCII, `csv` works on single bytes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CsvWriterConfig {
    #[serde(default = "default_csv_delimiter", deserialize_with = "ascii_char")]
    pub delimiter: char,
    #[serde(default, deserialize_with = "ascii_char_opt")]
    pub escape: Option<char>,
    #[serde(default = "default_csv_terminator")]
    pub terminator: CsvTerminator,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            escape: None,
            terminator: CsvTerminator::Any('\n'),
        }
    }
}

fn default_csv_delimiter() -> char {
    CsvWriterConfig::default().delimiter
}

fn default_csv_terminator() -> CsvTerminator {
    CsvWriterConfig::default().terminator
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CsvTerminator {
    CRLF,
    Any(#[serde(deserialize_with = "ascii_char")] char),
}

/// Parses a single ASCII character, for CSV delimiters given on the command line.
pub fn parse_ascii_char(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ensure_ascii(c),
        _ => Err(format!("expected a single character, got {s:?}")),
    }
}

fn ensure_ascii(c: char) -> Result<char, String> {
    if c.is_ascii() {
        Ok(c)
    } else {
        Err(format!("{c:?} is not an ASCII character"))
    }
}

fn ascii_char<'de, D>(deserializer: D) -> Result<char, D::Error>
where
    D: Deserializer<'de>,
{
    ensure_ascii(char::deserialize(deserializer)?).map_err(de::Error::custom)
}

fn ascii_char_opt<'de, D>(deserializer: D) -> Result<Option<char>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<char>::deserialize(deserializer)?
        .map(ensure_ascii)
        .transpose()
        .map_err(de::Error::custom)
}

impl From<CsvTerminator> for csv::Terminator {
    fn from(source: CsvTerminator) -> Self {
        match source {
            CsvTerminator::CRLF => Self::CRLF,
            CsvTerminator::Any(c) => Self::Any(c as u8),
        }
    }
}

impl From<&CsvWriterConfig> for csv::WriterBuilder {
    fn from(c: &CsvWriterConfig) -> Self {
        let mut builder = csv::WriterBuilder::new();
        builder.delimiter(c.delimiter as u8);
        builder.terminator(c.terminator.into());
        builder.has_headers(false);
        if let Some(escape) = c.escape {
            builder.double_quote(false);
            builder.escape(escape as u8);
        } else {
            builder.double_quote(true);
        }
        builder
    }
}

/// Reader able to read back what a writer built from the same config wrote
impl From<&CsvWriterConfig> for csv::ReaderBuilder {
    fn from(c: &CsvWriterConfig) -> Self {
        let mut builder = csv::ReaderBuilder::new();
        builder.delimiter(c.delimiter as u8);
        builder.has_headers(true);
        builder.flexible(true);
        if let Some(escape) = c.escape {
            builder.double_quote(false);
            builder.escape(Some(escape as u8));
        }
        builder
    }
}

enum Sink<W: Write> {
    Csv {
        wtr: csv::Writer<W>,
        header: Option<Vec<String>>,
        dropped: HashSet<String>,
    },
    JsonLines(W),
}

/// Appends records one at a time, flushing after each of them.
///
/// CSV output keeps a single header: the one already in the file, or else the
/// columns of the first record. Later fields missing from it are dropped.
pub struct RecordWriter<W: Write> {
    sink: Sink<W>,
}

impl RecordWriter<fs_err::File> {
    /// Opens `path` for appending, creating it if needed.
    pub fn append_to<P: AsRef<Path>>(
        path: P,
        format: OutputFormat,
        csv_config: &CsvWriterConfig,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        match format {
            OutputFormat::Csv => {
                let header = read_header(path, csv_config)?;
                if let Some(header) = &header {
                    log::debug!("Appending to {} ({} columns)", path.display(), header.len());
                }
                Ok(Self::csv(file, csv_config, header))
            }
            OutputFormat::JsonLines => Ok(Self::json_lines(file)),
        }
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn csv(writer: W, csv_config: &CsvWriterConfig, header: Option<Vec<String>>) -> Self {
        let wtr = csv::WriterBuilder::from(csv_config).from_writer(writer);
        Self {
            sink: Sink::Csv {
                wtr,
                header,
                dropped: HashSet::new(),
            },
        }
    }

    pub fn json_lines(writer: W) -> Self {
        Self {
            sink: Sink::JsonLines(writer),
        }
    }

    pub fn write(&mut self, record: &FieldRecord) -> anyhow::Result<()> {
        match &mut self.sink {
            Sink::Csv {
                wtr,
                header,
                dropped,
            } => {
                if header.is_none() {
                    let columns = record.keys().map(String::from).collect::<Vec<_>>();
                    wtr.write_record(&columns)?;
                    *header = Some(columns);
                }
                let columns = header.as_deref().unwrap_or_default();

                for key in record.keys() {
                    if !columns.iter().any(|col| col == key) && dropped.insert(key.to_string()) {
                        log::warn!("Column {key:?} is not in the output header, dropping its values");
                    }
                }

                wtr.write_record(columns.iter().map(|col| {
                    record
                        .get(col)
                        .map(ToString::to_string)
                        .unwrap_or_default()
                }))?;
                wtr.flush()?;
            }
            Sink::JsonLines(w) => {
                serde_json::to_writer(&mut *w, record)?;
                w.write_all(b"\n")?;
                w.flush()?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Csv { wtr, .. } => wtr.flush(),
            Sink::JsonLines(w) => w.flush(),
        }
    }

    pub fn into_inner(self) -> anyhow::Result<W> {
        match self.sink {
            Sink::Csv { wtr, .. } => wtr
                .into_inner()
                .map_err(|e| anyhow!("Couldn't flush records: {}", e.error())),
            Sink::JsonLines(w) => Ok(w),
        }
    }
}

/// Header of an existing CSV file, `None` when the file is empty
fn read_header(path: &Path, csv_config: &CsvWriterConfig) -> anyhow::Result<Option<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::from(csv_config).from_reader(fs_err::File::open(path)?);
    let header = rdr.headers()?;
    if header.is_empty() {
        Ok(None)
    } else {
        Ok(Some(header.iter().map(String::from).collect()))
    }
}
