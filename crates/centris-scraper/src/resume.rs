use std::collections::HashSet;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, Context};
use serde_json::Value;

use crate::fields;
use crate::writer::{CsvWriterConfig, OutputFormat};

/// IDs of the listings already present in a previous output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedIdSet(HashSet<String>);

impl ProcessedIdSet {
    /// Loads the IDs found in `path`.
    ///
    /// A missing file is a first run and gives an empty set.
    pub fn load<P: AsRef<Path>>(
        path: P,
        format: OutputFormat,
        csv_config: &CsvWriterConfig,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = match fs_err::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No previous output at {}, starting from scratch", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let ids = match format {
            OutputFormat::Csv => Self::from_csv(file, csv_config),
            OutputFormat::JsonLines => Self::from_json_lines(BufReader::new(file)),
        }
        .with_context(|| format!("Couldn't read IDs from {}", path.display()))?;

        log::info!("{} IDs already present in {}", ids.len(), path.display());
        Ok(ids)
    }

    /// IDs of the `ID` column of a CSV with a header line
    pub fn from_csv<R: Read>(rdr: R, csv_config: &CsvWriterConfig) -> anyhow::Result<Self> {
        let mut rdr = csv::ReaderBuilder::from(csv_config).from_reader(rdr);

        let header = rdr.headers()?;
        if header.is_empty() {
            return Ok(Self::default());
        }
        let idx = header
            .iter()
            .position(|col| col == fields::ID)
            .ok_or_else(|| anyhow!("Missing {:?} column", fields::ID))?;

        let mut ids = HashSet::new();
        for record in rdr.records() {
            if let Some(id) = record?.get(idx).filter(|id| !id.is_empty()) {
                ids.insert(id.to_string());
            }
        }
        Ok(Self(ids))
    }

    /// `ID` members of a JSON object per line, unreadable lines are skipped
    pub fn from_json_lines<R: BufRead>(rdr: R) -> anyhow::Result<Self> {
        let mut ids = HashSet::new();
        for (n, line) in rdr.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let id = match serde_json::from_str::<Value>(&line) {
                Ok(obj) => match obj.get(fields::ID) {
                    Some(Value::String(id)) => Some(id.clone()),
                    Some(Value::Number(id)) => Some(id.to_string()),
                    _ => None,
                },
                Err(e) => {
                    log::warn!("Skipping unreadable line {}: {e}", n + 1);
                    None
                }
            };
            ids.extend(id);
        }
        Ok(Self(ids))
    }

    pub fn should_fetch(&self, id: &str) -> bool {
        !self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ProcessedIdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
