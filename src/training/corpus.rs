//! Labeled training corpus: CSV with `url` and `label` columns.

use crate::error::TrainingError;
use crate::model::Label;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledUrl {
    pub url: String,
    pub label: Label,
}

impl LabeledUrl {
    pub fn new(url: impl Into<String>, label: Label) -> Self {
        Self {
            url: url.into(),
            label,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CorpusRow {
    url: String,
    label: String,
}

/// Read a corpus from any CSV source. Extra columns are ignored; `row` in
/// errors is the 1-based data row (header excluded).
pub fn load_corpus<R: Read>(reader: R) -> Result<Vec<LabeledUrl>, TrainingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (i, result) in rdr.deserialize::<CorpusRow>().enumerate() {
        let row = result?;
        let label = Label::parse(&row.label).ok_or_else(|| TrainingError::UnknownLabel {
            row: i + 1,
            value: row.label.clone(),
        })?;
        out.push(LabeledUrl { url: row.url, label });
    }
    Ok(out)
}

pub fn load_corpus_path(path: &Path) -> Result<Vec<LabeledUrl>, TrainingError> {
    let file = std::fs::File::open(path)?;
    load_corpus(std::io::BufReader::new(file))
}
