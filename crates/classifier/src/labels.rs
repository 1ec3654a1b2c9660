//! Class index to word lookup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{find_existing, ClassifierError, Result};

/// Words the bundled model was trained on, used when no label table is found.
const DEFAULT_LABELS: &[&str] = &["eat", "fish", "like", "want"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: BTreeMap<usize, String>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self::from_words(DEFAULT_LABELS.iter().copied())
    }
}

impl LabelMap {
    pub fn new(labels: BTreeMap<usize, String>) -> Self {
        Self { labels }
    }

    /// Index words by position.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(words.into_iter().map(Into::into).enumerate().collect())
    }

    /// Word for a class index. Unknown indices map to `unknown_<index>`.
    pub fn label_of(&self, class_index: usize) -> String {
        self.labels
            .get(&class_index)
            .cloned()
            .unwrap_or_else(|| format!("unknown_{class_index}"))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.labels.values().map(String::as_str)
    }

    /// Parse a table with `index` and `label` columns. Column order is free
    /// and extra columns are ignored. Cells may be double-quoted, in which
    /// case they can contain commas and `""` stands for a literal quote.
    pub fn from_csv_str(csv: &str) -> Result<Self> {
        let mut lines = csv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| ClassifierError::InvalidLabels("empty label table".to_string()))?;
        let columns = split_row(header);
        let column = |name: &str| {
            columns.iter().position(|c| c == name).ok_or_else(|| {
                ClassifierError::InvalidLabels(format!("missing '{name}' column"))
            })
        };
        let index_col = column("index")?;
        let label_col = column("label")?;

        let mut labels = BTreeMap::new();
        for (row, line) in lines.enumerate() {
            let cells = split_row(line);
            let (Some(index), Some(label)) = (cells.get(index_col), cells.get(label_col)) else {
                return Err(ClassifierError::InvalidLabels(format!(
                    "row {} has {} columns",
                    row + 1,
                    cells.len()
                )));
            };
            let index: usize = index.parse().map_err(|_| {
                ClassifierError::InvalidLabels(format!("row {}: bad index '{index}'", row + 1))
            })?;
            labels.insert(index, label.clone());
        }

        if labels.is_empty() {
            return Err(ClassifierError::InvalidLabels("no labels".to_string()));
        }
        Ok(Self::new(labels))
    }

    /// Parse a JSON object keyed by class index, e.g. `{"0": "eat"}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let labels: BTreeMap<usize, String> =
            serde_json::from_str(json).map_err(|e| ClassifierError::InvalidLabels(e.to_string()))?;
        if labels.is_empty() {
            return Err(ClassifierError::InvalidLabels("no labels".to_string()));
        }
        Ok(Self::new(labels))
    }

    /// Load a `.json` or `.csv` label table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_csv_str(&contents)
        }
    }

    /// Load the first readable table among `candidates`, falling back to the
    /// default labels.
    pub fn discover(candidates: &[PathBuf]) -> Self {
        if let Some(path) = find_existing(candidates) {
            match Self::load(path) {
                Ok(labels) => {
                    tracing::info!(path = %path.display(), count = labels.len(), "Loaded label map");
                    return labels;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to load label map: {}", e);
                }
            }
        }
        tracing::warn!("Using default label map");
        Self::default()
    }
}

/// Split one CSV row into trimmed cells, honouring double quotes.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}
