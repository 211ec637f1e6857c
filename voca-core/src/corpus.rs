use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use voca_types::{Grade, WordHints};

/// A word record as it appears in a grade's data file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorpusRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub word: String,
    pub hints: WordHints,
    #[serde(default)]
    pub category: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    List(Vec<CorpusRecord>),
    Wrapped {
        #[serde(rename = "wordList")]
        word_list: Vec<CorpusRecord>,
    },
}

/// File name holding the words for one grade
pub fn corpus_file_name(grade: Grade) -> String {
    format!("words_elementary_{}.json", grade)
}

/// Read-only word data for grades 1-6.
#[derive(Debug, Clone, Default)]
pub struct WordCorpus {
    grades: BTreeMap<Grade, Vec<CorpusRecord>>,
}

impl WordCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every grade file found in `dir`.
    ///
    /// A missing or unparsable grade file leaves that grade empty; only an
    /// unreadable directory is an error.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            anyhow::bail!("Word directory not found: {}", dir.display());
        }

        let mut corpus = Self::new();
        for grade in Grade::all() {
            let path = dir.join(corpus_file_name(grade));
            if !path.exists() {
                warn!("No word file for grade {} at {}", grade, path.display());
                continue;
            }

            let loaded = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))
                .and_then(|contents| Self::parse_records(&contents));

            match loaded {
                Ok(records) => {
                    info!("Loaded {} words for grade {}", records.len(), grade);
                    corpus.insert_grade(grade, records);
                }
                Err(e) => warn!("Ignoring word file {}: {:#}", path.display(), e),
            }
        }

        Ok(corpus)
    }

    /// Parse one grade file: either a bare array or `{ "wordList": [...] }`
    pub fn parse_records(json: &str) -> Result<Vec<CorpusRecord>> {
        let file: CorpusFile = serde_json::from_str(json).context("Malformed word file")?;
        Ok(match file {
            CorpusFile::List(records) => records,
            CorpusFile::Wrapped { word_list } => word_list,
        })
    }

    pub fn with_grade_json(mut self, grade: Grade, json: &str) -> Result<Self> {
        let records = Self::parse_records(json)?;
        self.insert_grade(grade, records);
        Ok(self)
    }

    /// Replace the words for `grade`, dropping records that cannot be played
    pub fn insert_grade(&mut self, grade: Grade, records: Vec<CorpusRecord>) {
        let records = records
            .into_iter()
            .filter_map(|mut record| {
                if !record.word.chars().any(char::is_alphabetic) {
                    warn!("Skipping grade {} record without letters: {:?}", grade, record.word);
                    return None;
                }
                record.id = record.id.filter(|id| !id.trim().is_empty());
                record.hints.hint2 = record.hints.hint2.filter(|h| !h.trim().is_empty());
                Some(record)
            })
            .collect();
        self.grades.insert(grade, records);
    }

    pub fn records(&self, grade: Grade) -> &[CorpusRecord] {
        self.grades.get(&grade).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn word_count(&self, grade: Grade) -> usize {
        self.records(grade).len()
    }

    pub fn total_words(&self) -> usize {
        self.grades.values().map(Vec::len).sum()
    }
}
