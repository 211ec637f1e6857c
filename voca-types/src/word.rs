use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// One of the six elementary school years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every grade in ascending order
    pub fn all() -> impl Iterator<Item = Grade> {
        (Self::MIN..=Self::MAX).map(Grade)
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value).ok_or_else(|| format!("grade must be 1-6, got {}", value))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scope of a word pool and of the stats recorded against it.
///
/// Persisted as a plain string: `"1"` .. `"6"` or `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GradeSelector {
    Grade(Grade),
    All,
}

impl GradeSelector {
    /// Grade used when nothing was stored or the stored grade has no words
    pub const DEFAULT: GradeSelector = GradeSelector::Grade(Grade(1));

    /// All seven selectors: grades 1-6 followed by `all`
    pub fn every() -> impl Iterator<Item = GradeSelector> {
        Grade::all()
            .map(GradeSelector::Grade)
            .chain(std::iter::once(GradeSelector::All))
    }
}

impl Default for GradeSelector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<Grade> for GradeSelector {
    fn from(grade: Grade) -> Self {
        GradeSelector::Grade(grade)
    }
}

impl fmt::Display for GradeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeSelector::Grade(grade) => write!(f, "{}", grade),
            GradeSelector::All => f.write_str("all"),
        }
    }
}

impl FromStr for GradeSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(GradeSelector::All);
        }
        let value: u8 = s
            .parse()
            .map_err(|_| format!("invalid grade selector: {:?}", s))?;
        Grade::try_from(value).map(GradeSelector::Grade)
    }
}

impl TryFrom<String> for GradeSelector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GradeSelector> for String {
    fn from(selector: GradeSelector) -> Self {
        selector.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordHints {
    pub hint1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint2: Option<String>,
}

/// A word as served to a round. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordEntry {
    pub id: String,
    pub word: String,
    pub hints: WordHints,
    pub category: String,
    #[ts(type = "number")]
    pub grade: Grade,
}

impl WordEntry {
    /// The word canonicalized for matching
    pub fn canonical(&self) -> String {
        self.word.trim().to_uppercase()
    }

    /// Number of guessable letters, ignoring spaces and punctuation
    pub fn letter_count(&self) -> usize {
        self.canonical().chars().filter(|c| c.is_alphabetic()).count()
    }
}
