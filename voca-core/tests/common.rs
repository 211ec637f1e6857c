#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use voca_core::{CorpusRecord, GameEvent, GameEventHandler, GameSession, WordCorpus};
use voca_types::{Grade, GuessMode, WordEntry, WordHints};

/// Words used across the property-style tests
pub const SAMPLE_WORDS: &[&str] = &[
    "cat", "dog", "apple", "banana", "school", "teacher", "zoo", "moon", "rainbow", "pencil",
    "butterfly", "ice-cream", "a", "mississippi",
];

pub fn grade(n: u8) -> Grade {
    Grade::new(n).unwrap()
}

/// Creates a word entry with predictable id and hints
pub fn create_test_entry(word: &str) -> WordEntry {
    WordEntry {
        id: format!("test-{}", word),
        word: word.to_string(),
        hints: WordHints {
            hint1: format!("first hint for {}", word),
            hint2: None,
        },
        category: "test".to_string(),
        grade: grade(1),
    }
}

pub fn start_free(word: &str) -> GameSession {
    GameSession::start_round(create_test_entry(word), GuessMode::FreeLetter)
}

pub fn start_positional(word: &str) -> GameSession {
    GameSession::start_round(create_test_entry(word), GuessMode::Positional)
}

/// Distinct letters of `word`, uppercased, in first-seen order
pub fn distinct_letters(word: &str) -> Vec<char> {
    let mut letters = Vec::new();
    for c in word.to_uppercase().chars().filter(|c| c.is_alphabetic()) {
        if !letters.contains(&c) {
            letters.push(c);
        }
    }
    letters
}

/// Uppercase letters that do not occur in `word`
pub fn absent_letters(word: &str) -> Vec<char> {
    let upper = word.to_uppercase();
    ('A'..='Z').filter(|c| !upper.contains(*c)).collect()
}

/// Creates a corpus with `per_grade` generated words in each of grades 1-6
pub fn create_test_corpus(per_grade: usize) -> WordCorpus {
    let mut corpus = WordCorpus::new();
    for g in Grade::all() {
        let records = (0..per_grade)
            .map(|i| CorpusRecord {
                id: None,
                word: format!("{}{}", SAMPLE_WORDS[i % SAMPLE_WORDS.len()], "s".repeat(g.get() as usize)),
                hints: WordHints {
                    hint1: "hint".to_string(),
                    hint2: Some("more".to_string()),
                },
                category: format!("grade-{}", g),
            })
            .collect();
        corpus.insert_grade(g, records);
    }
    corpus
}

/// Event collector for testing event emissions
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
