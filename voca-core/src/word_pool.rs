use crate::corpus::WordCorpus;
use crate::errors::PoolError;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::debug;
use voca_types::{Grade, GradeSelector, SolvedIndex, WordEntry};

/// Candidate words for one grade selector.
#[derive(Debug, Clone)]
pub struct WordPool {
    grade: GradeSelector,
    candidates: Vec<WordEntry>,
}

impl WordPool {
    /// Resolve `grade` into its candidate list. `all` concatenates grades 1-6.
    ///
    /// Records without an id get `<word>_<grade>_<index>`, which is stable for
    /// the same corpus content. Colliding ids get a positional suffix.
    pub fn load_candidates(corpus: &WordCorpus, grade: GradeSelector) -> Result<Self, PoolError> {
        let grades: Vec<Grade> = match grade {
            GradeSelector::Grade(g) => vec![g],
            GradeSelector::All => Grade::all().collect(),
        };

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for g in grades {
            for (index, record) in corpus.records(g).iter().enumerate() {
                let mut id = record
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{}_{}_{}", record.word.trim(), g, index));
                if seen.contains(&id) {
                    let base = id;
                    let mut suffix = candidates.len();
                    loop {
                        id = format!("{}_{}", base, suffix);
                        if !seen.contains(&id) {
                            break;
                        }
                        suffix += 1;
                    }
                }
                seen.insert(id.clone());

                candidates.push(WordEntry {
                    id,
                    word: record.word.trim().to_string(),
                    hints: record.hints.clone(),
                    category: record.category.clone(),
                    grade: g,
                });
            }
        }

        if candidates.is_empty() {
            return Err(PoolError::NoWordsAvailable { grade });
        }

        debug!("Word pool for grade {} has {} candidates", grade, candidates.len());
        Ok(Self { grade, candidates })
    }

    pub fn grade(&self) -> GradeSelector {
        self.grade
    }

    pub fn candidates(&self) -> &[WordEntry] {
        &self.candidates
    }

    /// Candidates not yet solved. Fails with `Exhausted` when every word is solved.
    pub fn pick_eligible(&self, solved: &SolvedIndex) -> Result<Vec<&WordEntry>, PoolError> {
        let eligible: Vec<&WordEntry> = self
            .candidates
            .iter()
            .filter(|entry| !solved.contains(&entry.id))
            .collect();

        if eligible.is_empty() {
            return Err(PoolError::Exhausted { grade: self.grade });
        }
        Ok(eligible)
    }

    /// Uniformly choose one eligible word
    pub fn pick_random<R: Rng + ?Sized>(
        &self,
        solved: &SolvedIndex,
        rng: &mut R,
    ) -> Result<&WordEntry, PoolError> {
        let eligible = self.pick_eligible(solved)?;
        eligible
            .choose(rng)
            .copied()
            .ok_or(PoolError::Exhausted { grade: self.grade })
    }
}
