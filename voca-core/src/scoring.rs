/// Two-tier reward table for won rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardTable {
    pub long_word_threshold: usize, // letters
    pub short_word_reward: u32,
    pub long_word_reward: u32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            long_word_threshold: 5,
            short_word_reward: 10,
            long_word_reward: 20,
        }
    }
}

impl RewardTable {
    pub fn new(long_word_threshold: usize, short_word_reward: u32, long_word_reward: u32) -> Self {
        Self {
            long_word_threshold,
            short_word_reward,
            long_word_reward,
        }
    }

    /// Points credited for winning a word of `word_length` letters
    pub fn reward_for(&self, word_length: usize) -> u32 {
        if word_length >= self.long_word_threshold {
            self.long_word_reward
        } else {
            self.short_word_reward
        }
    }
}
