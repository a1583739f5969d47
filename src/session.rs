use itertools::Itertools;

/// Final scores of the rounds played since the process started, in play order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHistory {
    scores: Vec<u32>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, final_score: u32) {
        self.scores.push(final_score);
        tracing::debug!(final_score, rounds = self.scores.len(), "round recorded");
    }

    /// Owned snapshot; later records do not show up in it
    pub fn all(&self) -> Vec<u32> {
        self.scores.clone()
    }

    pub fn max_score(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    pub fn count(&self) -> usize {
        self.scores.len()
    }

    pub fn reset(&mut self) {
        self.scores.clear();
    }

    /// Indices of every round tied for the session best. Zero never counts.
    pub fn best_rounds(&self) -> Vec<usize> {
        let max = self.max_score();
        if max == 0 {
            return vec![];
        }
        self.scores.iter().positions(|&s| s == max).collect()
    }
}
