//! Per-class confidence votes since the last reset.

use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct VoteTally {
    votes: BTreeMap<usize, Vec<f32>>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote and return how many votes the class now has.
    pub fn add(&mut self, class_index: usize, confidence: f32) -> usize {
        let votes = self.votes.entry(class_index).or_default();
        votes.push(confidence);
        votes.len()
    }

    pub fn count(&self, class_index: usize) -> usize {
        self.votes.get(&class_index).map_or(0, Vec::len)
    }

    /// Mean confidence of the votes for a class.
    pub fn mean_confidence(&self, class_index: usize) -> Option<f32> {
        let votes = self.votes.get(&class_index)?;
        if votes.is_empty() {
            return None;
        }
        Some(votes.iter().sum::<f32>() / votes.len() as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Drop the votes of every class.
    pub fn clear(&mut self) {
        self.votes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_class() {
        let mut tally = VoteTally::new();
        assert_eq!(tally.add(0, 0.9), 1);
        assert_eq!(tally.add(1, 0.8), 1);
        assert_eq!(tally.add(0, 0.7), 2);
        assert_eq!(tally.count(0), 2);
        assert_eq!(tally.count(1), 1);
        assert_eq!(tally.count(2), 0);
    }

    #[test]
    fn test_mean_confidence() {
        let mut tally = VoteTally::new();
        tally.add(3, 0.6);
        tally.add(3, 0.8);
        assert!((tally.mean_confidence(3).unwrap() - 0.7).abs() < 1e-6);
        assert!(tally.mean_confidence(1).is_none());
    }

    #[test]
    fn test_clear_drops_all_classes() {
        let mut tally = VoteTally::new();
        tally.add(0, 0.9);
        tally.add(1, 0.9);
        tally.clear();
        assert!(tally.is_empty());
        assert_eq!(tally.count(0), 0);
    }
}
