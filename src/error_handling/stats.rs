//! Processing statistics tracking.
//!
//! This module provides thread-safe counters for fetch attempts and scrape
//! outcomes, shared by every concurrent pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{AttemptKind, ScrapeOutcome};

/// Thread-safe processing statistics tracker.
///
/// All keys are initialized to zero on creation, so the maps are never
/// written after construction and need no lock.
pub struct ProcessingStats {
    attempts: HashMap<AttemptKind, AtomicUsize>,
    outcomes: HashMap<ScrapeOutcome, AtomicUsize>,
}

impl ProcessingStats {
    /// Creates a collector with every counter at zero.
    pub fn new() -> Self {
        let attempts = AttemptKind::iter()
            .map(|kind| (kind, AtomicUsize::new(0)))
            .collect();
        let outcomes = ScrapeOutcome::iter()
            .map(|outcome| (outcome, AtomicUsize::new(0)))
            .collect();

        ProcessingStats { attempts, outcomes }
    }

    /// Increment an attempt counter.
    pub fn record_attempt(&self, kind: AttemptKind) {
        if let Some(counter) = self.attempts.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment attempt counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                kind
            );
        }
    }

    /// Increment a scrape outcome counter.
    pub fn record_outcome(&self, outcome: ScrapeOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment outcome counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                outcome
            );
        }
    }

    /// Get the count for an attempt kind.
    pub fn get_attempt_count(&self, kind: AttemptKind) -> usize {
        self.attempts
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for a scrape outcome.
    pub fn get_outcome_count(&self, outcome: ScrapeOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total attempts across all kinds.
    pub fn total_attempts(&self) -> usize {
        AttemptKind::iter().map(|k| self.get_attempt_count(k)).sum()
    }

    /// Total scrapes across all outcomes.
    pub fn total_scrapes(&self) -> usize {
        ScrapeOutcome::iter()
            .map(|o| self.get_outcome_count(o))
            .sum()
    }

    /// Scrapes that ended in an error of any kind.
    pub fn failed_scrapes(&self) -> usize {
        ScrapeOutcome::iter()
            .filter(|o| !matches!(o, ScrapeOutcome::Succeeded | ScrapeOutcome::Empty))
            .map(|o| self.get_outcome_count(o))
            .sum()
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
