use std::collections::{HashSet, VecDeque};

use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::pool::entry::WeightedEntry;
use crate::rotation::quote_source::QuoteSource;
use crate::types::quote::{Quote, QuoteOrigin};

/// How many recently drawn texts are suppressed on the next draws.
pub const RECENCY_CAPACITY: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PoolStatistics {
    pub total: usize,
    pub builtin: usize,
    pub user_authored: usize,
}

/// The bag: every eligible quote with its weight, plus the draw-tracking
/// state that keeps selections fair and non-repeating.
#[derive(Debug)]
pub struct WeightedPool {
    entries: Vec<WeightedEntry>,
    recent: VecDeque<String>,
    recency_capacity: usize,
    drawn_since_reset: usize,
    user_multiplier: f64,
}

impl Default for WeightedPool {
    fn default() -> Self {
        Self::with_recency_capacity(RECENCY_CAPACITY)
    }
}

impl WeightedPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recency_capacity(recency_capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            recent: VecDeque::new(),
            recency_capacity,
            drawn_since_reset: 0,
            user_multiplier: 1.0,
        }
    }

    /// Inserts an entry. Duplicate text under different ids is allowed.
    pub fn add(&mut self, mut entry: WeightedEntry) {
        if entry.origin == QuoteOrigin::UserAuthored {
            entry.apply_multiplier(self.user_multiplier);
        }
        self.entries.push(entry);
    }

    pub fn add_all(&mut self, entries: impl IntoIterator<Item = WeightedEntry>) {
        for entry in entries {
            self.add(entry);
        }
    }

    /// Rescales the effective weight of user-authored entries. Built-in
    /// entries keep their fixed baseline.
    pub fn set_frequency_multiplier(&mut self, multiplier: f64) {
        if !multiplier.is_finite() || multiplier < 0.0 {
            warn!(multiplier, "ignoring invalid frequency multiplier");
            return;
        }

        self.user_multiplier = multiplier;
        for entry in &mut self.entries {
            if entry.origin == QuoteOrigin::UserAuthored {
                entry.apply_multiplier(multiplier);
            }
        }
    }

    pub fn frequency_multiplier(&self) -> f64 {
        self.user_multiplier
    }

    /// Deletes every entry matching the predicate.
    pub fn remove_matching(&mut self, predicate: impl Fn(&WeightedEntry) -> bool) {
        self.entries.retain(|entry| !predicate(entry));
        self.drawn_since_reset = self.drawn_since_reset.min(self.entries.len());
    }

    /// Replaces the text of the entry backed by `id`. Weight unchanged.
    pub fn update(&mut self, id: Uuid, new_text: &str) {
        for entry in &mut self.entries {
            if entry.source_id == Some(id) {
                entry.text = new_text.to_string();
            }
        }
    }

    pub fn set_active(&mut self, id: Uuid, is_active: bool) {
        for entry in &mut self.entries {
            if entry.source_id == Some(id) {
                entry.is_active = is_active;
            }
        }
    }

    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    pub fn available_count(&self) -> usize {
        self.entries.len().saturating_sub(self.drawn_since_reset)
    }

    pub fn exhaustion_percentage(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.drawn_since_reset as f64 / self.entries.len() as f64
    }

    pub fn statistics(&self) -> PoolStatistics {
        let builtin = self
            .entries
            .iter()
            .filter(|entry| entry.origin == QuoteOrigin::Builtin)
            .count();

        PoolStatistics {
            total: self.entries.len(),
            builtin,
            user_authored: self.entries.len() - builtin,
        }
    }

    /// Draws one entry with probability proportional to its effective
    /// weight, suppressing recently drawn texts. Always succeeds for a
    /// non-empty pool.
    pub fn select_random(&mut self) -> Option<WeightedEntry> {
        self.select_random_avoiding(None)
    }

    /// Like `select_random`, but also steers away from `avoid` when the
    /// pool holds more than one distinct text.
    pub fn select_random_avoiding(&mut self, avoid: Option<&str>) -> Option<WeightedEntry> {
        if self.entries.is_empty() {
            return None;
        }

        if self.available_count() == 0 {
            debug!(
                total = self.entries.len(),
                "pool exhausted, resetting draw tracking"
            );
            self.drawn_since_reset = 0;
        }

        let chosen = self.pick_weighted(self.candidate_indices(avoid));
        let entry = self.entries[chosen].clone();

        self.recent.push_back(entry.text.clone());
        while self.recent.len() > self.recency_capacity {
            self.recent.pop_front();
        }
        self.drawn_since_reset += 1;

        Some(entry)
    }

    /// Active entries, or the whole pool when every entry is paused, so a
    /// non-empty pool can always produce a draw.
    fn active_indices(&self) -> Vec<usize> {
        let flagged: Vec<usize> = (0..self.entries.len())
            .filter(|&i| self.entries[i].is_active)
            .collect();
        if flagged.is_empty() {
            (0..self.entries.len()).collect()
        } else {
            flagged
        }
    }

    /// Active entries minus the recency window and the avoided text,
    /// relaxing each filter in turn rather than ever going empty.
    fn candidate_indices(&self, avoid: Option<&str>) -> Vec<usize> {
        let active = self.active_indices();

        // Suppress at most one fewer than the selectable set; a pool
        // smaller than the buffer must still leave a candidate.
        let window = self.recency_capacity.min(active.len().saturating_sub(1));
        let suppressed: HashSet<&str> = self
            .recent
            .iter()
            .rev()
            .take(window)
            .map(String::as_str)
            .collect();

        let avoid_applies = avoid.is_some() && self.distinct_text_count(&active) > 1;

        let filtered: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&i| !suppressed.contains(self.entries[i].text.as_str()))
            .filter(|&i| !avoid_applies || Some(self.entries[i].text.as_str()) != avoid)
            .collect();
        if !filtered.is_empty() {
            return filtered;
        }

        let unsuppressed: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&i| !avoid_applies || Some(self.entries[i].text.as_str()) != avoid)
            .collect();
        if !unsuppressed.is_empty() {
            return unsuppressed;
        }

        active
    }

    fn distinct_text_count(&self, indices: &[usize]) -> usize {
        indices
            .iter()
            .map(|&i| self.entries[i].text.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Cumulative-weight selection over the candidate set.
    fn pick_weighted(&self, candidates: Vec<usize>) -> usize {
        let total_weight: f64 = candidates
            .iter()
            .map(|&i| self.entries[i].current_weight())
            .sum();

        let mut rng = rand::rng();

        if total_weight <= 0.0 {
            return candidates[rng.random_range(0..candidates.len())];
        }

        let mut threshold = rng.random_range(0.0..total_weight);
        for &index in &candidates {
            let weight = self.entries[index].current_weight();
            if threshold < weight {
                return index;
            }
            threshold -= weight;
        }

        // Floating point can leave a hair of threshold after the last entry.
        *candidates.last().unwrap_or(&0)
    }
}

impl QuoteSource for WeightedPool {
    fn draw(&mut self, avoid: Option<&str>) -> Option<Quote> {
        self.select_random_avoiding(avoid)
            .map(|entry| entry.quote())
    }

    fn distinct_count(&self) -> usize {
        self.distinct_text_count(&self.active_indices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_pool(texts: &[&str]) -> WeightedPool {
        let mut pool = WeightedPool::new();
        pool.add_all(texts.iter().map(|text| WeightedEntry::builtin(*text)));
        pool
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let mut pool = WeightedPool::new();
        assert!(pool.select_random().is_none());
    }

    #[test]
    fn non_empty_pool_always_yields() {
        let mut pool = builtin_pool(&["one"]);
        for _ in 0..20 {
            assert!(pool.select_random().is_some());
        }
    }

    #[test]
    fn never_repeats_within_recency_window() {
        let mut pool = builtin_pool(&["a", "b", "c", "d", "e", "f"]);
        let mut recent: Vec<String> = Vec::new();

        for _ in 0..60 {
            let drawn = pool.select_random().unwrap().text;
            let window: Vec<&String> = recent.iter().rev().take(RECENCY_CAPACITY).collect();
            assert!(
                !window.iter().any(|text| **text == drawn),
                "{drawn} repeated within the last {RECENCY_CAPACITY} draws"
            );
            recent.push(drawn);
        }
    }

    #[test]
    fn two_entry_pool_never_repeats_immediately() {
        let mut pool = builtin_pool(&["left", "right"]);
        let mut previous = pool.select_random().unwrap().text;

        for _ in 0..30 {
            let drawn = pool.select_random().unwrap().text;
            assert_ne!(drawn, previous);
            previous = drawn;
        }
    }

    #[test]
    fn weighted_fairness_over_many_draws() {
        // Recency suppression off: this checks the draw itself.
        let mut pool = WeightedPool::with_recency_capacity(0);
        pool.add(WeightedEntry::new(
            "heavy",
            QuoteOrigin::Builtin,
            10.0,
            None,
        ));
        pool.add(WeightedEntry::new("light", QuoteOrigin::Builtin, 1.0, None));

        let mut heavy = 0_u32;
        let mut light = 0_u32;
        for _ in 0..300 {
            match pool.select_random().unwrap().text.as_str() {
                "heavy" => heavy += 1,
                _ => light += 1,
            }
        }

        let ratio = heavy as f64 / light.max(1) as f64;
        assert!(
            (5.0..=15.0).contains(&ratio),
            "expected roughly 10:1, got {heavy}:{light}"
        );
    }

    #[test]
    fn exhaustion_resets_after_full_draw() {
        let mut pool = builtin_pool(&["a", "b", "c", "d"]);

        for _ in 0..4 {
            pool.select_random().unwrap();
        }
        assert_eq!(pool.exhaustion_percentage(), 1.0);
        assert_eq!(pool.available_count(), 0);

        assert!(pool.select_random().is_some());
        assert!(pool.exhaustion_percentage() < 1.0);
        assert_eq!(pool.available_count(), 3);
    }

    #[test]
    fn multiplier_touches_only_user_authored_entries() {
        let mut pool = builtin_pool(&["builtin"]);
        let id = Uuid::new_v4();
        pool.add(WeightedEntry::user_authored("mine", id));

        pool.set_frequency_multiplier(4.0);

        for entry in &pool.entries {
            match entry.origin {
                QuoteOrigin::Builtin => assert_eq!(entry.current_weight(), 1.0),
                QuoteOrigin::UserAuthored => assert_eq!(entry.current_weight(), 4.0),
            }
        }
    }

    #[test]
    fn entries_admitted_after_multiplier_are_scaled() {
        let mut pool = WeightedPool::new();
        pool.set_frequency_multiplier(2.5);
        pool.add(WeightedEntry::user_authored("late", Uuid::new_v4()));

        assert_eq!(pool.entries[0].current_weight(), 2.5);
    }

    #[test]
    fn invalid_multiplier_is_ignored() {
        let mut pool = WeightedPool::new();
        pool.add(WeightedEntry::user_authored("mine", Uuid::new_v4()));
        pool.set_frequency_multiplier(3.0);

        pool.set_frequency_multiplier(f64::NAN);
        pool.set_frequency_multiplier(-1.0);

        assert_eq!(pool.frequency_multiplier(), 3.0);
        assert_eq!(pool.entries[0].current_weight(), 3.0);
    }

    #[test]
    fn remove_matching_deletes_by_id() {
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();
        let mut pool = builtin_pool(&["builtin"]);
        pool.add(WeightedEntry::user_authored("keep", keep));
        pool.add(WeightedEntry::user_authored("drop", drop));

        pool.remove_matching(|entry| entry.source_id == Some(drop));

        assert_eq!(pool.total_count(), 2);
        assert!(pool.entries.iter().all(|e| e.source_id != Some(drop)));
    }

    #[test]
    fn remove_clamps_draw_tracking() {
        let mut pool = builtin_pool(&["a", "b", "c"]);
        for _ in 0..3 {
            pool.select_random().unwrap();
        }

        pool.remove_matching(|entry| entry.text == "a");

        assert_eq!(pool.available_count(), 0);
        assert!(pool.select_random().is_some());
    }

    #[test]
    fn update_replaces_text_and_keeps_weight() {
        let id = Uuid::new_v4();
        let mut pool = WeightedPool::new();
        pool.add(WeightedEntry::user_authored("before", id));
        pool.set_frequency_multiplier(2.0);

        pool.update(id, "after");

        assert_eq!(pool.entries[0].text, "after");
        assert_eq!(pool.entries[0].current_weight(), 2.0);
    }

    #[test]
    fn inactive_entries_are_not_drawn_while_active_remain() {
        let id = Uuid::new_v4();
        let mut pool = builtin_pool(&["always"]);
        pool.add(WeightedEntry::user_authored("paused", id));
        pool.set_active(id, false);

        for _ in 0..20 {
            assert_eq!(pool.select_random().unwrap().text, "always");
        }
    }

    #[test]
    fn fully_inactive_pool_still_draws() {
        let id = Uuid::new_v4();
        let mut pool = WeightedPool::new();
        pool.add(WeightedEntry::user_authored("only", id));
        pool.set_active(id, false);

        assert!(pool.select_random().is_some());
    }

    #[test]
    fn duplicate_text_under_different_ids_is_allowed() {
        let mut pool = WeightedPool::new();
        pool.add(WeightedEntry::user_authored("same words", Uuid::new_v4()));
        pool.add(WeightedEntry::user_authored("same words", Uuid::new_v4()));

        assert_eq!(pool.total_count(), 2);
        assert_eq!(pool.distinct_count(), 1);
    }

    #[test]
    fn statistics_count_by_origin() {
        let mut pool = builtin_pool(&["a", "b"]);
        pool.add(WeightedEntry::user_authored("mine", Uuid::new_v4()));

        let stats = pool.statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.builtin, 2);
        assert_eq!(stats.user_authored, 1);
    }

    #[test]
    fn avoid_steers_away_when_alternatives_exist() {
        let mut pool = builtin_pool(&["current", "other"]);
        for _ in 0..20 {
            let drawn = pool.select_random_avoiding(Some("current")).unwrap();
            assert_eq!(drawn.text, "other");
        }
    }

    #[test]
    fn avoid_is_dropped_for_single_distinct_text() {
        let mut pool = builtin_pool(&["only"]);
        let drawn = pool.select_random_avoiding(Some("only")).unwrap();
        assert_eq!(drawn.text, "only");
    }
}
