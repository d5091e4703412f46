//! Top-N entity rankings.

use analytik_core::TransactionRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::measure::{EntityKey, Measure};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub entity_name: String,
    pub total_amount: Decimal,
}

/// Entities sorted by summed measure, descending, at most `n` long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub key: EntityKey,
    pub measure: Measure,
    pub entries: Vec<RankingEntry>,
}

impl RankingResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct RankingAggregator;

impl RankingAggregator {
    /// Group by `key`, sum `measure`, keep the first `n`.
    ///
    /// Equal totals keep the order in which their entity first appeared in
    /// `records`. Records without the key are left out. `n` is not range
    /// checked here.
    pub fn top_entities(
        records: &[TransactionRecord],
        key: EntityKey,
        measure: Measure,
        n: usize,
    ) -> RankingResult {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<RankingEntry> = Vec::new();

        for r in records {
            let Some(name) = key.of(r) else { continue };
            let slot = *index.entry(name).or_insert_with(|| {
                groups.push(RankingEntry {
                    entity_name: name.to_string(),
                    total_amount: Decimal::ZERO,
                });
                groups.len() - 1
            });
            let total = &mut groups[slot].total_amount;
            *total = total.saturating_add(measure.value(r));
        }

        // sort_by is stable: ties stay in first-seen order
        groups.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        groups.truncate(n);

        RankingResult { key, measure, entries: groups }
    }
}
