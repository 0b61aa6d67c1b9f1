//! Consensus tiers for the aggregate view.

use std::collections::BTreeMap;

use super::slot::Slot;

/// Visual consensus rank for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Empty,
    LowConsensus,
    ThirdRank,
    SecondRank,
    FirstRank,
    Unanimous,
}

/// Share of participants below which a slot reads as contested.
const LOW_CONSENSUS_CUTOFF: f64 = 0.70;

/// Rank ladder derived from one aggregate snapshot: the top three distinct
/// positive participation counts below unanimity, plus the participant
/// total. Rebuilt whenever a fresh snapshot arrives; never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct Consensus {
    ranks: Vec<u32>,
    total: u32,
}

impl Consensus {
    pub fn new(dayhours: &BTreeMap<Slot, u32>, total: u32) -> Self {
        // A count equal to the total is the unanimous tier, not a rung of
        // the ladder; the next-highest count holds first rank.
        let mut ranks: Vec<u32> = dayhours
            .values()
            .copied()
            .filter(|c| *c > 0 && *c != total)
            .collect();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        ranks.dedup();
        ranks.truncate(3);
        Self { ranks, total }
    }

    /// Tier for a slot with `count` participants.
    ///
    /// Unanimity wins over rank ties, and the rank ladder resolves before
    /// the contested-share cutoff. A count above the cutoff that misses the
    /// ladder stays Empty.
    pub fn tier(&self, count: u32) -> Tier {
        if count == 0 || self.total == 0 {
            return Tier::Empty;
        }
        if count == self.total {
            return Tier::Unanimous;
        }
        match self.ranks.iter().position(|r| *r == count) {
            Some(0) => Tier::FirstRank,
            Some(1) => Tier::SecondRank,
            Some(2) => Tier::ThirdRank,
            _ => {
                if (count as f64) < (self.total as f64) * LOW_CONSENSUS_CUTOFF {
                    Tier::LowConsensus
                } else {
                    Tier::Empty
                }
            }
        }
    }

    /// Tier for one slot of a snapshot; absent slots count as zero.
    pub fn tier_for(&self, dayhours: &BTreeMap<Slot, u32>, slot: Slot) -> Tier {
        self.tier(dayhours.get(&slot).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u32)]) -> BTreeMap<Slot, u32> {
        pairs
            .iter()
            .map(|(key, count)| (Slot::parse(key).unwrap(), *count))
            .collect()
    }

    #[test]
    fn test_no_participants_means_all_empty() {
        let dayhours = counts(&[]);
        let consensus = Consensus::new(&dayhours, 0);
        for slot in Slot::all() {
            assert_eq!(consensus.tier_for(&dayhours, slot), Tier::Empty);
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let dayhours = counts(&[("M08", 3)]);
        let consensus = Consensus::new(&dayhours, 5);
        assert_eq!(consensus.tier(0), Tier::Empty);
    }

    #[test]
    fn test_unanimous_beats_first_rank() {
        let dayhours = counts(&[("M08", 4), ("T08", 3), ("W08", 2), ("R08", 4)]);
        let consensus = Consensus::new(&dayhours, 4);
        assert_eq!(consensus.tier_for(&dayhours, Slot::parse("M08").unwrap()), Tier::Unanimous);
        assert_eq!(consensus.tier_for(&dayhours, Slot::parse("R08").unwrap()), Tier::Unanimous);
        assert_eq!(consensus.tier_for(&dayhours, Slot::parse("T08").unwrap()), Tier::FirstRank);
        assert_eq!(consensus.tier_for(&dayhours, Slot::parse("W08").unwrap()), Tier::SecondRank);
    }

    #[test]
    fn test_three_distinct_counts_take_three_ranks() {
        let dayhours = counts(&[("M10", 9), ("T10", 7), ("W10", 5)]);
        let consensus = Consensus::new(&dayhours, 12);
        assert_eq!(consensus.tier(9), Tier::FirstRank);
        assert_eq!(consensus.tier(7), Tier::SecondRank);
        assert_eq!(consensus.tier(5), Tier::ThirdRank);
    }

    #[test]
    fn test_rank_resolves_before_low_consensus_cutoff() {
        // 6/10 is below 70%, but 6 is also the only positive count, so it
        // must land on the first rank rather than the contested tier.
        let dayhours = counts(&[("F14", 6)]);
        let consensus = Consensus::new(&dayhours, 10);
        assert_eq!(consensus.tier_for(&dayhours, Slot::parse("F14").unwrap()), Tier::FirstRank);
    }

    #[test]
    fn test_below_cutoff_and_unranked_is_contested() {
        let dayhours = counts(&[("M08", 9), ("T08", 8), ("W08", 7), ("R08", 2)]);
        let consensus = Consensus::new(&dayhours, 20);
        assert_eq!(consensus.tier(2), Tier::LowConsensus);
    }

    #[test]
    fn test_at_or_above_cutoff_but_unranked_stays_empty() {
        let dayhours = counts(&[("M08", 19), ("T08", 18), ("W08", 17), ("R08", 14)]);
        let consensus = Consensus::new(&dayhours, 20);
        // 14/20 sits at the cutoff and holds no rank (19, 18, 17 fill the
        // ladder): the fallback leaves it uncolored rather than contested.
        assert_eq!(consensus.tier(14), Tier::Empty);
    }

    #[test]
    fn test_ties_share_a_tier() {
        let dayhours = counts(&[("M08", 5), ("T08", 5), ("W08", 3)]);
        let consensus = Consensus::new(&dayhours, 8);
        assert_eq!(consensus.tier(5), Tier::FirstRank);
        assert_eq!(consensus.tier(3), Tier::SecondRank);
    }
}
