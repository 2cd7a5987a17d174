//! Loot generation.
//!
//! Every entry in a loot table is rolled independently: one unit draw
//! against the entry's drop rate, and on a hit one range draw for the
//! quantity. Hits are returned in table order; there is no cap and no
//! deduplication.

use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// What a loot entry pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payout<'a> {
    Equipment(&'a str),
    Gold(u64),
    SpiritStones(u64),
}

/// One independently rolled line of a loot table.
///
/// Exactly one of `equipment_id`, `gold` and `spirit_stones` should be
/// set. An entry with none set never drops anything; see
/// [`validate_table`] for detecting misconfigured entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTableEntry {
    /// Probability in `[0, 1]` that this entry drops.
    pub drop_rate: f64,
    pub min_quantity: u64,
    pub max_quantity: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spirit_stones: Option<u64>,
}

impl LootTableEntry {
    fn empty(drop_rate: f64, min_quantity: u64, max_quantity: u64) -> Self {
        Self {
            drop_rate,
            min_quantity,
            max_quantity,
            equipment_id: None,
            gold: None,
            spirit_stones: None,
        }
    }

    /// An entry dropping an equipment item.
    pub fn equipment(
        item_id: impl Into<String>,
        drop_rate: f64,
        min_quantity: u64,
        max_quantity: u64,
    ) -> Self {
        Self {
            equipment_id: Some(item_id.into()),
            ..Self::empty(drop_rate, min_quantity, max_quantity)
        }
    }

    /// An entry dropping `amount` gold per unit of quantity.
    pub fn gold(amount: u64, drop_rate: f64, min_quantity: u64, max_quantity: u64) -> Self {
        Self {
            gold: Some(amount),
            ..Self::empty(drop_rate, min_quantity, max_quantity)
        }
    }

    /// An entry dropping `amount` spirit stones per unit of quantity.
    pub fn spirit_stones(amount: u64, drop_rate: f64, min_quantity: u64, max_quantity: u64) -> Self {
        Self {
            spirit_stones: Some(amount),
            ..Self::empty(drop_rate, min_quantity, max_quantity)
        }
    }

    /// The payout of this entry.
    ///
    /// When several payout fields are set, equipment takes precedence
    /// over gold, and gold over spirit stones.
    pub fn payout(&self) -> Option<Payout<'_>> {
        if let Some(id) = &self.equipment_id {
            return Some(Payout::Equipment(id));
        }
        if let Some(gold) = self.gold {
            return Some(Payout::Gold(gold));
        }
        self.spirit_stones.map(Payout::SpiritStones)
    }

    fn payout_count(&self) -> usize {
        [
            self.equipment_id.is_some(),
            self.gold.is_some(),
            self.spirit_stones.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// A single dropped reward.
///
/// Currency amounts are `amount × quantity` held in a `u128`, which
/// cannot overflow for any `u64` operands. Amounts above `u64::MAX`
/// serialize as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LootDrop {
    Equipment { item_id: String, quantity: u64 },
    Gold {
        #[serde(with = "crate::numeric::amount")]
        amount: u128,
    },
    SpiritStones {
        #[serde(with = "crate::numeric::amount")]
        amount: u128,
    },
}

/// A named loot table.
///
/// # Examples
///
/// ```rust
/// use zzcombat::loot::{LootDrop, LootTable, LootTableEntry};
/// use zzcombat::random::RngSource;
///
/// let table = LootTable::new("slime", vec![
///     LootTableEntry::gold(10, 1.0, 2, 2),
///     LootTableEntry::equipment("slime_gel", 0.0, 1, 1),
/// ]);
///
/// let mut rng = RngSource::seeded(8);
/// let drops = table.roll(&mut rng);
/// assert_eq!(drops, vec![LootDrop::Gold { amount: 20 }]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub id: String,
    pub entries: Vec<LootTableEntry>,
}

impl LootTable {
    /// A table rolling `entries` in order.
    pub fn new(id: impl Into<String>, entries: Vec<LootTableEntry>) -> Self {
        Self {
            id: id.into(),
            entries,
        }
    }

    /// Roll every entry of this table.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec<LootDrop> {
        let drops = roll(&self.entries, rng);
        debug!(table = %self.id, drops = drops.len(), "loot rolled");
        drops
    }

    /// Check this table for configuration defects.
    pub fn validate(&self) -> Vec<LootTableIssue> {
        validate_table(&self.entries)
    }
}

/// Roll each entry independently and collect the hits in input order.
///
/// Each entry consumes one unit draw. A hit consumes one more draw for
/// its quantity, unless the entry has no payout, in which case it is
/// skipped.
pub fn roll<R: RandomSource + ?Sized>(table: &[LootTableEntry], rng: &mut R) -> Vec<LootDrop> {
    let mut drops = Vec::new();
    for (index, entry) in table.iter().enumerate() {
        if rng.next_unit() >= entry.drop_rate {
            continue;
        }
        let Some(payout) = entry.payout() else {
            warn!(index, "loot entry hit but has no payout");
            continue;
        };

        let quantity = rng.next_in_range(entry.min_quantity, entry.max_quantity);
        let drop = match payout {
            Payout::Equipment(item_id) => LootDrop::Equipment {
                item_id: item_id.to_string(),
                quantity,
            },
            Payout::Gold(amount) => LootDrop::Gold {
                amount: amount as u128 * quantity as u128,
            },
            Payout::SpiritStones(amount) => LootDrop::SpiritStones {
                amount: amount as u128 * quantity as u128,
            },
        };
        trace!(index, ?drop, "loot entry hit");
        drops.push(drop);
    }
    drops
}

/// A configuration defect in a loot table entry.
#[derive(Debug, Clone, PartialEq)]
pub enum LootTableIssue {
    DropRateOutOfRange { index: usize, drop_rate: f64 },
    QuantityRangeInverted { index: usize, min: u64, max: u64 },
    MissingPayout { index: usize },
    MultiplePayouts { index: usize },
}

impl fmt::Display for LootTableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LootTableIssue::DropRateOutOfRange { index, drop_rate } => {
                write!(f, "entry {index}: drop rate {drop_rate} outside [0, 1]")
            }
            LootTableIssue::QuantityRangeInverted { index, min, max } => {
                write!(f, "entry {index}: min quantity {min} > max quantity {max}")
            }
            LootTableIssue::MissingPayout { index } => write!(f, "entry {index}: no payout set"),
            LootTableIssue::MultiplePayouts { index } => {
                write!(f, "entry {index}: more than one payout set")
            }
        }
    }
}

/// Report configuration defects. An empty list means the table is clean.
///
/// Validation is advisory: [`roll`] accepts any table.
///
/// # Examples
///
/// ```rust
/// use zzcombat::loot::{validate_table, LootTableEntry, LootTableIssue};
///
/// let issues = validate_table(&[
///     LootTableEntry::gold(5, 1.5, 3, 1),
/// ]);
/// assert_eq!(issues.len(), 2);
/// assert!(matches!(issues[0], LootTableIssue::DropRateOutOfRange { index: 0, .. }));
/// ```
pub fn validate_table(table: &[LootTableEntry]) -> Vec<LootTableIssue> {
    let mut issues = Vec::new();
    for (index, entry) in table.iter().enumerate() {
        if !(0.0..=1.0).contains(&entry.drop_rate) {
            issues.push(LootTableIssue::DropRateOutOfRange {
                index,
                drop_rate: entry.drop_rate,
            });
        }
        if entry.min_quantity > entry.max_quantity {
            issues.push(LootTableIssue::QuantityRangeInverted {
                index,
                min: entry.min_quantity,
                max: entry.max_quantity,
            });
        }
        match entry.payout_count() {
            0 => issues.push(LootTableIssue::MissingPayout { index }),
            1 => {}
            _ => issues.push(LootTableIssue::MultiplePayouts { index }),
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, ScriptedSource};

    #[test]
    fn test_certain_gold_drop() {
        let table = [LootTableEntry::gold(10, 1.0, 2, 2)];
        let mut rng = RngSource::seeded(1);
        for _ in 0..100 {
            assert_eq!(roll(&table, &mut rng), vec![LootDrop::Gold { amount: 20 }]);
        }
    }

    #[test]
    fn test_zero_rate_never_drops() {
        let table = [LootTableEntry::equipment("relic", 0.0, 1, 1)];
        let mut rng = RngSource::seeded(2);
        for _ in 0..1_000 {
            assert!(roll(&table, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_preserves_order_and_allows_multiple_hits() {
        let table = [
            LootTableEntry::spirit_stones(3, 1.0, 1, 1),
            LootTableEntry::equipment("iron_sword", 1.0, 1, 1),
            LootTableEntry::gold(7, 1.0, 1, 1),
            LootTableEntry::gold(7, 1.0, 1, 1),
        ];
        let mut rng = ScriptedSource::constant(0.0);
        let drops = roll(&table, &mut rng);
        assert_eq!(
            drops,
            vec![
                LootDrop::SpiritStones { amount: 3 },
                LootDrop::Equipment {
                    item_id: "iron_sword".to_string(),
                    quantity: 1
                },
                LootDrop::Gold { amount: 7 },
                LootDrop::Gold { amount: 7 },
            ]
        );
    }

    #[test]
    fn test_entry_without_payout_is_skipped() {
        let mut broken = LootTableEntry::gold(1, 1.0, 1, 1);
        broken.gold = None;
        let table = [broken, LootTableEntry::gold(4, 1.0, 1, 1)];
        let mut rng = ScriptedSource::constant(0.0);
        assert_eq!(roll(&table, &mut rng), vec![LootDrop::Gold { amount: 4 }]);
        // chance draws for both entries, quantity draw only for the second
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_miss_consumes_one_draw() {
        let table = [LootTableEntry::gold(1, 0.5, 1, 1)];
        let mut rng = ScriptedSource::constant(0.5);
        assert!(roll(&table, &mut rng).is_empty());
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_quantity_within_range() {
        let table = [LootTableEntry::equipment("herb", 1.0, 2, 5)];
        let mut rng = RngSource::seeded(4);
        for _ in 0..500 {
            match &roll(&table, &mut rng)[0] {
                LootDrop::Equipment { quantity, .. } => assert!((2..=5).contains(quantity)),
                other => panic!("unexpected drop {other:?}"),
            }
        }
    }

    #[test]
    fn test_large_amount_does_not_overflow() {
        let table = [LootTableEntry::gold(u64::MAX, 1.0, u64::MAX, u64::MAX)];
        let mut rng = ScriptedSource::constant(0.0);
        let expected = u64::MAX as u128 * u64::MAX as u128;
        assert_eq!(roll(&table, &mut rng), vec![LootDrop::Gold { amount: expected }]);
    }

    #[test]
    fn test_payout_precedence() {
        let mut entry = LootTableEntry::gold(5, 1.0, 1, 1);
        entry.spirit_stones = Some(9);
        assert_eq!(entry.payout(), Some(Payout::Gold(5)));
        entry.equipment_id = Some("orb".to_string());
        assert_eq!(entry.payout(), Some(Payout::Equipment("orb")));
    }

    #[test]
    fn test_validate_clean_table() {
        let table = LootTable::new(
            "wolf",
            vec![
                LootTableEntry::gold(5, 0.8, 1, 3),
                LootTableEntry::equipment("wolf_fang", 0.1, 1, 1),
            ],
        );
        assert!(table.validate().is_empty());
    }

    #[test]
    fn test_validate_payout_issues() {
        let mut none = LootTableEntry::gold(5, 0.5, 1, 1);
        none.gold = None;
        let mut both = LootTableEntry::gold(5, 0.5, 1, 1);
        both.spirit_stones = Some(1);
        let issues = validate_table(&[none, both]);
        assert_eq!(
            issues,
            vec![
                LootTableIssue::MissingPayout { index: 0 },
                LootTableIssue::MultiplePayouts { index: 1 },
            ]
        );
        assert_eq!(issues[0].to_string(), "entry 0: no payout set");
    }

    #[test]
    fn test_drop_serializes_tagged() {
        let json = serde_json::to_string(&LootDrop::Gold { amount: 20 }).unwrap();
        assert_eq!(json, r#"{"kind":"gold","amount":20}"#);
    }

    #[test]
    fn test_drop_round_trips() {
        let huge = u64::MAX as u128 * 3;
        for drop in [
            LootDrop::Gold { amount: 20 },
            LootDrop::SpiritStones { amount: huge },
            LootDrop::Equipment {
                item_id: "jade_sword".into(),
                quantity: 2,
            },
        ] {
            let text = serde_json::to_string(&drop).unwrap();
            assert_eq!(serde_json::from_str::<LootDrop>(&text).unwrap(), drop);

            let value = serde_json::to_value(&drop).unwrap();
            assert_eq!(serde_json::from_value::<LootDrop>(value).unwrap(), drop);
        }
    }

    #[test]
    fn test_huge_amount_is_a_string() {
        let drop = LootDrop::Gold {
            amount: u64::MAX as u128 * 3,
        };
        let value = serde_json::to_value(&drop).unwrap();
        assert_eq!(value["amount"], "55340232221128654845");
        let parsed: LootDrop =
            serde_json::from_str(r#"{"kind":"gold","amount":"55340232221128654845"}"#).unwrap();
        assert_eq!(parsed, drop);
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(serde_json::from_str::<LootDrop>(r#"{"kind":"gold","amount":-5}"#).is_err());
    }

    #[test]
    fn test_entry_deserializes_sparse() {
        let json = r#"{ "drop_rate": 0.25, "min_quantity": 1, "max_quantity": 2, "spirit_stones": 4 }"#;
        let entry: LootTableEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.payout(), Some(Payout::SpiritStones(4)));
    }
}
