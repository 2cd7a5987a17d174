//! Read-only snapshots of persistent records.
//!
//! The engine never mutates these. Callers load a snapshot, run the
//! engine, and commit the returned deltas themselves.

use crate::stats::CombatStats;
use serde::{Deserialize, Serialize};

/// A character as loaded from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: String,
    /// Base stats before equipment and tier multiplier.
    pub base: CombatStats,
    /// Cultivation tier the character currently holds.
    pub tier_level: u32,
    /// Character level, tracked apart from the cultivation tier. Dungeon
    /// level requirements are checked against this.
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u64,
    #[serde(default, with = "crate::numeric::amount")]
    pub gold: u128,
    #[serde(default, with = "crate::numeric::amount")]
    pub spirit_stones: u128,
    /// Ids of equipped items.
    #[serde(default)]
    pub equipped: Vec<String>,
}

fn default_level() -> u32 {
    1
}

impl CharacterSnapshot {
    /// A level 1 character with no experience, currency or equipment.
    pub fn new(id: impl Into<String>, base: CombatStats, tier_level: u32) -> Self {
        Self {
            id: id.into(),
            base,
            tier_level,
            level: 1,
            experience: 0,
            gold: 0,
            spirit_stones: 0,
            equipped: Vec::new(),
        }
    }

    /// Replace the equipped item ids.
    pub fn with_equipped<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipped = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the character level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Set accumulated experience.
    pub fn with_experience(mut self, experience: u64) -> Self {
        self.experience = experience;
        self
    }

    /// Set the spirit stone balance.
    pub fn with_spirit_stones(mut self, spirit_stones: u128) -> Self {
        self.spirit_stones = spirit_stones;
        self
    }
}

/// A monster template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    pub id: String,
    pub name: String,
    pub stats: CombatStats,
    #[serde(default)]
    pub loot_table_id: Option<String>,
}

impl MonsterSnapshot {
    /// A monster with no loot table.
    pub fn new(id: impl Into<String>, name: impl Into<String>, stats: CombatStats) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats,
            loot_table_id: None,
        }
    }

    /// Set the loot table rolled when this monster is defeated.
    pub fn with_loot_table(mut self, table_id: impl Into<String>) -> Self {
        self.loot_table_id = Some(table_id.into());
        self
    }
}
