//! Read-only catalog of game data.
//!
//! The engine reads tiers, equipment, monsters, loot tables and dungeons
//! through the [`Catalog`] trait, so it stays independent of how the data
//! is stored. [`InMemoryCatalog`] is the bundled implementation, loadable
//! from JSON.

use crate::cultivation::{CultivationTier, TierTable};
use crate::dungeon::DungeonRewardParams;
use crate::equipment::EquipmentBonus;
use crate::error::{EngineError, EngineResult, NotFoundKind};
use crate::loot::LootTable;
use crate::snapshot::MonsterSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lookup interface for game data.
///
/// Implementors provide the `Option` lookups; the `require_*` methods
/// turn a missing record into [`EngineError::NotFound`].
pub trait Catalog {
    fn tier_table(&self) -> &TierTable;

    fn equipment(&self, id: &str) -> Option<&EquipmentBonus>;

    fn monster(&self, id: &str) -> Option<&MonsterSnapshot>;

    fn loot_table(&self, id: &str) -> Option<&LootTable>;

    fn dungeon(&self, id: &str) -> Option<&DungeonRewardParams>;

    fn require_tier(&self, level: u32) -> EngineResult<&CultivationTier> {
        self.tier_table()
            .get(level)
            .ok_or_else(|| EngineError::not_found(NotFoundKind::CultivationTier, level.to_string()))
    }

    fn require_equipment(&self, id: &str) -> EngineResult<&EquipmentBonus> {
        self.equipment(id)
            .ok_or_else(|| EngineError::not_found(NotFoundKind::Equipment, id))
    }

    fn require_monster(&self, id: &str) -> EngineResult<&MonsterSnapshot> {
        self.monster(id)
            .ok_or_else(|| EngineError::not_found(NotFoundKind::Monster, id))
    }

    fn require_loot_table(&self, id: &str) -> EngineResult<&LootTable> {
        self.loot_table(id)
            .ok_or_else(|| EngineError::not_found(NotFoundKind::LootTable, id))
    }

    fn require_dungeon(&self, id: &str) -> EngineResult<&DungeonRewardParams> {
        self.dungeon(id)
            .ok_or_else(|| EngineError::not_found(NotFoundKind::Dungeon, id))
    }
}

/// A catalog held in memory, keyed by record id.
///
/// # Examples
///
/// ```rust
/// use zzcombat::catalog::{Catalog, InMemoryCatalog};
/// use zzcombat::cultivation::{CultivationTier, TierTable};
/// use zzcombat::snapshot::MonsterSnapshot;
/// use zzcombat::CombatStats;
///
/// let tiers = TierTable::new(vec![CultivationTier::new(1, "Qi Condensation", 0, 1.0)]).unwrap();
/// let catalog = InMemoryCatalog::new(tiers)
///     .with_monster(MonsterSnapshot::new("wolf", "Grey Wolf", CombatStats::new(15, 5, 9, 80)));
///
/// assert!(catalog.require_monster("wolf").is_ok());
/// assert!(catalog.require_monster("tiger").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    pub tiers: TierTable,
    #[serde(default)]
    pub equipment: BTreeMap<String, EquipmentBonus>,
    #[serde(default)]
    pub monsters: BTreeMap<String, MonsterSnapshot>,
    #[serde(default)]
    pub loot_tables: BTreeMap<String, LootTable>,
    #[serde(default)]
    pub dungeons: BTreeMap<String, DungeonRewardParams>,
}

impl InMemoryCatalog {
    /// A catalog holding only a tier table.
    pub fn new(tiers: TierTable) -> Self {
        Self {
            tiers,
            equipment: BTreeMap::new(),
            monsters: BTreeMap::new(),
            loot_tables: BTreeMap::new(),
            dungeons: BTreeMap::new(),
        }
    }

    /// Load a catalog from JSON.
    ///
    /// Tier tables are validated while parsing.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(format!("catalog: {e}")))
    }

    /// Add an item, replacing any with the same id.
    pub fn with_equipment(mut self, item: EquipmentBonus) -> Self {
        self.equipment.insert(item.id.clone(), item);
        self
    }

    /// Add a monster, replacing any with the same id.
    pub fn with_monster(mut self, monster: MonsterSnapshot) -> Self {
        self.monsters.insert(monster.id.clone(), monster);
        self
    }

    /// Add a loot table, replacing any with the same id.
    pub fn with_loot_table(mut self, table: LootTable) -> Self {
        self.loot_tables.insert(table.id.clone(), table);
        self
    }

    /// Add a dungeon, replacing any with the same id.
    pub fn with_dungeon(mut self, dungeon: DungeonRewardParams) -> Self {
        self.dungeons.insert(dungeon.id.clone(), dungeon);
        self
    }
}

impl Catalog for InMemoryCatalog {
    fn tier_table(&self) -> &TierTable {
        &self.tiers
    }

    fn equipment(&self, id: &str) -> Option<&EquipmentBonus> {
        self.equipment.get(id)
    }

    fn monster(&self, id: &str) -> Option<&MonsterSnapshot> {
        self.monsters.get(id)
    }

    fn loot_table(&self, id: &str) -> Option<&LootTable> {
        self.loot_tables.get(id)
    }

    fn dungeon(&self, id: &str) -> Option<&DungeonRewardParams> {
        self.dungeons.get(id)
    }
}
