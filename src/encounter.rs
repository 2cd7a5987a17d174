//! Encounter orchestration.
//!
//! [`Engine`] wires the components together over a [`Catalog`]: it looks
//! up the records a request names, aggregates the character, runs the
//! battle or reward calculation, and returns a report of deltas. Nothing
//! is persisted; the caller commits the report as one unit.

use crate::aggregate::StatAggregator;
use crate::battle::{resolve, BattleOutcome};
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::cultivation::{advance, can_advance, Advancement};
use crate::dungeon::{check_entry, compute_rewards, partial_refund, DungeonRewardResult, EntryRequest};
use crate::equipment::EquipmentBonus;
use crate::error::{EngineError, EngineResult};
use crate::loot::LootDrop;
use crate::random::RandomSource;
use crate::snapshot::CharacterSnapshot;
use crate::stats::AggregatedStats;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What happened in a monster fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterReport {
    pub character_id: String,
    pub monster_id: String,
    /// The character's effective stats going into the fight.
    pub stats: AggregatedStats,
    pub outcome: BattleOutcome,
    /// Loot earned. Empty on defeat.
    pub drops: Vec<LootDrop>,
    /// Hp the character should be left with.
    pub character_hp: i64,
}

/// The engine, bound to a catalog and a configuration.
///
/// # Examples
///
/// ```rust
/// use zzcombat::catalog::InMemoryCatalog;
/// use zzcombat::cultivation::{CultivationTier, TierTable};
/// use zzcombat::encounter::Engine;
/// use zzcombat::loot::{LootDrop, LootTable, LootTableEntry};
/// use zzcombat::random::RngSource;
/// use zzcombat::snapshot::{CharacterSnapshot, MonsterSnapshot};
/// use zzcombat::CombatStats;
///
/// let tiers = TierTable::new(vec![CultivationTier::new(1, "Qi Condensation", 0, 1.0)]).unwrap();
/// let catalog = InMemoryCatalog::new(tiers)
///     .with_monster(
///         MonsterSnapshot::new("slime", "Green Slime", CombatStats::new(8, 2, 1, 30))
///             .with_loot_table("slime_drops"),
///     )
///     .with_loot_table(LootTable::new("slime_drops", vec![LootTableEntry::gold(5, 1.0, 1, 1)]));
///
/// let engine = Engine::new(catalog);
/// let hero = CharacterSnapshot::new("lin", CombatStats::new(20, 10, 5, 100), 1);
///
/// let report = engine.fight_monster(&hero, "slime", &mut RngSource::seeded(3)).unwrap();
/// assert!(report.outcome.success);
/// assert_eq!(report.drops, vec![LootDrop::Gold { amount: 5 }]);
/// ```
#[derive(Debug, Clone)]
pub struct Engine<C> {
    catalog: C,
    config: EngineConfig,
    aggregator: StatAggregator,
}

impl<C: Catalog> Engine<C> {
    /// An engine with the default configuration.
    pub fn new(catalog: C) -> Self {
        let config = EngineConfig::default();
        Self {
            aggregator: StatAggregator::from_config(&config),
            catalog,
            config,
        }
    }

    /// An engine with a custom configuration.
    ///
    /// Returns `InvalidConfig` if `config` fails [`EngineConfig::validate`].
    pub fn with_config(catalog: C, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: StatAggregator::from_config(&config),
            catalog,
            config,
        })
    }

    /// The catalog this engine reads from.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Look up every item a character has equipped.
    pub fn equipped_items(&self, character: &CharacterSnapshot) -> EngineResult<Vec<EquipmentBonus>> {
        character
            .equipped
            .iter()
            .map(|id| self.catalog.require_equipment(id).cloned())
            .collect()
    }

    /// Effective stats of a character at its current tier.
    pub fn effective_stats(&self, character: &CharacterSnapshot) -> EngineResult<AggregatedStats> {
        let tier = self.catalog.require_tier(character.tier_level)?;
        let equipment = self.equipped_items(character)?;
        Ok(self.aggregator.aggregate(&character.base, &equipment, tier))
    }

    /// Fight a catalog monster and roll its loot on victory.
    ///
    /// All lookups happen before any draw, so a missing record leaves
    /// `rng` untouched.
    pub fn fight_monster<R: RandomSource + ?Sized>(
        &self,
        character: &CharacterSnapshot,
        monster_id: &str,
        rng: &mut R,
    ) -> EngineResult<EncounterReport> {
        let monster = self.catalog.require_monster(monster_id)?;
        let loot_table = monster
            .loot_table_id
            .as_deref()
            .map(|id| self.catalog.require_loot_table(id))
            .transpose()?;
        let stats = self.effective_stats(character)?;

        let player = stats.combatant(character.base.current_hp, character.base.current_mp);
        let outcome = resolve(&player, &monster.stats, rng);

        let drops = match loot_table {
            Some(table) if outcome.success => table.roll(rng),
            _ => Vec::new(),
        };

        info!(
            character = %character.id,
            monster = %monster.id,
            success = outcome.success,
            exchanges = outcome.exchanges,
            drops = drops.len(),
            "encounter finished"
        );
        Ok(EncounterReport {
            character_id: character.id.clone(),
            monster_id: monster.id.clone(),
            stats,
            character_hp: outcome.player_hp,
            outcome,
            drops,
        })
    }

    /// Check whether a character may enter a dungeon today.
    pub fn check_dungeon_entry(
        &self,
        character: &CharacterSnapshot,
        dungeon_id: &str,
        attempts_today: u32,
    ) -> EngineResult<()> {
        let dungeon = self.catalog.require_dungeon(dungeon_id)?;
        check_entry(
            dungeon,
            &EntryRequest {
                level: character.level,
                spirit_stones: character.spirit_stones,
                attempts_today,
            },
        )
    }

    /// Rewards for completing a dungeon in `time_spent` seconds.
    pub fn complete_dungeon(&self, dungeon_id: &str, time_spent: u64) -> EngineResult<DungeonRewardResult> {
        let dungeon = self.catalog.require_dungeon(dungeon_id)?;
        Ok(compute_rewards(time_spent, dungeon, &self.config))
    }

    /// Spirit stones refunded for leaving a dungeon after `floors_completed`.
    pub fn abandon_dungeon(&self, dungeon_id: &str, floors_completed: u32) -> EngineResult<u64> {
        let dungeon = self.catalog.require_dungeon(dungeon_id)?;
        let refund = partial_refund(
            dungeon.energy_cost,
            floors_completed,
            dungeon.floors,
            self.config.partial_refund_ratio,
        );
        debug!(dungeon = %dungeon.id, floors_completed, refund, "dungeon abandoned");
        Ok(refund)
    }

    /// Advance a character to its next cultivation tier.
    ///
    /// At the top tier this returns `Advancement::MaxTierReached`. Below
    /// it, the character's experience must meet the next tier's threshold,
    /// otherwise the request fails with `InsufficientResource`.
    pub fn advance_character(&self, character: &CharacterSnapshot) -> EngineResult<Advancement> {
        let current = self.catalog.require_tier(character.tier_level)?;
        let table = self.catalog.tier_table();
        if let Some(next) = current.level.checked_add(1).and_then(|l| table.get(l)) {
            if !can_advance(character.experience, current, table) {
                return Err(EngineError::InsufficientResource {
                    resource: "experience".to_string(),
                    required: next.min_exp as u128,
                    available: character.experience as u128,
                });
            }
        }
        Ok(advance(current, table))
    }
}
