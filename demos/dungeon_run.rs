//! Dungeon Run Example
//!
//! Plays a short session against an in-memory catalog:
//! - Aggregating a character's effective stats with a breakdown
//! - Checking dungeon entry requirements
//! - Fighting each monster on the way, collecting loot
//! - Computing the star rating and rewards
//! - Breaking through to the next cultivation tier
//!
//! Run with `RUST_LOG=zzcombat=debug` to see the engine's log output.

use tracing_subscriber::EnvFilter;
use zzcombat::catalog::{Catalog, InMemoryCatalog};
use zzcombat::cultivation::{can_advance, Advancement, CultivationTier, TierTable};
use zzcombat::dungeon::DungeonRewardParams;
use zzcombat::equipment::{EquipmentBonus, EquipmentSlot, Rarity};
use zzcombat::loot::{LootDrop, LootTable, LootTableEntry};
use zzcombat::random::RngSource;
use zzcombat::snapshot::{CharacterSnapshot, MonsterSnapshot};
use zzcombat::*;

// ============================================================================
// Game Data
// ============================================================================

fn build_catalog() -> EngineResult<InMemoryCatalog> {
    let tiers = TierTable::new(vec![
        CultivationTier::new(1, "Qi Condensation", 0, 1.0).with_floors(100, 50, 20, 10, 5),
        CultivationTier::new(2, "Foundation Establishment", 200, 1.5)
            .with_floors(250, 120, 45, 25, 12),
        CultivationTier::new(3, "Golden Core", 2_000, 2.0).with_floors(600, 300, 90, 50, 20),
    ])?;

    let wolf_drops = LootTable::new(
        "wolf_drops",
        vec![
            LootTableEntry::gold(5, 0.9, 2, 6),
            LootTableEntry::equipment("wolf_fang", 0.25, 1, 1),
        ],
    );
    let bear_drops = LootTable::new(
        "bear_drops",
        vec![
            LootTableEntry::spirit_stones(3, 0.6, 1, 4),
            LootTableEntry::equipment("bear_hide", 0.4, 1, 1),
        ],
    );
    for table in [&wolf_drops, &bear_drops] {
        for issue in table.validate() {
            tracing::warn!(table = %table.id, %issue, "loot table issue");
        }
    }

    Ok(InMemoryCatalog::new(tiers)
        .with_equipment(
            EquipmentBonus::new("jade_sword", EquipmentSlot::Weapon, Rarity::Rare)
                .with_attack(12)
                .with_crit_rate(0.1)
                .with_crit_damage(0.5),
        )
        .with_equipment(
            EquipmentBonus::new("spirit_robe", EquipmentSlot::Armor, Rarity::Uncommon)
                .with_defense(8)
                .with_hp(40),
        )
        .with_monster(
            MonsterSnapshot::new("wolf", "Grey Wolf", CombatStats::new(18, 6, 9, 70))
                .with_loot_table("wolf_drops"),
        )
        .with_monster(
            MonsterSnapshot::new("bear", "Cave Bear", CombatStats::new(26, 14, 4, 140))
                .with_loot_table("bear_drops"),
        )
        .with_loot_table(wolf_drops)
        .with_loot_table(bear_drops)
        .with_dungeon(
            DungeonRewardParams::new("misty_valley", 300, 120)
                .with_multiplier(1.5)
                .with_target_time(240)
                .with_energy_cost(15)
                .with_daily_attempts(3)
                .with_floors(2),
        ))
}

// ============================================================================
// Session
// ============================================================================

fn main() -> EngineResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let engine = Engine::new(build_catalog()?);
    let mut hero = CharacterSnapshot::new(
        "lin",
        CombatStats::new(20, 10, 5, 100).with_crit(0.05, 1.5),
        1,
    )
    .with_equipped(["jade_sword", "spirit_robe"])
    .with_experience(150)
    .with_spirit_stones(40);

    let stats = engine.effective_stats(&hero)?;
    println!("=== {} ===", hero.id);
    println!(
        "ATK {}  DEF {}  HP {}  CRIT {:.0}% x{:.2}",
        stats.attack,
        stats.defense,
        stats.max_hp,
        stats.crit_rate * 100.0,
        stats.crit_damage
    );

    let tier = engine.catalog().require_tier(hero.tier_level)?;
    let equipment = engine.equipped_items(&hero)?;
    let breakdown = StatAggregator::new().explain(StatKind::Attack, &hero.base, &equipment, tier);
    for (source, value) in &breakdown.sources {
        println!("  attack from {source}: {value}");
    }

    engine.check_dungeon_entry(&hero, "misty_valley", 0)?;
    hero.spirit_stones -= 15;
    println!("\nEntered Misty Valley ({} spirit stones left)", hero.spirit_stones);

    let mut rng = RngSource::seeded(2024);
    for (floor, monster_id) in ["wolf", "bear"].into_iter().enumerate() {
        let report = engine.fight_monster(&hero, monster_id, &mut rng)?;
        println!(
            "Floor {}: {} {} in {} exchanges (dealt {}{}, took {})",
            floor + 1,
            if report.outcome.success { "defeated" } else { "lost to" },
            monster_id,
            report.outcome.exchanges,
            report.outcome.player_damage,
            if report.outcome.player_critical { " crit" } else { "" },
            report.outcome.monster_damage,
        );
        hero.base.current_hp = report.character_hp;

        if !report.outcome.success {
            let refund = engine.abandon_dungeon("misty_valley", floor as u32)?;
            hero.spirit_stones += refund as u128;
            println!("Retreated, refunded {refund} spirit stones");
            return Ok(());
        }
        for drop in &report.drops {
            match drop {
                LootDrop::Gold { amount } => hero.gold += amount,
                LootDrop::SpiritStones { amount } => hero.spirit_stones += amount,
                LootDrop::Equipment { item_id, quantity } => {
                    println!("  looted {quantity}x {item_id}")
                }
            }
        }
    }

    let rewards = engine.complete_dungeon("misty_valley", 275)?;
    hero.gold += rewards.gold as u128;
    hero.experience += rewards.experience;
    println!(
        "\nCleared with {} stars: +{} gold, +{} exp (gold {}, exp {})",
        rewards.stars, rewards.gold, rewards.experience, hero.gold, hero.experience
    );

    let current = engine.catalog().require_tier(hero.tier_level)?;
    if can_advance(hero.experience, current, engine.catalog().tier_table()) {
        if let Advancement::Advanced(next) = engine.advance_character(&hero)? {
            hero.base = next.reset.apply_to(&hero.base);
            hero.tier_level = next.tier.level;
            let stats = engine.effective_stats(&hero)?;
            println!(
                "Breakthrough to {}! ATK {}  DEF {}  HP {}",
                next.tier.name, stats.attack, stats.defense, stats.max_hp
            );
        }
    }

    Ok(())
}
