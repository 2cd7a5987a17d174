//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Damage: every hit deals at least 1
//! - Aggregation: crit rate stays in [0, 1]; equipment order is irrelevant
//! - Battle: terminates within ceil(hp / damage) exchanges; `run` agrees
//!   with stepping one exchange at a time
//! - Crits: damage is non-decreasing in crit rate and crit damage
//! - Stars: thresholds hold for any target time

use proptest::prelude::*;
use zzcombat::battle::{resolve_fixed, Battle, BattleState};
use zzcombat::cultivation::CultivationTier;
use zzcombat::damage::hit;
use zzcombat::dungeon::compute_stars;
use zzcombat::equipment::{EquipmentBonus, EquipmentSlot, Rarity};
use zzcombat::loot::{roll, LootDrop, LootTableEntry};
use zzcombat::random::RngSource;
use zzcombat::*;

fn item(index: usize, attack: i64, hp: i64, crit_rate: f64, crit_damage: f64) -> EquipmentBonus {
    EquipmentBonus::new(format!("item_{index}"), EquipmentSlot::Accessory, Rarity::Common)
        .with_attack(attack)
        .with_hp(hp)
        .with_crit_rate(crit_rate)
        .with_crit_damage(crit_damage)
}

fn items() -> impl Strategy<Value = Vec<EquipmentBonus>> {
    prop::collection::vec(
        (-100i64..100, -100i64..100, -2.0f64..2.0, -1.0f64..3.0),
        0..8,
    )
    .prop_map(|bonuses| {
        bonuses
            .into_iter()
            .enumerate()
            .map(|(i, (atk, hp, cr, cd))| item(i, atk, hp, cr, cd))
            .collect()
    })
}

fn ceil_div(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}

// ============================================================
// Damage
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_damage_at_least_one(
        attack in 0i64..100_000,
        defense in 0i64..100_000,
        crit_rate in 0.0f64..=1.0,
        crit_damage in 0.0f64..5.0,
        seed in any::<u64>(),
    ) {
        let mut rng = RngSource::seeded(seed);
        for _ in 0..16 {
            prop_assert!(hit(attack, defense, crit_rate, crit_damage, &mut rng) >= 1);
        }
    }

    #[test]
    fn prop_damage_monotone_in_crit_rate(
        attack in 1i64..1_000,
        defense in 0i64..1_000,
        low in 0.0f64..=1.0,
        extra in 0.0f64..=1.0,
        crit_damage in 1.0f64..4.0,
        seed in any::<u64>(),
    ) {
        let high = (low + extra).min(1.0);
        let mut a = RngSource::seeded(seed);
        let mut b = RngSource::seeded(seed);
        let mut total_low = 0;
        let mut total_high = 0;
        for _ in 0..64 {
            total_low += hit(attack, defense, low, crit_damage, &mut a);
            total_high += hit(attack, defense, high, crit_damage, &mut b);
        }
        prop_assert!(total_high >= total_low);
    }

    #[test]
    fn prop_damage_monotone_in_crit_damage(
        attack in 1i64..1_000,
        defense in 0i64..1_000,
        crit_rate in 0.0f64..=1.0,
        low in 1.0f64..4.0,
        extra in 0.0f64..2.0,
        seed in any::<u64>(),
    ) {
        let mut a = RngSource::seeded(seed);
        let mut b = RngSource::seeded(seed);
        let mut total_low = 0;
        let mut total_high = 0;
        for _ in 0..64 {
            total_low += hit(attack, defense, crit_rate, low, &mut a);
            total_high += hit(attack, defense, crit_rate, low + extra, &mut b);
        }
        prop_assert!(total_high >= total_low);
    }
}

// ============================================================
// Aggregation
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_crit_rate_clamped(base_crit in -1.0f64..1.0, gear in items()) {
        let base = CombatStats::new(20, 10, 5, 100).with_crit(base_crit, 1.5);
        let tier = CultivationTier::new(1, "Qi Condensation", 0, 1.0);
        let stats = StatAggregator::new().aggregate(&base, &gear, &tier);
        prop_assert!((0.0..=1.0).contains(&stats.crit_rate), "crit rate {}", stats.crit_rate);
    }

    #[test]
    fn prop_equipment_order_irrelevant(
        gear in items(),
        rotate in 0usize..8,
        multiplier in 0.5f64..4.0,
    ) {
        let base = CombatStats::new(20, 10, 5, 100).with_crit(0.1, 1.5);
        let tier = CultivationTier::new(2, "Foundation Establishment", 100, multiplier);
        let aggregator = StatAggregator::new();

        let mut shuffled = gear.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let by = rotate % shuffled.len();
            shuffled.rotate_left(by);
        }

        prop_assert_eq!(
            aggregator.aggregate(&base, &gear, &tier),
            aggregator.aggregate(&base, &shuffled, &tier)
        );
    }
}

// ============================================================
// Battle
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_battle_terminates(
        attacker_hp in 1i64..10_000,
        defender_hp in 1i64..10_000,
        attacker_damage in 1i64..500,
        defender_damage in 1i64..500,
    ) {
        let outcome = resolve_fixed(attacker_hp, defender_hp, attacker_damage, defender_damage);
        let bound = ceil_div(defender_hp, attacker_damage).min(ceil_div(attacker_hp, defender_damage));
        prop_assert!(outcome.exchanges as i64 <= bound);
        prop_assert!(outcome.player_hp == 0 || outcome.monster_hp == 0);
        prop_assert_eq!(outcome.success, outcome.monster_hp == 0);
    }

    #[test]
    fn prop_run_agrees_with_stepping(
        attacker_hp in 0i64..2_000,
        defender_hp in 0i64..2_000,
        attacker_damage in 1i64..200,
        defender_damage in 1i64..200,
        warmup in 0usize..5,
    ) {
        let mut stepped = Battle::new(attacker_hp, defender_hp, attacker_damage, defender_damage);
        while stepped.step() == BattleState::InProgress {}

        let mut partial = Battle::new(attacker_hp, defender_hp, attacker_damage, defender_damage);
        for _ in 0..warmup {
            partial.step();
        }
        prop_assert_eq!(Some(partial.run()), stepped.outcome());
    }
}

// ============================================================
// Loot and rewards
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_gold_quantity_in_range(
        amount in 1u64..1_000,
        min in 0u64..20,
        span in 0u64..20,
        seed in any::<u64>(),
    ) {
        let table = vec![LootTableEntry::gold(amount, 1.0, min, min + span)];
        let mut rng = RngSource::seeded(seed);
        let drops = roll(&table, &mut rng);
        prop_assert_eq!(drops.len(), 1);
        let LootDrop::Gold { amount: paid } = drops[0] else {
            return Err(TestCaseError::fail("expected gold"));
        };
        let quantity = paid / amount as u128;
        prop_assert_eq!(paid % amount as u128, 0);
        prop_assert!((min as u128..=(min + span) as u128).contains(&quantity));
    }

    #[test]
    fn prop_star_thresholds(target in 0u64..1_000_000_000) {
        let two_star_limit = target * 3 / 2;
        prop_assert_eq!(compute_stars(target, Some(target)), 3);
        if two_star_limit > target {
            prop_assert_eq!(compute_stars(two_star_limit, Some(target)), 2);
        }
        prop_assert_eq!(compute_stars(two_star_limit + 1, Some(target)), 1);
    }
}
