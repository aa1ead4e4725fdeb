//! Worked scenarios across stats, inference, damage and the languages.

use calc_core::combat::{CompactRange, RangeResult};
use calc_core::lang::EvalError;
use calc_core::stats::StatParams;
use calc_core::{
    CalcConfig, DamageQuery, EvalContext, Generation, IvRange, IvRangeSet, ModifierHypothesis,
    Nature, Stat, StatLine, TrackerCommand, TrackerRegistry, TrackerSpec, apply_command,
    bucket_by_lethality, calculate_stat, combine_hypotheses, parse_calc, parse_condition,
};

const ROLLS: [u32; 16] = [10, 10, 10, 11, 11, 11, 12, 12, 12, 13, 13, 13, 14, 14, 14, 14];

fn only(stat: Stat, value: u32) -> StatLine<Option<u32>> {
    let mut line = StatLine::splat(None);
    *line.get_mut(stat) = Some(value);
    line
}

fn execute(registry: TrackerRegistry, command: TrackerCommand) -> TrackerRegistry {
    apply_command(&registry, &command).unwrap()
}

// ----------------------------------------------------------------------------
// Stats and inference
// ----------------------------------------------------------------------------

#[test]
fn boosted_attack_at_level_fifty() {
    let params = StatParams::new(50, 100, 31, 0);
    let value = calculate_stat(Stat::Attack, &params, ModifierHypothesis::Boosted, Generation::Gen4);
    assert_eq!(value, 132);
}

#[test]
fn observations_intersect_rather_than_union() {
    let spec = TrackerSpec::new("Wild", Generation::Gen4, StatLine::splat(40));
    let registry = execute(TrackerRegistry::new(), TrackerCommand::register(spec));

    let registry = execute(registry, TrackerCommand::record("Wild", 10, only(Stat::Attack, 14)));
    let first = registry.get("Wild").unwrap().infer();
    assert_eq!(first.ranges.attack.neutral, IvRange::new(10, 19));

    let narrowed = execute(
        registry.clone(),
        TrackerCommand::record("Wild", 20, only(Stat::Attack, 23)),
    );
    let second = narrowed.get("Wild").unwrap().infer();
    assert_eq!(second.ranges.attack.neutral, IvRange::new(10, 14));

    // 30 at level 20 needs an IV of 45-49: the domain empties instead of
    // falling back to the earlier observation alone.
    let conflicting = execute(registry, TrackerCommand::record("Wild", 20, only(Stat::Attack, 30)));
    let third = conflicting.get("Wild").unwrap().infer();
    assert!(third.ranges.attack.neutral.is_empty());
}

// ----------------------------------------------------------------------------
// Damage
// ----------------------------------------------------------------------------

#[test]
fn kill_threshold_counts_rolls_and_merges_identical_labels() {
    let results = vec![
        (
            ModifierHypothesis::Neutral,
            vec![RangeResult::new(IvRange::new(0, 15), 40, ROLLS)],
        ),
        (
            ModifierHypothesis::Boosted,
            vec![RangeResult::new(IvRange::new(0, 4), 44, ROLLS)],
        ),
    ];
    let compact = combine_hypotheses(&results);
    assert_eq!(compact.len(), 1);

    let buckets = bucket_by_lethality(&compact, 12);
    assert_eq!(buckets.len(), 1);
    let bucket = &buckets[&10];
    assert_eq!(bucket.success_count, 10);
    assert_eq!(bucket.ivs.neutral, IvRange::new(0, 15));
    assert_eq!(bucket.ivs.boosted, IvRange::new(0, 4));
    assert_eq!(bucket.children, compact);
}

// ----------------------------------------------------------------------------
// Languages
// ----------------------------------------------------------------------------

#[test]
fn inverting_an_exact_bounded_range_is_rejected() {
    let registry = execute(
        TrackerRegistry::new(),
        TrackerCommand::register(TrackerSpec::new("Wild", Generation::Gen4, StatLine::splat(40))),
    );
    let config = CalcConfig::default();
    let context = EvalContext::new(&registry, &config)
        .with_source("Wild")
        .with_level(10);
    let condition = parse_condition("hp = ~31\u{2013}31").unwrap();
    assert_eq!(condition.evaluate(&context), Err(EvalError::BoundedInversion));
}

// ----------------------------------------------------------------------------
// End to end
// ----------------------------------------------------------------------------

/// Adamant starter whose attack at level 5 reads 11: boosted IVs 2-21.
fn starter() -> TrackerRegistry {
    let spec = TrackerSpec::new("Starter", Generation::Gen4, "45/49/49/65/65/45".parse().unwrap())
        .with_starting_level(5)
        .with_nature(Nature::Adamant);
    let registry = execute(TrackerRegistry::new(), TrackerCommand::register(spec));
    let mut observed = StatLine::splat(None);
    observed.hp = Some(20);
    observed.attack = Some(11);
    execute(registry, TrackerCommand::record("Starter", 5, observed))
}

#[test]
fn recorded_stats_flow_into_damage_and_conditions() {
    let registry = starter();
    let tracker = registry.get("Starter").unwrap();
    let inferred = tracker.infer();
    assert_eq!(inferred.ranges.attack.boosted, IvRange::new(2, 21));
    assert_eq!(inferred.ranges.hp.neutral, IvRange::new(10, 29));

    let report = DamageQuery::new(Stat::Attack, 5, 40, 10)
        .with_threshold(8)
        .run(tracker)
        .unwrap();
    assert_eq!(report.per_hypothesis.len(), 1);
    assert!(report.per_hypothesis.contains_key(&ModifierHypothesis::Boosted));
    let covered = report
        .compact
        .iter()
        .fold(IvRangeSet::EMPTY, |acc, range: &CompactRange| acc.union(&range.ivs));
    assert_eq!(covered.boosted, IvRange::new(2, 21));
    assert!(covered.neutral.is_empty());
    assert_eq!(
        report
            .lethality
            .values()
            .map(|bucket| bucket.children.len())
            .sum::<usize>(),
        report.compact.len()
    );

    let config = CalcConfig::default();
    let context = EvalContext::new(&registry, &config)
        .with_source("Starter")
        .with_level(5);
    assert_eq!(
        parse_condition("attack = */*/2-21 && hp = 10-").unwrap().evaluate(&context),
        Ok(false)
    );
    assert_eq!(
        parse_condition("attack = */*/2-21 && hp = 20").unwrap().evaluate(&context),
        Ok(true)
    );
    assert_eq!(
        parse_condition("attack = */*/22+").unwrap().evaluate(&context),
        Ok(false)
    );
    assert_eq!(parse_calc("attack * 2").unwrap().evaluate(&context), Ok(vec![22.0]));
    assert_eq!(
        parse_calc("startingLevel + hp").unwrap().evaluate(&context),
        Ok(vec![25.0])
    );
}

#[test]
fn clearing_an_observation_widens_the_domain_again() {
    let registry = execute(starter(), TrackerCommand::clear("Starter", 5));
    let inferred = registry.get("Starter").unwrap().infer();
    assert_eq!(inferred.ranges.attack.boosted, IvRange::FULL);
}
