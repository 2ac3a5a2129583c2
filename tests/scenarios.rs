use ranking::{Config, Error, KnowledgeBase, Rank, Repair};
use std::collections::BTreeMap;

/// Yale shooting with a reanimation: shooting at 1 kills and unloads, reanimating
/// at 2 revives, everything else persists.
const SHOOTING_VARIABLES: &str = "l0 l1 l2 l3 a0 a1 a2 a3 s1 r2";
const SHOOTING: &str = "a1 and l1 and s1 and r2 => -a2, a1 and l1 and s1 and r2 => -l2, -a2 and s1 and r2 => a3,\
    a0 and l0 and s1 and r2 => a1, a0 and l0 and s1 and r2 => l1, \
    -a0 and l0 and s1 and r2 => -a1, -a0 and l0 and s1 and r2 => l1, \
    a0 and -l0 and s1 and r2 => a1, a0 and -l0 and s1 and r2 => -l1,\
    -a0 and -l0 and s1 and r2 => -a1, -a0 and -l0 and s1 and r2 => -l1,\
    -a1 and l1 and s1 and r2 => -a2, -a1 and l1 and s1 and r2 => l2,\
    a1 and -l1 and s1 and r2 => a2, a1 and -l1 and s1 and r2 => -l2,\
    -a1 and -l1 and s1 and r2 => -a2, -a1 and -l1 and s1 and r2 => -l2,\
    a2 and s1 and r2 => a3,\
    l2 and s1 and r2 => l3,\
    -l2 and s1 and r2 => -l3";
const SHOOTING_SITUATION: &str = "l0 and a0 and s1 and r2";

/// Stanford murder mystery: the victim was alive before and dead after a
/// shot, so the gun must have been loaded throughout.
const POSTDICTION_VARIABLES: &str = "a0 a1 a2 l0 l1 l2 s0";
const POSTDICTION: &str = "a0 and l0 and s0 => -a1,\
    l0 and s0 => l1, -l0 and s0 => -l1,\
    a0 and -l0 and s0 => a1, a0 and -l0 and s0 => -l0,\
    -a0 and l0 and s0 => -a1, -a0 and l0 and s0 => l1,\
    -a0 and -l0 and s0 => -a1, -a0 and -l0 and s0 => -l1,\
    a1 and l1 and s0 => a2, a1 and l1 and s0 => l2,\
    -a1 and l1 and s0 => -a2, -a1 and l1 and s0 => l2,\
    a1 and -l1 and s0 => a2, a1 and -l1 and s0 => -l2,\
    -a1 and -l1 and s0 => -a2, -a1 and -l1 and s0 => -l2";
const POSTDICTION_SITUATION: &str = "a0 and -a2 and s0";

const CONFLICT_VARIABLES: &str = "load sound loaded shoot dead fly";
const CONFLICT: &str = "load=>sound, load=>loaded, shoot and loaded=>dead, sound=>fly, fly=>-dead";

fn build(config: Config, variables: &str, rules: &str) -> Result<KnowledgeBase, Error> {
    let mut kb = KnowledgeBase::with_config(config);
    kb.declare(variables)?;
    kb.accept(rules)?;
    Ok(kb)
}

fn reversed(rules: &str) -> String {
    let mut rules = rules.split(',').map(str::trim).collect::<Vec<_>>();
    rules.reverse();
    rules.join(", ")
}

/// For each fluent: `Some(value)` when the situation entails it or its
/// negation, `None` when it entails neither.
fn fluents(kb: &KnowledgeBase, situation: &str, names: &[&str]) -> Result<Vec<Option<bool>>, Error> {
    let mut values = Vec::new();
    for name in names {
        let positive = kb.query(&format!("{} => {}", situation, name))?;
        let negative = kb.query(&format!("{} => -{}", situation, name))?;
        assert!(!(positive && negative), "{} and -{} both entailed", name, name);
        values.push(match (positive, negative) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        });
    }
    Ok(values)
}

fn histogram(kb: &KnowledgeBase) -> BTreeMap<Rank, usize> {
    let mut counts = BTreeMap::new();
    for (_, rank) in kb.ranking().iter() {
        *counts.entry(rank).or_insert(0) += 1;
    }
    counts
}

fn ranks(counts: &[(u32, usize)]) -> BTreeMap<Rank, usize> {
    counts
        .iter()
        .map(|(rank, count)| (Rank::Finite(*rank), *count))
        .collect()
}

#[test]
fn shooting_projects_forwards() -> Result<(), Error> {
    let kb = build(Config::default(), SHOOTING_VARIABLES, SHOOTING)?;

    let alive = fluents(&kb, SHOOTING_SITUATION, &["a0", "a1", "a2", "a3"])?;
    let loaded = fluents(&kb, SHOOTING_SITUATION, &["l0", "l1", "l2", "l3"])?;
    assert_eq!(alive, vec![Some(true), Some(true), Some(false), Some(true)]);
    assert_eq!(loaded, vec![Some(true), Some(true), Some(false), Some(false)]);

    assert!(kb.query("l0 and a0 and s1 and r2 => a3")?);
    assert!(!kb.query("l0 and a0 and s1 and r2 => -a3")?);

    assert_eq!(
        histogram(&kb),
        ranks(&[(0, 772), (1, 24), (2, 60), (3, 80), (4, 60), (5, 24), (6, 4)])
    );

    Ok(())
}

#[test]
fn postdiction_recovers_the_loaded_gun() -> Result<(), Error> {
    let kb = build(Config::default(), POSTDICTION_VARIABLES, POSTDICTION)?;

    let alive = fluents(&kb, POSTDICTION_SITUATION, &["a0", "a1", "a2"])?;
    let loaded = fluents(&kb, POSTDICTION_SITUATION, &["l0", "l1", "l2"])?;
    assert_eq!(alive, vec![Some(true), Some(false), Some(false)]);
    assert_eq!(loaded, vec![Some(true), Some(true), Some(true)]);

    assert_eq!(
        histogram(&kb),
        ranks(&[(0, 68), (1, 16), (2, 24), (3, 16), (4, 4)])
    );

    Ok(())
}

#[test]
fn conflicting_defaults() -> Result<(), Error> {
    let kb = build(Config::default(), CONFLICT_VARIABLES, CONFLICT)?;

    assert!(!kb.query("load and shoot => -dead")?);
    assert!(!kb.query("load and shoot => dead")?);
    assert!(kb.query("load => fly")?);
    assert!(kb.query("shoot and loaded => dead")?);

    assert_eq!(histogram(&kb), ranks(&[(0, 14), (1, 30), (2, 18), (3, 2)]));

    Ok(())
}

#[test]
fn every_accepted_rule_holds() -> Result<(), Error> {
    for (variables, rules) in &[
        (SHOOTING_VARIABLES, SHOOTING),
        (POSTDICTION_VARIABLES, POSTDICTION),
        (CONFLICT_VARIABLES, CONFLICT),
    ] {
        let mut kb = KnowledgeBase::new();
        kb.declare(variables)?;

        let rules = rules.split(',').map(str::trim).collect::<Vec<_>>();
        for (i, rule) in rules.iter().enumerate() {
            kb.accept(rule)?;
            for earlier in &rules[..=i] {
                assert!(kb.query(earlier)?, "{} broken after accepting {}", earlier, rule);
            }
        }
    }
    Ok(())
}

#[test]
fn rankings_do_not_depend_on_rule_order() -> Result<(), Error> {
    for (variables, rules) in &[(SHOOTING_VARIABLES, SHOOTING), (CONFLICT_VARIABLES, CONFLICT)] {
        let expected = build(Config::default(), variables, rules)?;

        let backwards = build(Config::default(), variables, &reversed(rules))?;
        assert_eq!(backwards.ranking(), expected.ranking());

        let rescan = Config {
            repair: Repair::Rescan,
            ..Config::default()
        };
        assert_eq!(build(rescan.clone(), variables, rules)?.ranking(), expected.ranking());

        for seed in 0..4 {
            let shuffled = Config {
                shuffle: Some(seed),
                ..rescan.clone()
            };
            assert_eq!(
                build(shuffled.clone(), variables, rules)?.ranking(),
                expected.ranking()
            );
            assert_eq!(
                build(shuffled, variables, &reversed(rules))?.ranking(),
                expected.ranking()
            );
        }
    }
    Ok(())
}

#[test]
fn postdiction_answers_do_not_depend_on_rule_order() -> Result<(), Error> {
    let names = ["a0", "a1", "a2", "l0", "l1", "l2"];
    let expected = fluents(
        &build(Config::default(), POSTDICTION_VARIABLES, POSTDICTION)?,
        POSTDICTION_SITUATION,
        &names,
    )?;

    let rescan = Config {
        repair: Repair::Rescan,
        ..Config::default()
    };
    let mut variants = vec![
        build(Config::default(), POSTDICTION_VARIABLES, &reversed(POSTDICTION))?,
        build(rescan.clone(), POSTDICTION_VARIABLES, POSTDICTION)?,
    ];
    for seed in 0..4 {
        let shuffled = Config {
            shuffle: Some(seed),
            ..rescan.clone()
        };
        variants.push(build(shuffled, POSTDICTION_VARIABLES, &reversed(POSTDICTION))?);
    }

    for kb in &variants {
        assert_eq!(fluents(kb, POSTDICTION_SITUATION, &names)?, expected);
    }
    Ok(())
}

#[test]
fn queries_leave_the_ranking_alone() -> Result<(), Error> {
    let kb = build(Config::default(), CONFLICT_VARIABLES, CONFLICT)?;
    let before = kb.ranking().clone();

    for _ in 0..3 {
        kb.query("load and shoot => -dead")?;
        kb.query("fly => dead")?;
        kb.query("load -> loaded")?;
        assert!(kb.query("load => dragon").is_err());
    }
    assert_eq!(kb.ranking(), &before);

    Ok(())
}

#[test]
fn reaccepting_changes_nothing() -> Result<(), Error> {
    let mut kb = build(Config::default(), CONFLICT_VARIABLES, CONFLICT)?;
    let before = kb.ranking().clone();

    kb.accept(CONFLICT)?;
    assert_eq!(kb.ranking(), &before);
    assert_eq!(kb.conditionals().len(), 10);

    Ok(())
}

#[test]
fn late_declaration_resets_ranks() -> Result<(), Error> {
    let mut kb = build(Config::default(), CONFLICT_VARIABLES, CONFLICT)?;
    kb.declare("wing")?;

    assert_eq!(kb.ranking().num_worlds(), 128);
    assert_eq!(histogram(&kb), ranks(&[(0, 128)]));

    kb.rebuild();
    assert!(!kb.query("load and shoot => -dead")?);
    assert_eq!(histogram(&kb), ranks(&[(0, 28), (1, 60), (2, 36), (3, 4)]));

    Ok(())
}
