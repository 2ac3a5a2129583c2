use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rand::Rng;
use ranking::{Config, Error, KnowledgeBase, Rank, Repair};

const NAMES: [&str; 4] = ["p", "q", "r", "s"];

/// A small knowledge base in rule text, including hard constraints and rules
/// which conflict with each other.
#[derive(Clone, Debug)]
struct Rules {
    num_vars: usize,
    rules: Vec<String>,
}

fn literal<G: Gen>(g: &mut G, num_vars: usize) -> String {
    let name = NAMES[g.gen_range(0, num_vars)];
    if g.gen() {
        format!("-{}", name)
    } else {
        name.to_string()
    }
}

impl Arbitrary for Rules {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let num_vars = g.gen_range(1, NAMES.len() + 1);
        let mut rules = Vec::new();

        for _ in 0..g.gen_range(1, 7) {
            let mut antecedent = Vec::new();
            for _ in 0..g.gen_range(0, 3) {
                antecedent.push(literal(g, num_vars));
            }
            let connective = if g.gen_ratio(1, 5) { "->" } else { "=>" };
            let consequent = if g.gen_ratio(1, 10) {
                "false".to_string()
            } else {
                literal(g, num_vars)
            };
            rules.push(format!(
                "{} {} {}",
                antecedent.join(" and "),
                connective,
                consequent
            ));
        }

        Rules { num_vars, rules }
    }
}

impl Rules {
    fn knowledge_base(&self, repair: Repair) -> KnowledgeBase {
        let mut kb = KnowledgeBase::with_config(Config {
            repair,
            rank_limit: 32,
            ..Config::default()
        });
        kb.declare(&NAMES[..self.num_vars].join(" ")).unwrap();
        kb
    }

    fn accepted(&self) -> Result<KnowledgeBase, Error> {
        let mut kb = self.knowledge_base(Repair::Worklist);
        kb.accept(&self.rules.join(", "))?;
        Ok(kb)
    }
}

#[quickcheck]
fn every_accepted_rule_holds(rules: Rules, rescan: bool) -> Result<bool, Error> {
    let repair = if rescan { Repair::Rescan } else { Repair::Worklist };
    let mut kb = rules.knowledge_base(repair);

    for (i, rule) in rules.rules.iter().enumerate() {
        kb.accept(rule)?;
        for earlier in &rules.rules[..=i] {
            if !kb.query(earlier)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

#[quickcheck]
fn reaccepting_is_idempotent(rules: Rules) -> Result<bool, Error> {
    let mut kb = rules.accepted()?;
    let before = kb.ranking().clone();

    for rule in &rules.rules {
        kb.accept(rule)?;
    }
    Ok(kb.ranking() == &before)
}

#[quickcheck]
fn queries_do_not_mutate(rules: Rules, probes: Rules) -> Result<bool, Error> {
    let kb = rules.accepted()?;
    let before = kb.ranking().clone();

    for probe in &probes.rules {
        // probes may name variables this knowledge base never declared
        let _ = kb.query(probe);
    }
    Ok(kb.ranking() == &before)
}

#[quickcheck]
fn ranks_only_increase(rules: Rules) -> Result<bool, Error> {
    let mut kb = rules.knowledge_base(Repair::Worklist);
    let mut previous = kb.ranking().clone();

    for rule in &rules.rules {
        kb.accept(rule)?;
        let raised = previous
            .iter()
            .all(|(world, rank)| kb.ranking()[world] >= rank);
        let infinity_kept = previous
            .iter()
            .filter(|(_, rank)| *rank == Rank::Infinite)
            .all(|(world, _)| kb.ranking()[world] == Rank::Infinite);
        if !(raised && infinity_kept) {
            return Ok(false);
        }
        previous = kb.ranking().clone();
    }
    Ok(true)
}

#[quickcheck]
fn failed_accept_is_atomic(rules: Rules) -> Result<bool, Error> {
    let mut kb = rules.accepted()?;
    let before = kb.ranking().clone();
    let count = kb.conditionals().len();

    let batch = format!("{}, {} => undeclared", rules.rules.join(", "), NAMES[0]);
    let rejected = matches!(kb.accept(&batch), Err(Error::UndeclaredVariable(_)));

    Ok(rejected && kb.ranking() == &before && kb.conditionals().len() == count)
}

#[quickcheck]
fn worlds_outside_every_exception_stay_at_zero(rules: Rules) -> Result<bool, Error> {
    let kb = rules.accepted()?;

    let exceptional = |world| {
        kb.conditionals()
            .iter()
            .any(|conditional| conditional.exception().map_or(false, |mask| mask.matches(world)))
    };
    let untouched = kb
        .ranking()
        .iter()
        .all(|(world, rank)| exceptional(world) || rank == Rank::ZERO);
    Ok(untouched)
}
