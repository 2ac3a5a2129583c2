mod worklist;

use crate::{
    misc::log::targets, Conditional, ConditionalIdx, Config, Error, Formula, Mask, Rank, Ranking,
    Repair, Variables,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{fmt, ops::Range};
use worklist::Worklist;

#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    config: Config,
    variables: Variables,
    ranking: Ranking,
    conditionals: Vec<Conditional>,
    stale: bool,
    rng: Option<StdRng>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            rng: config.shuffle.map(StdRng::seed_from_u64),
            config,
            variables: Variables::new(),
            ranking: Ranking::new(0),
            conditionals: Vec::new(),
            stale: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn conditionals(&self) -> &[Conditional] {
        &self.conditionals
    }

    /// Resets every rank. Accepted conditionals come back on the next
    /// [`accept`](KnowledgeBase::accept) or [`rebuild`](KnowledgeBase::rebuild).
    pub fn declare(&mut self, text: &str) -> Result<(), Error> {
        let names = self.variables.parse_declaration(text)?;

        let requested = self.variables.len() + names.len();
        let limit = std::cmp::min(self.config.max_variables, Config::MAX_VARIABLES);
        if requested > limit {
            return Err(Error::TooManyVariables { requested, limit });
        }

        self.variables.extend(names);
        self.ranking.reset(self.variables.len());

        if !self.conditionals.is_empty() {
            log::warn!(target: targets::DECLARE, "Discarded the ranks of {} conditionals", self.conditionals.len());
            self.stale = true;
        }
        log::debug!(target: targets::DECLARE, "{} variables, {} worlds", requested, self.ranking.num_worlds());
        Ok(())
    }

    pub fn parse(&self, text: &str) -> Result<Conditional, Error> {
        Conditional::parse(text, &self.variables)
    }

    /// Nothing changes unless the whole batch parses.
    pub fn accept(&mut self, text: &str) -> Result<(), Error> {
        let batch = text
            .split(',')
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
            .map(|rule| self.parse(rule))
            .collect::<Result<Vec<_>, _>>()?;

        if batch.is_empty() {
            return Err(Error::syntax(format!(
                "\"{}\" contains no conditionals",
                text
            )));
        }

        for conditional in batch {
            self.incorporate(conditional);
        }
        Ok(())
    }

    pub fn incorporate(&mut self, conditional: Conditional) {
        log::debug!(target: targets::ACCEPT, "{}", conditional.display(&self.variables));
        self.conditionals.push(conditional);

        let seeds = if self.stale {
            self.stale = false;
            0..self.conditionals.len()
        } else {
            self.conditionals.len() - 1..self.conditionals.len()
        };
        self.restore(seeds);
    }

    pub fn rebuild(&mut self) {
        self.ranking.reset(self.variables.len());
        self.stale = false;
        self.restore(0..self.conditionals.len());
    }

    pub fn query(&self, text: &str) -> Result<bool, Error> {
        let conditional = self.parse(text)?;
        let holds = self.entails(&conditional);
        log::trace!(target: targets::QUERY, "{} : {}", conditional.display(&self.variables), holds);
        Ok(holds)
    }

    pub fn entails(&self, conditional: &Conditional) -> bool {
        self.ranking.satisfies(conditional)
    }

    pub fn rank(&self, text: &str) -> Result<Rank, Error> {
        let mask = Formula::parse(text, &self.variables)?.mask();
        Ok(self.ranking.minimal_rank(self.ranking.satisfying(mask)))
    }

    fn restore(&mut self, seeds: Range<ConditionalIdx>) {
        let bumps = match self.config.repair {
            Repair::Worklist => {
                let mut worklist = Worklist::new(self.conditionals.len());
                for idx in seeds {
                    worklist.push(idx);
                }

                let mut bumps = 0;
                while let Some(idx) = worklist.pop() {
                    bumps += self.repair(idx, Some(&mut worklist));
                }
                bumps
            }
            Repair::Rescan => {
                let mut bumps = 0;
                for idx in seeds {
                    bumps += self.repair(idx, None);
                }
                bumps + self.rescan()
            }
        };
        log::debug!(target: targets::REPAIR, "Fixpoint over {} conditionals after {} bumps", self.conditionals.len(), bumps);
    }

    fn rescan(&mut self) -> usize {
        let mut bumps = 0;
        loop {
            let mut order = (0..self.conditionals.len()).collect::<Vec<_>>();
            if let Some(rng) = self.rng.as_mut() {
                order.shuffle(rng);
            }

            let mut violated = false;
            for idx in order {
                if !self.ranking.satisfies(&self.conditionals[idx]) {
                    violated = true;
                    bumps += self.repair(idx, None);
                }
            }

            if !violated {
                return bumps;
            }
        }
    }

    fn repair(&mut self, idx: ConditionalIdx, mut worklist: Option<&mut Worklist>) -> usize {
        let mut bumps = 0;
        while !self.ranking.satisfies(&self.conditionals[idx]) {
            let raised = self.bump(idx);
            bumps += 1;

            if let Some(worklist) = worklist.as_mut() {
                let queued = worklist.invalidate(raised, &self.conditionals);
                log::trace!(target: targets::REPAIR, "Bump of {} queued {}", idx, queued);
            }
        }
        bumps
    }

    /// Raises the exception worlds of the conditional by one, or pins them to
    /// infinity if its positive worlds are impossible.
    fn bump(&mut self, idx: ConditionalIdx) -> Option<Mask> {
        let conditional = &self.conditionals[idx];
        let exception = conditional.exception();
        let positive = self
            .ranking
            .minimal_rank(self.ranking.satisfying(conditional.positive()));

        if positive.is_infinite() {
            log::trace!(target: targets::REPAIR, "Pinned exceptions of {}", conditional.display(&self.variables));
            self.ranking.pin(exception);
        } else {
            let pinned = self.ranking.raise(exception, self.config.rank_limit);
            if pinned > 0 {
                log::warn!(target: targets::REPAIR, "{} worlds passed rank {} under {}", pinned, self.config.rank_limit, conditional.display(&self.variables));
            }
        }
        exception
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "--- propositions:")?;
        writeln!(f, "{}", self.variables.names().collect::<Vec<_>>().join(" "))?;
        writeln!(f)?;
        writeln!(f, "--- conditionals:")?;
        for conditional in &self.conditionals {
            writeln!(f, "{}", conditional.display(&self.variables))?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn knowledge_base(variables: &str, conditionals: &str) -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    kb.declare(variables).unwrap();
    kb.accept(conditionals).unwrap();
    kb
}

#[test]
fn single_default() -> Result<(), Error> {
    let kb = knowledge_base("bird fly", "bird => fly");

    assert_eq!(kb.rank("bird and fly")?, Rank::ZERO);
    assert_eq!(kb.rank("bird and -fly")?, Rank::Finite(1));
    assert_eq!(kb.rank("-bird")?, Rank::ZERO);
    assert!(kb.query("bird => fly")?);
    assert!(!kb.query("bird => -fly")?);
    assert!(!kb.query("true => bird")?);

    Ok(())
}

#[test]
fn material_implication_excludes_worlds() -> Result<(), Error> {
    let kb = knowledge_base("a b", "a -> b");

    let ranks = kb.ranking().iter().map(|(_, rank)| rank).collect::<Vec<_>>();
    assert_eq!(
        ranks,
        vec![Rank::ZERO, Rank::Infinite, Rank::ZERO, Rank::ZERO]
    );
    assert!(kb.query("a => b")?);
    assert!(kb.query("a -> b")?);
    assert!(!kb.query("true => -a")?);

    Ok(())
}

#[test]
fn penguins() -> Result<(), Error> {
    let kb = knowledge_base("p b f", "b => f, p => -f, p -> b");

    let ranks = kb.ranking().iter().map(|(_, rank)| rank).collect::<Vec<_>>();
    use Rank::{Finite, Infinite};
    assert_eq!(
        ranks,
        vec![
            Finite(0),
            Infinite,
            Finite(1),
            Finite(1),
            Finite(0),
            Infinite,
            Finite(0),
            Finite(2)
        ]
    );
    assert!(kb.query("p => -f")?);
    assert!(kb.query("b => f")?);
    assert!(kb.query("p => b")?);
    assert!(!kb.query("p => f")?);

    Ok(())
}

#[test]
fn self_defeating_default_pins() -> Result<(), Error> {
    let kb = knowledge_base("a b", "a => -a");

    assert_eq!(kb.rank("a")?, Rank::Infinite);
    assert_eq!(kb.rank("-a")?, Rank::ZERO);
    // nothing plausible is an `a` world, so anything follows from `a`
    assert!(kb.query("a => b")?);
    assert!(kb.query("a => -b")?);

    Ok(())
}

#[test]
fn conflicting_defaults_converge() -> Result<(), Error> {
    let mut kb = KnowledgeBase::with_config(Config {
        rank_limit: 16,
        ..Config::default()
    });
    kb.declare("a b")?;
    kb.accept("a => b, a => -b")?;

    assert_eq!(kb.rank("a")?, Rank::Infinite);
    assert_eq!(kb.rank("-a")?, Rank::ZERO);
    assert!(kb.query("a => b")?);
    assert!(kb.query("a => -b")?);

    Ok(())
}

#[test]
fn impossible_antecedents_hold_vacuously() -> Result<(), Error> {
    let kb = knowledge_base("a b", "a => b");

    assert!(kb.query("false => a")?);
    assert!(kb.query("a and -a => b")?);
    assert!(kb.query("a => true")?);
    assert!(!kb.query("a => false")?);

    Ok(())
}

#[test]
fn failed_accept_changes_nothing() -> Result<(), Error> {
    let mut kb = knowledge_base("a b c", "a => b");
    let before = kb.ranking().clone();

    assert!(matches!(
        kb.accept("b => c, c => d"),
        Err(Error::UndeclaredVariable(_))
    ));
    assert!(matches!(kb.accept("b => c, c b"), Err(Error::Syntax(_))));
    assert!(matches!(kb.accept(" , "), Err(Error::Syntax(_))));

    assert_eq!(kb.conditionals().len(), 1);
    assert_eq!(kb.ranking(), &before);
    assert!(!kb.query("b => c")?);

    Ok(())
}

#[test]
fn queries_need_declared_variables() {
    let kb = knowledge_base("a b", "a => b");

    assert_eq!(
        kb.query("a => z"),
        Err(Error::UndeclaredVariable("\"z\" in \"a => z\"".to_string()))
    );
    assert!(matches!(kb.query("a b"), Err(Error::Syntax(_))));
}

#[test]
fn declaring_resets_then_rebuilds() -> Result<(), Error> {
    let mut kb = knowledge_base("a b", "a => b");
    assert_eq!(kb.rank("a and -b")?, Rank::Finite(1));

    kb.declare("c")?;
    assert_eq!(kb.ranking().num_worlds(), 8);
    assert!(kb.ranking().iter().all(|(_, rank)| rank == Rank::ZERO));

    kb.accept("c => a")?;
    assert!(kb.query("a => b")?);
    assert!(kb.query("c => a")?);
    assert_eq!(kb.rank("a and -b")?, Rank::Finite(1));

    let mut again = kb.clone();
    again.rebuild();
    assert_eq!(again.ranking(), kb.ranking());

    Ok(())
}

#[test]
fn declaration_limits() {
    let mut kb = KnowledgeBase::with_config(Config {
        max_variables: 3,
        ..Config::default()
    });

    assert_eq!(
        kb.declare("a b c d"),
        Err(Error::TooManyVariables {
            requested: 4,
            limit: 3
        })
    );
    assert!(kb.variables().is_empty());
    assert!(kb.declare("a b c").is_ok());
    assert_eq!(
        kb.declare("a"),
        Err(Error::DuplicateVariable("a".to_string()))
    );
}

#[test]
fn rescan_agrees_with_worklist() -> Result<(), Error> {
    let rules = "b => f, p => -f, p -> b, f => w, p and w => s";
    let mut rescan = KnowledgeBase::with_config(Config {
        repair: Repair::Rescan,
        ..Config::default()
    });
    rescan.declare("p b f w s")?;
    rescan.accept(rules)?;

    let worklist = knowledge_base("p b f w s", rules);
    assert_eq!(rescan.ranking(), worklist.ranking());

    Ok(())
}

#[test]
fn displays_contents() {
    let kb = knowledge_base("load sound", "load => sound, sound -> load");
    assert_eq!(
        kb.to_string(),
        "--- propositions:\nload sound\n\n--- conditionals:\nload => sound\n-load and sound => false\n"
    );
}
