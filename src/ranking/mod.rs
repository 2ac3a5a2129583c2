mod rank;

pub use rank::Rank;

use crate::{Conditional, Mask, World};
use std::ops::Index;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ranking {
    ranks: Vec<Rank>,
}

impl Ranking {
    pub fn new(num_vars: usize) -> Self {
        Self {
            ranks: vec![Rank::ZERO; 1 << num_vars],
        }
    }

    pub fn reset(&mut self, num_vars: usize) {
        *self = Self::new(num_vars);
    }

    pub fn num_worlds(&self) -> usize {
        self.ranks.len()
    }

    pub fn satisfying(&self, mask: Option<Mask>) -> Satisfying {
        let all = self.ranks.len() - 1;
        match mask {
            Some(mask) if mask.care() & !all == 0 => {
                Satisfying {
                    value: mask.value(),
                    free: !mask.care() & all,
                    next: Some(0),
                }
            }
            _ => Satisfying {
                value: 0,
                free: 0,
                next: None,
            },
        }
    }

    pub fn minimal_rank(&self, worlds: impl IntoIterator<Item = World>) -> Rank {
        worlds
            .into_iter()
            .map(|world| self.ranks[world])
            .min()
            .unwrap_or(Rank::Infinite)
    }

    /// A conditional without possible exceptions holds vacuously.
    pub fn satisfies(&self, conditional: &Conditional) -> bool {
        match self.minimal_rank(self.satisfying(conditional.exception())) {
            Rank::Infinite => true,
            exception => self.minimal_rank(self.satisfying(conditional.positive())) < exception,
        }
    }

    /// Raises every world matching the mask by one, pinning to infinity any
    /// world that would pass `limit`. Returns the number of newly pinned worlds.
    pub(crate) fn raise(&mut self, mask: Option<Mask>, limit: u32) -> usize {
        let mut pinned = 0;
        for world in self.satisfying(mask) {
            let rank = self.ranks[world];
            let raised = rank.raised(limit);
            if raised.is_infinite() && !rank.is_infinite() {
                pinned += 1;
            }
            self.ranks[world] = raised;
        }
        pinned
    }

    pub(crate) fn pin(&mut self, mask: Option<Mask>) {
        for world in self.satisfying(mask) {
            self.ranks[world] = Rank::Infinite;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (World, Rank)> + '_ {
        self.ranks.iter().copied().enumerate()
    }

    pub fn by_rank(&self) -> Vec<(World, Rank)> {
        let mut worlds = self.iter().collect::<Vec<_>>();
        worlds.sort_by_key(|(_, rank)| *rank);
        worlds
    }
}

impl Index<World> for Ranking {
    type Output = Rank;

    #[inline]
    fn index(&self, world: World) -> &Self::Output {
        &self.ranks[world]
    }
}

/// Iterates the worlds matching a mask by walking the subsets of its free bits.
pub struct Satisfying {
    value: usize,
    free: usize,
    next: Option<usize>,
}

impl Iterator for Satisfying {
    type Item = World;

    fn next(&mut self) -> Option<World> {
        let subset = self.next?;
        self.next = if subset == self.free {
            None
        } else {
            Some((subset | !self.free).wrapping_add(1) & self.free)
        };
        Some(self.value | subset)
    }
}

#[cfg(test)]
use crate::{variables::declared, Formula};

#[cfg(test)]
fn mask(text: &str, names: &str) -> Option<Mask> {
    Formula::parse(text, &declared(names)).unwrap().mask()
}

#[test]
fn satisfying_worlds() {
    let ranking = Ranking::new(3);

    assert_eq!(
        ranking.satisfying(mask("a", "a b c")).collect::<Vec<_>>(),
        vec![0b001, 0b011, 0b101, 0b111]
    );
    assert_eq!(
        ranking.satisfying(mask("-a and c", "a b c")).collect::<Vec<_>>(),
        vec![0b100, 0b110]
    );
    assert_eq!(
        ranking.satisfying(mask("a and -b and c", "a b c")).collect::<Vec<_>>(),
        vec![0b101]
    );
    assert_eq!(ranking.satisfying(mask("true", "a b c")).count(), 8);
    assert_eq!(ranking.satisfying(mask("a and -a", "a b c")).count(), 0);
    assert_eq!(ranking.satisfying(None).count(), 0);
}

#[test]
fn no_variables_one_world() {
    let ranking = Ranking::new(0);
    assert_eq!(ranking.num_worlds(), 1);
    assert_eq!(ranking.satisfying(Some(Mask::FREE)).collect::<Vec<_>>(), vec![0]);
}

#[test]
fn minimal_ranks() {
    let mut ranking = Ranking::new(2);
    let a = mask("a", "a b");

    assert_eq!(ranking.minimal_rank(ranking.satisfying(a)), Rank::ZERO);
    assert_eq!(ranking.minimal_rank(std::iter::empty()), Rank::Infinite);

    assert_eq!(ranking.raise(a, 10), 0);
    assert_eq!(ranking[0b01], Rank::Finite(1));
    assert_eq!(ranking[0b10], Rank::ZERO);
    assert_eq!(ranking.minimal_rank(ranking.satisfying(a)), Rank::Finite(1));

    ranking.pin(mask("a and b", "a b"));
    assert_eq!(ranking[0b11], Rank::Infinite);
    assert_eq!(ranking.minimal_rank(ranking.satisfying(a)), Rank::Finite(1));
}

#[test]
fn raising_past_the_limit_pins() {
    let mut ranking = Ranking::new(1);
    let a = mask("a", "a");

    assert_eq!(ranking.raise(a, 1), 0);
    assert_eq!(ranking.raise(a, 1), 1);
    assert_eq!(ranking[1], Rank::Infinite);
    assert_eq!(ranking.raise(a, 1), 0);
    assert_eq!(ranking[0], Rank::ZERO);
}

#[test]
fn reset_re_enumerates() {
    let mut ranking = Ranking::new(2);
    ranking.pin(Some(Mask::FREE));
    ranking.reset(3);
    assert_eq!(ranking.num_worlds(), 8);
    assert!(ranking.iter().all(|(_, rank)| rank == Rank::ZERO));
}

#[test]
fn ordering_by_rank() {
    let mut ranking = Ranking::new(2);
    ranking.pin(mask("a and b", "a b"));
    ranking.raise(mask("-a", "a b"), 10);

    assert_eq!(
        ranking.by_rank(),
        vec![
            (0b01, Rank::ZERO),
            (0b00, Rank::Finite(1)),
            (0b10, Rank::Finite(1)),
            (0b11, Rank::Infinite)
        ]
    );
}
