use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Finite(u32),
    Infinite,
}

impl Rank {
    pub const ZERO: Rank = Rank::Finite(0);

    pub fn is_infinite(self) -> bool {
        matches!(self, Rank::Infinite)
    }

    /// The next rank up, or infinity once `limit` would be passed.
    pub fn raised(self, limit: u32) -> Rank {
        match self {
            Rank::Finite(n) if n < limit => Rank::Finite(n + 1),
            _ => Rank::Infinite,
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::ZERO
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rank::Finite(n) => write!(f, "{}", n),
            Rank::Infinite => write!(f, "infinity"),
        }
    }
}

#[test]
fn infinity_is_maximal() {
    assert!(Rank::ZERO < Rank::Finite(1));
    assert!(Rank::Finite(u32::MAX) < Rank::Infinite);
    assert_eq!(
        vec![Rank::Infinite, Rank::Finite(3), Rank::ZERO]
            .into_iter()
            .min(),
        Some(Rank::ZERO)
    );
}

#[test]
fn raising_ranks() {
    assert_eq!(Rank::ZERO.raised(10), Rank::Finite(1));
    assert_eq!(Rank::Finite(9).raised(10), Rank::Finite(10));
    assert_eq!(Rank::Finite(10).raised(10), Rank::Infinite);
    assert_eq!(Rank::Infinite.raised(10), Rank::Infinite);
    assert_eq!(Rank::Infinite.to_string(), "infinity");
}
