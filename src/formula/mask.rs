use crate::{Literal, World};

/// The worlds whose `care` bits equal `value`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Mask {
    care: usize,
    value: usize,
}

impl Mask {
    pub const FREE: Mask = Mask { care: 0, value: 0 };

    pub fn with(self, literal: Literal) -> Option<Mask> {
        let (bit, value) = (literal.bit(), literal.value());

        if self.care & bit != 0 && self.value & bit != value {
            None
        } else {
            Some(Mask {
                care: self.care | bit,
                value: self.value | value,
            })
        }
    }

    pub fn care(self) -> usize {
        self.care
    }

    pub fn value(self) -> usize {
        self.value
    }

    #[inline]
    pub fn matches(self, world: World) -> bool {
        world & self.care == self.value
    }

    /// Whether some world matches both masks.
    #[inline]
    pub fn overlaps(self, other: Mask) -> bool {
        (self.value ^ other.value) & self.care & other.care == 0
    }
}

#[test]
fn building_masks() {
    let (a, b) = (Literal::new(0, true), Literal::new(2, false));

    let mask = Mask::FREE.with(a).and_then(|m| m.with(b)).unwrap();
    assert!(mask.matches(0b001));
    assert!(mask.matches(0b011));
    assert!(!mask.matches(0b101));
    assert!(!mask.matches(0b000));

    assert_eq!(mask.with(a), Some(mask));
    assert_eq!(mask.with(!a), None);
}

#[test]
fn overlapping_masks() {
    let (a, b, c) = (
        Literal::new(0, true),
        Literal::new(1, true),
        Literal::new(2, true),
    );
    let ab = Mask::FREE.with(a).and_then(|m| m.with(b)).unwrap();
    let not_a = Mask::FREE.with(!a).unwrap();
    let c = Mask::FREE.with(c).unwrap();

    assert!(ab.overlaps(c));
    assert!(!ab.overlaps(not_a));
    assert!(not_a.overlaps(c));
    assert!(Mask::FREE.overlaps(ab));
}
