use derive_more::{Add, Display, From, Into};

/// The cost of a sequence of [Edit][crate::Edit]s under the unit-cost model.
///
/// Inserting or removing a node costs one, relabeling a node costs one if the labels differ and
/// nothing otherwise.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Display, From, Into, Add)]
pub struct Cost(usize);

impl Cost {
    /// The cost of doing nothing.
    pub const ZERO: Self = Cost(0);

    /// The cost of inserting or removing a single node.
    pub const UNIT: Self = Cost(1);

    /// Returns the cost of replacing a node labeled `a` by one labeled `b`.
    #[inline]
    pub fn relabel<L: PartialEq + ?Sized>(a: &L, b: &L) -> Self {
        if a == b {
            Self::ZERO
        } else {
            Self::UNIT
        }
    }

    /// Whether this is the cost of doing nothing.
    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl From<Cost> for f64 {
    #[inline]
    fn from(Cost(c): Cost) -> Self {
        c as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn relabeling_is_free_only_between_equal_labels(a: u8, b: u8) {
        assert_eq!(Cost::relabel(&a, &b).is_zero(), a == b);
    }

    #[proptest]
    fn costs_add_like_whole_numbers(a: u16, b: u16) {
        let c = Cost::from(a as usize) + Cost::from(b as usize);
        assert_eq!(usize::from(c), a as usize + b as usize);
        assert_eq!(f64::from(c), a as f64 + b as f64);
    }
}
