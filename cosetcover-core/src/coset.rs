//! The coset abstraction shared by the rank-1 and rank-2 instantiations.

use crate::ambient::AmbientSpace;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use std::fmt;
use std::hash::Hash;

/// Point type of the ambient space a coset lives in.
pub type Point<C> = <<C as Coset>::Space as AmbientSpace>::Point;

/// Index of a coset: finite for full-rank cosets, infinite otherwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Index {
    Finite(BigInt),
    Infinite,
}

impl Index {
    pub fn finite(&self) -> Option<&BigInt> {
        match self {
            Index::Finite(n) => Some(n),
            Index::Infinite => None,
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Finite(n) => write!(f, "{}", n),
            Index::Infinite => write!(f, "inf"),
        }
    }
}

/// A coset `a + H` of a subgroup H of the ambient space, in canonical form.
///
/// Degenerate cosets (the trivial one, and anything of less than full rank)
/// have infinite index and weight 0: they cannot help to cover the space.
/// Equality is set equality, and the total order sorts the trivial coset
/// first, then by rank (descending), index (ascending) and finally the
/// canonical order inside one index.
pub trait Coset: Sized + Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display {
    type Space: AmbientSpace;

    /// Rank of a full-rank coset (1 for Z, 2 for Z^2).
    const FULL_RANK: u8;

    /// The trivial coset, the seed of every chain of joins.
    fn trivial() -> Self;

    fn is_trivial(&self) -> bool;

    fn rank(&self) -> u8;

    /// Raw index N; 0 for every degenerate coset.
    fn modulus(&self) -> &BigInt;

    /// All `psi(N)` cosets of index N; empty for N = 0.
    fn full_cover(n: &BigInt) -> Vec<Self>;

    fn contains_point(&self, point: &Point<Self>) -> bool;

    fn contains(&self, other: &Self) -> bool;

    /// The smallest coset containing `self` and `point`.
    fn join(&self, point: &Point<Self>) -> Self;

    fn is_full_rank(&self) -> bool {
        self.rank() == Self::FULL_RANK
    }

    fn index(&self) -> Index {
        if self.is_full_rank() {
            Index::Finite(self.modulus().clone())
        } else {
            Index::Infinite
        }
    }

    /// `1/psi(N)` for full rank, 0 otherwise.
    fn weight(&self) -> BigRational {
        if self.is_full_rank() {
            BigRational::new(1.into(), <Self::Space as AmbientSpace>::psi(self.modulus()))
        } else {
            BigRational::zero()
        }
    }

    fn is_contained_in(&self, other: &Self) -> bool {
        other.contains(self)
    }
}
