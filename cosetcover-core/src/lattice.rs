//! Subgroups of Z^2 encoded as `L(c:d;N)`.
//!
//! For `N > 0`, `L(c:d;N) = {(x, y) : N | x*d - y*c}` is the cocyclic lattice
//! of index N attached to the point `(c : d)` of P^1(Z/NZ). For `N = 0` the
//! same triple names the rank-1 subgroup spanned by the primitive vector
//! `(c, d)`, and `L(0:0;0)` is the zero subgroup.

use crate::ambient::{AmbientSpace, IntegerPlane};
use crate::arith::{self, divides, wedge, xgcd, Vector2};
use crate::coset::Coset;
use crate::error::{CoverError, Result};
use crate::progression::parse_int;
use crate::projective_line::{self, ProjectiveLine};
use crate::smith::smith_normal_form;
use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Lattice {
    index: BigInt,
    c: BigInt,
    d: BigInt,
    /// Reduced P^1 pair (rank 2) or normalised direction (rank 1); it orders
    /// lattices of equal rank and index the same way the order index does.
    key: Vector2,
}

impl Lattice {
    /// Build `L(c:d;N)`.
    ///
    /// For `N > 0` the pair is normalised to its canonical coprime
    /// representative and must satisfy `gcd(c, d, N) = 1`. For `N = 0` a
    /// non-zero `(c, d)` gives the line through it, and `(0, 0)` the zero
    /// subgroup.
    pub fn new(n: impl Into<BigInt>, c: impl Into<BigInt>, d: impl Into<BigInt>) -> Result<Self> {
        let n = n.into();
        let c = c.into();
        let d = d.into();
        if n.is_negative() {
            return Err(CoverError::InvalidIndex(n));
        }
        if n.is_zero() {
            return Ok(Self::line(&(c, d)));
        }
        let reduced = projective_line::normalize(&n, &c, &d).ok_or_else(|| {
            CoverError::MalformedRepresentative {
                index: n.clone(),
                c: c.clone(),
                d: d.clone(),
            }
        })?;
        Ok(Self::from_reduced(n, reduced))
    }

    /// The rank-1 subgroup containing `v`, or the zero subgroup for `v = 0`.
    pub fn line(v: &Vector2) -> Self {
        let g = arith::gcd(&v.0, &v.1);
        if g.is_zero() {
            return Self::trivial();
        }
        let (mut c, mut d) = (&v.0 / &g, &v.1 / &g);
        if c.is_negative() || (c.is_zero() && d.is_negative()) {
            c = -c;
            d = -d;
        }
        Self {
            index: BigInt::zero(),
            key: (c.clone(), d.clone()),
            c,
            d,
        }
    }

    /// Encode the subgroup of Z^2 generated by `generators`.
    ///
    /// Rank-2 subgroups must be cocyclic (Z^2/L cyclic) to have an
    /// `L(c:d;N)` form. A rank-1 result is identified by its direction
    /// only: `[(2, 0)]` gives the line through `(1, 0)`.
    pub fn from_generators(generators: &[Vector2]) -> Result<Self> {
        if generators.is_empty() {
            return Ok(Self::trivial());
        }
        let entries: Vec<BigInt> = generators
            .iter()
            .flat_map(|(x, y)| [x.clone(), y.clone()])
            .collect();
        let snf = smith_normal_form(&DMatrix::from_row_slice(generators.len(), 2, &entries));
        let v = &snf.right;
        // first row of V^{-1}, up to sign
        let direction = (v[(1, 1)].clone(), -v[(0, 1)].clone());
        match snf.elementary_divisors().as_slice() {
            [] => Ok(Self::trivial()),
            [_] => Ok(Self::line(&direction)),
            [d1, d2, ..] => {
                let index = d1 * d2;
                if !d1.is_one() {
                    return Err(CoverError::NotCocyclic {
                        index,
                        elementary_divisor: d1.clone(),
                    });
                }
                Self::new(index, direction.0, direction.1)
            }
        }
    }

    /// Full-rank lattice through a primitive vector.
    fn cocyclic(n: BigInt, v: &Vector2) -> Self {
        match projective_line::normalize(&n, &v.0, &v.1) {
            Some(reduced) => Self::from_reduced(n, reduced),
            None => unreachable!("({}, {}) is primitive, so it is a point mod {}", v.0, v.1, n),
        }
    }

    fn from_reduced(n: BigInt, reduced: Vector2) -> Self {
        let (c, d) = projective_line::lift(&n, &reduced);
        Self {
            index: n,
            c,
            d,
            key: reduced,
        }
    }

    pub fn vector(&self) -> Vector2 {
        (self.c.clone(), self.d.clone())
    }

    /// A Z-basis: empty, `[v]`, or `[v, (N*y, -N*x)]` with `x*c + y*d = 1`.
    pub fn basis(&self) -> Vec<Vector2> {
        match self.rank() {
            0 => Vec::new(),
            1 => vec![self.vector()],
            _ => {
                let (g, x, y) = xgcd(&self.c, &self.d);
                debug_assert!(g.is_one(), "representative of {} is not coprime", self);
                vec![self.vector(), (&self.index * &y, -(&self.index * &x))]
            }
        }
    }

    /// Position of `(c : d)` in P^1(Z/NZ); `None` below full rank.
    pub fn order_index(&self) -> Option<usize> {
        if self.rank() < 2 {
            return None;
        }
        IntegerPlane::order_index(&self.index, &self.vector())
    }

    /// Number of full-rank lattices with this index (0 below full rank).
    pub fn psi(&self) -> BigInt {
        IntegerPlane::psi(&self.index)
    }
}

impl Coset for Lattice {
    type Space = IntegerPlane;

    const FULL_RANK: u8 = 2;

    fn trivial() -> Self {
        Self {
            index: BigInt::zero(),
            c: BigInt::zero(),
            d: BigInt::zero(),
            key: (BigInt::zero(), BigInt::zero()),
        }
    }

    fn is_trivial(&self) -> bool {
        self.index.is_zero() && self.c.is_zero() && self.d.is_zero()
    }

    fn rank(&self) -> u8 {
        if !self.index.is_zero() {
            2
        } else if self.is_trivial() {
            0
        } else {
            1
        }
    }

    fn modulus(&self) -> &BigInt {
        &self.index
    }

    fn full_cover(n: &BigInt) -> Vec<Self> {
        let line = ProjectiveLine::new(n);
        line.reduced_points()
            .iter()
            .map(|reduced| Self::from_reduced(n.clone(), reduced.clone()))
            .collect()
    }

    fn contains_point(&self, w: &Vector2) -> bool {
        if self.is_trivial() {
            return w.0.is_zero() && w.1.is_zero();
        }
        divides(&self.index, &wedge(w, &self.vector()))
    }

    fn contains(&self, other: &Self) -> bool {
        divides(&self.index, &other.index) && self.contains_point(&other.vector())
    }

    fn join(&self, w: &Vector2) -> Self {
        match self.rank() {
            0 => Self::line(w),
            1 => {
                let det = wedge(&self.vector(), w).abs();
                if det.is_zero() {
                    self.clone()
                } else {
                    Self::cocyclic(det, &self.vector())
                }
            }
            _ => Self::cocyclic(
                arith::gcd(&self.index, &wedge(&self.vector(), w)),
                &self.vector(),
            ),
        }
    }
}

impl PartialEq for Lattice {
    fn eq(&self, other: &Self) -> bool {
        if self.index != other.index {
            return false;
        }
        if self.is_trivial() || other.is_trivial() {
            return self.is_trivial() && other.is_trivial();
        }
        self.rank() == other.rank() && other.contains_point(&self.vector())
    }
}

impl Eq for Lattice {}

impl Hash for Lattice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.key.hash(state);
    }
}

impl Ord for Lattice {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_trivial()
            .cmp(&self.is_trivial())
            .then_with(|| other.rank().cmp(&self.rank()))
            .then_with(|| self.index.cmp(&other.index))
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl PartialOrd for Lattice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L({}:{};{})", self.c, self.d, self.index)
    }
}

impl FromStr for Lattice {
    type Err = CoverError;

    /// Parses `L(c:d;N)`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || CoverError::Parse(format!("expected L(c:d;N), got {:?}", s));
        let inner = s
            .trim()
            .strip_prefix("L(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(bad)?;
        let (pair, n) = inner.split_once(';').ok_or_else(bad)?;
        let (c, d) = pair.split_once(':').ok_or_else(bad)?;
        Self::new(parse_int(n)?, parse_int(c)?, parse_int(d)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coset::Index;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    fn vec2(x: i64, y: i64) -> Vector2 {
        (big(x), big(y))
    }

    fn lat(n: i64, c: i64, d: i64) -> Lattice {
        Lattice::new(n, c, d).unwrap()
    }

    #[test]
    fn test_normalisation_is_idempotent() {
        // 3 is a unit mod 10
        assert_eq!(lat(10, 3, 4), lat(10, 9, 12));
        assert_eq!(lat(10, 3, 4).vector(), lat(10, 9, 12).vector());
        let l = lat(12, 5, 7);
        let (c, d) = l.vector();
        let again = Lattice::new(12, c, d).unwrap();
        assert_eq!(again.vector(), l.vector());
        assert_eq!(again, l);
    }

    #[test]
    fn test_malformed_and_invalid() {
        assert!(matches!(
            Lattice::new(10, 2, 4),
            Err(CoverError::MalformedRepresentative { .. })
        ));
        assert!(matches!(Lattice::new(-3, 1, 0), Err(CoverError::InvalidIndex(_))));
    }

    #[test]
    fn test_ranks_and_weights() {
        let zero = lat(0, 0, 0);
        assert!(zero.is_trivial());
        assert_eq!(zero.rank(), 0);
        assert_eq!(lat(0, 2, 4).rank(), 1);
        assert_eq!(lat(0, 2, 4), lat(0, -1, -2));
        assert_eq!(lat(0, 2, 4).index(), Index::Infinite);
        assert_eq!(lat(6, 1, 0).psi(), big(12));
        assert_eq!(lat(6, 1, 0).weight(), num_rational::BigRational::new(big(1), big(12)));
        assert!(lat(0, 1, 1).weight().is_zero());
    }

    #[test]
    fn test_contains() {
        // L(1:0;2) = {(x, y) : 2 | y}
        let l2 = lat(2, 1, 0);
        assert!(l2.contains_point(&vec2(3, 4)));
        assert!(!l2.contains_point(&vec2(3, 5)));
        assert!(l2.contains(&lat(4, 1, 0)));
        assert!(l2.contains(&lat(4, 1, 2)));
        assert!(!l2.contains(&lat(4, 0, 1)));
        assert!(l2.contains(&lat(0, 1, 0)));
        assert!(!lat(0, 1, 0).contains(&l2));
        assert!(l2.contains(&Lattice::trivial()));
        assert!(lat(4, 1, 0).is_contained_in(&l2));
    }

    #[test]
    fn test_join_spans() {
        let line = Lattice::trivial().join(&vec2(2, 6));
        assert_eq!(line, lat(0, 1, 3));
        let full = line.join(&vec2(1, 1));
        // |det((1,3), (1,1))| = 2
        assert_eq!(full.modulus(), &big(2));
        assert!(full.contains(&line));
        assert!(full.contains_point(&vec2(1, 1)));
        let whole = full.join(&vec2(1, 0));
        assert_eq!(whole, lat(1, 0, 1));
        assert_eq!(line.join(&vec2(-3, -9)), line);
    }

    #[test]
    fn test_basis_round_trip() {
        for l in Lattice::full_cover(&big(12)) {
            let basis = l.basis();
            assert_eq!(basis.len(), 2);
            assert!(basis.iter().all(|v| l.contains_point(v)));
            assert_eq!(wedge(&basis[0], &basis[1]).abs(), big(12));
            assert_eq!(Lattice::from_generators(&basis).unwrap(), l);
        }
        let line = lat(0, 2, 5);
        assert_eq!(Lattice::from_generators(&line.basis()).unwrap(), line);
        assert_eq!(Lattice::from_generators(&[]).unwrap(), Lattice::trivial());
    }

    #[test]
    fn test_from_generators() {
        let l = Lattice::from_generators(&[vec2(1, 1), vec2(0, 4), vec2(4, 0)]).unwrap();
        assert_eq!(l.modulus(), &big(4));
        assert!(l.contains_point(&vec2(1, 1)));
        assert!(l.contains_point(&vec2(5, 1)));
        assert!(matches!(
            Lattice::from_generators(&[vec2(2, 0), vec2(0, 2)]),
            Err(CoverError::NotCocyclic { .. })
        ));
        assert_eq!(
            Lattice::from_generators(&[vec2(2, 4), vec2(-1, -2)]).unwrap(),
            lat(0, 1, 2)
        );
        // lines keep only their direction
        assert_eq!(
            Lattice::from_generators(&[vec2(2, 0)]).unwrap(),
            Lattice::line(&vec2(1, 0))
        );
    }

    #[test]
    fn test_order_index_and_sorting() {
        let cover = Lattice::full_cover(&big(4));
        for (i, l) in cover.iter().enumerate() {
            assert_eq!(l.order_index(), Some(i));
        }
        let mut shuffled: Vec<Lattice> = cover.iter().rev().cloned().collect();
        shuffled.push(lat(0, 1, 0));
        shuffled.push(lat(2, 1, 0));
        shuffled.push(Lattice::trivial());
        shuffled.sort();
        assert!(shuffled[0].is_trivial());
        assert_eq!(shuffled[1], lat(2, 1, 0));
        assert_eq!(&shuffled[2..8], cover.as_slice());
        assert_eq!(shuffled[8], lat(0, 1, 0));
    }

    #[test]
    fn test_display_round_trip() {
        for l in [lat(6, 1, 3), lat(0, 1, -2), Lattice::trivial()] {
            assert_eq!(l.to_string().parse::<Lattice>().unwrap(), l);
        }
        assert!("L(1:2)".parse::<Lattice>().is_err());
        assert!("L(2:4;10)".parse::<Lattice>().is_err());
    }
}
