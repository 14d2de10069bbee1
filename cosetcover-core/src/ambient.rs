//! Ambient spaces: Z and Z^2, with their finite sets of index-N
//! representatives.

use crate::arith::{self, Vector2};
use crate::projective_line::ProjectiveLine;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use std::collections::VecDeque;
use std::fmt;

/// Supplies, for each index N, the canonical representatives of index N and
/// their total order.
///
/// The covering engine blows a covering up to its lcm modulus M and tests
/// every representative of index M, so `representatives(M)` must hit every
/// class of the quotient that matters for containment.
pub trait AmbientSpace {
    type Point: Clone + fmt::Debug;

    /// Number of index-N cosets, equal to `representatives(n).len()`;
    /// 0 for N = 0.
    fn psi(n: &BigInt) -> BigInt;

    /// Canonical representatives of index N, in order-index order.
    fn representatives(n: &BigInt) -> Vec<Self::Point>;

    /// Position of `point` in `representatives(n)`.
    fn order_index(n: &BigInt, point: &Self::Point) -> Option<usize>;
}

/// The integers, for residue-class coverings.
#[derive(Debug, Clone, Copy)]
pub struct IntegerLine;

impl AmbientSpace for IntegerLine {
    type Point = BigInt;

    fn psi(n: &BigInt) -> BigInt {
        if n.is_positive() {
            n.clone()
        } else {
            BigInt::zero()
        }
    }

    fn representatives(n: &BigInt) -> Vec<BigInt> {
        let mut out = Vec::new();
        let mut x = BigInt::zero();
        while &x < n {
            out.push(x.clone());
            x += 1;
        }
        out
    }

    fn order_index(n: &BigInt, point: &BigInt) -> Option<usize> {
        if !n.is_positive() {
            return None;
        }
        point.mod_floor(n).to_usize()
    }
}

/// The lattice Z^2, for coverings by sublattices. Representatives of index N
/// are the points of P^1(Z/NZ), lifted to primitive vectors.
#[derive(Debug, Clone, Copy)]
pub struct IntegerPlane;

impl AmbientSpace for IntegerPlane {
    type Point = Vector2;

    fn psi(n: &BigInt) -> BigInt {
        if n.is_positive() {
            arith::psi(n)
        } else {
            BigInt::zero()
        }
    }

    fn representatives(n: &BigInt) -> Vec<Vector2> {
        ProjectiveLine::new(n).points().to_vec()
    }

    fn order_index(n: &BigInt, point: &Vector2) -> Option<usize> {
        ProjectiveLine::new(n).index_of(&point.0, &point.1)
    }
}

/// All primitive vectors of Z^2 up to sign: `(1, 0)` first, then `(p, q)` for
/// the rationals p/q in order of height (0, 1, -1, 1/2, -1/2, 2, -2, 1/3, ...).
#[derive(Debug, Clone)]
pub struct PrimitiveVectors {
    pending: VecDeque<Vector2>,
    height: i64,
}

impl PrimitiveVectors {
    pub fn new() -> Self {
        let pending = [(1, 0), (0, 1), (1, 1), (-1, 1)]
            .into_iter()
            .map(|(a, b)| (BigInt::from(a), BigInt::from(b)))
            .collect();
        Self { pending, height: 1 }
    }

    fn refill(&mut self) {
        self.height += 1;
        let h = self.height;
        for other in 1..h {
            if other.gcd(&h) != 1 {
                continue;
            }
            for (a, b) in [(other, h), (-other, h), (h, other), (-h, other)] {
                self.pending.push_back((BigInt::from(a), BigInt::from(b)));
            }
        }
    }
}

impl Default for PrimitiveVectors {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for PrimitiveVectors {
    type Item = Vector2;

    fn next(&mut self) -> Option<Vector2> {
        while self.pending.is_empty() {
            self.refill();
        }
        self.pending.pop_front()
    }
}
