//! The projective line P^1(Z/NZ).
//!
//! A point is a pair `(c, d)` modulo N with `gcd(c, d, N) = 1`, taken up to
//! multiplication by units of Z/NZ. Each class has a reduced form: the
//! lexicographically smallest pair `(u*c mod N, u*d mod N)` over all units
//! `u`. Reduced pairs are listed in increasing order, and the position in that
//! list is the point's order index. Every reduced pair also has a lift to a
//! coprime pair of integers, which is what the lattice code stores.

use crate::arith::{gcd, Vector2};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// All points of P^1(Z/NZ) for one N, in order-index order.
#[derive(Debug, Clone)]
pub struct ProjectiveLine {
    modulus: BigInt,
    reduced: Vec<Vector2>,
    lifted: Vec<Vector2>,
}

impl ProjectiveLine {
    /// Enumerate P^1(Z/NZ). A non-positive modulus gives the empty line.
    pub fn new(n: &BigInt) -> Self {
        let mut reduced = Vec::new();
        if n.is_positive() {
            for c in reduced_first_coordinates(n) {
                let mut d = BigInt::zero();
                while &d < n {
                    let candidate = (c.clone(), d.clone());
                    if normalize(n, &c, &d).as_ref() == Some(&candidate) {
                        reduced.push(candidate);
                    }
                    d += 1;
                }
            }
            reduced.sort();
        }
        let lifted = reduced.iter().map(|pair| lift(n, pair)).collect();
        Self {
            modulus: n.clone(),
            reduced,
            lifted,
        }
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// Number of points, equal to psi(N).
    pub fn len(&self) -> usize {
        self.reduced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reduced.is_empty()
    }

    /// Coprime integer representatives, in order-index order.
    pub fn points(&self) -> &[Vector2] {
        &self.lifted
    }

    /// Reduced pairs, in order-index order.
    pub fn reduced_points(&self) -> &[Vector2] {
        &self.reduced
    }

    /// Order index of the point represented by `(c, d)`, if it is a point.
    pub fn index_of(&self, c: &BigInt, d: &BigInt) -> Option<usize> {
        let key = normalize(&self.modulus, c, d)?;
        self.reduced.binary_search(&key).ok()
    }
}

/// Reduced form of `(c : d)` in P^1(Z/NZ), or `None` when `gcd(c, d, N) != 1`
/// or N is not positive.
pub fn normalize(n: &BigInt, c: &BigInt, d: &BigInt) -> Option<Vector2> {
    if !n.is_positive() {
        return None;
    }
    let c0 = c.mod_floor(n);
    let d0 = d.mod_floor(n);
    if !gcd(&gcd(&c0, &d0), n).is_one() {
        return None;
    }
    units(n)
        .into_iter()
        .map(|u| ((&u * &c0).mod_floor(n), (&u * &d0).mod_floor(n)))
        .min()
}

/// Lift a reduced pair to integers `(c, d')` with `d' = d (mod N)` and
/// `gcd(c, d') = 1`. The class of `(0 : 1)` lifts to `(0, 1)`.
pub fn lift(n: &BigInt, reduced: &Vector2) -> Vector2 {
    let (c, d) = reduced;
    if c.is_zero() {
        return (BigInt::zero(), BigInt::one());
    }
    // terminates: every prime of c either divides N (and not d) or
    // misses exactly one residue class of the shift
    let mut lifted = d.clone();
    while !gcd(c, &lifted).is_one() {
        lifted += n;
    }
    (c.clone(), lifted)
}

/// Units of Z/NZ; for N = 1 the single class 1.
fn units(n: &BigInt) -> Vec<BigInt> {
    if n.is_one() {
        return vec![BigInt::one()];
    }
    let mut out = Vec::new();
    let mut u = BigInt::one();
    while &u < n {
        if gcd(&u, n).is_one() {
            out.push(u.clone());
        }
        u += 1;
    }
    out
}

/// A reduced first coordinate is 0 or a proper divisor of N.
fn reduced_first_coordinates(n: &BigInt) -> Vec<BigInt> {
    let mut out = vec![BigInt::zero()];
    let mut g = BigInt::one();
    while &g < n {
        if n.is_multiple_of(&g) {
            out.push(g.clone());
        }
        g += 1;
    }
    out
}
