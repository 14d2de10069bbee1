//! Exact integer primitives shared by both rank instantiations.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// A vector of Z^2.
pub type Vector2 = (BigInt, BigInt);

/// Non-negative gcd; `gcd(0, 0) = 0`.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    a.gcd(b)
}

/// gcd of a list of integers (0 for the empty list).
pub fn gcd_all<'a, I>(values: I) -> BigInt
where
    I: IntoIterator<Item = &'a BigInt>,
{
    values
        .into_iter()
        .fold(BigInt::zero(), |acc, v| acc.gcd(v))
}

/// lcm of a list of integers (1 for the empty list, 0 if any entry is 0).
pub fn lcm_all<'a, I>(values: I) -> BigInt
where
    I: IntoIterator<Item = &'a BigInt>,
{
    values.into_iter().fold(BigInt::one(), |acc, v| acc.lcm(v))
}

/// Extended gcd: returns `(g, x, y)` with `a*x + b*y = g` and `g >= 0`.
pub fn xgcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());
    while !r.is_zero() {
        let q = old_r.div_floor(&r);
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }
    if old_r.is_negative() {
        (-old_r, -old_s, -old_t)
    } else {
        (old_r, old_s, old_t)
    }
}

/// The wedge product of `v = (a, b)` and `w = (c, d)`, that is `a*d - b*c`.
pub fn wedge(v: &Vector2, w: &Vector2) -> BigInt {
    &v.0 * &w.1 - &v.1 * &w.0
}

/// Whether `d` divides `n`, with the convention that 0 divides only 0.
pub fn divides(d: &BigInt, n: &BigInt) -> bool {
    if d.is_zero() {
        n.is_zero()
    } else {
        n.is_multiple_of(d)
    }
}

/// Prime factorisation of a positive integer by trial division.
///
/// Returns `(p, e)` pairs with increasing `p`; 0 and 1 have no factors.
pub fn factor<T>(n: &T) -> Vec<(T, u32)>
where
    T: Integer + Clone,
{
    let mut factors = Vec::new();
    if n.is_zero() {
        return factors;
    }
    let mut m = n.clone();
    let mut p = T::one() + T::one();
    while p.clone() * p.clone() <= m {
        if m.is_multiple_of(&p) {
            let mut e = 0u32;
            while m.is_multiple_of(&p) {
                m = m / p.clone();
                e += 1;
            }
            factors.push((p.clone(), e));
        }
        p = p + T::one();
    }
    if m > T::one() {
        factors.push((m, 1));
    }
    factors
}

/// Distinct prime divisors of a positive integer, increasing.
pub fn prime_divisors<T>(n: &T) -> Vec<T>
where
    T: Integer + Clone,
{
    factor(n).into_iter().map(|(p, _)| p).collect()
}

/// Number of index-`n` cosets in rank 2, the classical
/// `psi(N) = N * prod_{p | N} (1 + 1/p)`, i.e. `#P^1(Z/NZ)`.
///
/// `psi(1) = 1`; `psi(0) = 0` by convention.
pub fn psi<T>(n: &T) -> T
where
    T: Integer + Clone,
{
    if n.is_zero() {
        return T::zero();
    }
    let mut value = n.clone();
    for p in prime_divisors(n) {
        value = value / p.clone() * (p + T::one());
    }
    value
}

/// Whether `n` is prime.
pub fn is_prime(n: u64) -> bool {
    n >= 2 && factor(&n) == vec![(n, 1)]
}

/// All primes strictly below `bound`.
pub fn primes_below(bound: u64) -> Vec<u64> {
    (2..bound).filter(|&p| is_prime(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_xgcd_bezout() {
        for (a, b) in [(240, 46), (-7, 3), (0, 5), (5, 0), (-4, -6), (1, 1)] {
            let (g, x, y) = xgcd(&big(a), &big(b));
            assert!(g >= BigInt::zero());
            assert_eq!(&big(a) * &x + &big(b) * &y, g);
            assert_eq!(g, gcd(&big(a), &big(b)));
        }
    }

    #[test]
    fn test_lcm_conventions() {
        assert_eq!(lcm_all(Vec::<BigInt>::new().iter()), big(1));
        assert_eq!(lcm_all([big(4), big(6)].iter()), big(12));
        assert_eq!(lcm_all([big(4), big(0)].iter()), big(0));
    }

    #[test]
    fn test_psi_values() {
        // psi is not monotone: psi(6) = 12 but psi(7) = 8
        let expected = [(0u64, 0u64), (1, 1), (2, 3), (3, 4), (4, 6), (5, 6), (6, 12), (7, 8), (12, 24)];
        for (n, value) in expected {
            assert_eq!(psi(&n), value, "psi({})", n);
        }
        assert_eq!(psi(&big(30)), big(72));
    }

    #[test]
    fn test_factor_and_primes() {
        assert_eq!(factor(&360u64), vec![(2, 3), (3, 2), (5, 1)]);
        assert!(factor(&1u64).is_empty());
        assert_eq!(primes_below(12), vec![2, 3, 5, 7, 11]);
    }

    #[test]
    fn test_divides_zero_convention() {
        assert!(divides(&big(0), &big(0)));
        assert!(!divides(&big(0), &big(3)));
        assert!(divides(&big(3), &big(-9)));
        assert!(divides(&big(3), &big(0)));
    }
}
