//! Residue classes `a + NZ` of the integers, displayed `<a;N>`.

use crate::ambient::IntegerLine;
use crate::arith::{self, divides};
use crate::coset::Coset;
use crate::error::{CoverError, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// An arithmetic progression `a + NZ`.
///
/// `N > 0` is a genuine residue class with `0 <= a < N`; `N = 0` is the
/// singleton `{a}`. The trivial progression is empty and only arises as the
/// seed of a chain of joins.
#[derive(Debug, Clone)]
pub struct Progression {
    modulus: BigInt,
    residue: Option<BigInt>,
}

impl Progression {
    /// Build `<a;N>`, reducing `a` modulo `N` when `N > 0`.
    pub fn new(n: impl Into<BigInt>, a: impl Into<BigInt>) -> Result<Self> {
        let n = n.into();
        let a = a.into();
        if n.is_negative() {
            return Err(CoverError::InvalidIndex(n));
        }
        let residue = if n.is_zero() { a } else { a.mod_floor(&n) };
        Ok(Self {
            modulus: n,
            residue: Some(residue),
        })
    }

    /// Residue class representative; `None` for the trivial progression.
    pub fn residue(&self) -> Option<&BigInt> {
        self.residue.as_ref()
    }
}

impl Coset for Progression {
    type Space = IntegerLine;

    const FULL_RANK: u8 = 1;

    fn trivial() -> Self {
        Self {
            modulus: BigInt::zero(),
            residue: None,
        }
    }

    fn is_trivial(&self) -> bool {
        self.residue.is_none()
    }

    fn rank(&self) -> u8 {
        if self.modulus.is_zero() {
            0
        } else {
            1
        }
    }

    fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    fn full_cover(n: &BigInt) -> Vec<Self> {
        if !n.is_positive() {
            return Vec::new();
        }
        let mut cover = Vec::new();
        let mut a = BigInt::zero();
        while &a < n {
            cover.push(Self {
                modulus: n.clone(),
                residue: Some(a.clone()),
            });
            a += 1;
        }
        cover
    }

    fn contains_point(&self, x: &BigInt) -> bool {
        match &self.residue {
            None => false,
            Some(a) => divides(&self.modulus, &(a - x)),
        }
    }

    fn contains(&self, other: &Self) -> bool {
        match &other.residue {
            None => true,
            Some(b) => divides(&self.modulus, &other.modulus) && self.contains_point(b),
        }
    }

    fn join(&self, x: &BigInt) -> Self {
        let modulus = match &self.residue {
            None => BigInt::zero(),
            Some(a) => arith::gcd(&self.modulus, &(x - a)),
        };
        let residue = if modulus.is_zero() {
            x.clone()
        } else {
            x.mod_floor(&modulus)
        };
        Self {
            modulus,
            residue: Some(residue),
        }
    }
}

impl PartialEq for Progression {
    fn eq(&self, other: &Self) -> bool {
        if self.modulus != other.modulus {
            return false;
        }
        match &self.residue {
            None => other.is_trivial(),
            Some(a) => !other.is_trivial() && other.contains_point(a),
        }
    }
}

impl Eq for Progression {}

impl Hash for Progression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.modulus.hash(state);
        self.residue.hash(state);
    }
}

impl Ord for Progression {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_trivial()
            .cmp(&self.is_trivial())
            .then_with(|| other.rank().cmp(&self.rank()))
            .then_with(|| self.modulus.cmp(&other.modulus))
            .then_with(|| self.residue.cmp(&other.residue))
    }
}

impl PartialOrd for Progression {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.residue {
            None => write!(f, "<>"),
            Some(a) => write!(f, "<{};{}>", a, self.modulus),
        }
    }
}

impl FromStr for Progression {
    type Err = CoverError;

    /// Parses `<a;N>`, or `<>` for the trivial progression.
    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .trim()
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .ok_or_else(|| CoverError::Parse(format!("expected <a;N>, got {:?}", s)))?;
        if inner.trim().is_empty() {
            return Ok(Self::trivial());
        }
        let (a, n) = inner
            .split_once(';')
            .ok_or_else(|| CoverError::Parse(format!("missing ';' in {:?}", s)))?;
        Self::new(parse_int(n)?, parse_int(a)?)
    }
}

pub(crate) fn parse_int(s: &str) -> Result<BigInt> {
    s.trim()
        .parse::<BigInt>()
        .map_err(|e| CoverError::Parse(format!("bad integer {:?}: {}", s.trim(), e)))
}
