//! Covering and minimality tests, generic over the coset type.
//!
//! A covering is a slice of cosets whose union is the whole ambient space.
//! Only full-rank members can help: a degenerate coset misses infinitely many
//! classes modulo any N, so it is dropped before any covering test and is
//! never one-minimal.
//!
//! Every exact test blows the list up to the lcm M of its moduli and checks
//! each index-M representative supplied by the ambient space.

use crate::ambient::AmbientSpace;
use crate::arith::{gcd, lcm_all};
use crate::coset::{Coset, Point};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use tracing::{debug, trace};

/// Sum of the member weights; 0 for the empty list.
pub fn weight<C: Coset>(cover: &[C]) -> BigRational {
    cover.iter().map(Coset::weight).sum()
}

/// lcm of the indices of the full-rank members.
pub fn modulus_lcm<C: Coset>(cover: &[C]) -> BigInt {
    lcm_all(cover.iter().filter(|c| c.is_full_rank()).map(Coset::modulus))
}

/// Whether `point` lies in at least one member.
pub fn is_in_union<C: Coset>(point: &Point<C>, cover: &[C]) -> bool {
    cover.iter().any(|c| c.contains_point(point))
}

/// All `psi(n)` cosets of index `n`, a covering of weight exactly 1.
pub fn full_cover<C: Coset>(n: &BigInt) -> Vec<C> {
    C::full_cover(n)
}

fn representatives<C: Coset>(modulus: &BigInt) -> Vec<Point<C>> {
    <C::Space as AmbientSpace>::representatives(modulus)
}

/// Covering test for full-rank members only.
fn covers<C: Coset>(members: &[&C]) -> bool {
    // weight >= 1 is necessary but not sufficient
    let total: BigRational = members.iter().map(|c| c.weight()).sum();
    if total < BigRational::one() {
        trace!(%total, "weight below 1, not a cover");
        return false;
    }
    let m = lcm_all(members.iter().map(|c| c.modulus()));
    representatives::<C>(&m)
        .iter()
        .all(|p| members.iter().any(|c| c.contains_point(p)))
}

/// Whether the members of `cover` cover the ambient space.
pub fn is_cover<C: Coset>(cover: &[C]) -> bool {
    let members: Vec<&C> = cover.iter().filter(|c| c.is_full_rank()).collect();
    covers(&members)
}

/// Whether `cover` still covers after deleting member `i`.
pub fn is_cover_without<C: Coset>(cover: &[C], i: usize) -> bool {
    let members: Vec<&C> = cover
        .iter()
        .enumerate()
        .filter(|(j, c)| *j != i && c.is_full_rank())
        .map(|(_, c)| c)
        .collect();
    covers(&members)
}

/// Assuming `cover` covers: every member has full rank, and either the weight
/// is exactly 1 or no single deletion still covers.
///
/// With `check`, first verify that `cover` covers.
pub fn is_full<C: Coset>(cover: &[C], check: bool) -> bool {
    if check && !is_cover(cover) {
        return false;
    }
    cover.iter().all(Coset::is_full_rank)
        && (weight(cover).is_one() || !(0..cover.len()).any(|i| is_cover_without(cover, i)))
}

/// Assuming `cover` covers: whether member `i` cannot be replaced by a proper
/// sub-coset with the list still covering.
pub fn is_one_minimal<C: Coset>(cover: &[C], i: usize) -> bool {
    let Some(member) = cover.get(i) else {
        return false;
    };
    if !member.is_full_rank() {
        debug!(%member, "degenerate member is redundant");
        return false;
    }
    // a proper sub-coset has at most half the weight
    let slack = (weight(cover) - BigRational::one()) * BigRational::from_integer(2.into());
    if member.weight() > slack {
        trace!(%member, "weight bound: one-minimal");
        return true;
    }
    is_one_minimal_exact(cover, i)
}

/// The exact one-minimality test: the points of index M covered only by
/// member `i` must span a coset of exactly its index.
pub(crate) fn is_one_minimal_exact<C: Coset>(cover: &[C], i: usize) -> bool {
    let member = &cover[i];
    let others: Vec<&C> = cover
        .iter()
        .enumerate()
        .filter(|(j, c)| *j != i && c.is_full_rank())
        .map(|(_, c)| c)
        .collect();
    let m = modulus_lcm(cover);
    let only_here: Vec<Point<C>> = representatives::<C>(&m)
        .into_iter()
        .filter(|p| !others.iter().any(|c| c.contains_point(p)))
        .collect();
    let Some((first, rest)) = only_here.split_first() else {
        debug!(%member, "member is redundant");
        return false;
    };
    let span = rest
        .iter()
        .fold(C::trivial().join(first), |acc, p| acc.join(p));
    let smallest = gcd(&m, span.modulus());
    debug!(
        %member,
        forced = only_here.len(),
        %smallest,
        "exact one-minimality check"
    );
    &smallest == member.modulus()
}

/// Assuming `cover` covers: whether no member can be shrunk.
///
/// With `check`, first verify that `cover` covers.
pub fn is_minimal<C: Coset>(cover: &[C], check: bool) -> bool {
    if check && !is_cover(cover) {
        return false;
    }
    (0..cover.len()).all(|i| is_one_minimal(cover, i))
}

/// Minimal with total weight exactly 1.
///
/// With `check`, first verify that `cover` covers.
pub fn is_strongly_minimal<C: Coset>(cover: &[C], check: bool) -> bool {
    if !weight(cover).is_one() {
        return false;
    }
    is_minimal(cover, check)
}
