//! Search for the index multisets a strongly minimal covering of Z^2 could
//! have.
//!
//! An index list `[N_1, ..., N_n]` satisfies the weight equation when
//! `sum 1/psi(N_i) = 1`. We first solve `sum 1/M_i = 1` over values M of psi,
//! then expand each M to every N with `psi(N) = M`, and finally discard
//! lists that fail one of several necessary conditions for strong
//! minimality. The conditions are not sufficient.

use crate::arith::{prime_divisors, psi};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rayon::prelude::*;
use tracing::{debug, trace};
use std::collections::{BTreeSet, HashSet};

/// Configuration for the index-sequence search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Exclusive bound on psi values (and hence indices) in the lookup table
    pub psi_max: u64,
    /// Apply the strong-minimality conditions
    pub strong: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            psi_max: 100,
            strong: true,
        }
    }
}

/// Inverse of psi below a bound: for each value M, the indices N with
/// `psi(N) = M`. psi is not monotone (psi(6) = 12, psi(7) = 8), so this has
/// to be tabulated rather than bisected.
#[derive(Debug, Clone)]
pub struct PsiTable {
    inverse: Vec<Vec<u64>>,
}

impl PsiTable {
    pub fn new(bound: u64) -> Self {
        let mut inverse = vec![Vec::new(); bound as usize];
        // psi(N) >= N, so no index at or above the bound can qualify
        for n in 1..bound {
            let value = psi(&n);
            if value < bound {
                inverse[value as usize].push(n);
            }
        }
        Self { inverse }
    }

    /// Exclusive bound on the tabulated values.
    pub fn bound(&self) -> u64 {
        self.inverse.len() as u64
    }

    /// Indices N with `psi(N) = value`, increasing.
    pub fn indices(&self, value: u64) -> &[u64] {
        self.inverse
            .get(value as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A search context: the configuration plus the psi table built from it.
#[derive(Debug, Clone)]
pub struct IndexSearch {
    config: SearchConfig,
    table: PsiTable,
}

impl IndexSearch {
    pub fn new(config: SearchConfig) -> Self {
        let table = PsiTable::new(config.psi_max);
        Self { config, table }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn table(&self) -> &PsiTable {
        &self.table
    }

    /// All weakly increasing lists of `n` psi values `>= min_psi` whose
    /// reciprocals sum to `total`.
    ///
    /// With `M_1` the smallest term we need `n / M_1 >= total`, i.e.
    /// `M_1 * total - n <= 0`; the left side grows with `M_1`, so the scan
    /// stops at the first candidate where it turns positive.
    pub fn solve_weights(&self, n: usize, total: &BigRational, min_psi: u64) -> Vec<Vec<u64>> {
        trace!(n, %total, min_psi, "solve_weights");
        if n == 0 || *total <= BigRational::zero() {
            return Vec::new();
        }
        let terms = BigRational::from_integer(BigInt::from(n));
        let candidates: Vec<u64> = (min_psi..self.table.bound())
            .filter(|&m| !self.table.indices(m).is_empty())
            .take_while(|&m| BigRational::from_integer(BigInt::from(m)) * total <= terms)
            .collect();

        let solutions: Vec<Vec<u64>> = candidates
            .par_iter()
            .flat_map_iter(|&m| {
                let m_ratio = BigRational::from_integer(BigInt::from(m));
                if &m_ratio * total == terms {
                    return vec![vec![m; n]];
                }
                if n == 1 {
                    return Vec::new();
                }
                let rest = total - m_ratio.recip();
                self.solve_weights(n - 1, &rest, m)
                    .into_iter()
                    .map(|tail| {
                        let mut list = Vec::with_capacity(n);
                        list.push(m);
                        list.extend(tail);
                        list
                    })
                    .collect()
            })
            .collect();
        trace!(n, %total, min_psi, found = solutions.len(), "solve_weights done");
        solutions
    }

    /// Replace each psi value by every index realising it (cartesian
    /// product); empty if some value has no index.
    pub fn expand_to_indices(&self, psi_values: &[u64]) -> Vec<Vec<u64>> {
        let mut results: Vec<Vec<u64>> = vec![Vec::new()];
        for &value in psi_values {
            let choices = self.table.indices(value);
            if choices.is_empty() {
                return Vec::new();
            }
            let mut next = Vec::with_capacity(results.len() * choices.len());
            for partial in &results {
                for &n in choices {
                    let mut extended = partial.clone();
                    extended.push(n);
                    next.push(extended);
                }
            }
            results = next;
        }
        results
    }

    /// Sorted index lists of length `n` that pass every known necessary
    /// condition for a strongly minimal covering, without repeats.
    pub fn all_index_sequences(&self, n: usize) -> Vec<Vec<u64>> {
        match n {
            0 | 2 => return Vec::new(),
            1 => return vec![vec![1]],
            3 => return vec![vec![2, 2, 2]],
            _ => {}
        }
        // for n >= 4 no member can have index 1 (psi = 1) or psi < 3
        let psi_lists = self.solve_weights(n, &BigRational::one(), 3);
        let expanded: Vec<Vec<u64>> = psi_lists
            .par_iter()
            .flat_map_iter(|values| self.expand_to_indices(values))
            .map(|mut list| {
                list.sort_unstable();
                list
            })
            .collect();

        let mut seen = HashSet::new();
        let candidates: Vec<Vec<u64>> = expanded
            .into_iter()
            .filter(|list| seen.insert(list.clone()))
            .collect();
        debug!(n, candidates = candidates.len(), "before validity check");

        let strong = self.config.strong;
        let valid: Vec<Vec<u64>> = candidates
            .into_par_iter()
            .filter(|list| is_valid_index_multiset(list, strong))
            .collect();
        debug!(n, solutions = valid.len(), "after validity check");
        valid
    }
}

/// Necessary conditions for `indices` to be the index list of a (strongly,
/// if `strong`) minimal covering of Z^2. Applied in order, stopping at the
/// first failure.
pub fn is_valid_index_multiset(indices: &[u64], strong: bool) -> bool {
    if indices.iter().any(|&n| n == 0) {
        return false;
    }

    // (1) weight equation (strong) or inequality
    let weight: BigRational = indices
        .iter()
        .map(|&n| BigRational::new(BigInt::one(), BigInt::from(psi(&n))))
        .sum();
    let weight_ok = if strong {
        weight.is_one()
    } else {
        weight >= BigRational::one()
    };
    if !weight_ok {
        trace!(?indices, %weight, "weight condition fails");
        return false;
    }

    // (2) no two coprime indices
    if strong && has_coprime_pair(indices) {
        trace!(?indices, "coprime indices");
        return false;
    }

    // (3) per prime p dividing some index
    let primes: BTreeSet<u64> = indices.iter().flat_map(prime_divisors).collect();
    for p in primes {
        let multiples = indices.iter().filter(|&&n| n % p == 0).count() as u64;
        if multiples <= p {
            trace!(?indices, p, multiples, "too few indices divisible by p");
            return false;
        }
        if strong && !exact_copies_admissible(indices, p) {
            return false;
        }
    }

    if !strong {
        return true;
    }

    // (4) known impossible small configurations
    small_configurations_admissible(indices)
}

/// With exactly p indices equal to p, the other multiples of p must have
/// pairwise non-coprime cofactors.
fn exact_copies_admissible(indices: &[u64], p: u64) -> bool {
    if indices.iter().filter(|&&n| n == p).count() as u64 != p {
        return true;
    }
    let cofactors: Vec<u64> = indices
        .iter()
        .filter(|&&n| n % p == 0 && n != p)
        .map(|&n| n / p)
        .collect();
    if has_coprime_pair(&cofactors) {
        trace!(?indices, p, "coprime cofactors beside p copies of p");
        return false;
    }
    true
}

/// Exclusions for small mixed counts of the indices 2, 3, 4 and 6.
fn small_configurations_admissible(indices: &[u64]) -> bool {
    let count = |value: u64| indices.iter().filter(|&&n| n == value).count();
    let (n2, n3, n4, n6) = (count(2), count(3), count(4), count(6));

    if n2 > 0 && n4 > 0 && n6 > 4 {
        trace!(?indices, "2, 4 and more than four 6s");
        return false;
    }
    if ((n2 == 2 && n4 == 1) || (n2 == 1 && n4 == 3)) && !rest_admissible(indices, &[2, 4], 4) {
        return false;
    }
    if n2 == 1 && n4 == 2 && !rest_admissible(indices, &[2, 4], 2) {
        return false;
    }
    if n2 == 2 && n6 == 3 && !rest_admissible(indices, &[2, 6], 6) {
        return false;
    }
    if n2 == 1 && n4 == 2 && n6 == 3 && !rest_admissible(indices, &[2, 4, 6], 6) {
        return false;
    }
    if n3 == 3 && n6 == 2 && !rest_admissible(indices, &[3, 6], 6) {
        return false;
    }
    if n3 == 2 && n6 >= 4 && !rest_admissible(indices, &[3, 6], 6) {
        return false;
    }
    true
}

/// Whether two entries at distinct positions are coprime.
fn has_coprime_pair(values: &[u64]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, a)| values[i + 1..].iter().any(|b| a.gcd(b) == 1))
}

/// The indices outside `excluded` must all be multiples of `modulus`, with
/// pairwise non-coprime cofactors.
fn rest_admissible(indices: &[u64], excluded: &[u64], modulus: u64) -> bool {
    let rest: Vec<u64> = indices
        .iter()
        .copied()
        .filter(|n| !excluded.contains(n))
        .collect();
    if rest.iter().any(|n| n % modulus != 0) {
        trace!(?indices, modulus, "remaining indices are not all multiples");
        return false;
    }
    let cofactors: Vec<u64> = rest.iter().map(|n| n / modulus).collect();
    if has_coprime_pair(&cofactors) {
        trace!(?indices, modulus, "remaining cofactors have a coprime pair");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search() -> IndexSearch {
        IndexSearch::new(SearchConfig::default())
    }

    #[test]
    fn test_psi_table() {
        let table = PsiTable::new(100);
        assert_eq!(table.indices(1), &[1]);
        assert!(table.indices(2).is_empty());
        assert_eq!(table.indices(3), &[2]);
        assert_eq!(table.indices(6), &[4, 5]);
        assert_eq!(table.indices(12), &[6, 8, 9, 11]);
        assert!(table.indices(100).is_empty());
    }

    #[test]
    fn test_solve_weights_small() {
        let s = search();
        assert_eq!(s.solve_weights(3, &BigRational::one(), 3), vec![vec![3, 3, 3]]);
        assert_eq!(
            s.solve_weights(4, &BigRational::one(), 3),
            vec![vec![3, 3, 4, 12], vec![3, 3, 6, 6], vec![3, 4, 4, 6], vec![4, 4, 4, 4]]
        );
        assert!(s.solve_weights(0, &BigRational::one(), 3).is_empty());
        assert!(s.solve_weights(2, &BigRational::zero(), 3).is_empty());
    }

    #[test]
    fn test_expand_to_indices() {
        let s = search();
        assert_eq!(
            s.expand_to_indices(&[3, 6]),
            vec![vec![2, 4], vec![2, 5]]
        );
        assert!(s.expand_to_indices(&[3, 2]).is_empty());
    }

    #[test]
    fn test_base_cases() {
        let s = search();
        assert_eq!(s.all_index_sequences(1), vec![vec![1]]);
        assert!(s.all_index_sequences(2).is_empty());
        assert_eq!(s.all_index_sequences(3), vec![vec![2, 2, 2]]);
    }

    #[test]
    fn test_four_members() {
        assert_eq!(search().all_index_sequences(4), vec![vec![2, 2, 4, 4], vec![3, 3, 3, 3]]);
    }

    #[test]
    fn test_validity_conditions() {
        assert!(is_valid_index_multiset(&[2, 2, 2], true));
        assert!(is_valid_index_multiset(&[1], true));
        assert!(!is_valid_index_multiset(&[2, 3], true));
        // weight 1 but 4 and 5 are coprime
        assert!(!is_valid_index_multiset(&[2, 2, 4, 5], true));
        // weight 4/3: fails strong, passes weak
        assert!(!is_valid_index_multiset(&[2, 2, 2, 2], true));
        assert!(is_valid_index_multiset(&[2, 2, 2, 2], false));
        // only two indices divisible by 2
        assert!(!is_valid_index_multiset(&[2, 2, 3, 3, 3, 3], false));
        assert!(!is_valid_index_multiset(&[0, 2], false));
    }

    #[test]
    fn test_rest_admissible() {
        assert!(rest_admissible(&[2, 2, 4, 8, 8], &[2, 4], 4));
        assert!(!rest_admissible(&[2, 2, 4, 6, 6], &[2, 4], 4));
        assert!(!rest_admissible(&[2, 2, 4, 8, 12], &[2, 4], 4));
        assert!(is_valid_index_multiset(&[2, 2, 4, 8, 8], true));
    }

    #[test]
    fn test_many_coprime_indices() {
        // the lcm of these overflows u64
        let indices = [2, 2, 2, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97];
        assert!(!is_valid_index_multiset(&indices, false));
        assert!(!is_valid_index_multiset(&indices, true));
    }

    #[test]
    fn test_exact_copies_of_p() {
        assert!(!exact_copies_admissible(&[2, 2, 4, 6, 6], 2));
        assert!(exact_copies_admissible(&[2, 2, 4, 4], 2));
        // three 2s, not two
        assert!(exact_copies_admissible(&[2, 2, 2, 6, 10], 2));
        assert!(!exact_copies_admissible(&[3, 3, 3, 6, 9, 12], 3));
        // weight 1 with no coprime pair, rejected by the cofactors 2 and 3
        assert!(!is_valid_index_multiset(&[2, 2, 4, 6, 6], true));
    }

    #[test]
    fn test_small_configurations() {
        // 2, 4 and five 6s
        assert!(!small_configurations_admissible(&[2, 4, 6, 6, 6, 6, 6]));
        // two 2s and one 4, or one 2 and three 4s: the rest are multiples of 4
        assert!(!small_configurations_admissible(&[2, 2, 4, 6]));
        assert!(!small_configurations_admissible(&[2, 4, 4, 4, 6]));
        assert!(small_configurations_admissible(&[2, 4, 4, 4, 12]));
        // one 2 and two 4s: the rest are even with non-coprime halves
        assert!(!small_configurations_admissible(&[2, 4, 4, 6, 10]));
        assert!(small_configurations_admissible(&[2, 4, 4, 6, 6]));
        // two 2s and three 6s
        assert!(!small_configurations_admissible(&[2, 2, 6, 6, 6, 8]));
        assert!(small_configurations_admissible(&[2, 2, 6, 6, 6, 12]));
        // one 2, two 4s and three 6s
        assert!(!small_configurations_admissible(&[2, 4, 4, 6, 6, 6, 10]));
        // three 3s and two 6s
        assert!(!small_configurations_admissible(&[3, 3, 3, 6, 6, 9]));
        assert!(small_configurations_admissible(&[3, 3, 3, 6, 6, 12]));
        // two 3s and at least four 6s
        assert!(!small_configurations_admissible(&[3, 3, 6, 6, 6, 6, 9]));
        assert!(small_configurations_admissible(&[3, 3, 6, 6, 6, 6, 12]));

        assert!(small_configurations_admissible(&[2, 2, 4, 8, 8]));
        assert!(small_configurations_admissible(&[2, 4, 4, 4, 4]));
    }
}
