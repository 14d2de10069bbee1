//! Nested index sequences built by repeatedly splitting a term by a prime.
//!
//! Splitting a lattice of index N by a prime p gives either p sublattices of
//! index pN (when p divides N) or p + 1 of them (when it does not). Starting
//! from `[1]` this generates candidate index structures for coverings of
//! Z^2 together with the tree of splittings that produced them.

use crate::arith::primes_below;
use tracing::{debug, trace};
use std::collections::HashMap;
use std::fmt;

/// An entry of a refined sequence: an index, or a nested group of entries.
///
/// `Leaf` sorts before `Node`; nodes compare lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeqTree {
    Leaf(u64),
    Node(Vec<SeqTree>),
}

impl SeqTree {
    /// A node with a single child stands for that child.
    fn collapsed(&self) -> &SeqTree {
        match self {
            SeqTree::Node(children) if children.len() == 1 => &children[0],
            _ => self,
        }
    }

    fn into_collapsed(self) -> SeqTree {
        match self {
            SeqTree::Node(mut children) if children.len() == 1 => children.remove(0),
            other => other,
        }
    }

    /// The indices at the leaves, left to right.
    pub fn leaves(&self) -> Vec<u64> {
        match self {
            SeqTree::Leaf(n) => vec![*n],
            SeqTree::Node(children) => children.iter().flat_map(SeqTree::leaves).collect(),
        }
    }
}

impl fmt::Display for SeqTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqTree::Leaf(n) => write!(f, "{}", n),
            SeqTree::Node(children) => {
                write!(f, "[")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Which leaves a refinement step may split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineFilter {
    /// Split every leaf
    Any,
    /// Only leaves divisible by p (into p copies)
    Divisible,
    /// Only leaves prime to p (into p + 1 copies)
    Coprime,
}

impl RefineFilter {
    fn allows_divisible(self) -> bool {
        matches!(self, RefineFilter::Any | RefineFilter::Divisible)
    }

    fn allows_coprime(self) -> bool {
        matches!(self, RefineFilter::Any | RefineFilter::Coprime)
    }
}

/// Every sequence obtained from `seq` by splitting exactly one leaf by `p`.
///
/// A leaf N becomes `[pN; p]` if `p | N` and `[pN; p + 1]` otherwise, subject
/// to `filter`; nested groups are refined recursively. With `no_repeats`
/// only the first of several equal entries is refined.
pub fn refine_sequence(
    seq: &[SeqTree],
    p: u64,
    filter: RefineFilter,
    no_repeats: bool,
) -> Vec<Vec<SeqTree>> {
    let mut results: Vec<Vec<SeqTree>> = Vec::new();
    let mut done: Vec<&SeqTree> = Vec::new();

    for (i, entry) in seq.iter().enumerate() {
        let entry = entry.collapsed();
        if no_repeats && done.contains(&entry) {
            trace!(%entry, p, "repeat, skipped");
            continue;
        }
        done.push(entry);

        let replacements: Vec<SeqTree> = match entry {
            SeqTree::Leaf(n) => {
                let copies = if n % p == 0 {
                    filter.allows_divisible().then_some(p)
                } else {
                    filter.allows_coprime().then_some(p + 1)
                };
                copies
                    .map(|k| SeqTree::Node(vec![SeqTree::Leaf(p * n); k as usize]))
                    .into_iter()
                    .collect()
            }
            SeqTree::Node(children) => refine_sequence(children, p, filter, no_repeats)
                .into_iter()
                .map(SeqTree::Node)
                .collect(),
        };

        for replacement in replacements {
            let refined = seq
                .iter()
                .enumerate()
                .map(|(j, e)| {
                    if j == i {
                        replacement.clone()
                    } else {
                        e.clone()
                    }
                })
                .map(SeqTree::into_collapsed)
                .collect();
            results.push(refined);
        }
    }
    trace!(p, ?filter, count = results.len(), "refinements");
    results
}

/// Enumerates refined sequences by total number of splits, memoised per
/// explorer.
#[derive(Debug, Clone)]
pub struct SequenceExplorer {
    no_repeats: bool,
    cache: HashMap<u64, Vec<Vec<SeqTree>>>,
}

impl Default for SequenceExplorer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SequenceExplorer {
    pub fn new(no_repeats: bool) -> Self {
        Self {
            no_repeats,
            cache: HashMap::new(),
        }
    }

    /// Sequences of weight n: `[1]` for n = 1, and for n > 1 the
    /// coprime p-refinements of weight n - p together with the divisible
    /// p-refinements of weight n - p + 1, over primes p < n.
    ///
    /// Each sequence is sorted at the top level; repeats are dropped,
    /// keeping the first occurrence.
    pub fn all_sequences(&mut self, n: u64) -> Vec<Vec<SeqTree>> {
        if let Some(cached) = self.cache.get(&n) {
            return cached.clone();
        }
        let sequences = match n {
            0 => Vec::new(),
            1 => vec![vec![SeqTree::Leaf(1)]],
            _ => {
                let mut found: Vec<Vec<SeqTree>> = Vec::new();
                for p in primes_below(n) {
                    let sources = [
                        (n - p, RefineFilter::Coprime),
                        (n - p + 1, RefineFilter::Divisible),
                    ];
                    for (m, filter) in sources {
                        for seq in self.all_sequences(m) {
                            for mut refined in refine_sequence(&seq, p, filter, self.no_repeats) {
                                refined.sort();
                                if !found.contains(&refined) {
                                    found.push(refined);
                                }
                            }
                        }
                    }
                }
                found
            }
        };
        debug!(n, count = sequences.len(), "all_sequences");
        self.cache.insert(n, sequences.clone());
        sequences
    }
}
