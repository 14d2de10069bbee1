//! Error types for cosetcover-core

use num_bigint::BigInt;
use thiserror::Error;

/// Result type alias for coset construction and parsing.
pub type Result<T> = std::result::Result<T, CoverError>;

/// Errors raised while building cosets.
///
/// These signal a misused precondition, never a domain answer: questions such
/// as "does this list cover?" are total and answer with a `bool`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverError {
    /// Negative index or modulus
    #[error("invalid index {0}: must be non-negative")]
    InvalidIndex(BigInt),

    /// Representative that is not a point of P^1(Z/NZ), or a zero vector
    /// passed where a rank-1 direction is required
    #[error("malformed representative ({c}, {d}) for index {index}")]
    MalformedRepresentative {
        index: BigInt,
        c: BigInt,
        d: BigInt,
    },

    /// Rank-2 subgroup whose quotient is not cyclic
    #[error("subgroup of index {index} is not cocyclic (first elementary divisor {elementary_divisor})")]
    NotCocyclic {
        index: BigInt,
        elementary_divisor: BigInt,
    },

    /// Malformed textual coset
    #[error("parse error: {0}")]
    Parse(String),
}
