// Arithmetic substrate: integers, Smith form, projective line
pub mod arith;
pub mod smith;
pub mod projective_line;

// Coset algebra and the covering engine, shared by Z and Z^2
pub mod ambient;
pub mod coset;
pub mod progression;
pub mod lattice;
pub mod covering;

// Searches over index profiles
pub mod index_search;
pub mod refine;

pub mod error;

// Public arithmetic API
pub use crate::arith::{Vector2, gcd, primes_below, psi, wedge};
pub use crate::projective_line::ProjectiveLine;
pub use crate::smith::{SmithForm, smith_normal_form};

// Public coset / covering API
pub use crate::ambient::{AmbientSpace, IntegerLine, IntegerPlane, PrimitiveVectors};
pub use crate::coset::{Coset, Index, Point};
pub use crate::progression::Progression;
pub use crate::lattice::Lattice;
pub use crate::covering::{
	full_cover, is_cover, is_cover_without, is_full, is_in_union, is_minimal,
	is_one_minimal, is_strongly_minimal, modulus_lcm, weight,
};

// Public search API
pub use crate::index_search::{IndexSearch, PsiTable, SearchConfig, is_valid_index_multiset};
pub use crate::refine::{RefineFilter, SeqTree, SequenceExplorer, refine_sequence};

pub use crate::error::{CoverError, Result};
