//! Property-based checks of the coset algebra and the covering engine.

use cosetcover_core::{Coset, Lattice, Progression, Vector2, is_cover, weight};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::One;
use proptest::prelude::*;

fn vec2(x: i64, y: i64) -> Vector2 {
    (BigInt::from(x), BigInt::from(y))
}

// Full-rank lattices L(c:d;N) with N < 30
fn lattice_strategy() -> impl Strategy<Value = Lattice> {
    (1i64..30, -40i64..40, -40i64..40)
        .prop_filter("gcd(c, d, N) must be 1", |(n, c, d)| c.gcd(d).gcd(n) == 1)
        .prop_map(|(n, c, d)| Lattice::new(n, c, d).unwrap())
}

fn progression_strategy() -> impl Strategy<Value = Progression> {
    (1i64..13, 0i64..1000).prop_map(|(n, a)| Progression::new(n, a).unwrap())
}

proptest! {
    #[test]
    fn test_normalisation_is_idempotent(l in lattice_strategy()) {
        let (c, d) = l.vector();
        let again = Lattice::new(l.modulus().clone(), c.clone(), d.clone()).unwrap();
        prop_assert_eq!(&again, &l);
        prop_assert_eq!(again.vector(), (c, d));
    }

    #[test]
    fn test_representative_lies_in_lattice(n in 1i64..30, c in -40i64..40, d in -40i64..40) {
        prop_assume!(c.gcd(&d).gcd(&n) == 1);
        let l = Lattice::new(n, c, d).unwrap();
        prop_assert!(l.contains_point(&vec2(c, d)));
        prop_assert!(l.contains_point(&vec2(c + 7 * n, d - 3 * n)));
    }

    #[test]
    fn test_lattice_join_contains_both(l in lattice_strategy(), x in -50i64..50, y in -50i64..50) {
        let w = vec2(x, y);
        let joined = l.join(&w);
        prop_assert!(joined.contains(&l));
        prop_assert!(joined.contains_point(&w));
        prop_assert!(l.modulus().is_multiple_of(joined.modulus()));
    }

    #[test]
    fn test_line_join_contains_both(x in -20i64..20, y in -20i64..20, u in -20i64..20, v in -20i64..20) {
        let line = Lattice::trivial().join(&vec2(x, y));
        let joined = line.join(&vec2(u, v));
        prop_assert!(joined.contains(&line));
        prop_assert!(joined.contains_point(&vec2(x, y)));
        prop_assert!(joined.contains_point(&vec2(u, v)));
    }

    #[test]
    fn test_progression_join_contains_both(p in progression_strategy(), x in -500i64..500) {
        let x = BigInt::from(x);
        let joined = p.join(&x);
        prop_assert!(joined.contains(&p));
        prop_assert!(joined.contains_point(&x));
    }

    #[test]
    fn test_basis_round_trip(l in lattice_strategy()) {
        prop_assert_eq!(Lattice::from_generators(&l.basis()).unwrap(), l);
    }

    #[test]
    fn test_weight_is_additive(
        a in prop::collection::vec(progression_strategy(), 0..5),
        b in prop::collection::vec(progression_strategy(), 0..5)
    ) {
        let mut both = a.clone();
        both.extend(b.iter().cloned());
        prop_assert_eq!(weight(&both), weight(&a) + weight(&b));
    }

    #[test]
    fn test_light_lists_never_cover(cover in prop::collection::vec(progression_strategy(), 0..6)) {
        if weight(&cover) < BigRational::one() {
            prop_assert!(!is_cover(&cover));
        }
    }

    #[test]
    fn test_light_lattice_lists_never_cover(cover in prop::collection::vec(lattice_strategy(), 0..4)) {
        if weight(&cover) < BigRational::one() {
            prop_assert!(!is_cover(&cover));
        }
    }
}
