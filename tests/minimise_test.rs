//! Reduction and minimisation to the unique minimal representative.

mod common;

use rstest::rstest;

use treepair::TreePair;

const REDUCIBLE: &str = "{111000100,111100000,0 1 2 3 4}";
const REDUCED: &str = "{D: [0 0], [10 1], [11 2] || R: [00 0], [01 1], [1 2]}";

// ============================================================
// Minimise fixtures
// ============================================================

#[test]
fn given_reducible_pair_when_minimised_then_reaches_reduced_form() {
    common::init_test_logging();
    let mut tp = TreePair::from_dfs("01", REDUCIBLE).unwrap();
    tp.minimise();
    assert_eq!(tp.full_string(), REDUCED);
}

#[test]
fn given_reducible_pair_when_minimized_then_spelling_does_not_matter() {
    let mut tp = TreePair::from_dfs("01", REDUCIBLE).unwrap();
    tp.minimize();
    assert_eq!(tp.full_string(), REDUCED);
}

/// Minimisation is idempotent: a second pass changes nothing.
#[rstest]
#[case(REDUCIBLE)]
#[case("{110011000,101010100,0 1 2 3 4}")]
#[case("{11110000111010000,11101000110100100,0 1 2 5 4 3 6 8 7}")]
#[case("{1110000,1010100,0 2 1 3}")]
fn given_any_pair_when_minimised_twice_then_fixpoint(#[case] triple: &str) {
    let mut tp = TreePair::from_dfs("01", triple).unwrap();
    tp.minimise();
    let once = tp.full_string();
    tp.minimise();
    assert_eq!(tp.full_string(), once);
}

#[test]
fn given_minimal_pair_when_minimised_then_only_labels_normalize() {
    let mut tp = TreePair::from_dfs("01", "{11000,10100,1 2 0}").unwrap();
    let before = tp.full_string();
    tp.minimise();
    assert_eq!(tp.full_string(), before);
}

// ============================================================
// Single-caret reductions
// ============================================================

#[test]
fn given_matching_carets_when_reducing_domain_then_both_sides_collapse() {
    let mut tp = TreePair::from_dfs("01", REDUCIBLE).unwrap();
    // domain caret "00" maps onto range caret "000" with labels 0,1
    assert!(tp.reduce_domain_at("00").unwrap());
    assert_eq!(
        tp.full_string(),
        "{D: [00 0], [01 1], [10 2], [11 3] || R: [000 0], [001 1], [01 2], [1 3]}"
    );
}

#[test]
fn given_mismatched_image_when_reducing_domain_then_false() {
    let mut tp = TreePair::from_dfs("01", REDUCIBLE).unwrap();
    tp.minimise();
    // "1" is an exposed domain caret, but its image leaves 01 and 1 do not
    // form a caret in the range tree
    assert!(!tp.reduce_domain_at("1").unwrap());
    assert_eq!(tp.full_string(), REDUCED);
}

#[test]
fn given_non_caret_path_when_reducing_then_false_but_labels_reset() {
    let mut tp = TreePair::from_dfs("01", "{110011000,101010100,0 1 2 3 4}").unwrap();
    tp.apply_perm_domain(&[1, 4, 2, 0, 3]).unwrap();

    // "1" is not an exposed caret; the attempt fails but still resets labels
    assert!(!tp.reduce_domain_at("1").unwrap());
    assert_eq!(tp.domain().permutation(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn given_range_caret_when_reducing_range_then_dual_collapse() {
    common::init_test_logging();
    let mut tp = TreePair::from_dfs("01", REDUCIBLE).unwrap();
    // range caret "000" is the image of domain caret "00"
    assert!(tp.reduce_range_at("000").unwrap());
    assert_eq!(
        tp.full_string(),
        "{D: [00 0], [01 1], [10 2], [11 3] || R: [000 0], [001 1], [01 2], [1 3]}"
    );

    assert!(!tp.reduce_range_at("01").unwrap());
}

#[test]
fn given_trivial_pair_when_reducing_then_nothing_to_collapse() {
    let mut tp = TreePair::new("01").unwrap();
    assert!(!tp.reduce_domain_at("").unwrap());
    assert_eq!(tp.full_string(), "{D: [ 0] || R: [ 0]}");
}
