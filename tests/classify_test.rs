//! Membership classification into Thompson's groups F, T and V.

use rstest::rstest;

use treepair::TreePair;

const FOUR_LEAVES: &str = "{1110000,1010100,0 1 2 3}";

// ============================================================
// F: order-preserving correspondence
// ============================================================

#[test]
fn given_reordered_leaves_when_testing_f_then_false() {
    let tp = TreePair::from_dfs("01", "{1110000,1010100,0 2 1 3}").unwrap();
    assert!(!tp.in_f());
}

#[test]
fn given_consistent_relabelling_when_testing_f_then_still_true() {
    let mut tp = TreePair::from_dfs("01", FOUR_LEAVES).unwrap();
    tp.permute_labels(&[1, 2, 3, 0]).unwrap();
    assert!(tp.in_f());
}

// ============================================================
// T: rotated correspondence
// ============================================================

#[test]
fn given_non_rotation_when_testing_t_then_false() {
    let mut tp = TreePair::from_dfs("01", FOUR_LEAVES).unwrap();
    tp.apply_perm_range(&[1, 3, 2, 0]).unwrap();
    assert!(!tp.in_t());
}

#[test]
fn given_rotation_when_testing_t_then_true() {
    let mut tp = TreePair::from_dfs("01", FOUR_LEAVES).unwrap();
    tp.apply_perm_range(&[1, 2, 3, 0]).unwrap();
    assert!(tp.in_t());
    assert!(!tp.in_f());
}

#[test]
fn given_conjugated_rotation_when_testing_t_then_still_true() {
    let mut tp = TreePair::from_dfs("01", FOUR_LEAVES).unwrap();
    tp.apply_perm_range(&[1, 2, 3, 0]).unwrap();
    // a consistent relabelling scrambles both sequences but not the element
    tp.permute_labels(&[1, 3, 2, 0]).unwrap();
    assert!(tp.in_t());
}

#[test]
fn given_trivial_pair_when_classifying_then_in_all_three() {
    let tp = TreePair::new("01").unwrap();
    assert!(tp.in_f());
    assert!(tp.in_t());
    assert!(tp.in_v());
}

// ============================================================
// V and the subgroup chain
// ============================================================

#[test]
fn given_arbitrary_permutation_when_testing_v_then_true() {
    let mut tp = TreePair::from_dfs("01", FOUR_LEAVES).unwrap();
    tp.apply_perm_range(&[1, 3, 2, 0]).unwrap();
    assert!(tp.in_v());
}

/// F ⊂ T ⊂ V: membership can only widen along the chain.
#[rstest]
#[case(FOUR_LEAVES)]
#[case("{1110000,1010100,0 2 1 3}")]
#[case("{11000,10100,1 2 0}")]
#[case("{110011000,101010100,0 1 2 3 4}")]
#[case("{11001101000,11101000100,5 1 2 4 0 3}")]
fn given_any_pair_when_classified_then_subgroup_chain_holds(#[case] triple: &str) {
    let tp = TreePair::from_dfs("01", triple).unwrap();
    if tp.in_f() {
        assert!(tp.in_t());
    }
    if tp.in_t() {
        assert!(tp.in_v());
    }
}
