//! Tests for distribute / recalc / apply_edit

use rstest::rstest;

use alloctree::domain::{
    apply_edit, demo_seed, distribute, recalc, recalc_all, Forest, ForestBuilder, SeedNode,
};
use alloctree::util::testing;

fn value(forest: &Forest, id: &str) -> f64 {
    forest.find_node(id).expect("node exists").data.value
}

fn originals(forest: &Forest) -> Vec<(String, f64)> {
    forest
        .iter()
        .map(|(_, n)| (n.data.id.clone(), n.data.original_value()))
        .collect()
}

//  company
//  ├── north
//  │   ├── n1 (100)
//  │   └── n2 (300)
//  └── south
//      ├── s1 (0)
//      └── s2 (600)
//  misc (50)
fn nested() -> Forest {
    let seeds = vec![
        SeedNode::branch(
            "company",
            "Company",
            0.0,
            vec![
                SeedNode::branch(
                    "north",
                    "North",
                    0.0,
                    vec![
                        SeedNode::leaf("n1", "N1", 100.0),
                        SeedNode::leaf("n2", "N2", 300.0),
                    ],
                ),
                SeedNode::branch(
                    "south",
                    "South",
                    0.0,
                    vec![
                        SeedNode::leaf("s1", "S1", 0.0),
                        SeedNode::leaf("s2", "S2", 600.0),
                    ],
                ),
            ],
        ),
        SeedNode::leaf("misc", "Misc", 50.0),
    ];
    ForestBuilder::new().build(&seeds).unwrap()
}

// ============================================================
// Distributor
// ============================================================

#[rstest]
#[case(&[300.0, 700.0], 500.0, &[150.0, 350.0])]
#[case(&[0.0, 0.0], 100.0, &[50.0, 50.0])]
#[case(&[0.0, 0.0, 0.0, 0.0], 10.0, &[2.5, 2.5, 2.5, 2.5])]
#[case(&[1.0, 3.0], 0.0, &[0.0, 0.0])]
#[case(&[250.0, 750.0], -100.0, &[-25.0, -75.0])]
#[case(&[1.0, 2.0], 10.0, &[3.3333, 6.6667])]
fn given_children_when_distributing_then_keeps_pre_edit_shares(
    #[case] children: &[f64],
    #[case] new_value: f64,
    #[case] expected: &[f64],
) {
    testing::init_test_setup();
    let seeds = vec![SeedNode::branch(
        "p",
        "Parent",
        0.0,
        children
            .iter()
            .enumerate()
            .map(|(i, v)| SeedNode::leaf(format!("c{i}"), format!("C{i}"), *v))
            .collect(),
    )];
    let mut forest = ForestBuilder::new().build(&seeds).unwrap();
    let p = forest.find("p").unwrap();

    distribute(&mut forest, p, new_value);

    let actual: Vec<f64> = (0..children.len())
        .map(|i| value(&forest, &format!("c{i}")))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn given_nested_tree_when_distributing_root_then_every_level_scales() {
    let mut forest = nested();
    let company = forest.find("company").unwrap();
    assert_eq!(value(&forest, "company"), 1000.0);

    distribute(&mut forest, company, 2000.0);
    recalc_all(&mut forest);

    assert_eq!(value(&forest, "north"), 800.0);
    assert_eq!(value(&forest, "south"), 1200.0);
    assert_eq!(value(&forest, "n1"), 200.0);
    assert_eq!(value(&forest, "n2"), 600.0);
    // zero leaf keeps a zero share while its sibling is non-zero
    assert_eq!(value(&forest, "s1"), 0.0);
    assert_eq!(value(&forest, "s2"), 1200.0);
    assert_eq!(value(&forest, "misc"), 50.0);
}

#[test]
fn given_distribute_without_recalc_when_inspecting_then_ancestors_are_stale() {
    let mut forest = nested();
    let north = forest.find("north").unwrap();

    distribute(&mut forest, north, 800.0);

    assert_eq!(value(&forest, "north"), 400.0);
    assert_eq!(value(&forest, "company"), 1000.0);
    assert!(!forest.is_balanced());

    recalc_all(&mut forest);
    assert!(forest.is_balanced());
    assert_eq!(value(&forest, "company"), 1400.0);
}

// ============================================================
// Recalculator
// ============================================================

#[test]
fn given_leaf_when_recalc_then_returns_value_unchanged() {
    let mut forest = nested();
    let misc = forest.find("misc").unwrap();
    assert_eq!(recalc(&mut forest, misc), 50.0);
}

#[test]
fn given_stale_seed_totals_when_built_then_recalc_corrects_them() {
    let forest = ForestBuilder::new().build(&demo_seed()).unwrap();
    let electronics = forest.find_node("electronics").unwrap();
    assert_eq!(electronics.data.value, 1500.0);
    assert_eq!(electronics.data.original_value(), 1400.0);
}

// ============================================================
// apply_edit
// ============================================================

#[test]
fn given_leaf_edit_when_apply_edit_then_only_ancestor_chain_changes() {
    let forest = nested();

    let next = apply_edit(&forest, "n1", 500.0);

    assert_eq!(value(&next, "n1"), 500.0);
    assert_eq!(value(&next, "north"), 800.0);
    assert_eq!(value(&next, "company"), 1400.0);
    for untouched in ["n2", "south", "s1", "s2", "misc"] {
        assert_eq!(value(&next, untouched), value(&forest, untouched), "{untouched}");
    }
}

#[test]
fn given_internal_edit_when_apply_edit_then_target_is_recalculated() {
    let forest = nested();
    let next = apply_edit(&forest, "south", 300.0);
    assert_eq!(value(&next, "south"), 300.0);
    assert_eq!(value(&next, "s2"), 300.0);
    assert_eq!(value(&next, "company"), 700.0);
}

#[test]
fn given_zero_subtree_when_apply_edit_then_splits_evenly_all_the_way_down() {
    let seeds = vec![SeedNode::branch(
        "root",
        "Root",
        0.0,
        vec![
            SeedNode::branch(
                "a",
                "A",
                0.0,
                vec![SeedNode::leaf("a1", "A1", 0.0), SeedNode::leaf("a2", "A2", 0.0)],
            ),
            SeedNode::leaf("b", "B", 0.0),
        ],
    )];
    let forest = ForestBuilder::new().build(&seeds).unwrap();

    let next = apply_edit(&forest, "root", 100.0);

    assert_eq!(value(&next, "a"), 50.0);
    assert_eq!(value(&next, "a1"), 25.0);
    assert_eq!(value(&next, "a2"), 25.0);
    assert_eq!(value(&next, "b"), 50.0);
}

#[test]
fn given_huge_value_on_internal_node_when_apply_edit_then_stays_finite_and_balanced() {
    let forest = nested();

    let next = apply_edit(&forest, "company", 1e305);

    assert!(next.is_finite(), "{:?}", next.values());
    assert!(next.is_balanced(), "{:?}", next.unbalanced_nodes());
    assert!((value(&next, "n2") / value(&next, "n1") - 3.0).abs() < 1e-12);
    assert_eq!(value(&next, "s1"), 0.0);
    assert_eq!(value(&next, "misc"), 50.0);
    assert!((next.totals().grand_total / 1e305 - 1.0).abs() < 1e-12);
}

#[test]
fn given_many_edits_when_applied_then_invariants_hold_after_each() {
    let mut forest = nested();
    let before = originals(&forest);
    let shape = (forest.len(), forest.depth(), forest.leaf_ids());
    let ids = ["company", "north", "n1", "n2", "south", "s1", "s2", "misc"];

    // Deterministic LCG drives ids and values
    let mut state: u64 = 42;
    for _ in 0..200 {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let id = ids[(state >> 33) as usize % ids.len()];
        let new_value = ((state >> 11) % 100_000) as f64 / 7.0;

        forest = apply_edit(&forest, id, new_value);

        assert!(
            forest.is_balanced(),
            "unbalanced after {id}={new_value}: {:?}",
            forest.unbalanced_nodes()
        );
    }
    assert_eq!(originals(&forest), before);
    assert_eq!((forest.len(), forest.depth(), forest.leaf_ids()), shape);
}
