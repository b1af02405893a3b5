//! Tests for ForestBuilder

use alloctree::domain::{demo_seed, DomainError, ForestBuilder, SeedNode};

#[test]
fn given_demo_seed_when_building_then_creates_two_trees() {
    // Act
    let forest = ForestBuilder::new().build(&demo_seed()).unwrap();

    // Assert
    assert_eq!(forest.roots().len(), 2);
    assert_eq!(forest.len(), 6);
    assert_eq!(forest.depth(), 2);
    assert_eq!(
        forest.leaf_ids(),
        vec!["phones", "laptops", "tables", "chairs"]
    );
}

#[test]
fn given_seed_when_building_then_preserves_sibling_order() {
    let seeds = vec![SeedNode::branch(
        "root",
        "Root",
        0.0,
        vec![
            SeedNode::leaf("z", "Z", 1.0),
            SeedNode::branch("m", "M", 0.0, vec![SeedNode::leaf("m1", "M1", 2.0)]),
            SeedNode::leaf("a", "A", 3.0),
        ],
    )];

    let forest = ForestBuilder::new().build(&seeds).unwrap();

    let order: Vec<_> = forest.iter().map(|(_, n)| n.data.id.clone()).collect();
    assert_eq!(order, vec!["root", "z", "m", "m1", "a"]);
    assert_eq!(forest.find_node("root").unwrap().data.value, 6.0);
}

#[test]
fn given_duplicate_id_across_trees_when_building_then_errors() {
    // Arrange
    let seeds = vec![
        SeedNode::branch("a", "A", 0.0, vec![SeedNode::leaf("x", "X", 1.0)]),
        SeedNode::branch("b", "B", 0.0, vec![SeedNode::leaf("x", "X again", 2.0)]),
    ];

    // Act
    let result = ForestBuilder::new().build(&seeds);

    // Assert
    assert_eq!(result.unwrap_err(), DomainError::DuplicateId("x".to_string()));
}

#[test]
fn given_blank_id_when_building_then_errors() {
    let result = ForestBuilder::new().build(&[SeedNode::leaf("  ", "Blank", 1.0)]);
    assert!(matches!(result, Err(DomainError::EmptyId { .. })));
}

#[test]
fn given_non_finite_value_when_building_then_errors() {
    let mut seed = SeedNode::leaf("n", "N", 1.0);
    seed.original_value = Some(f64::INFINITY);

    let result = ForestBuilder::new().build(&[seed]);

    assert!(matches!(
        result,
        Err(DomainError::NonFiniteValue {
            field: "original_value",
            ..
        })
    ));
}

#[test]
fn given_builder_when_reused_then_starts_fresh() {
    let mut builder = ForestBuilder::new();
    builder.build(&demo_seed()).unwrap();

    // same ids again must not count as duplicates
    let forest = builder.build(&demo_seed()).unwrap();
    assert_eq!(forest.len(), 6);
}

#[test]
fn given_seed_when_building_then_caller_copy_is_not_touched() {
    let seeds = demo_seed();
    let _forest = ForestBuilder::new().build(&seeds).unwrap();
    // built forest is corrected to 1500, the seed keeps its stale total
    assert_eq!(seeds[0].value, 1400.0);
}

#[test]
fn given_empty_seed_when_building_then_forest_is_empty() {
    let forest = ForestBuilder::new().build(&[]).unwrap();
    assert!(forest.is_empty());
    assert_eq!(forest.depth(), 0);
    assert!(forest.totals().variance.is_nan());
}
