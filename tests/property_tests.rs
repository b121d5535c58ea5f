//! Property tests for table-row enumeration and model bookkeeping.

use bayedit::{parent_configurations, Cpt, EditorModel, Position, VariableSpec};
use proptest::prelude::*;

proptest! {
    #[test]
    fn configuration_count_is_the_product_of_domains(
        domains in prop::collection::vec(1usize..5, 0..4)
    ) {
        let configs = parent_configurations(&domains);
        let expected: usize = domains.iter().product();
        prop_assert_eq!(configs.len(), expected);
    }

    #[test]
    fn configurations_enumerate_in_lexicographic_order(
        domains in prop::collection::vec(1usize..5, 1..4)
    ) {
        let configs = parent_configurations(&domains);
        for pair in configs.windows(2) {
            prop_assert!(pair[0] < pair[1], "first parent must vary slowest");
        }
    }

    #[test]
    fn row_index_inverts_the_enumeration(
        domains in prop::collection::vec(1usize..5, 0..4)
    ) {
        let cpt = Cpt::uniform(2, domains.clone());
        for (i, config) in parent_configurations(&domains).iter().enumerate() {
            prop_assert_eq!(cpt.row_index(config), Some(i));
        }
    }

    #[test]
    fn uniform_tables_satisfy_the_row_sum_invariant(
        child in 1usize..7,
        domains in prop::collection::vec(1usize..4, 0..3)
    ) {
        let cpt = Cpt::uniform(child, domains);
        for row in cpt.rows() {
            let sum: f64 = row.iter().sum();
            prop_assert!((sum - 1.0).abs() <= 1e-6);
        }
    }

    #[test]
    fn add_then_remove_node_restores_the_empty_model(
        id in "[a-z]{1,10}",
        x in -1e3f64..1e3,
        y in -1e3f64..1e3
    ) {
        let mut model = EditorModel::new();
        model.add_node(&id, Position { x, y }, VariableSpec::labelized()).unwrap();
        let removed = model.remove_node(&id).unwrap();
        prop_assert!(removed.is_empty());
        prop_assert_eq!(model.node_count(), 0);
        prop_assert_eq!(model.arc_count(), 0);
        // the identifier is free for reuse
        let reused = model.add_node(&id, Position { x, y }, VariableSpec::labelized());
        prop_assert!(reused.is_ok());
    }

    #[test]
    fn arcs_always_reference_live_nodes(
        removals in prop::collection::vec(0usize..4, 0..4)
    ) {
        let ids = ["a", "b", "c", "d"];
        let mut model = EditorModel::new();
        for id in ids {
            model.add_node(id, Position::default(), VariableSpec::labelized()).unwrap();
        }
        model.add_arc("a", "b").unwrap();
        model.add_arc("b", "c").unwrap();
        model.add_arc("c", "d").unwrap();

        for &idx in &removals {
            // repeated removals of the same node fail and must not corrupt
            let _ = model.remove_node(ids[idx]);
            for arc in model.arcs() {
                prop_assert!(model.node(&arc.from).is_some());
                prop_assert!(model.node(&arc.to).is_some());
            }
        }
    }
}
