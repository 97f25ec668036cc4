//! Property-style tests for canonical ordering, row projection, and
//! rendering determinism.

use apilist_core::{canonicalize, flatten, render_csv, CSV_HEADER};
use apilist_testkit::arb::{arb_operation, arb_snapshot};
use apilist_types::{Interface, Snapshot};
use proptest::prelude::*;

/// All operation signatures in the snapshot as sorted argument-type
/// vectors. Canonicalization may reorder operations but must never
/// touch the vectors themselves.
fn argument_signatures(snapshot: &Snapshot) -> Vec<Vec<String>> {
    let mut signatures: Vec<Vec<String>> = snapshot
        .interfaces
        .iter()
        .flat_map(|interface| interface.operations.iter())
        .map(|operation| {
            operation
                .arguments
                .iter()
                .map(|argument| argument.type_string.clone())
                .collect()
        })
        .collect();
    signatures.sort();
    signatures
}

fn entity_count(snapshot: &Snapshot) -> usize {
    snapshot
        .interfaces
        .iter()
        .map(|interface| {
            1 + interface.attributes.len()
                + interface.operations.len()
                + interface.constants.len()
        })
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Canonicalizing an already canonical snapshot is a no-op.
    #[test]
    fn property_canonicalize_is_idempotent(snapshot in arb_snapshot()) {
        let mut once = snapshot;
        canonicalize(&mut once);
        let mut twice = once.clone();
        canonicalize(&mut twice);
        prop_assert_eq!(once, twice);
    }

    // Argument lists are call signatures; sorting never reaches them.
    #[test]
    fn property_canonicalize_preserves_argument_lists(snapshot in arb_snapshot()) {
        let before = argument_signatures(&snapshot);
        let mut canonical = snapshot;
        canonicalize(&mut canonical);
        let after = argument_signatures(&canonical);
        prop_assert_eq!(before, after);
    }

    // After canonicalization every unordered sequence ascends by name.
    #[test]
    fn property_canonical_sequences_ascend(snapshot in arb_snapshot()) {
        let mut canonical = snapshot;
        canonicalize(&mut canonical);
        for window in canonical.interfaces.windows(2) {
            prop_assert!(window[0].name <= window[1].name);
        }
        for interface in &canonical.interfaces {
            for window in interface.attributes.windows(2) {
                prop_assert!(window[0].name <= window[1].name);
            }
            for window in interface.operations.windows(2) {
                prop_assert!(window[0].name <= window[1].name);
            }
            for window in interface.constants.windows(2) {
                prop_assert!(window[0].name <= window[1].name);
            }
        }
    }

    // Rows come out sorted by the synthetic interface:member key no matter
    // how the input was ordered.
    #[test]
    fn property_rows_are_globally_sorted(snapshot in arb_snapshot()) {
        let rows = flatten(&snapshot);
        let keys: Vec<String> = rows.iter().map(|row| row.sort_key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    // Flattening before or after canonicalization yields identical rows.
    #[test]
    fn property_flatten_ignores_input_order(snapshot in arb_snapshot()) {
        let direct = flatten(&snapshot);
        let mut canonical = snapshot;
        canonicalize(&mut canonical);
        prop_assert_eq!(direct, flatten(&canonical));
    }

    // One row per interface and one per member, nothing dropped.
    #[test]
    fn property_row_count_matches_entity_count(snapshot in arb_snapshot()) {
        let rows = flatten(&snapshot);
        prop_assert_eq!(rows.len(), entity_count(&snapshot));
    }

    // Rendering the same snapshot twice produces identical bytes.
    #[test]
    fn property_render_is_deterministic(snapshot in arb_snapshot()) {
        let mut canonical = snapshot;
        canonicalize(&mut canonical);
        let first = render_csv(&flatten(&canonical));
        let second = render_csv(&flatten(&canonical));
        prop_assert_eq!(&first, &second);
        prop_assert!(first.starts_with(CSV_HEADER));
    }

    // A canonical snapshot survives an encode/decode/encode cycle byte
    // for byte.
    #[test]
    fn property_canonical_json_round_trips(snapshot in arb_snapshot()) {
        let mut canonical = snapshot;
        canonicalize(&mut canonical);
        let encoded = serde_json::to_string_pretty(&canonical).expect("encode snapshot");
        let decoded: Snapshot = serde_json::from_str(&encoded).expect("decode snapshot");
        prop_assert_eq!(&decoded, &canonical);
        let reencoded = serde_json::to_string_pretty(&decoded).expect("re-encode snapshot");
        prop_assert_eq!(encoded, reencoded);
    }

    // Operation rows always render the declared signature in order.
    #[test]
    fn property_operation_arguments_render_in_declared_order(operation in arb_operation()) {
        let expected = format!(
            "({})",
            operation
                .arguments
                .iter()
                .map(|argument| argument.type_string.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        let snapshot = Snapshot {
            interfaces: vec![Interface {
                name: "Host".to_string(),
                operations: vec![operation],
                ..Interface::default()
            }],
            ..Snapshot::default()
        };
        let rows = flatten(&snapshot);
        prop_assert_eq!(rows[1].arguments.as_deref(), Some(expected.as_str()));
    }
}
