//! Proptest strategies for generating snapshot data.
//!
//! Generated values stay small so property tests run fast while still
//! covering the interesting shapes: duplicate member names (overloads),
//! missing types, annotation combinations, unordered inputs.
//!
//! # Bounds
//!
//! - interfaces per snapshot: up to [`MAX_INTERFACES`]
//! - members per kind: up to [`MAX_MEMBERS`]
//! - operation arguments: up to [`MAX_ARGUMENTS`]

use apilist_types::{
    Attribute, Constant, ExtendedAttributes, HighEntropyClass, IdlType, Interface, Operation,
    Snapshot, SourceLocation,
};
use proptest::prelude::*;

// =============================================================================
// Constants for bounding generated data
// =============================================================================

/// Maximum number of interfaces in a generated snapshot.
pub const MAX_INTERFACES: usize = 6;

/// Maximum number of members per kind in a generated interface.
pub const MAX_MEMBERS: usize = 5;

/// Maximum number of arguments in a generated operation.
pub const MAX_ARGUMENTS: usize = 4;

// =============================================================================
// Name and String Strategies
// =============================================================================

/// Interface-style identifier.
fn arb_interface_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Za-z0-9]{0,11}")
        .expect("valid regex for interface name")
}

/// Member names draw from a small pool so duplicates (overloads) show up
/// in generated data.
fn arb_member_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "open", "close", "item", "length", "name", "share", "toJSON", "value",
    ])
    .prop_map(|s| s.to_string())
}

/// Realistic IDL type display strings. `record<...>` carries a comma to
/// exercise CSV quoting downstream.
fn arb_type_string() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "undefined",
        "boolean",
        "long",
        "unsigned long long",
        "DOMString",
        "USVString",
        "Promise<void>",
        "sequence<DOMString>",
        "record<DOMString, DOMString>",
    ])
    .prop_map(|s| s.to_string())
}

fn arb_use_counter_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Za-z0-9]{0,15}")
        .expect("valid regex for use counter name")
}

fn arb_filename() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,12}\\.idl")
        .expect("valid regex for filename")
}

fn arb_revision() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9a-f]{40}")
        .expect("valid regex for revision")
}

// =============================================================================
// Record Strategies
// =============================================================================

pub fn arb_high_entropy_class() -> impl Strategy<Value = HighEntropyClass> {
    prop_oneof![
        Just(HighEntropyClass::None),
        Just(HighEntropyClass::Unclassified),
        Just(HighEntropyClass::Direct),
    ]
}

pub fn arb_extended_attributes() -> impl Strategy<Value = ExtendedAttributes> {
    (
        any::<bool>(),                            // secure_context_required
        arb_high_entropy_class(),                 // high_entropy_classification
        prop::option::of(arb_use_counter_name()), // use_counter_name
    )
        .prop_map(
            |(secure_context_required, high_entropy_classification, use_counter_name)| {
                ExtendedAttributes {
                    secure_context_required,
                    high_entropy_classification,
                    use_counter_name,
                }
            },
        )
}

pub fn arb_source_location() -> impl Strategy<Value = SourceLocation> {
    (
        prop::option::of(arb_filename()),
        prop::option::of(-2i64..5000), // includes non-positive "unknown" lines
    )
        .prop_map(|(filename, line)| SourceLocation { filename, line })
}

pub fn arb_idl_type() -> impl Strategy<Value = IdlType> {
    arb_type_string().prop_map(|type_string| IdlType { type_string })
}

pub fn arb_attribute() -> impl Strategy<Value = Attribute> {
    (
        arb_member_name(),
        prop::option::of(arb_idl_type()),
        arb_extended_attributes(),
        arb_source_location(),
    )
        .prop_map(|(name, idl_type, extended_attributes, source_location)| Attribute {
            name,
            idl_type,
            extended_attributes,
            source_location,
        })
}

pub fn arb_operation() -> impl Strategy<Value = Operation> {
    (
        arb_member_name(),
        prop::option::of(arb_idl_type()),
        prop::collection::vec(arb_idl_type(), 0..=MAX_ARGUMENTS),
        arb_extended_attributes(),
        arb_source_location(),
    )
        .prop_map(
            |(name, return_type, arguments, extended_attributes, source_location)| Operation {
                name,
                return_type,
                arguments,
                extended_attributes,
                source_location,
            },
        )
}

pub fn arb_constant() -> impl Strategy<Value = Constant> {
    (
        arb_member_name(),
        prop::option::of(arb_idl_type()),
        arb_extended_attributes(),
        arb_source_location(),
    )
        .prop_map(|(name, idl_type, extended_attributes, source_location)| Constant {
            name,
            idl_type,
            extended_attributes,
            source_location,
        })
}

pub fn arb_interface() -> impl Strategy<Value = Interface> {
    (
        arb_interface_name(),
        arb_extended_attributes(),
        arb_source_location(),
        prop::collection::vec(arb_attribute(), 0..=MAX_MEMBERS),
        prop::collection::vec(arb_operation(), 0..=MAX_MEMBERS),
        prop::collection::vec(arb_constant(), 0..=MAX_MEMBERS),
    )
        .prop_map(
            |(name, extended_attributes, source_location, attributes, operations, constants)| {
                Interface {
                    name,
                    extended_attributes,
                    source_location,
                    attributes,
                    operations,
                    constants,
                }
            },
        )
}

/// A full snapshot. Interface names are deduplicated to keep the
/// uniqueness invariant; member lists arrive in whatever order the inner
/// strategies produced them.
pub fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    (
        prop::option::of(arb_revision()),
        prop::collection::vec(arb_interface(), 0..=MAX_INTERFACES),
    )
        .prop_map(|(chromium_revision, mut interfaces)| {
            let mut seen = std::collections::HashSet::new();
            interfaces.retain(|interface| seen.insert(interface.name.clone()));
            Snapshot {
                chromium_revision,
                interfaces,
            }
        })
}
