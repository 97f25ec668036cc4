//! Projection from a snapshot to flat listing rows.
//!
//! One row per interface plus one row per member, each kind with its own
//! projection, then a single stable sort on `interface:member` over the
//! combined rows. Output order never depends on the order records
//! arrived in; ties (overloads) keep declaration order.

use apilist_types::{
    ApiRow, Attribute, Constant, EntityKind, ExtendedAttributes, HighEntropyClass, IdlType,
    Interface, Operation, Snapshot, SourceLocation,
};

/// Project the snapshot into listing rows, globally ordered by
/// [`ApiRow::sort_key`].
pub fn flatten(snapshot: &Snapshot) -> Vec<ApiRow> {
    let mut rows = Vec::new();
    for interface in &snapshot.interfaces {
        rows.push(interface_row(interface));
        for attribute in &interface.attributes {
            rows.push(attribute_row(&interface.name, attribute));
        }
        for operation in &interface.operations {
            rows.push(operation_row(&interface.name, operation));
        }
        for constant in &interface.constants {
            rows.push(constant_row(&interface.name, constant));
        }
    }
    rows.sort_by_cached_key(|row| row.sort_key());
    rows
}

fn interface_row(interface: &Interface) -> ApiRow {
    let mut row = ApiRow::new(&interface.name, None, EntityKind::Interface);
    project_annotations(&mut row, &interface.extended_attributes);
    project_location(&mut row, &interface.source_location);
    row
}

fn attribute_row(interface: &str, attribute: &Attribute) -> ApiRow {
    let mut row = ApiRow::new(interface, non_empty(&attribute.name), EntityKind::Attribute);
    row.idl_type = attribute.idl_type.as_ref().and_then(type_cell);
    project_annotations(&mut row, &attribute.extended_attributes);
    project_location(&mut row, &attribute.source_location);
    row
}

fn operation_row(interface: &str, operation: &Operation) -> ApiRow {
    let mut row = ApiRow::new(interface, non_empty(&operation.name), EntityKind::Operation);
    row.arguments = Some(render_arguments(&operation.arguments));
    row.idl_type = operation.return_type.as_ref().and_then(type_cell);
    project_annotations(&mut row, &operation.extended_attributes);
    project_location(&mut row, &operation.source_location);
    row
}

/// Constants list no annotations in the output even when the snapshot
/// carries them. The source location still applies.
fn constant_row(interface: &str, constant: &Constant) -> ApiRow {
    let mut row = ApiRow::new(interface, non_empty(&constant.name), EntityKind::Constant);
    row.idl_type = constant.idl_type.as_ref().and_then(type_cell);
    project_location(&mut row, &constant.source_location);
    row
}

/// Declared order, comma-joined, parenthesized. Zero arguments render
/// as `()`.
fn render_arguments(arguments: &[IdlType]) -> String {
    let types: Vec<&str> = arguments.iter().map(|a| a.type_string.as_str()).collect();
    format!("({})", types.join(","))
}

fn project_annotations(row: &mut ApiRow, annotations: &ExtendedAttributes) {
    // "True" only when required; the cell stays empty otherwise, never "False"
    if annotations.secure_context_required {
        row.secure_context = Some("True".to_string());
    }
    row.high_entropy = match annotations.high_entropy_classification {
        HighEntropyClass::None => None,
        HighEntropyClass::Unclassified => Some("(True)".to_string()),
        HighEntropyClass::Direct => Some("Direct".to_string()),
    };
    row.use_counter = annotations.use_counter_name.as_deref().and_then(non_empty);
}

fn project_location(row: &mut ApiRow, location: &SourceLocation) {
    row.source_file = location.filename.as_deref().and_then(non_empty);
    row.source_line = location
        .line
        .filter(|line| *line > 0)
        .map(|line| line.to_string());
}

fn type_cell(idl_type: &IdlType) -> Option<String> {
    non_empty(&idl_type.type_string)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(interface: Interface) -> Snapshot {
        Snapshot {
            interfaces: vec![interface],
            ..Snapshot::default()
        }
    }

    fn idl(type_string: &str) -> IdlType {
        IdlType {
            type_string: type_string.to_string(),
        }
    }

    fn share_interface() -> Interface {
        Interface {
            name: "Navigator".to_string(),
            operations: vec![Operation {
                name: "share".to_string(),
                return_type: Some(idl("Promise<void>")),
                arguments: vec![idl("ShareData")],
                extended_attributes: ExtendedAttributes {
                    secure_context_required: true,
                    high_entropy_classification: HighEntropyClass::Direct,
                    use_counter_name: None,
                },
                ..Operation::default()
            }],
            ..Interface::default()
        }
    }

    #[test]
    fn operation_row_for_navigator_share() {
        let rows = flatten(&single(share_interface()));
        assert_eq!(rows.len(), 2);
        let row = &rows[1];
        assert_eq!(row.interface, "Navigator");
        assert_eq!(row.name.as_deref(), Some("share"));
        assert_eq!(row.entity_type, EntityKind::Operation);
        assert_eq!(row.arguments.as_deref(), Some("(ShareData)"));
        assert_eq!(row.idl_type.as_deref(), Some("Promise<void>"));
        assert_eq!(row.secure_context.as_deref(), Some("True"));
        assert_eq!(row.high_entropy.as_deref(), Some("Direct"));
        assert!(row.use_counter.is_none());
        assert!(row.syntactic_form.is_none());
        assert!(row.source_file.is_none());
        assert!(row.source_line.is_none());
    }

    #[test]
    fn interface_rows_precede_member_rows_globally() {
        let snapshot = Snapshot {
            interfaces: vec![
                Interface {
                    name: "B".to_string(),
                    constants: vec![Constant {
                        name: "x".to_string(),
                        ..Constant::default()
                    }],
                    ..Interface::default()
                },
                Interface {
                    name: "A".to_string(),
                    attributes: vec![Attribute {
                        name: "y".to_string(),
                        ..Attribute::default()
                    }],
                    ..Interface::default()
                },
            ],
            ..Snapshot::default()
        };
        let rows = flatten(&snapshot);
        let summary: Vec<(String, Option<&str>, EntityKind)> = rows
            .iter()
            .map(|r| (r.interface.clone(), r.name.as_deref(), r.entity_type))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A".to_string(), None, EntityKind::Interface),
                ("A".to_string(), Some("y"), EntityKind::Attribute),
                ("B".to_string(), None, EntityKind::Interface),
                ("B".to_string(), Some("x"), EntityKind::Constant),
            ]
        );
    }

    #[test]
    fn zero_argument_operation_renders_unit_parens() {
        let interface = Interface {
            name: "Document".to_string(),
            operations: vec![Operation {
                name: "close".to_string(),
                ..Operation::default()
            }],
            ..Interface::default()
        };
        let rows = flatten(&single(interface));
        assert_eq!(rows[1].arguments.as_deref(), Some("()"));
        assert!(rows[1].idl_type.is_none());
    }

    #[test]
    fn multiple_arguments_join_without_spaces() {
        let interface = Interface {
            name: "EventTarget".to_string(),
            operations: vec![Operation {
                name: "addEventListener".to_string(),
                arguments: vec![idl("DOMString"), idl("EventListener"), idl("boolean")],
                ..Operation::default()
            }],
            ..Interface::default()
        };
        let rows = flatten(&single(interface));
        assert_eq!(
            rows[1].arguments.as_deref(),
            Some("(DOMString,EventListener,boolean)")
        );
    }

    #[test]
    fn high_entropy_cells_by_classification() {
        let interface = Interface {
            name: "Screen".to_string(),
            attributes: vec![
                Attribute {
                    name: "width".to_string(),
                    extended_attributes: ExtendedAttributes {
                        high_entropy_classification: HighEntropyClass::Unclassified,
                        ..ExtendedAttributes::default()
                    },
                    ..Attribute::default()
                },
                Attribute {
                    name: "pixelDepth".to_string(),
                    ..Attribute::default()
                },
            ],
            ..Interface::default()
        };
        let rows = flatten(&single(interface));
        let width = rows.iter().find(|r| r.name.as_deref() == Some("width")).unwrap();
        let pixel_depth = rows
            .iter()
            .find(|r| r.name.as_deref() == Some("pixelDepth"))
            .unwrap();
        assert_eq!(width.high_entropy.as_deref(), Some("(True)"));
        assert!(pixel_depth.high_entropy.is_none());
    }

    #[test]
    fn secure_context_cell_never_says_false() {
        let interface = Interface {
            name: "Screen".to_string(),
            ..Interface::default()
        };
        let rows = flatten(&single(interface));
        assert!(rows[0].secure_context.is_none());
    }

    #[test]
    fn use_counter_empty_string_stays_absent() {
        let interface = Interface {
            name: "Screen".to_string(),
            extended_attributes: ExtendedAttributes {
                use_counter_name: Some(String::new()),
                ..ExtendedAttributes::default()
            },
            ..Interface::default()
        };
        let rows = flatten(&single(interface));
        assert!(rows[0].use_counter.is_none());
    }

    #[test]
    fn constant_annotations_are_not_projected() {
        let interface = Interface {
            name: "WheelEvent".to_string(),
            constants: vec![Constant {
                name: "DOM_DELTA_PIXEL".to_string(),
                idl_type: Some(idl("unsigned long")),
                extended_attributes: ExtendedAttributes {
                    secure_context_required: true,
                    high_entropy_classification: HighEntropyClass::Direct,
                    use_counter_name: Some("WheelEventDelta".to_string()),
                },
                source_location: SourceLocation {
                    filename: Some("wheel_event.idl".to_string()),
                    line: Some(17),
                },
            }],
            ..Interface::default()
        };
        let rows = flatten(&single(interface));
        let row = &rows[1];
        assert_eq!(row.entity_type, EntityKind::Constant);
        assert_eq!(row.idl_type.as_deref(), Some("unsigned long"));
        assert!(row.secure_context.is_none());
        assert!(row.high_entropy.is_none());
        assert!(row.use_counter.is_none());
        assert_eq!(row.source_file.as_deref(), Some("wheel_event.idl"));
        assert_eq!(row.source_line.as_deref(), Some("17"));
    }

    #[test]
    fn source_line_requires_a_positive_value() {
        for (line, expected) in [
            (Some(42), Some("42")),
            (Some(0), None),
            (Some(-3), None),
            (None, None),
        ] {
            let interface = Interface {
                name: "Screen".to_string(),
                source_location: SourceLocation {
                    filename: Some("screen.idl".to_string()),
                    line,
                },
                ..Interface::default()
            };
            let rows = flatten(&single(interface));
            assert_eq!(rows[0].source_line.as_deref(), expected, "line {line:?}");
            assert_eq!(rows[0].source_file.as_deref(), Some("screen.idl"));
        }
    }

    #[test]
    fn unnamed_member_yields_empty_name_cell_after_interface_row() {
        let interface = Interface {
            name: "Screen".to_string(),
            attributes: vec![Attribute::default()],
            ..Interface::default()
        };
        let rows = flatten(&single(interface));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].entity_type, EntityKind::Interface);
        assert_eq!(rows[1].entity_type, EntityKind::Attribute);
        assert!(rows[1].name.is_none());
        // both rows carry the key "Screen:"; the interface row wins the tie
        assert_eq!(rows[0].sort_key(), rows[1].sort_key());
    }

    #[test]
    fn same_name_overload_rows_keep_declaration_order() {
        let interface = Interface {
            name: "Window".to_string(),
            operations: vec![
                Operation {
                    name: "open".to_string(),
                    arguments: vec![idl("USVString")],
                    ..Operation::default()
                },
                Operation {
                    name: "open".to_string(),
                    ..Operation::default()
                },
            ],
            ..Interface::default()
        };
        let rows = flatten(&single(interface));
        assert_eq!(rows[1].arguments.as_deref(), Some("(USVString)"));
        assert_eq!(rows[2].arguments.as_deref(), Some("()"));
    }

    #[test]
    fn empty_snapshot_flattens_to_no_rows() {
        assert!(flatten(&Snapshot::default()).is_empty());
    }
}
