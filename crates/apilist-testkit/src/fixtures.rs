//! Canned snapshots for integration tests.

use apilist_types::{
    Attribute, ExtendedAttributes, HighEntropyClass, Operation, Snapshot, SourceLocation,
};

use crate::builder::{idl, SnapshotBuilder};

/// A small snapshot with deliberately unordered interfaces and members,
/// covering annotated and plain entities of every kind.
pub fn sample_snapshot() -> Snapshot {
    SnapshotBuilder::new()
        .revision("8d3c5a2f90b1e4770a6bd4c2f0c9f4f2a5b8c1d0")
        .interface("Screen")
        .source("screen.idl", 9)
        .attribute("width", "long")
        .attribute("availWidth", "long")
        .done()
        .interface("Navigator")
        .source("navigator.idl", 4)
        .add_operation(Operation {
            name: "share".to_string(),
            return_type: Some(idl("Promise<void>")),
            arguments: vec![idl("ShareData")],
            extended_attributes: ExtendedAttributes {
                secure_context_required: true,
                high_entropy_classification: HighEntropyClass::Direct,
                use_counter_name: None,
            },
            source_location: SourceLocation {
                filename: Some("navigator_share.idl".to_string()),
                line: Some(12),
            },
        })
        .add_attribute(Attribute {
            name: "userAgent".to_string(),
            idl_type: Some(idl("DOMString")),
            extended_attributes: ExtendedAttributes {
                secure_context_required: false,
                high_entropy_classification: HighEntropyClass::Unclassified,
                use_counter_name: Some("NavigatorUserAgent".to_string()),
            },
            source_location: SourceLocation {
                filename: Some("navigator_id.idl".to_string()),
                line: Some(33),
            },
        })
        .done()
        .interface("WheelEvent")
        .source("wheel_event.idl", 6)
        .constant("DOM_DELTA_PIXEL", "unsigned long")
        .constant("DOM_DELTA_LINE", "unsigned long")
        .done()
        .build()
}

/// Wire-format JSON for a snapshot like [`sample_snapshot`], unordered on
/// purpose. Kept as text so tests exercise real decoding.
pub const SAMPLE_SNAPSHOT_JSON: &str = r#"{
  "chromiumRevision": "8d3c5a2f90b1e4770a6bd4c2f0c9f4f2a5b8c1d0",
  "interfaces": [
    {
      "name": "Screen",
      "sourceLocation": {"filename": "screen.idl", "line": 9},
      "attributes": [
        {"name": "width", "idlType": {"typeString": "long"}},
        {"name": "availWidth", "idlType": {"typeString": "long"}}
      ]
    },
    {
      "name": "Navigator",
      "sourceLocation": {"filename": "navigator.idl", "line": 4},
      "attributes": [
        {
          "name": "userAgent",
          "idlType": {"typeString": "DOMString"},
          "extendedAttributes": {
            "highEntropyClassification": "unclassified",
            "useCounterName": "NavigatorUserAgent"
          },
          "sourceLocation": {"filename": "navigator_id.idl", "line": 33}
        }
      ],
      "operations": [
        {
          "name": "share",
          "returnType": {"typeString": "Promise<void>"},
          "arguments": [{"typeString": "ShareData"}],
          "extendedAttributes": {
            "secureContextRequired": true,
            "highEntropyClassification": "direct"
          },
          "sourceLocation": {"filename": "navigator_share.idl", "line": 12}
        }
      ]
    },
    {
      "name": "WheelEvent",
      "sourceLocation": {"filename": "wheel_event.idl", "line": 6},
      "constants": [
        {"name": "DOM_DELTA_PIXEL", "idlType": {"typeString": "unsigned long"}},
        {"name": "DOM_DELTA_LINE", "idlType": {"typeString": "unsigned long"}}
      ]
    }
  ]
}
"#;
