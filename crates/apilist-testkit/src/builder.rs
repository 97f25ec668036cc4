//! Fluent builder for constructing snapshots in tests.
//!
//! Interfaces and members are kept in insertion order, so tests can
//! build deliberately unordered data and watch canonicalization sort it.
//!
//! # Example
//!
//! ```rust,ignore
//! use apilist_testkit::SnapshotBuilder;
//!
//! let snapshot = SnapshotBuilder::new()
//!     .revision("8d3c5a2f90b1e4770a6bd4c2f0c9f4f2a5b8c1d0")
//!     .interface("Navigator")
//!     .secure_context()
//!     .operation("share", "Promise<void>", &["ShareData"])
//!     .done()
//!     .build();
//! ```

use apilist_types::{
    Attribute, Constant, HighEntropyClass, IdlType, Interface, Operation, Snapshot, SourceLocation,
};

/// Shorthand for an [`IdlType`] from a display string.
pub fn idl(type_string: &str) -> IdlType {
    IdlType {
        type_string: type_string.to_string(),
    }
}

/// Top-level builder; finish with [`SnapshotBuilder::build`].
#[derive(Default)]
pub struct SnapshotBuilder {
    chromium_revision: Option<String>,
    interfaces: Vec<Interface>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(mut self, revision: &str) -> Self {
        self.chromium_revision = Some(revision.to_string());
        self
    }

    /// Start an interface; configure it and call [`InterfaceBuilder::done`]
    /// to come back.
    pub fn interface(self, name: &str) -> InterfaceBuilder {
        InterfaceBuilder {
            snapshot: self,
            interface: Interface {
                name: name.to_string(),
                ..Interface::default()
            },
        }
    }

    /// Add a prebuilt interface.
    pub fn add_interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn build(self) -> Snapshot {
        Snapshot {
            chromium_revision: self.chromium_revision,
            interfaces: self.interfaces,
        }
    }
}

/// Interface under construction; created by [`SnapshotBuilder::interface`].
pub struct InterfaceBuilder {
    snapshot: SnapshotBuilder,
    interface: Interface,
}

impl InterfaceBuilder {
    /// Mark the interface secure-context only.
    pub fn secure_context(mut self) -> Self {
        self.interface.extended_attributes.secure_context_required = true;
        self
    }

    pub fn high_entropy(mut self, class: HighEntropyClass) -> Self {
        self.interface.extended_attributes.high_entropy_classification = class;
        self
    }

    pub fn use_counter(mut self, name: &str) -> Self {
        self.interface.extended_attributes.use_counter_name = Some(name.to_string());
        self
    }

    pub fn source(mut self, filename: &str, line: i64) -> Self {
        self.interface.source_location = SourceLocation {
            filename: Some(filename.to_string()),
            line: Some(line),
        };
        self
    }

    pub fn attribute(mut self, name: &str, idl_type: &str) -> Self {
        self.interface.attributes.push(Attribute {
            name: name.to_string(),
            idl_type: Some(idl(idl_type)),
            ..Attribute::default()
        });
        self
    }

    pub fn operation(mut self, name: &str, return_type: &str, argument_types: &[&str]) -> Self {
        self.interface.operations.push(Operation {
            name: name.to_string(),
            return_type: Some(idl(return_type)),
            arguments: argument_types.iter().map(|t| idl(t)).collect(),
            ..Operation::default()
        });
        self
    }

    pub fn constant(mut self, name: &str, idl_type: &str) -> Self {
        self.interface.constants.push(Constant {
            name: name.to_string(),
            idl_type: Some(idl(idl_type)),
            ..Constant::default()
        });
        self
    }

    /// Add a prebuilt member when the shorthand setters are not enough.
    pub fn add_attribute(mut self, attribute: Attribute) -> Self {
        self.interface.attributes.push(attribute);
        self
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.interface.operations.push(operation);
        self
    }

    pub fn add_constant(mut self, constant: Constant) -> Self {
        self.interface.constants.push(constant);
        self
    }

    /// Finish this interface and return to the snapshot builder.
    pub fn done(mut self) -> SnapshotBuilder {
        self.snapshot.interfaces.push(self.interface);
        self.snapshot
    }
}
