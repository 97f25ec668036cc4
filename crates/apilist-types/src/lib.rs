//! Data types (snapshots + listing rows + config) for apilist.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.
//! The snapshot structs mirror the JSON the Chromium build target emits
//! when it extracts the web-exposed API surface. Field names follow that
//! wire format (camelCase), absent fields decode to defaults, and unknown
//! fields are ignored, so snapshots from newer extractors still load.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Frozen Vocabulary ────────────────────────────────────────────────────────
// Names shared with the build system and with published artifacts. Consumers
// pin these, so they never change.

/// Build driver used to refresh the snapshot.
pub const SNAPSHOT_BUILD_TOOL: &str = "autoninja";

/// Build target that writes the snapshot into the build directory.
pub const SNAPSHOT_BUILD_TARGET: &str = "generate_api_snapshot";

/// Snapshot file the build target produces, relative to the build directory.
pub const SNAPSHOT_BUILD_FILE: &str = "web_api_snapshot.json";

/// Canonicalized snapshot artifact committed to the target checkout.
pub const SNAPSHOT_TARGET_FILE: &str = "chromium_api_snapshot.json";

/// Flat CSV artifact committed to the target checkout.
pub const API_LIST_TARGET_FILE: &str = "chromium_api_list.csv";

/// Git trailer naming the Chromium commit position, separator included,
/// e.g. `Cr-Commit-Position: refs/heads/main@{#1234567}`.
pub const COMMIT_POSITION_TRAILER: &str = "Cr-Commit-Position: ";

// ── Snapshot Wire Types ──────────────────────────────────────────────────────

/// One extracted API snapshot: every web-exposed interface known to the
/// build, plus the revision it was extracted at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Chromium revision recorded by the extractor, when it recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromium_revision: Option<String>,
    /// Interface records. Names are unique within a snapshot.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
}

/// A named interface and its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "ExtendedAttributes::is_empty")]
    pub extended_attributes: ExtendedAttributes,
    #[serde(default, skip_serializing_if = "SourceLocation::is_empty")]
    pub source_location: SourceLocation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<Constant>,
}

/// A property exposed on an interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idl_type: Option<IdlType>,
    #[serde(default, skip_serializing_if = "ExtendedAttributes::is_empty")]
    pub extended_attributes: ExtendedAttributes,
    #[serde(default, skip_serializing_if = "SourceLocation::is_empty")]
    pub source_location: SourceLocation,
}

/// A callable member. `arguments` is the declared call signature: the
/// order is meaningful and is never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<IdlType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<IdlType>,
    #[serde(default, skip_serializing_if = "ExtendedAttributes::is_empty")]
    pub extended_attributes: ExtendedAttributes,
    #[serde(default, skip_serializing_if = "SourceLocation::is_empty")]
    pub source_location: SourceLocation,
}

/// A constant member. Constants carry extended attributes on the wire;
/// the flat listing leaves those cells empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Constant {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idl_type: Option<IdlType>,
    #[serde(default, skip_serializing_if = "ExtendedAttributes::is_empty")]
    pub extended_attributes: ExtendedAttributes,
    #[serde(default, skip_serializing_if = "SourceLocation::is_empty")]
    pub source_location: SourceLocation,
}

/// A resolved IDL type, kept as the extractor's display string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdlType {
    #[serde(default)]
    pub type_string: String,
}

/// Annotations attached to interfaces and members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedAttributes {
    /// True when the entity is only exposed in secure contexts.
    #[serde(default, skip_serializing_if = "is_false")]
    pub secure_context_required: bool,
    #[serde(default, skip_serializing_if = "HighEntropyClass::is_none")]
    pub high_entropy_classification: HighEntropyClass,
    /// Use-counter metric name, when usage of the entity is counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_counter_name: Option<String>,
}

impl ExtendedAttributes {
    /// True when no annotation is set.
    pub fn is_empty(&self) -> bool {
        !self.secure_context_required
            && self.high_entropy_classification == HighEntropyClass::None
            && self.use_counter_name.is_none()
    }
}

/// How an entity contributes to fingerprinting entropy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HighEntropyClass {
    /// Not classified as high entropy.
    #[default]
    None,
    /// Flagged high entropy without a specific class.
    Unclassified,
    /// Directly exposes identifying bits.
    Direct,
}

impl HighEntropyClass {
    pub fn as_str(self) -> &'static str {
        match self {
            HighEntropyClass::None => "none",
            HighEntropyClass::Unclassified => "unclassified",
            HighEntropyClass::Direct => "direct",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, HighEntropyClass::None)
    }
}

/// Where an entity was declared in the Chromium tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// 1-based line number. Non-positive values mean "unknown" and stay
    /// out of rendered output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
}

impl SourceLocation {
    pub fn is_empty(&self) -> bool {
        self.filename.is_none() && self.line.is_none()
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

// ── Flat Listing Rows ────────────────────────────────────────────────────────

/// Kind tag for a flat listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Interface,
    Attribute,
    Operation,
    Constant,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Interface => "interface",
            EntityKind::Attribute => "attribute",
            EntityKind::Operation => "operation",
            EntityKind::Constant => "constant",
        }
    }
}

/// One row of the flat API listing. Cells that do not apply to the row's
/// kind stay `None` and render as empty CSV fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRow {
    /// Owning interface name; for interface rows, the interface itself.
    pub interface: String,
    /// Member name; `None` for interface rows.
    pub name: Option<String>,
    pub entity_type: EntityKind,
    pub arguments: Option<String>,
    pub idl_type: Option<String>,
    /// Reserved column; no producer fills it today.
    pub syntactic_form: Option<String>,
    pub use_counter: Option<String>,
    pub secure_context: Option<String>,
    pub high_entropy: Option<String>,
    pub source_file: Option<String>,
    pub source_line: Option<String>,
}

impl ApiRow {
    /// A row with only the identity cells set.
    pub fn new(interface: &str, name: Option<String>, entity_type: EntityKind) -> Self {
        ApiRow {
            interface: interface.to_string(),
            name,
            entity_type,
            arguments: None,
            idl_type: None,
            syntactic_form: None,
            use_counter: None,
            secure_context: None,
            high_entropy: None,
            source_file: None,
            source_line: None,
        }
    }

    /// Global ordering key: interface name, a colon, then the member name
    /// (empty for interface rows). An interface row therefore sorts ahead
    /// of its members, and members group under their interface.
    pub fn sort_key(&self) -> String {
        format!("{}:{}", self.interface, self.name.as_deref().unwrap_or(""))
    }
}

// ── CLI Configuration ────────────────────────────────────────────────────────

/// Root of `apilist.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Defaults applied when the matching CLI flag is not given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Defaults {
    /// Chromium build directory holding the extracted snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_path: Option<PathBuf>,
    /// Checkout the artifacts are written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<PathBuf>,
    /// Rebuild the snapshot before reading it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<bool>,
    /// Commit refreshed artifacts after a successful update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<bool>,
}
