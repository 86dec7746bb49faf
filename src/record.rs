//! Record model — the unit of whiteboard document state.
//!
//! DESIGN
//! ======
//! A document is an unordered set of records: shapes, pages, and bindings,
//! each addressable by an opaque string id. A [`Snapshot`] is an immutable
//! point-in-time capture of all records, produced for transit to and from
//! the remote store. Per-record `version` counters drive last-write-wins
//! merging when a remote snapshot is folded into the live canvas.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// RECORD ID
// =============================================================================

/// Opaque record identifier, unique within a snapshot.
///
/// Minted ids take the `kind:uuid` form (`shape:4fd2…`), but any non-empty
/// string supplied by the drawing surface is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Mint a fresh id for a record of the given kind.
    #[must_use]
    pub fn mint(kind: RecordKind) -> Self {
        Self(format!("{}:{}", kind.as_str(), Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// RECORD KINDS
// =============================================================================

/// Discriminant of the [`Record`] union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Shape,
    Page,
    Binding,
}

impl RecordKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shape => "shape",
            Self::Page => "page",
            Self::Binding => "binding",
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A single addressable document entity, tagged by kind on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Shape(ShapeRecord),
    Page(PageRecord),
    Binding(BindingRecord),
}

/// A drawn shape. `shape` names the drawing-surface type ("geo", "draw",
/// "image", ...); style attributes live in `props`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub id: RecordId,
    /// Owning page, or `None` for shapes on the implicit default page.
    pub page: Option<RecordId>,
    pub shape: String,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: f64,
    pub props: serde_json::Value,
    pub version: i64,
}

/// A page grouping shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: RecordId,
    pub name: String,
    pub index: i32,
    pub version: i64,
}

/// A relationship between two records (e.g. an arrow bound to a shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingRecord {
    pub id: RecordId,
    pub from: RecordId,
    pub to: RecordId,
    pub props: serde_json::Value,
    pub version: i64,
}

impl Record {
    #[must_use]
    pub fn id(&self) -> &RecordId {
        match self {
            Self::Shape(s) => &s.id,
            Self::Page(p) => &p.id,
            Self::Binding(b) => &b.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Shape(_) => RecordKind::Shape,
            Self::Page(_) => RecordKind::Page,
            Self::Binding(_) => RecordKind::Binding,
        }
    }

    #[must_use]
    pub fn version(&self) -> i64 {
        match self {
            Self::Shape(s) => s.version,
            Self::Page(p) => p.version,
            Self::Binding(b) => b.version,
        }
    }

    pub fn set_version(&mut self, version: i64) {
        match self {
            Self::Shape(s) => s.version = version,
            Self::Page(p) => p.version = version,
            Self::Binding(b) => b.version = version,
        }
    }

    /// Ids of other records this record references. Every listed id must
    /// resolve within the owning snapshot.
    #[must_use]
    pub fn references(&self) -> Vec<&RecordId> {
        match self {
            Self::Shape(s) => s.page.iter().collect(),
            Self::Page(_) => Vec::new(),
            Self::Binding(b) => vec![&b.from, &b.to],
        }
    }
}

impl ShapeRecord {
    /// A fresh shape with a minted id, version 1, and empty props.
    #[must_use]
    pub fn new(shape: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: RecordId::mint(RecordKind::Shape),
            page: None,
            shape: shape.into(),
            x,
            y,
            width: None,
            height: None,
            rotation: 0.0,
            props: serde_json::json!({}),
            version: 1,
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Invariant violations detected by [`Snapshot::validate`].
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("duplicate record id: {0}")]
    DuplicateId(RecordId),
    #[error("record {record} references missing record {missing}")]
    DanglingRef { record: RecordId, missing: RecordId },
}

impl crate::ErrorCode for SnapshotError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "E_DUPLICATE_ID",
            Self::DanglingRef { .. } => "E_DANGLING_REF",
        }
    }
}

/// Immutable point-in-time capture of all records in a document.
///
/// Serialized as a flat array. Construction sorts records by id so that
/// captures of the same state compare equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: Vec<Record>,
}

impl Snapshot {
    #[must_use]
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| a.id().cmp(b.id()));
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    /// Check snapshot invariants: record ids are unique, and every parent or
    /// endpoint reference resolves to a record in this snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = std::collections::HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(record.id()) {
                return Err(SnapshotError::DuplicateId(record.id().clone()));
            }
        }
        for record in &self.records {
            for reference in record.references() {
                if !seen.contains(reference) {
                    return Err(SnapshotError::DanglingRef {
                        record: record.id().clone(),
                        missing: reference.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
