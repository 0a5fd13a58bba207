//! Record models and their write payloads.
//!
//! Each record type comes in three shapes:
//!
//! - the stored record (`Student`), as returned by the API;
//! - a draft (`StudentDraft`), the full set of writable fields used by
//!   create and full update;
//! - a patch (`StudentPatch`), where every field is optional and nullable
//!   fields distinguish "absent" from an explicit `null`.

pub mod employee;
pub mod staff;
pub mod student;

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use roster_core::TextError;

pub use employee::{Employee, EmployeeDraft, EmployeePatch};
pub use staff::{Staff, StaffDraft, StaffPatch};
pub use student::{Student, StudentDraft, StudentPatch};

/// A stored record type with its draft and patch payloads.
pub trait Entity: Serialize + Clone + Send + Sync + Unpin + 'static {
    /// Typed primary key.
    type Id: Copy + Display + DeserializeOwned + From<i32> + Into<i32> + Send + Sync + 'static;
    /// All writable fields.
    type Draft: Draft + DeserializeOwned + Clone + Send + Sync + 'static;
    /// Partial update payload.
    type Patch: Patch<Self::Draft> + DeserializeOwned + Send + 'static;

    /// Singular name used in messages and logs.
    const KIND: &'static str;
    /// Collection path segment under `/api`.
    const COLLECTION: &'static str;

    /// The record's primary key.
    fn id(&self) -> Self::Id;

    /// The record's department (empty when unset).
    fn department(&self) -> &str;

    /// Copy the writable fields out of a stored record.
    fn to_draft(&self) -> Self::Draft;

    /// Assemble a record from a key and its writable fields.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;
}

/// Field-level checks that serde cannot express.
pub trait Draft {
    /// Check text limits and required fields.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails its column constraint.
    fn validate(&self) -> Result<(), TextError>;
}

/// A partial update that can be folded into a draft.
pub trait Patch<D> {
    /// Overwrite the fields present in the patch.
    fn apply_to(self, draft: &mut D);
}

/// Deserialize a field that must tell "absent" apart from `null`.
///
/// Use together with `#[serde(default)]`: an absent key stays `None`, a
/// `null` becomes `Some(None)`, and a value becomes `Some(Some(v))`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrite `slot` when the patch carried the field.
pub(crate) fn set_if_present<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
