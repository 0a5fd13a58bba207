//! Staff records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use roster_core::{
    Age, CODE_MAX_CHARS, DEPARTMENT_MAX_CHARS, NAME_MAX_CHARS, StaffId, TextError, check_text,
};

use super::{Draft, Entity, Patch, nullable, set_if_present};

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Staff {
    /// Auto-assigned key.
    pub id: StaffId,
    /// Full name.
    pub name: String,
    /// Age in years, if known.
    pub age: Option<Age>,
    /// Department (empty when unknown).
    pub department: String,
    /// Staff identifier (empty when unknown).
    pub staff_id: String,
    /// Date the staff member joined.
    pub joined: Option<NaiveDate>,
}

/// Writable staff fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDraft {
    pub name: String,
    #[serde(default)]
    pub age: Option<Age>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub staff_id: String,
    #[serde(default)]
    pub joined: Option<NaiveDate>,
}

/// Partial staff update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub age: Option<Option<Age>>,
    pub department: Option<String>,
    pub staff_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub joined: Option<Option<NaiveDate>>,
}

impl Draft for StaffDraft {
    fn validate(&self) -> Result<(), TextError> {
        check_text("name", &self.name, NAME_MAX_CHARS, true)?;
        check_text("department", &self.department, DEPARTMENT_MAX_CHARS, false)?;
        check_text("staff_id", &self.staff_id, CODE_MAX_CHARS, false)
    }
}

impl Patch<StaffDraft> for StaffPatch {
    fn apply_to(self, draft: &mut StaffDraft) {
        set_if_present(&mut draft.name, self.name);
        set_if_present(&mut draft.age, self.age);
        set_if_present(&mut draft.department, self.department);
        set_if_present(&mut draft.staff_id, self.staff_id);
        set_if_present(&mut draft.joined, self.joined);
    }
}

impl Entity for Staff {
    type Id = StaffId;
    type Draft = StaffDraft;
    type Patch = StaffPatch;

    const KIND: &'static str = "staff";
    const COLLECTION: &'static str = "staff";

    fn id(&self) -> StaffId {
        self.id
    }

    fn department(&self) -> &str {
        &self.department
    }

    fn to_draft(&self) -> StaffDraft {
        StaffDraft {
            name: self.name.clone(),
            age: self.age,
            department: self.department.clone(),
            staff_id: self.staff_id.clone(),
            joined: self.joined,
        }
    }

    fn from_draft(id: StaffId, draft: StaffDraft) -> Self {
        Self {
            id,
            name: draft.name,
            age: draft.age,
            department: draft.department,
            staff_id: draft.staff_id,
            joined: draft.joined,
        }
    }
}
