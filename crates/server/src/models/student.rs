//! Student records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use roster_core::{
    Age, CODE_MAX_CHARS, DEPARTMENT_MAX_CHARS, NAME_MAX_CHARS, StudentId, TextError, check_text,
};

use super::{Draft, Entity, Patch, nullable, set_if_present};

/// A student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    /// Auto-assigned key.
    pub id: StudentId,
    /// Full name.
    pub name: String,
    /// Age in years, if known.
    pub age: Option<Age>,
    /// Department (empty when unknown).
    pub department: String,
    /// Enrolment number (empty when unknown).
    pub enrol_no: String,
    /// Date the student joined.
    pub joined: Option<NaiveDate>,
}

/// Writable student fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    #[serde(default)]
    pub age: Option<Age>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub enrol_no: String,
    #[serde(default)]
    pub joined: Option<NaiveDate>,
}

/// Partial student update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub age: Option<Option<Age>>,
    pub department: Option<String>,
    pub enrol_no: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub joined: Option<Option<NaiveDate>>,
}

impl Draft for StudentDraft {
    fn validate(&self) -> Result<(), TextError> {
        check_text("name", &self.name, NAME_MAX_CHARS, true)?;
        check_text("department", &self.department, DEPARTMENT_MAX_CHARS, false)?;
        check_text("enrol_no", &self.enrol_no, CODE_MAX_CHARS, false)
    }
}

impl Patch<StudentDraft> for StudentPatch {
    fn apply_to(self, draft: &mut StudentDraft) {
        set_if_present(&mut draft.name, self.name);
        set_if_present(&mut draft.age, self.age);
        set_if_present(&mut draft.department, self.department);
        set_if_present(&mut draft.enrol_no, self.enrol_no);
        set_if_present(&mut draft.joined, self.joined);
    }
}

impl Entity for Student {
    type Id = StudentId;
    type Draft = StudentDraft;
    type Patch = StudentPatch;

    const KIND: &'static str = "student";
    const COLLECTION: &'static str = "students";

    fn id(&self) -> StudentId {
        self.id
    }

    fn department(&self) -> &str {
        &self.department
    }

    fn to_draft(&self) -> StudentDraft {
        StudentDraft {
            name: self.name.clone(),
            age: self.age,
            department: self.department.clone(),
            enrol_no: self.enrol_no.clone(),
            joined: self.joined,
        }
    }

    fn from_draft(id: StudentId, draft: StudentDraft) -> Self {
        Self {
            id,
            name: draft.name,
            age: draft.age,
            department: draft.department,
            enrol_no: draft.enrol_no,
            joined: draft.joined,
        }
    }
}
