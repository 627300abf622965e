//! Subject model.
//!
//! A subject joins one teacher to the class groups they teach it to.
//! Subjects may be shared across several sections, so the class side is
//! always a list.

use serde::{Deserialize, Serialize};

use super::{ClassId, SubjectId, TeacherId};

/// A subject taught by one teacher to one or more class groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: SubjectId,
    /// Owning teacher.
    pub teacher_id: TeacherId,
    /// Class groups this subject is taught to (non-empty, deduplicated).
    pub class_ids: Vec<ClassId>,
    /// Periods per week.
    pub periods_per_week: u8,
    /// Display name.
    pub name: String,
}

/// A subject record as produced by upstream sources.
///
/// Older sources carry a single `class_id`, newer ones a `class_ids`
/// list; some carry both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSubject {
    pub id: SubjectId,
    pub teacher_id: TeacherId,
    #[serde(default)]
    pub class_id: Option<ClassId>,
    #[serde(default)]
    pub class_ids: Option<Vec<ClassId>>,
    #[serde(default)]
    pub periods_per_week: u8,
    #[serde(default, alias = "subject_name")]
    pub name: String,
}

impl Subject {
    /// Creates a subject taught to a single class.
    pub fn new(id: SubjectId, teacher_id: TeacherId, class_id: ClassId) -> Self {
        Self {
            id,
            teacher_id,
            class_ids: vec![class_id],
            periods_per_week: 1,
            name: String::new(),
        }
    }

    /// Adds another class group (ignored if already present).
    pub fn with_class(mut self, class_id: ClassId) -> Self {
        if !self.class_ids.contains(&class_id) {
            self.class_ids.push(class_id);
        }
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets periods per week.
    pub fn with_periods_per_week(mut self, periods: u8) -> Self {
        self.periods_per_week = periods;
        self
    }

    /// Whether this subject is taught to the given class.
    #[inline]
    pub fn teaches_class(&self, class_id: ClassId) -> bool {
        self.class_ids.contains(&class_id)
    }
}

impl RawSubject {
    /// Merges `class_id` and `class_ids` into one ordered, deduplicated list.
    ///
    /// Returns `None` if the record names no class at all.
    pub fn normalize(self) -> Option<Subject> {
        let mut class_ids = Vec::new();
        for c in self.class_id.into_iter().chain(self.class_ids.into_iter().flatten()) {
            if !class_ids.contains(&c) {
                class_ids.push(c);
            }
        }
        if class_ids.is_empty() {
            return None;
        }
        Some(Subject {
            id: self.id,
            teacher_id: self.teacher_id,
            class_ids,
            periods_per_week: self.periods_per_week,
            name: self.name,
        })
    }
}

impl From<Subject> for RawSubject {
    fn from(s: Subject) -> Self {
        Self {
            id: s.id,
            teacher_id: s.teacher_id,
            class_id: None,
            class_ids: Some(s.class_ids),
            periods_per_week: s.periods_per_week,
            name: s.name,
        }
    }
}
