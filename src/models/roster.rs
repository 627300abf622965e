//! Roster model.
//!
//! Teachers, class groups, and rooms as supplied by the roster
//! collaborator. All three are read-only to the assignment engine.

use serde::{Deserialize, Serialize};

use super::{ClassId, RoomId, TeacherId};

/// A teacher who can be absent or act as a substitute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: TeacherId,
    /// Display name.
    #[serde(default, alias = "full_name")]
    pub name: String,
    /// Subject group (department), e.g. "Science".
    #[serde(default)]
    pub subject_group: String,
}

/// A class group (grade + section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    /// Unique class identifier.
    pub id: ClassId,
    /// Class name, e.g. "M.1/2".
    #[serde(default, alias = "class_name")]
    pub name: String,
}

/// A room. Carried for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Room name.
    #[serde(default, alias = "room_name")]
    pub name: String,
    /// Room classification.
    #[serde(default)]
    pub room_type: RoomType,
}

/// Room classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    /// General classroom.
    #[default]
    Classroom,
    /// Laboratory or technology room.
    Lab,
    /// Domain-specific type.
    Custom(String),
}

impl Teacher {
    /// Creates a teacher.
    pub fn new(id: TeacherId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            subject_group: String::new(),
        }
    }

    /// Sets the subject group.
    pub fn with_subject_group(mut self, group: impl Into<String>) -> Self {
        self.subject_group = group.into();
        self
    }
}

impl ClassGroup {
    /// Creates a class group.
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Room {
    /// Creates a general classroom.
    pub fn classroom(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            room_type: RoomType::Classroom,
        }
    }

    /// Creates a lab room.
    pub fn lab(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            room_type: RoomType::Lab,
        }
    }

    /// Whether this is a lab/tech room.
    pub fn is_lab(&self) -> bool {
        self.room_type == RoomType::Lab
    }
}
