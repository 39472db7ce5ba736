// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Request to place a graduate against a staff request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignGraduate {
    /// The staff request receiving the graduate.
    pub staff_request_id: i64,
    /// The graduate being placed.
    pub graduate_id: i64,
    /// Free-text notes stored on the assignment.
    pub notes: Option<String>,
}

/// Request to change a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterCommand {
    /// Create a chapter in the caller's zone.
    Create { name: String },
    /// Rename an existing chapter.
    Rename { chapter_id: i64, name: String },
    /// Remove an existing chapter.
    Delete { chapter_id: i64 },
}

impl ChapterCommand {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "CreateChapter",
            Self::Rename { .. } => "RenameChapter",
            Self::Delete { .. } => "DeleteChapter",
        }
    }
}
