use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One person on the event roster.
///
/// Identity is `id`; two participants may share a `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

impl Participant {
    /// Create a participant with a fresh random identifier. The name is trimmed.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.as_ref().trim().to_string(),
        }
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Where the draw engine is in its decide / reveal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawPhase {
    #[default]
    Idle,
    /// A winner has been committed but not yet revealed.
    Drawing,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,
    pub members: Vec<Participant>,
}

/// All groups produced by a single partition call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingResult {
    pub groups: Vec<Group>,
}

impl GroupingResult {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// `(group label, member name)` pairs in group-then-member order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.groups.iter().flat_map(|g| {
            g.members
                .iter()
                .map(move |m| (g.label.as_str(), m.name.as_str()))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    #[serde(alias = "txt")]
    Text,
    Csv,
}

impl ExportKind {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportKind::Text => "grouping-results.txt",
            ExportKind::Csv => "grouping-results.csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportKind::Text => "text/plain;charset=utf-8",
            ExportKind::Csv => "text/csv;charset=utf-8",
        }
    }

    /// Parse the short names used in config files and on the command line.
    pub fn from_str_kind(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Some(ExportKind::Text),
            "csv" => Some(ExportKind::Csv),
            _ => None,
        }
    }
}

/// Formatted export content ready to hand to the download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
