use crate::core::{Participant, Storage};
use crate::utils::error::Result;
use crate::utils::validation::validate_file_extensions;
use std::collections::{BTreeSet, HashMap, HashSet};

/// File types accepted for roster upload.
pub const ROSTER_EXTENSIONS: &[&str] = &["txt", "csv"];

const SAMPLE_NAMES: &[&str] = &[
    "陳小明", "林美玲", "李冠宇", "王雅婷", "張家豪", "劉宜君", "黃柏翰", "蔡淑惠", "吳信宏", "鄭羽彤",
    "郭建志", "謝宜芳", "曾冠傑", "洪于婷", "邱品妤", "蘇煜翔", "葉詩涵", "江志強", "呂佩珊", "潘佳琪",
];

/// Split raw input on newlines or commas, trimming entries and dropping blanks.
pub fn split_names(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// The ordered participant list owned by the host.
///
/// A roster is never edited in place; every change builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let participants = names
            .into_iter()
            .filter(|n| !n.as_ref().trim().is_empty())
            .map(Participant::new)
            .collect();
        Self { participants }
    }

    pub fn from_text(raw: &str) -> Self {
        Self::from_names(split_names(raw))
    }

    pub fn from_participants(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    /// Built-in demo roster.
    pub fn sample() -> Self {
        Self::from_names(SAMPLE_NAMES)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Names that occur more than once, by exact match.
    pub fn duplicate_names(&self) -> BTreeSet<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for p in &self.participants {
            *counts.entry(p.name.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn has_duplicates(&self) -> bool {
        let mut seen = HashSet::new();
        self.participants.iter().any(|p| !seen.insert(p.name.as_str()))
    }

    /// New roster keeping only the first participant for each name.
    pub fn without_duplicates(&self) -> Roster {
        let mut seen = HashSet::new();
        let participants = self
            .participants
            .iter()
            .filter(|p| seen.insert(p.name.as_str()))
            .cloned()
            .collect();
        Roster { participants }
    }
}

/// Read an uploaded `.txt` / `.csv` roster through storage.
pub async fn load_roster<S: Storage>(storage: &S, path: &str) -> Result<Roster> {
    validate_file_extensions("roster.file", &[path.to_string()], ROSTER_EXTENSIONS)?;

    let bytes = storage.read_file(path).await?;
    let text = String::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let roster = Roster::from_text(text);
    tracing::debug!("Loaded {} names from {}", roster.len(), path);
    Ok(roster)
}
