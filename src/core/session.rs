use crate::adapters::random::FastRandom;
use crate::core::draw::{DrawEngine, SuspenseSettings};
use crate::core::export;
use crate::core::grouping::{GroupEngine, DEFAULT_LABEL_TEMPLATE};
use crate::core::roster::Roster;
use crate::core::{CelebrationHook, ExportFile, ExportKind, GroupingResult, Participant, RandomSource};
use crate::utils::error::{EventError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub allow_repeat: bool,
    pub suspense: SuspenseSettings,
    pub label_template: String,
    pub text_file_name: Option<String>,
    pub csv_file_name: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            allow_repeat: false,
            suspense: SuspenseSettings::default(),
            label_template: DEFAULT_LABEL_TEMPLATE.to_string(),
            text_file_name: None,
            csv_file_name: None,
        }
    }
}

/// One event session: the current roster plus raffle and grouping state.
///
/// Replacing the roster resets the raffle and drops any grouping, so results
/// never refer to people who are no longer on the list.
pub struct EventSession<R: RandomSource> {
    roster: Roster,
    draw: DrawEngine<R>,
    groups: GroupEngine<R>,
    grouping: Option<GroupingResult>,
    settings: SessionSettings,
}

impl EventSession<FastRandom> {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_sources(FastRandom::new(), FastRandom::new(), settings)
    }

    /// Reproducible session; draw and grouping streams are derived from `seed`.
    pub fn seeded(seed: u64, settings: SessionSettings) -> Self {
        Self::with_sources(
            FastRandom::with_seed(seed),
            FastRandom::with_seed(seed.wrapping_add(1)),
            settings,
        )
    }
}

impl<R: RandomSource> EventSession<R> {
    pub fn with_sources(draw_rng: R, group_rng: R, settings: SessionSettings) -> Self {
        let mut draw = DrawEngine::new(draw_rng);
        draw.set_allow_repeat(settings.allow_repeat);
        let groups = GroupEngine::new(group_rng).with_label_template(settings.label_template.clone());

        Self {
            roster: Roster::default(),
            draw,
            groups,
            grouping: None,
            settings,
        }
    }

    pub fn with_celebration(mut self, hook: impl CelebrationHook + Send + 'static) -> Self {
        self.draw = self.draw.with_hook(hook);
        self
    }

    pub fn replace_roster(&mut self, roster: Roster) {
        tracing::info!(
            "Roster replaced: {} participants ({} duplicate names)",
            roster.len(),
            roster.duplicate_names().len()
        );
        self.draw.reset(roster.participants());
        self.grouping = None;
        self.roster = roster;
    }

    /// Replace the roster with its first-occurrence-per-name subset.
    pub fn remove_duplicates(&mut self) {
        let deduped = self.roster.without_duplicates();
        self.replace_roster(deduped);
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn draw_engine(&self) -> &DrawEngine<R> {
        &self.draw
    }

    pub fn set_allow_repeat(&mut self, allow: bool) {
        self.settings.allow_repeat = allow;
        self.draw.set_allow_repeat(allow);
    }

    pub fn draw(&mut self) -> Result<Participant> {
        self.draw.draw()
    }

    pub async fn draw_with_suspense<F>(&mut self, on_frame: F) -> Result<Participant>
    where
        F: FnMut(&[String]),
    {
        let suspense = self.settings.suspense;
        self.draw.draw_with_suspense(&suspense, on_frame).await
    }

    pub fn reset_draw(&mut self) {
        self.draw.reset_pool();
    }

    /// Regroup the current roster. On error the previous grouping is kept.
    pub fn partition(&mut self, group_size: usize) -> Result<&GroupingResult> {
        let result = self.groups.partition(self.roster.participants(), group_size)?;
        Ok(&*self.grouping.insert(result))
    }

    pub fn grouping(&self) -> Option<&GroupingResult> {
        self.grouping.as_ref()
    }

    pub fn export(&self, kind: ExportKind) -> Result<ExportFile> {
        let grouping = self.grouping.as_ref().ok_or(EventError::NothingToExport)?;
        let file_name = match kind {
            ExportKind::Text => self.settings.text_file_name.as_deref(),
            ExportKind::Csv => self.settings.csv_file_name.as_deref(),
        };
        export::export_file(grouping, kind, file_name)
    }
}
