use crate::core::draw::{SuspenseSettings, MAX_REEL_WIDTH};
use crate::core::grouping::DEFAULT_LABEL_TEMPLATE;
use crate::core::roster::ROSTER_EXTENSIONS;
use crate::core::session::SessionSettings;
use crate::core::ExportKind;
use crate::utils::error::{EventError, Result};
use crate::utils::validation::{self, Validate, MIN_GROUP_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_GROUP_SIZE: usize = 4;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Event settings file. Every section and key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventConfig {
    pub event: Option<EventSection>,
    pub roster: Option<RosterSection>,
    pub raffle: Option<RaffleSection>,
    pub grouping: Option<GroupingSection>,
    pub export: Option<ExportSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventSection {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSection {
    pub file: Option<String>,
    pub dedupe: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaffleSection {
    pub allow_repeat: Option<bool>,
    pub suspense_cycles: Option<usize>,
    pub suspense_interval_ms: Option<u64>,
    pub reel_width: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupingSection {
    pub group_size: Option<usize>,
    pub label_template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSection {
    pub output_path: Option<String>,
    pub formats: Option<Vec<String>>,
    pub text_filename: Option<String>,
    pub csv_filename: Option<String>,
}

impl EventConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EventError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EventError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("export.output_path", self.output_path())?;
        validation::validate_positive_number(
            "grouping.group_size",
            self.group_size(),
            MIN_GROUP_SIZE,
        )?;
        validation::validate_label_template("grouping.label_template", self.label_template())?;

        if let Some(file) = self.roster_file() {
            validation::validate_file_extensions(
                "roster.file",
                &[file.to_string()],
                ROSTER_EXTENSIONS,
            )?;
        }

        let suspense = self.suspense();
        validation::validate_range("raffle.reel_width", suspense.reel_width, 1, MAX_REEL_WIDTH)?;
        validation::validate_range(
            "raffle.suspense_interval_ms",
            suspense.interval.as_millis() as u64,
            1,
            5_000,
        )?;

        if let Some(name) = self.event.as_ref().and_then(|e| e.name.as_deref()) {
            validation::validate_non_empty_string("event.name", name)?;
        }

        self.export_kinds()?;
        Ok(())
    }

    pub fn event_name(&self) -> &str {
        self.event
            .as_ref()
            .and_then(|e| e.name.as_deref())
            .unwrap_or("HR Event")
    }

    pub fn roster_file(&self) -> Option<&str> {
        self.roster.as_ref().and_then(|r| r.file.as_deref())
    }

    pub fn dedupe(&self) -> bool {
        self.roster.as_ref().and_then(|r| r.dedupe).unwrap_or(false)
    }

    pub fn allow_repeat(&self) -> bool {
        self.raffle.as_ref().and_then(|r| r.allow_repeat).unwrap_or(false)
    }

    pub fn suspense(&self) -> SuspenseSettings {
        let defaults = SuspenseSettings::default();
        let Some(raffle) = self.raffle.as_ref() else {
            return defaults;
        };
        SuspenseSettings {
            cycles: raffle.suspense_cycles.unwrap_or(defaults.cycles),
            interval: raffle
                .suspense_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            reel_width: raffle.reel_width.unwrap_or(defaults.reel_width),
        }
    }

    pub fn group_size(&self) -> usize {
        self.grouping
            .as_ref()
            .and_then(|g| g.group_size)
            .unwrap_or(DEFAULT_GROUP_SIZE)
    }

    pub fn label_template(&self) -> &str {
        self.grouping
            .as_ref()
            .and_then(|g| g.label_template.as_deref())
            .unwrap_or(DEFAULT_LABEL_TEMPLATE)
    }

    pub fn output_path(&self) -> &str {
        self.export
            .as_ref()
            .and_then(|e| e.output_path.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    /// Export formats written after grouping; none unless configured.
    pub fn export_kinds(&self) -> Result<Vec<ExportKind>> {
        let Some(formats) = self.export.as_ref().and_then(|e| e.formats.as_ref()) else {
            return Ok(Vec::new());
        };
        parse_export_kinds("export.formats", formats)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            allow_repeat: self.allow_repeat(),
            suspense: self.suspense(),
            label_template: self.label_template().to_string(),
            text_file_name: self.export.as_ref().and_then(|e| e.text_filename.clone()),
            csv_file_name: self.export.as_ref().and_then(|e| e.csv_filename.clone()),
        }
    }
}

impl Validate for EventConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

pub fn parse_export_kinds(field_name: &str, formats: &[String]) -> Result<Vec<ExportKind>> {
    let mut kinds = Vec::new();
    for format in formats {
        let kind =
            ExportKind::from_str_kind(format).ok_or_else(|| EventError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: "Unsupported format. Valid formats: txt, csv".to_string(),
            })?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}
