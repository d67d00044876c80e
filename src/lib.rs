pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command, LocalStorage};

pub use crate::adapters::random::FastRandom;
pub use crate::config::EventConfig;
pub use crate::core::{
    draw::{DrawEngine, SuspenseSettings},
    grouping::GroupEngine,
    roster::Roster,
    session::{EventSession, SessionSettings},
};
pub use crate::domain::model::{DrawPhase, ExportFile, ExportKind, Group, GroupingResult, Participant};
pub use crate::utils::error::{EventError, Result};
