pub mod draw;
pub mod export;
pub mod grouping;
pub mod roster;
pub mod session;

pub use crate::domain::model::{
    DrawPhase, ExportFile, ExportKind, Group, GroupingResult, Participant,
};
pub use crate::domain::ports::{CelebrationHook, NoCelebration, RandomSource, Storage};
pub use crate::utils::error::Result;
