use crate::core::{Group, GroupingResult, Participant, RandomSource};
use crate::utils::error::{EventError, Result};
use crate::utils::validation::MIN_GROUP_SIZE;
use uuid::Uuid;

pub const DEFAULT_LABEL_TEMPLATE: &str = "Group {n}";

/// Splits a roster into randomly shuffled, fixed-size groups.
pub struct GroupEngine<R: RandomSource> {
    rng: R,
    label_template: String,
}

impl<R: RandomSource> GroupEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            label_template: DEFAULT_LABEL_TEMPLATE.to_string(),
        }
    }

    /// `{n}` in the template is replaced by the 1-based group number.
    pub fn with_label_template(mut self, template: impl Into<String>) -> Self {
        self.label_template = template.into();
        self
    }

    pub fn label_for(&self, number: usize) -> String {
        self.label_template.replace("{n}", &number.to_string())
    }

    /// Shuffle `participants` uniformly and cut the result into chunks of
    /// `group_size`; the last group takes the remainder.
    pub fn partition(
        &mut self,
        participants: &[Participant],
        group_size: usize,
    ) -> Result<GroupingResult> {
        if group_size < MIN_GROUP_SIZE {
            return Err(EventError::InvalidGroupSize {
                size: group_size,
                min: MIN_GROUP_SIZE,
            });
        }

        let mut shuffled = participants.to_vec();
        self.rng.shuffle(&mut shuffled);

        let groups: Vec<Group> = shuffled
            .chunks(group_size)
            .enumerate()
            .map(|(i, members)| Group {
                id: Uuid::new_v4().to_string(),
                label: self.label_for(i + 1),
                members: members.to_vec(),
            })
            .collect();

        tracing::debug!(
            "Partitioned {} participants into {} groups of up to {}",
            participants.len(),
            groups.len(),
            group_size
        );
        Ok(GroupingResult { groups })
    }
}
