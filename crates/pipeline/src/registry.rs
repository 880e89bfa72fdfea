//! The per-job stage registry.
//!
//! The registry owns the ordered stage list of one job. Stages are kept in a
//! single vector: the visible pipeline order first, with the `rejected`
//! bucket always in the last slot. Every mutation returns a [`StageEdit`]
//! describing what changed, carrying the full configuration to persist and
//! enough of the previous state to undo the edit if persistence fails.

use std::collections::HashSet;

use hireboard_protocol::{
    BuiltinStage, JobId, Stage, StageKey, default_stages, validate_color, validate_label,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{PipelineError, Result};

/// Kind of change a [`StageEdit`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEditKind {
    /// A custom stage was appended.
    Created,
    /// Label, color, or icon changed.
    Updated,
    /// The stage moved within the visible order.
    Reordered,
    /// The stage was removed.
    Deleted,
}

/// A single applied stage mutation.
///
/// Edits are handed to the persistence layer and, if the write fails, back
/// to [`StageRegistry::revert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEdit {
    /// Monotonic sequence number within the registry.
    pub seq: u64,
    /// What changed.
    pub kind: StageEditKind,
    /// The stage this edit touched.
    pub key: StageKey,
    /// The stage as it was before the edit (absent for creations).
    pub before: Option<Stage>,
    /// The stage as the edit left it (absent for deletions).
    pub after: Option<Stage>,
    /// Position before the edit.
    pub before_index: Option<usize>,
    /// Position after the edit.
    pub after_index: Option<usize>,
    /// The complete stage list to persist.
    pub snapshot: Vec<Stage>,
}

/// Result of trying to undo a failed [`StageEdit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertOutcome {
    /// The registry was restored.
    Reverted,
    /// A newer edit superseded this one; nothing was changed.
    Superseded,
    /// Deleted stages are never resurrected.
    NotRevertible,
}

/// Ordered stage configuration for one job.
///
/// # Examples
///
/// ```
/// use hireboard_pipeline::StageRegistry;
/// use hireboard_protocol::JobId;
///
/// let mut registry = StageRegistry::new(JobId::new("backend"), Vec::new());
/// assert_eq!(registry.list_stages(false).len(), 5);
///
/// let (stage, _edit) = registry.create_stage("Take-home", "#0891B2", "clipboard").unwrap();
/// assert!(stage.key.as_str().starts_with("custom-"));
/// assert_eq!(registry.list_stages(false).len(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct StageRegistry {
    job: JobId,
    stages: Vec<Stage>,
    retired: HashSet<StageKey>,
    next_seq: u64,
}

impl StageRegistry {
    /// Hydrates a registry from a stored configuration.
    ///
    /// An empty configuration yields the built-in stages. Duplicate keys
    /// are dropped (first wins), missing built-ins are restored, and the
    /// `rejected` bucket is moved to the end.
    #[must_use]
    pub fn new(job: JobId, stored: Vec<Stage>) -> Self {
        let stored = if stored.is_empty() {
            default_stages()
        } else {
            stored
        };

        let mut seen = HashSet::new();
        let mut stages = Vec::with_capacity(stored.len());
        for stage in stored {
            if seen.insert(stage.key.clone()) {
                stages.push(stage);
            } else {
                warn!(job = %job, key = %stage.key, "dropping duplicate stage key");
            }
        }

        let rejected = match stages.iter().position(Stage::is_rejected) {
            Some(position) => stages.remove(position),
            None => BuiltinStage::Rejected.stage(),
        };
        for builtin in BuiltinStage::pipeline() {
            let key = StageKey::from(builtin);
            if !seen.contains(&key) {
                debug!(job = %job, key = %key, "restoring missing built-in stage");
                stages.push(builtin.stage());
            }
        }
        stages.push(rejected);

        Self {
            job,
            stages,
            retired: HashSet::new(),
            next_seq: 0,
        }
    }

    /// Returns the job this registry belongs to.
    #[must_use]
    pub fn job(&self) -> &JobId {
        &self.job
    }

    /// Lists stages in pipeline order, with `rejected` last when requested.
    #[must_use]
    pub fn list_stages(&self, include_rejected: bool) -> Vec<&Stage> {
        self.stages
            .iter()
            .filter(|s| include_rejected || !s.is_rejected())
            .collect()
    }

    /// Returns the full stage list, `rejected` included.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Looks up a stage by key.
    #[must_use]
    pub fn get(&self, key: &StageKey) -> Option<&Stage> {
        self.stages.iter().find(|s| &s.key == key)
    }

    /// Returns `true` if a stage with this key exists.
    #[must_use]
    pub fn contains(&self, key: &StageKey) -> bool {
        self.get(key).is_some()
    }

    /// Returns the position of a stage in the full list.
    #[must_use]
    pub fn index_of(&self, key: &StageKey) -> Option<usize> {
        self.stages.iter().position(|s| &s.key == key)
    }

    /// Returns the first visible stage, the default fallback for migrations.
    #[must_use]
    pub fn first_visible(&self) -> Option<&Stage> {
        self.stages.iter().find(|s| !s.is_rejected())
    }

    fn visible_len(&self) -> usize {
        self.stages.iter().filter(|s| !s.is_rejected()).count()
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn fresh_key(&self) -> StageKey {
        loop {
            let candidate = format!("custom-{}", Uuid::new_v4().simple());
            if let Ok(key) = StageKey::new(candidate)
                && !self.contains(&key)
                && !self.retired.contains(&key)
            {
                return key;
            }
        }
    }

    fn edit(
        &mut self,
        kind: StageEditKind,
        key: StageKey,
        before: Option<(Stage, usize)>,
        after: Option<(Stage, usize)>,
    ) -> StageEdit {
        let (before, before_index) = before.map_or((None, None), |(s, i)| (Some(s), Some(i)));
        let (after, after_index) = after.map_or((None, None), |(s, i)| (Some(s), Some(i)));
        StageEdit {
            seq: self.next_seq(),
            kind,
            key,
            before,
            after,
            before_index,
            after_index,
            snapshot: self.stages.clone(),
        }
    }

    /// Appends a new custom stage to the end of the visible order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] for an empty label or a
    /// malformed color.
    pub fn create_stage(
        &mut self,
        label: &str,
        color: &str,
        icon: &str,
    ) -> Result<(Stage, StageEdit)> {
        let stage = Stage::custom(self.fresh_key(), label, color, icon)?;
        let index = self.visible_len();
        self.stages.insert(index, stage.clone());
        debug!(job = %self.job, key = %stage.key, label = %stage.label, "created stage");
        let edit = self.edit(
            StageEditKind::Created,
            stage.key.clone(),
            None,
            Some((stage.clone(), index)),
        );
        Ok((stage, edit))
    }

    fn update(
        &mut self,
        key: &StageKey,
        apply: impl FnOnce(&mut Stage),
    ) -> Result<(Stage, StageEdit)> {
        let index = self
            .index_of(key)
            .ok_or_else(|| PipelineError::UnknownStage(key.clone()))?;
        let before = self.stages[index].clone();
        apply(&mut self.stages[index]);
        let after = self.stages[index].clone();
        let edit = self.edit(
            StageEditKind::Updated,
            key.clone(),
            Some((before, index)),
            Some((after.clone(), index)),
        );
        Ok((after, edit))
    }

    /// Changes a stage's label. Allowed on built-ins.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] for an empty label and
    /// [`PipelineError::UnknownStage`] for an unknown key.
    pub fn rename_stage(&mut self, key: &StageKey, label: &str) -> Result<(Stage, StageEdit)> {
        let label = validate_label(label)?;
        self.update(key, |stage| stage.label = label)
    }

    /// Changes a stage's color. Allowed on built-ins.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] for a malformed color and
    /// [`PipelineError::UnknownStage`] for an unknown key.
    pub fn recolor_stage(&mut self, key: &StageKey, color: &str) -> Result<(Stage, StageEdit)> {
        let color = validate_color(color)?;
        self.update(key, |stage| stage.color = color)
    }

    /// Changes a stage's icon. Allowed on built-ins.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownStage`] for an unknown key.
    pub fn reicon_stage(&mut self, key: &StageKey, icon: &str) -> Result<(Stage, StageEdit)> {
        let icon = icon.trim().to_string();
        self.update(key, |stage| stage.icon = icon)
    }

    /// Moves a stage to `new_index` within the visible order.
    ///
    /// The index is clamped to the visible range. `rejected` is not part of
    /// the visible order and cannot be moved.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownStage`] for an unknown key and
    /// [`PipelineError::InvariantViolation`] when moving `rejected`.
    pub fn reorder_stage(&mut self, key: &StageKey, new_index: usize) -> Result<StageEdit> {
        let index = self
            .index_of(key)
            .ok_or_else(|| PipelineError::UnknownStage(key.clone()))?;
        if self.stages[index].is_rejected() {
            return Err(PipelineError::invariant(
                "the rejected stage is not part of the pipeline order",
            ));
        }
        let target = new_index.min(self.visible_len().saturating_sub(1));
        let stage = self.stages.remove(index);
        self.stages.insert(target, stage.clone());
        debug!(job = %self.job, key = %key, from = index, to = target, "reordered stage");
        Ok(self.edit(
            StageEditKind::Reordered,
            key.clone(),
            Some((stage.clone(), index)),
            Some((stage, target)),
        ))
    }

    /// Checks whether a stage may be deleted.
    ///
    /// `occupancy` is the number of applications currently in the stage.
    /// A non-empty stage needs a reassignment target that exists and is not
    /// the stage itself.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownStage`] for an unknown key and
    /// [`PipelineError::InvariantViolation`] for built-ins or an invalid
    /// reassignment.
    pub fn check_delete(
        &self,
        key: &StageKey,
        occupancy: usize,
        reassign_to: Option<&StageKey>,
    ) -> Result<()> {
        let stage = self
            .get(key)
            .ok_or_else(|| PipelineError::UnknownStage(key.clone()))?;
        if !stage.is_custom || key.builtin().is_some() {
            return Err(PipelineError::invariant(format!(
                "built-in stage {:?} cannot be deleted",
                stage.label
            )));
        }
        if let Some(target) = reassign_to {
            if target == key {
                return Err(PipelineError::invariant(
                    "cannot reassign applications to the stage being deleted",
                ));
            }
            if !self.contains(target) {
                return Err(PipelineError::invariant(format!(
                    "reassignment target {target} does not exist"
                )));
            }
        } else if occupancy > 0 {
            return Err(PipelineError::invariant(format!(
                "stage {:?} still holds {occupancy} application(s); choose where to move them",
                stage.label
            )));
        }
        Ok(())
    }

    /// Removes a custom stage and retires its key.
    ///
    /// Applications referencing the stage must already have been migrated
    /// to `reassign_to`; `occupancy` is the number still left behind.
    ///
    /// # Errors
    ///
    /// Same as [`StageRegistry::check_delete`].
    pub fn delete_stage(
        &mut self,
        key: &StageKey,
        occupancy: usize,
        reassign_to: Option<&StageKey>,
    ) -> Result<StageEdit> {
        self.check_delete(key, occupancy, reassign_to)?;
        let index = self
            .index_of(key)
            .ok_or_else(|| PipelineError::UnknownStage(key.clone()))?;
        let stage = self.stages.remove(index);
        self.retired.insert(key.clone());
        debug!(job = %self.job, key = %key, "deleted stage");
        Ok(self.edit(
            StageEditKind::Deleted,
            key.clone(),
            Some((stage, index)),
            None,
        ))
    }

    /// Undoes an edit whose persistence failed.
    ///
    /// An edit is only undone while the registry still shows exactly what
    /// it produced; a later edit to the same stage wins. Created stages are
    /// removed (callers must make sure they are still empty). Deleted stages
    /// are never brought back.
    pub fn revert(&mut self, edit: &StageEdit) -> RevertOutcome {
        match edit.kind {
            StageEditKind::Deleted => RevertOutcome::NotRevertible,
            StageEditKind::Created => {
                let Some(index) = self.index_of(&edit.key) else {
                    return RevertOutcome::Superseded;
                };
                if edit.after.as_ref() != Some(&self.stages[index]) {
                    return RevertOutcome::Superseded;
                }
                self.stages.remove(index);
                self.retired.insert(edit.key.clone());
                RevertOutcome::Reverted
            }
            StageEditKind::Updated => {
                let (Some(index), Some(before)) = (self.index_of(&edit.key), &edit.before) else {
                    return RevertOutcome::Superseded;
                };
                let current = &mut self.stages[index];
                let Some(after) = &edit.after else {
                    return RevertOutcome::Superseded;
                };
                let mut changed = false;
                if current.label == after.label && before.label != after.label {
                    current.label.clone_from(&before.label);
                    changed = true;
                }
                if current.color == after.color && before.color != after.color {
                    current.color.clone_from(&before.color);
                    changed = true;
                }
                if current.icon == after.icon && before.icon != after.icon {
                    current.icon.clone_from(&before.icon);
                    changed = true;
                }
                if changed {
                    RevertOutcome::Reverted
                } else {
                    RevertOutcome::Superseded
                }
            }
            StageEditKind::Reordered => {
                let (Some(index), Some(after), Some(before)) =
                    (self.index_of(&edit.key), edit.after_index, edit.before_index)
                else {
                    return RevertOutcome::Superseded;
                };
                if index != after {
                    return RevertOutcome::Superseded;
                }
                let stage = self.stages.remove(index);
                let target = before.min(self.visible_len());
                self.stages.insert(target, stage);
                RevertOutcome::Reverted
            }
        }
    }
}
