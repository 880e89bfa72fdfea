//! Partitioning applications into board columns.

use hireboard_protocol::{Application, Stage, StageKey};

/// One column of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn<'a> {
    /// The stage this column shows.
    pub stage: &'a Stage,
    /// Applications in display order.
    pub applications: Vec<&'a Application>,
}

/// Applications grouped by stage, in stage order.
///
/// Derived on demand and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardPartition<'a> {
    columns: Vec<BoardColumn<'a>>,
    orphaned: Vec<&'a Application>,
}

impl<'a> BoardPartition<'a> {
    /// Returns the columns in stage order.
    #[must_use]
    pub fn columns(&self) -> &[BoardColumn<'a>] {
        &self.columns
    }

    /// Returns the applications of one stage.
    #[must_use]
    pub fn get(&self, key: &StageKey) -> Option<&[&'a Application]> {
        self.columns
            .iter()
            .find(|c| &c.stage.key == key)
            .map(|c| c.applications.as_slice())
    }

    /// Applications whose status matches none of the partitioned stages.
    #[must_use]
    pub fn orphaned(&self) -> &[&'a Application] {
        &self.orphaned
    }

    /// Number of applications placed in a column.
    #[must_use]
    pub fn placed(&self) -> usize {
        self.columns.iter().map(|c| c.applications.len()).sum()
    }
}

/// Groups applications by stage.
///
/// Every stage gets a column, even when empty, and column contents keep the
/// order of `applications`. Applications whose status is not one of
/// `stages` land in [`BoardPartition::orphaned`] instead of a column.
///
/// # Examples
///
/// ```
/// use hireboard_pipeline::partition_by_stage;
/// use hireboard_protocol::{Applicant, Application, BuiltinStage, default_stages};
///
/// let stages = default_stages();
/// let apps = vec![Application::new(
///     Applicant::new("Ada", "ada@example.com"),
///     BuiltinStage::Interview.into(),
/// )];
/// let board = partition_by_stage(&apps, &stages);
/// assert_eq!(board.get(&BuiltinStage::Interview.into()).map(<[_]>::len), Some(1));
/// assert_eq!(board.get(&BuiltinStage::Pending.into()).map(<[_]>::len), Some(0));
/// ```
#[must_use]
pub fn partition_by_stage<'a, S>(applications: &'a [Application], stages: S) -> BoardPartition<'a>
where
    S: IntoIterator<Item = &'a Stage>,
{
    let mut columns: Vec<BoardColumn<'a>> = stages
        .into_iter()
        .map(|stage| BoardColumn {
            stage,
            applications: Vec::new(),
        })
        .collect();
    let mut orphaned = Vec::new();

    for app in applications {
        match columns.iter_mut().find(|c| c.stage.key == app.status) {
            Some(column) => column.applications.push(app),
            None => orphaned.push(app),
        }
    }

    BoardPartition { columns, orphaned }
}

#[cfg(test)]
mod tests {
    use hireboard_protocol::{Applicant, BuiltinStage, default_stages};
    use proptest::prelude::*;

    use super::*;

    fn app(status: &str) -> Application {
        Application::new(
            Applicant::new("Test", "test@example.com"),
            StageKey::new(status).unwrap(),
        )
    }

    #[test]
    fn orphans_are_reported_not_placed() {
        let stages = default_stages();
        let apps = vec![app("pending"), app("custom-gone"), app("hired")];
        let board = partition_by_stage(&apps, &stages);
        assert_eq!(board.placed(), 2);
        assert_eq!(board.orphaned().len(), 1);
        assert_eq!(board.orphaned()[0].status.as_str(), "custom-gone");
    }

    #[test]
    fn excluded_stage_applications_are_orphaned() {
        let stages = default_stages();
        let visible: Vec<&Stage> = stages.iter().filter(|s| !s.is_rejected()).collect();
        let apps = vec![app("rejected")];
        let board = partition_by_stage(&apps, visible);
        assert_eq!(board.columns().len(), 5);
        assert_eq!(board.orphaned().len(), 1);
    }

    #[test]
    fn column_order_follows_stage_order() {
        let mut stages = default_stages();
        stages.reverse();
        let apps = vec![app("pending")];
        let board = partition_by_stage(&apps, &stages);
        assert_eq!(
            board.columns().first().map(|c| c.stage.key.clone()),
            Some(BuiltinStage::Rejected.into())
        );
    }

    fn status_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("pending".to_string()),
            Just("reviewing".to_string()),
            Just("interview".to_string()),
            Just("offered".to_string()),
            Just("hired".to_string()),
            Just("rejected".to_string()),
            "custom-[a-z]{1,4}",
        ]
    }

    proptest! {
        #[test]
        fn partition_is_complete(statuses in prop::collection::vec(status_strategy(), 0..40)) {
            let stages = default_stages();
            let apps: Vec<Application> = statuses.iter().map(|s| app(s)).collect();
            let board = partition_by_stage(&apps, &stages);

            prop_assert_eq!(board.placed() + board.orphaned().len(), apps.len());
            for column in board.columns() {
                for placed in &column.applications {
                    prop_assert_eq!(&placed.status, &column.stage.key);
                }
            }
            for orphan in board.orphaned() {
                prop_assert!(stages.iter().all(|s| s.key != orphan.status));
            }
            // Within each column the original relative order is kept.
            for column in board.columns() {
                let positions: Vec<usize> = column
                    .applications
                    .iter()
                    .filter_map(|a| apps.iter().position(|b| b.id == a.id))
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
