//! Drop-target resolution.
//!
//! Columns are often mostly empty or of uneven height, so a column is
//! considered "under" the dragged card based on horizontal overlap only.
//! Among overlapping columns the one whose center is closest to the pointer
//! wins, and ties go to the left-most column. Once the column is known the
//! pointer's vertical position picks the card to insert before, if any.

use hireboard_protocol::{ApplicationId, StageKey};

use crate::geometry::{Bounds, Point};
use crate::store::ApplicationStore;

/// Screen region of a rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRegion {
    /// The application shown by the card.
    pub application: ApplicationId,
    /// Where the card is drawn.
    pub bounds: Bounds,
}

/// Screen region of a rendered column and its cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRegion {
    /// Stage shown by the column.
    pub stage: StageKey,
    /// Where the column is drawn.
    pub bounds: Bounds,
    /// Visible cards, top to bottom.
    pub cards: Vec<CardRegion>,
}

impl ColumnRegion {
    /// Creates a column region without cards.
    #[must_use]
    pub fn new(stage: StageKey, bounds: Bounds) -> Self {
        Self {
            stage,
            bounds,
            cards: Vec::new(),
        }
    }

    /// Adds a card region.
    #[must_use]
    pub fn with_card(mut self, application: ApplicationId, bounds: Bounds) -> Self {
        self.cards.push(CardRegion {
            application,
            bounds,
        });
        self
    }
}

/// Geometry of the whole rendered board, as produced by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardLayout {
    /// Visible columns, left to right.
    pub columns: Vec<ColumnRegion>,
}

impl BoardLayout {
    /// Creates a layout from column regions.
    #[must_use]
    pub fn new(columns: Vec<ColumnRegion>) -> Self {
        Self { columns }
    }

    /// Finds the card drawn at `point`.
    #[must_use]
    pub fn card_at(&self, point: Point) -> Option<&CardRegion> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|card| card.bounds.contains(point))
    }

    /// Finds the column drawn at `point`.
    #[must_use]
    pub fn column_at(&self, point: Point) -> Option<&ColumnRegion> {
        self.columns.iter().find(|c| c.bounds.contains(point))
    }
}

/// Where a dragged card would land.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// Append to the end of the column.
    Column(StageKey),
    /// Insert before this card.
    Card(ApplicationId),
}

impl DropTarget {
    /// Maps the target to a stage.
    ///
    /// Card targets are resolved through the card's current status in the
    /// store; an unknown card resolves to nothing.
    #[must_use]
    pub fn stage(&self, store: &ApplicationStore) -> Option<StageKey> {
        match self {
            Self::Column(stage) => Some(stage.clone()),
            Self::Card(id) => store.get(*id).map(|app| app.status.clone()),
        }
    }

    /// Returns the card this target inserts before, if any.
    #[must_use]
    pub fn before(&self) -> Option<ApplicationId> {
        match self {
            Self::Column(_) => None,
            Self::Card(id) => Some(*id),
        }
    }
}

/// Resolves the drop target for a dragged box at `pointer`.
///
/// Returns `None` when no column overlaps the dragged box horizontally.
///
/// # Examples
///
/// ```
/// use hireboard_pipeline::{BoardLayout, Bounds, ColumnRegion, DropTarget, Point, resolve_collision};
/// use hireboard_protocol::StageKey;
///
/// let layout = BoardLayout::new(vec![
///     ColumnRegion::new(StageKey::new("pending").unwrap(), Bounds::new(0.0, 0.0, 20.0, 40.0)),
///     ColumnRegion::new(StageKey::new("reviewing").unwrap(), Bounds::new(20.0, 0.0, 20.0, 40.0)),
/// ]);
/// let dragged = Bounds::new(15.0, 30.0, 18.0, 4.0);
/// let target = resolve_collision(&layout, dragged, Point::new(28.0, 32.0));
/// assert_eq!(target, Some(DropTarget::Column(StageKey::new("reviewing").unwrap())));
/// ```
#[must_use]
pub fn resolve_collision(layout: &BoardLayout, dragged: Bounds, pointer: Point) -> Option<DropTarget> {
    let mut best: Option<(&ColumnRegion, f64)> = None;
    for column in &layout.columns {
        if column.bounds.horizontal_overlap(&dragged) <= 0.0 {
            continue;
        }
        let distance = (column.bounds.center_x() - pointer.x).abs();
        let closer = match best {
            None => true,
            Some((current, best_distance)) => {
                distance < best_distance
                    || (distance == best_distance && column.bounds.x < current.bounds.x)
            }
        };
        if closer {
            best = Some((column, distance));
        }
    }

    let (column, _) = best?;
    let target = column
        .cards
        .iter()
        .find(|card| card.bounds.contains_y(pointer.y))
        .map_or_else(
            || DropTarget::Column(column.stage.clone()),
            |card| DropTarget::Card(card.application),
        );
    Some(target)
}
