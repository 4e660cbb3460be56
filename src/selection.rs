use crate::data::filter::{Predicate, RangeBounds};

// ---------------------------------------------------------------------------
// Selection – what a chart group currently highlights
// ---------------------------------------------------------------------------

/// The highlighted subset of one chart group.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    None,
    /// A clicked category.
    Point { field: String, value: String },
    /// A brushed numeric interval, inclusive.
    Interval { field: String, bounds: RangeBounds },
}

impl Selection {
    /// Predicate for linked views. No selection yields the identity.
    pub fn predicate(&self) -> Predicate {
        match self {
            Selection::None => Predicate::All,
            Selection::Point { field, value } => Predicate::equals(field, value.clone()),
            Selection::Interval { field, bounds } => Predicate::range(field, *bounds),
        }
    }

    /// Whether a bar for `category` of `field` is drawn emphasized in the
    /// source chart. Everything is emphasized while nothing is selected.
    pub fn emphasizes_category(&self, field: &str, category: &str) -> bool {
        match self {
            Selection::None => true,
            Selection::Point { field: f, value } => f == field && value == category,
            Selection::Interval { .. } => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Events and phases
// ---------------------------------------------------------------------------

/// Interaction emitted by a rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// A category mark was clicked.
    Click { field: String, value: String },
    /// A click landed on empty plot area.
    ClickEmpty,
    /// Drag started at data coordinate `x` on the axis of `field`.
    BrushStart { field: String, x: f64 },
    /// Drag moved to data coordinate `x`.
    BrushMove(f64),
    BrushEnd,
    ClearBrush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A brush drag is in progress.
    Selecting,
    Selected,
}

// ---------------------------------------------------------------------------
// SelectionCoordinator
// ---------------------------------------------------------------------------

/// Turns one chart group's interaction events into its current
/// [`Selection`]. Holds nothing beyond that selection and the drag anchor.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    phase: Phase,
    selection: Selection,
    anchor: Option<(String, f64)>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Predicate sibling views filter on.
    pub fn predicate(&self) -> Predicate {
        self.selection.predicate()
    }

    /// Drop any selection, e.g. when the widget layer re-renders with a new
    /// dataset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance the state machine. Returns whether the selection changed.
    pub fn handle(&mut self, event: SelectionEvent) -> bool {
        let before = self.selection.clone();
        match event {
            SelectionEvent::Click { field, value } => {
                let same = matches!(
                    &self.selection,
                    Selection::Point { field: f, value: v } if *f == field && *v == value
                );
                if same {
                    self.reset();
                } else {
                    self.anchor = None;
                    self.selection = Selection::Point { field, value };
                    self.phase = Phase::Selected;
                }
            }
            SelectionEvent::ClickEmpty | SelectionEvent::ClearBrush => self.reset(),
            SelectionEvent::BrushStart { field, x } => {
                self.selection = Selection::Interval {
                    field: field.clone(),
                    bounds: RangeBounds::new(x, x),
                };
                self.anchor = Some((field, x));
                self.phase = Phase::Selecting;
            }
            SelectionEvent::BrushMove(x) => {
                if let (Phase::Selecting, Some((field, start))) = (self.phase, &self.anchor) {
                    self.selection = Selection::Interval {
                        field: field.clone(),
                        bounds: RangeBounds::new(*start, x),
                    };
                }
            }
            SelectionEvent::BrushEnd => {
                if self.phase == Phase::Selecting {
                    let has_width = matches!(
                        &self.selection,
                        Selection::Interval { bounds, .. } if bounds.width() > 0.0
                    );
                    if has_width {
                        self.anchor = None;
                        self.phase = Phase::Selected;
                    } else {
                        self.reset();
                    }
                }
            }
        }

        let changed = self.selection != before;
        if changed {
            log::debug!("selection -> {:?} ({:?})", self.selection, self.phase);
        }
        changed
    }
}
