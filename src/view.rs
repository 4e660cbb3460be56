use crate::config::Config;
use crate::data::aggregate::{self, CategoryCount};
use crate::data::filter::{apply, Predicate, RangeBounds, View};
use crate::data::model::{columns, Dataset};
use crate::error::Result;
use crate::selection::SelectionCoordinator;

/// Fields shown by the coordinated tick plots, top to bottom.
pub const TICK_FIELDS: [&str; 4] = [
    columns::PRICE,
    columns::REVIEW_COUNT,
    columns::ESTIMATED_REVENUE,
    columns::REVIEW_SCORE,
];

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Values read from the widget layer each render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    /// Selected `host_neighbourhood`.
    pub neighbourhood: Option<String>,
    /// Inclusive `review_scores_rating` range.
    pub score_range: RangeBounds,
}

/// What the widgets may offer: select-box options and slider limits.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetOptions {
    pub neighbourhoods: Vec<String>,
    pub score_limits: RangeBounds,
}

impl WidgetOptions {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        Ok(Self {
            neighbourhoods: aggregate::distinct_values(dataset, columns::HOST_NEIGHBOURHOOD)?,
            score_limits: RangeBounds::from_field(dataset, columns::REVIEW_SCORE)?
                .unwrap_or(RangeBounds::new(0.0, 0.0)),
        })
    }

    /// First neighbourhood, full score range.
    pub fn initial_state(&self) -> WidgetState {
        WidgetState {
            neighbourhood: self.neighbourhoods.first().cloned(),
            score_range: self.score_limits,
        }
    }
}

/// Render parameters that do not change between interactions.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub top_k: usize,
    pub tick_prefilter: Vec<Predicate>,
}

impl From<&Config> for RenderSettings {
    fn from(config: &Config) -> Self {
        Self {
            top_k: config.top_k as usize,
            tick_prefilter: config.tick_prefilter(),
        }
    }
}

/// One coordinator per interactive chart group.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    /// Click selection on the neighbourhood bars.
    pub bars: SelectionCoordinator,
    /// Shared brush across the tick plots.
    pub ticks: SelectionCoordinator,
}

impl Selections {
    pub fn reset(&mut self) {
        self.bars.reset();
        self.ticks.reset();
    }
}

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Review score against review count for one host neighbourhood.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterView {
    pub view: View,
    /// `[review_scores_rating, number_of_reviews]` per plotted row.
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    pub category: String,
    pub count: usize,
    pub emphasized: bool,
}

/// Top-K neighbourhood counts linked to room-type counts.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedBars {
    /// Clickable source chart, largest first.
    pub source: Vec<BarView>,
    /// Room types over the rows the click selects (all rows when none).
    pub sibling: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickAxis {
    pub field: &'static str,
    pub ticks: Vec<Tick>,
}

/// Single-axis tick plots sharing one brush.
#[derive(Debug, Clone, PartialEq)]
pub struct TickGroup {
    /// Rows left after the threshold pre-filter.
    pub view: View,
    pub axes: Vec<TickAxis>,
}

/// Everything handed to the chart layer for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Views {
    pub scatter: ScatterView,
    pub bars: LinkedBars,
    pub ticks: TickGroup,
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// Build every view model from the shared dataset and the current widget
/// and selection state. Called once per interaction.
pub fn render(
    dataset: &Dataset,
    widgets: &WidgetState,
    selections: &Selections,
    settings: &RenderSettings,
) -> Result<Views> {
    let views = Views {
        scatter: scatter(dataset, widgets)?,
        bars: linked_bars(dataset, &selections.bars, settings.top_k)?,
        ticks: tick_group(dataset, &selections.ticks, &settings.tick_prefilter)?,
    };
    log::debug!(
        "rendered: {} scatter points, {} bars, {} tick rows",
        views.scatter.points.len(),
        views.bars.source.len(),
        views.ticks.view.len()
    );
    Ok(views)
}

pub fn scatter(dataset: &Dataset, widgets: &WidgetState) -> Result<ScatterView> {
    let Some(neighbourhood) = &widgets.neighbourhood else {
        return Ok(ScatterView {
            view: View::empty(),
            points: Vec::new(),
        });
    };

    let view = apply(
        dataset,
        &[
            Predicate::equals(columns::HOST_NEIGHBOURHOOD, neighbourhood.clone()),
            Predicate::range(columns::REVIEW_SCORE, widgets.score_range),
        ],
    )?;

    let score = dataset.numeric_column(columns::REVIEW_SCORE)?;
    let reviews = dataset.numeric_column(columns::REVIEW_COUNT)?;
    let points = view
        .rows()
        .iter()
        .filter_map(|&row| {
            let x = dataset.value(row, score).as_f64()?;
            let y = dataset.value(row, reviews).as_f64()?;
            Some([x, y])
        })
        .collect();

    Ok(ScatterView { view, points })
}

pub fn linked_bars(
    dataset: &Dataset,
    selection: &SelectionCoordinator,
    top_k: usize,
) -> Result<LinkedBars> {
    let top = Predicate::top_k(dataset, columns::NEIGHBOURHOOD, top_k)?;
    let top_view = apply(dataset, &[top])?;
    let source = aggregate::count_by(dataset, &top_view, columns::NEIGHBOURHOOD)?
        .into_iter()
        .map(|c| BarView {
            emphasized: selection
                .selection()
                .emphasizes_category(columns::NEIGHBOURHOOD, &c.category),
            category: c.category,
            count: c.count,
        })
        .collect();

    let linked = apply(dataset, &[selection.predicate()])?;
    let sibling = aggregate::count_by(dataset, &linked, columns::ROOM_TYPE)?;

    Ok(LinkedBars { source, sibling })
}

pub fn tick_group(
    dataset: &Dataset,
    brush: &SelectionCoordinator,
    prefilter: &[Predicate],
) -> Result<TickGroup> {
    let view = apply(dataset, prefilter)?;
    let inside = brush.predicate().compile(dataset)?;

    let axes = TICK_FIELDS
        .iter()
        .map(|&field| -> Result<TickAxis> {
            let col = dataset.numeric_column(field)?;
            let ticks = view
                .rows()
                .iter()
                .filter_map(|&row| {
                    let value = dataset.value(row, col).as_f64()?;
                    Some(Tick {
                        value,
                        emphasized: inside.matches(dataset, row),
                    })
                })
                .collect();
            Ok(TickAxis { field, ticks })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TickGroup { view, axes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::dataset;
    use crate::data::normalize::normalize_defaults;
    use crate::selection::SelectionEvent;

    const COLUMNS: [&str; 8] = [
        "host_neighbourhood",
        "neighbourhood_cleansed",
        "room_type",
        "review_scores_rating",
        "number_of_reviews",
        "host_response_rate",
        "price",
        "estimated_revenue_l365d",
    ];

    fn listings() -> Dataset {
        let mut ds = dataset(
            &COLUMNS,
            &[
                &["A", "Allston", "Private room", "4.5", "10", "95%", "$120", "5000"],
                &["A", "Allston", "Entire home/apt", "3.0", "2", "N/A", "$3,500", "80000"],
                &["B", "Fenway", "Entire home/apt", "5.0", "40", "100%", "$250", "250000"],
                &["B", "Fenway", "Hotel room", "", "0", "", "$90", "0"],
                &["A", "Dorchester", "Private room", "4.0", "7", "80%", "$60", "12000"],
            ],
        );
        normalize_defaults(&mut ds).unwrap();
        ds
    }

    fn settings() -> RenderSettings {
        RenderSettings::from(&Config::default())
    }

    #[test]
    fn test_scatter_filters_neighbourhood_and_score() {
        let ds = dataset(
            &["host_neighbourhood", "review_scores_rating", "number_of_reviews"],
            &[&["A", "4.5", "1"], &["A", "3.0", "2"], &["B", "5.0", "3"]],
        );
        let widgets = WidgetState {
            neighbourhood: Some("A".into()),
            score_range: RangeBounds::new(3.0, 5.0),
        };
        let view = scatter(&ds, &widgets).unwrap();
        assert_eq!(view.view.rows(), &[0, 1]);
        assert_eq!(view.points, vec![[4.5, 1.0], [3.0, 2.0]]);
    }

    #[test]
    fn test_initial_widget_state() {
        let ds = listings();
        let options = WidgetOptions::from_dataset(&ds).unwrap();
        assert_eq!(options.neighbourhoods, vec!["A", "B"]);
        assert_eq!(options.score_limits, RangeBounds { low: 3.0, high: 5.0 });

        let state = options.initial_state();
        assert_eq!(state.neighbourhood.as_deref(), Some("A"));
        let view = scatter(&ds, &state).unwrap();
        assert_eq!(view.view.rows(), &[0, 1, 4]);
    }

    #[test]
    fn test_scatter_without_neighbourhood_is_empty() {
        let ds = listings();
        let widgets = WidgetState {
            neighbourhood: None,
            score_range: RangeBounds::new(0.0, 5.0),
        };
        assert!(scatter(&ds, &widgets).unwrap().points.is_empty());
    }

    #[test]
    fn test_linked_bars_without_selection() {
        let ds = listings();
        let bars = linked_bars(&ds, &SelectionCoordinator::new(), 2).unwrap();

        let source: Vec<(&str, usize, bool)> = bars
            .source
            .iter()
            .map(|b| (b.category.as_str(), b.count, b.emphasized))
            .collect();
        assert_eq!(source, vec![("Allston", 2, true), ("Fenway", 2, true)]);

        let total: usize = bars.sibling.iter().map(|c| c.count).sum();
        assert_eq!(total, ds.len());
    }

    #[test]
    fn test_linked_bars_point_selection() {
        let ds = listings();
        let mut coord = SelectionCoordinator::new();
        coord.handle(SelectionEvent::Click {
            field: "neighbourhood_cleansed".into(),
            value: "Fenway".into(),
        });

        let bars = linked_bars(&ds, &coord, 10).unwrap();
        let emphasized: Vec<&str> = bars
            .source
            .iter()
            .filter(|b| b.emphasized)
            .map(|b| b.category.as_str())
            .collect();
        assert_eq!(emphasized, vec!["Fenway"]);
        assert_eq!(bars.source.len(), 3);

        let sibling: Vec<(&str, usize)> = bars
            .sibling
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(sibling, vec![("Entire home/apt", 1), ("Hotel room", 1)]);
    }

    #[test]
    fn test_tick_prefilter_excludes_expensive_listing() {
        let ds = listings();
        let group = tick_group(&ds, &SelectionCoordinator::new(), &settings().tick_prefilter).unwrap();
        // $3,500 fails the price cap, 250000 the revenue cap, the missing
        // score the rating floor.
        assert_eq!(group.view.rows(), &[0, 4]);
        assert_eq!(group.axes.len(), 4);
        assert_eq!(group.axes[0].field, "price");
        let prices: Vec<f64> = group.axes[0].ticks.iter().map(|t| t.value).collect();
        assert_eq!(prices, vec![120.0, 60.0]);
        assert!(group.axes.iter().flat_map(|a| &a.ticks).all(|t| t.emphasized));
    }

    #[test]
    fn test_tick_brush_emphasizes_across_axes() {
        let ds = listings();
        let mut brush = SelectionCoordinator::new();
        brush.handle(SelectionEvent::BrushStart {
            field: "price".into(),
            x: 100.0,
        });
        brush.handle(SelectionEvent::BrushMove(200.0));
        brush.handle(SelectionEvent::BrushEnd);

        let group = tick_group(&ds, &brush, &settings().tick_prefilter).unwrap();
        for axis in &group.axes {
            let flags: Vec<bool> = axis.ticks.iter().map(|t| t.emphasized).collect();
            assert_eq!(flags, vec![true, false], "axis {}", axis.field);
        }
    }

    #[test]
    fn test_render_all_views() {
        let ds = listings();
        let options = WidgetOptions::from_dataset(&ds).unwrap();
        let views = render(&ds, &options.initial_state(), &Selections::default(), &settings()).unwrap();
        assert_eq!(views.scatter.points.len(), 3);
        assert_eq!(views.bars.source.len(), 3);
        assert_eq!(views.ticks.view.len(), 2);
    }

    #[test]
    fn test_render_requires_columns() {
        let ds = dataset(&["host_neighbourhood"], &[&["A"]]);
        let widgets = WidgetState {
            neighbourhood: Some("A".into()),
            score_range: RangeBounds::new(0.0, 5.0),
        };
        assert!(render(&ds, &widgets, &Selections::default(), &settings()).is_err());
    }
}
