use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, PlotPoints, Points, VLine};

use crate::color::{brush_color, ColorMap, LIGHTGRAY, STEELBLUE};
use crate::data::model::{columns, Dataset};
use crate::selection::{Selection, SelectionEvent};
use crate::view::{LinkedBars, ScatterView, TickGroup};

// ---------------------------------------------------------------------------
// Chart group 1: filtered scatterplot
// ---------------------------------------------------------------------------

/// Review score against number of reviews for the selected neighbourhood.
pub fn scatter_chart(ui: &mut Ui, scatter: &ScatterView) {
    let points = Points::new(PlotPoints::from(scatter.points.clone()))
        .radius(4.0)
        .color(STEELBLUE.gamma_multiply(0.6))
        .name("listings");

    Plot::new("scatter")
        .height(280.0)
        .x_axis_label("Host Review Ratings")
        .y_axis_label("Number of Reviews")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(points);
        });
}

/// Table of the rows behind the scatterplot.
pub fn scatter_table(ui: &mut Ui, dataset: &Dataset, scatter: &ScatterView) {
    let shown = [
        columns::NEIGHBOURHOOD,
        columns::ROOM_TYPE,
        columns::REVIEW_SCORE,
        columns::REVIEW_COUNT,
        columns::PRICE,
    ];
    let cols: Vec<Option<usize>> = shown
        .iter()
        .map(|c| dataset.column_index(c).ok())
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().resizable(true), shown.len())
        .header(20.0, |mut header| {
            for name in shown {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, scatter.view.len(), |mut row| {
                let record = scatter.view.rows()[row.index()];
                for col in &cols {
                    row.col(|ui| {
                        if let Some(col) = col {
                            ui.label(dataset.value(record, *col).to_string());
                        }
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Chart group 2: linked bar charts
// ---------------------------------------------------------------------------

/// Top-K neighbourhood counts (clickable) stacked over room-type counts
/// of the clicked neighbourhood. Returns the click, if any.
pub fn linked_bar_charts(
    ui: &mut Ui,
    bars: &LinkedBars,
    color_map: &ColorMap,
) -> Option<SelectionEvent> {
    // Largest bar on top: bar i sits at y = n - 1 - i.
    let n = bars.source.len();
    let source: Vec<Bar> = bars
        .source
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new((n - 1 - i) as f64, b.count as f64)
                .name(&b.category)
                .fill(color_map.emphasis(&b.category, b.emphasized))
                .width(0.8)
        })
        .collect();

    ui.label("Listings by neighbourhood (click a bar)");
    let response = Plot::new("neighbourhood_bars")
        .height(24.0 * n.max(4) as f32)
        .x_axis_label("Count")
        .show_axes([true, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(source).horizontal());
            plot_ui.pointer_coordinate()
        });

    let event = if response.response.clicked() {
        Some(click_event(bars, response.inner))
    } else {
        None
    };

    let sibling: Vec<Bar> = bars
        .sibling
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new((bars.sibling.len() - 1 - i) as f64, c.count as f64)
                .name(&c.category)
                .fill(STEELBLUE)
                .width(0.8)
        })
        .collect();

    ui.label("Room Type");
    Plot::new("room_type_bars")
        .height(24.0 * bars.sibling.len().max(4) as f32)
        .x_axis_label("Count")
        .show_axes([true, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(sibling).horizontal());
        });

    event
}

fn click_event(bars: &LinkedBars, pointer: Option<PlotPoint>) -> SelectionEvent {
    let n = bars.source.len() as f64;
    let hit = pointer.and_then(|p| {
        let slot = p.y.round();
        if slot < 0.0 || slot >= n || (p.y - slot).abs() > 0.4 {
            return None;
        }
        let bar = &bars.source[(n - 1.0 - slot) as usize];
        (p.x >= 0.0 && p.x <= bar.count as f64).then_some(bar)
    });
    match hit {
        Some(bar) => SelectionEvent::Click {
            field: columns::NEIGHBOURHOOD.to_string(),
            value: bar.category.clone(),
        },
        None => SelectionEvent::ClickEmpty,
    }
}

// ---------------------------------------------------------------------------
// Chart group 3: coordinated tick plots with a shared brush
// ---------------------------------------------------------------------------

/// One strip plot per field. Dragging across any of them brushes an
/// x-interval; clicking without dragging clears it.
pub fn tick_plots(ui: &mut Ui, ticks: &TickGroup, brush: &Selection) -> Vec<SelectionEvent> {
    let mut events = Vec::new();

    for axis in &ticks.axes {
        let (inside, outside): (Vec<[f64; 2]>, Vec<[f64; 2]>) = {
            let mut inside = Vec::new();
            let mut outside = Vec::new();
            for t in &axis.ticks {
                if t.emphasized {
                    inside.push([t.value, 0.0]);
                } else {
                    outside.push([t.value, 0.0]);
                }
            }
            (inside, outside)
        };

        let response = Plot::new(("ticks", axis.field))
            .height(70.0)
            .x_axis_label(axis.field)
            .show_axes([true, false])
            .include_y(-1.0)
            .include_y(1.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(outside))
                        .shape(egui_plot::MarkerShape::Square)
                        .radius(2.0)
                        .color(brush_color(false)),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(inside))
                        .shape(egui_plot::MarkerShape::Square)
                        .radius(2.0)
                        .color(brush_color(true)),
                );
                if let Selection::Interval { field, bounds } = brush {
                    if field == axis.field {
                        plot_ui.vline(VLine::new(bounds.low).color(LIGHTGRAY));
                        plot_ui.vline(VLine::new(bounds.high).color(LIGHTGRAY));
                    }
                }
                plot_ui.pointer_coordinate()
            });

        let r = &response.response;
        if r.drag_started() {
            if let Some(p) = response.inner {
                events.push(SelectionEvent::BrushStart {
                    field: axis.field.to_string(),
                    x: p.x,
                });
            }
        } else if r.dragged() {
            if let Some(p) = response.inner {
                events.push(SelectionEvent::BrushMove(p.x));
            }
        }
        if r.drag_stopped() {
            events.push(SelectionEvent::BrushEnd);
        }
        if r.clicked() {
            events.push(SelectionEvent::ClearBrush);
        }
    }

    if ticks.view.is_empty() {
        ui.label(egui::RichText::new("No listings pass the price, revenue and rating filters.").italics());
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::BarView;

    fn bars() -> LinkedBars {
        LinkedBars {
            source: vec![
                BarView { category: "Allston".into(), count: 30, emphasized: true },
                BarView { category: "Fenway".into(), count: 20, emphasized: true },
                BarView { category: "Dorchester".into(), count: 10, emphasized: true },
            ],
            sibling: Vec::new(),
        }
    }

    #[test]
    fn test_click_on_top_bar() {
        // Three bars: Allston at y = 2, Fenway at y = 1, Dorchester at y = 0.
        let event = click_event(&bars(), Some(PlotPoint::new(12.0, 2.1)));
        assert_eq!(
            event,
            SelectionEvent::Click {
                field: "neighbourhood_cleansed".into(),
                value: "Allston".into(),
            }
        );
    }

    #[test]
    fn test_click_on_bottom_bar() {
        let event = click_event(&bars(), Some(PlotPoint::new(5.0, -0.2)));
        assert_eq!(
            event,
            SelectionEvent::Click {
                field: "neighbourhood_cleansed".into(),
                value: "Dorchester".into(),
            }
        );
    }

    #[test]
    fn test_click_past_bar_end_is_empty() {
        let event = click_event(&bars(), Some(PlotPoint::new(15.0, 0.0)));
        assert_eq!(event, SelectionEvent::ClickEmpty);
    }

    #[test]
    fn test_click_between_bars_is_empty() {
        assert_eq!(
            click_event(&bars(), Some(PlotPoint::new(5.0, 1.5))),
            SelectionEvent::ClickEmpty
        );
        assert_eq!(click_event(&bars(), None), SelectionEvent::ClickEmpty);
    }
}
