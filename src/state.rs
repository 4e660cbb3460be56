use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::aggregate::top_k;
use crate::data::filter::RangeBounds;
use crate::data::loader::load_file;
use crate::data::model::{columns, Dataset};
use crate::data::normalize::normalize_defaults;
use crate::error::Result;
use crate::selection::SelectionEvent;
use crate::view::{render, RenderSettings, Selections, Views, WidgetOptions, WidgetState};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Normalized dataset, shared read-only by every view.
    pub dataset: Arc<Dataset>,

    /// Where `dataset` was loaded from.
    pub source: PathBuf,

    /// Select-box options and slider limits for the current dataset.
    pub options: WidgetOptions,

    /// Current widget values.
    pub widgets: WidgetState,

    /// One selection per interactive chart group.
    pub selections: Selections,

    pub settings: RenderSettings,

    /// View models from the last render (None if it failed).
    pub views: Option<Views>,

    /// Colours for the neighbourhood bars.
    pub color_map: ColorMap,

    /// Values that failed numeric conversion during normalization.
    pub coercion_warnings: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load, normalize and render the dataset named by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (dataset, warnings) = load_normalized(&config.data)?;
        let options = WidgetOptions::from_dataset(&dataset)?;
        let mut state = Self {
            widgets: options.initial_state(),
            color_map: ColorMap::new(&[]),
            options,
            dataset,
            source: config.data.clone(),
            selections: Selections::default(),
            settings: RenderSettings::from(config),
            views: None,
            coercion_warnings: warnings,
            status_message: None,
        };
        state.rebuild_color_map();
        state.views = Some(render(
            &state.dataset,
            &state.widgets,
            &state.selections,
            &state.settings,
        )?);
        Ok(state)
    }

    /// Replace the dataset with the one at `path`. On failure the current
    /// dataset is kept and the error is shown in the status bar.
    pub fn open(&mut self, path: &Path) {
        let loaded = load_normalized(path)
            .and_then(|(ds, warnings)| Ok((WidgetOptions::from_dataset(&ds)?, ds, warnings)));
        match loaded {
            Ok((options, dataset, warnings)) => {
                self.widgets = options.initial_state();
                self.options = options;
                self.dataset = dataset;
                self.source = path.to_path_buf();
                self.coercion_warnings = warnings;
                self.selections.reset();
                self.status_message = None;
                self.rebuild_color_map();
                self.rerender();
            }
            Err(e) => {
                log::error!("Keeping previous dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute every view model from the current state.
    pub fn rerender(&mut self) {
        match render(&self.dataset, &self.widgets, &self.selections, &self.settings) {
            Ok(views) => {
                self.views = Some(views);
            }
            Err(e) => {
                log::error!("Render failed: {e}");
                self.views = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_neighbourhood(&mut self, neighbourhood: String) {
        if self.widgets.neighbourhood.as_deref() != Some(neighbourhood.as_str()) {
            self.widgets.neighbourhood = Some(neighbourhood);
            self.rerender();
        }
    }

    pub fn set_score_range(&mut self, range: RangeBounds) {
        let range = range.snapped();
        if self.widgets.score_range != range {
            self.widgets.score_range = range;
            self.rerender();
        }
    }

    /// Feed an event from the neighbourhood bar chart.
    pub fn handle_bar_event(&mut self, event: SelectionEvent) {
        if self.selections.bars.handle(event) {
            self.rerender();
        }
    }

    /// Feed an event from any of the tick plots.
    pub fn handle_brush_event(&mut self, event: SelectionEvent) {
        if self.selections.ticks.handle(event) {
            self.rerender();
        }
    }

    fn rebuild_color_map(&mut self) {
        let categories = match top_k(&self.dataset, columns::NEIGHBOURHOOD, self.settings.top_k) {
            Ok(categories) => categories,
            Err(e) => {
                log::warn!("No category colours: {e}");
                Vec::new()
            }
        };
        self.color_map = ColorMap::new(&categories);
    }
}

/// Load `path` and run the default normalization passes before the
/// dataset is frozen. Returns the number of coerced values.
fn load_normalized(path: &Path) -> Result<(Arc<Dataset>, usize)> {
    let mut dataset = load_file(path)?;
    let reports = normalize_defaults(&mut dataset)?;
    let warnings = reports.iter().map(|r| r.warnings.len()).sum();
    Ok((Arc::new(dataset), warnings))
}
