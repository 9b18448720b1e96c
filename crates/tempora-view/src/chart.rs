//! Chart slot management.
//!
//! The renderer owns at most one live chart per slot. Every refresh tears
//! the previous instance down and builds a new one; there is no incremental
//! update path.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::view_model::{DailyViewModel, HourlyViewModel};

/// Which drawing surface a chart binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    Hourly,
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Bar,
}

/// Which value axis a dataset is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub kind: SeriesKind,
    pub values: Vec<f64>,
    pub axis: Axis,
    pub dashed: bool,
}

/// A label pinned to one data point, e.g. "23°\n☀️".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointNote {
    pub index: usize,
    pub text: String,
}

/// Everything the charting collaborator needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub notes: Vec<PointNote>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Chart backend failure: {0}")]
    Backend(String),
}

/// The charting collaborator. Rendering internals stay behind this seam.
pub trait ChartBackend: Send + Sync {
    /// Build a chart on the slot's surface, returning its instance id.
    fn create(&self, spec: &ChartSpec) -> Result<u64, ChartError>;

    /// Tear down a previously created instance.
    fn destroy(&self, id: u64);
}

/// Exclusive ownership of one live chart instance.
struct ChartHandle {
    id: u64,
    backend: Arc<dyn ChartBackend>,
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        self.backend.destroy(self.id);
    }
}

/// Owns the hourly and daily chart slots.
pub struct ChartRenderer {
    backend: Option<Arc<dyn ChartBackend>>,
    hourly_slot: Mutex<Option<ChartHandle>>,
    daily_slot: Mutex<Option<ChartHandle>>,
}

impl ChartRenderer {
    /// `None` means the charting collaborator is not loaded; renders become
    /// silent no-ops and the dashboard degrades to data-only display.
    pub fn new(backend: Option<Arc<dyn ChartBackend>>) -> Self {
        Self {
            backend,
            hourly_slot: Mutex::new(None),
            daily_slot: Mutex::new(None),
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn render_hourly(&self, vm: &HourlyViewModel) -> Result<(), ChartError> {
        self.render(&self.hourly_slot, hourly_chart_spec(vm))
    }

    pub fn render_daily(&self, vm: &DailyViewModel) -> Result<(), ChartError> {
        self.render(&self.daily_slot, daily_chart_spec(vm))
    }

    fn render(
        &self,
        slot: &Mutex<Option<ChartHandle>>,
        spec: ChartSpec,
    ) -> Result<(), ChartError> {
        let Some(backend) = &self.backend else {
            tracing::debug!("chart backend unavailable, skipping {:?} render", spec.slot);
            return Ok(());
        };

        // The slot lock serializes renders: a render arriving while one is
        // in flight for the same slot queues behind it.
        let mut guard = slot.lock();

        // Destroy the previous instance before building its replacement, so
        // the surface never carries two live charts.
        guard.take();

        let id = backend.create(&spec)?;
        *guard = Some(ChartHandle {
            id,
            backend: Arc::clone(backend),
        });
        Ok(())
    }
}

/// Hourly chart: temperature line on the left axis, precipitation bars and a
/// dashed wind line sharing the right axis, temperature+icon notes on every
/// fourth point.
pub fn hourly_chart_spec(vm: &HourlyViewModel) -> ChartSpec {
    let notes = vm
        .temps
        .iter()
        .enumerate()
        .step_by(4)
        .map(|(index, temp)| PointNote {
            index,
            text: format!(
                "{}°\n{}",
                temp.round() as i64,
                crate::weather_code::weather_info(
                    vm.codes.get(index).copied().unwrap_or_default()
                )
                .icon
            ),
        })
        .collect();

    ChartSpec {
        slot: ChartSlot::Hourly,
        labels: vm.labels.clone(),
        datasets: vec![
            Dataset {
                label: "Temp",
                kind: SeriesKind::Line,
                values: vm.temps.clone(),
                axis: Axis::Left,
                dashed: false,
            },
            Dataset {
                label: "Rain (mm)",
                kind: SeriesKind::Bar,
                values: vm.precipitation.clone(),
                axis: Axis::Right,
                dashed: false,
            },
            Dataset {
                label: "Wind (km/h)",
                kind: SeriesKind::Line,
                values: vm.wind.clone(),
                axis: Axis::Right,
                dashed: true,
            },
        ],
        notes,
    }
}

/// Daily chart: max/min temperature bar pairs with an icon note per day.
pub fn daily_chart_spec(vm: &DailyViewModel) -> ChartSpec {
    let notes = vm
        .icons
        .iter()
        .enumerate()
        .map(|(index, icon)| PointNote {
            index,
            text: (*icon).to_string(),
        })
        .collect();

    ChartSpec {
        slot: ChartSlot::Daily,
        labels: vm.labels.clone(),
        datasets: vec![
            Dataset {
                label: "Max",
                kind: SeriesKind::Bar,
                values: vm.temp_max.clone(),
                axis: Axis::Left,
                dashed: false,
            },
            Dataset {
                label: "Min",
                kind: SeriesKind::Bar,
                values: vm.temp_min.clone(),
                axis: Axis::Left,
                dashed: false,
            },
        ],
        notes,
    }
}
