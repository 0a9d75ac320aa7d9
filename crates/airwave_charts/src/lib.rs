//! airwave_charts
//!
//! Chart runtime for the Airwave dashboards. A chart type only describes how
//! a dataset is laid out as keyed [`Mark`]s; [`ChartRuntime`] supplies the
//! behaviour every chart shares:
//!
//! - Defer the first render until the container reports a drawable size
//! - Reconcile updates by id (enter / update / exit), animating updates
//! - Keep exactly one click callback bound to the drawn elements
//!
//! Drawing itself is left to the host through the [`Container`] trait.
//!
//! # Example
//!
//! ```rust
//! use airwave_charts::prelude::*;
//! use serde_json::json;
//!
//! let container = RecordingContainer::new(Size::new(0.0, 200.0));
//! let chart = BarChart::new("key", "value", "key").unwrap();
//! let mut runtime = ChartRuntime::new(chart, Some(Box::new(container.clone())));
//!
//! let row = json!({"key": "population_male", "value": 48});
//! assert!(runtime.update(vec![row.as_object().unwrap().clone()]).is_none());
//!
//! // Zero width: still waiting.
//! assert!(!runtime.poll_size());
//!
//! container.set_size(Size::new(400.0, 200.0));
//! assert!(runtime.poll_size());
//! assert_eq!(container.live_elements().len(), 1);
//! ```

pub mod bar;
pub mod common;
pub mod container;
pub mod error;
pub mod events;
pub mod geometry;
pub mod heatmap;
pub mod interpolate;
pub mod join;
pub mod lifecycle;
pub mod mark;
pub mod pie;
pub mod runtime;
pub mod scale;
pub mod streamgraph;
pub mod transition;

pub use container::{Container, ElementKey, ObserverToken, RecordingContainer, SceneOp};
pub use error::{ChartError, Result};
pub use events::ElementClicked;
pub use geometry::{Color, Geometry, Point, Rect, Size};
pub use join::JoinStats;
pub use lifecycle::ChartState;
pub use mark::Mark;
pub use runtime::{ChartRuntime, ReconcilableChart};
pub use transition::TRANSITION_DURATION;

/// Common imports for chart users.
pub mod prelude {
    pub use crate::bar::{BarChart, BarChartStyle};
    pub use crate::heatmap::{HeatmapChart, HeatmapStyle};
    pub use crate::pie::{PieChart, PieChartStyle};
    pub use crate::streamgraph::{StreamgraphChart, StreamgraphStyle};
    pub use crate::{
        ChartRuntime, ChartState, Color, Container, ElementClicked, ElementKey, Geometry, JoinStats,
        Mark, ReconcilableChart, RecordingContainer, SceneOp, Size, TRANSITION_DURATION,
    };
}
