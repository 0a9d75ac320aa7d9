//! Shared chart runtime.
//!
//! Every chart type only knows how to lay a dataset out as [`Mark`]s. The
//! [`ChartRuntime`] wraps it with the behaviour all charts share:
//!
//! - deferred first render on the first drawable container size
//! - keyed enter / update / exit reconciliation with animated updates
//! - a single click callback, re-bound after every reconcile
//! - idempotent disposal of the size subscription

use std::time::Duration;

use airwave_core::Record;

use crate::container::{Container, ElementKey, ObserverToken, SceneOp};
use crate::events::{ClickSlot, ElementClicked};
use crate::geometry::Size;
use crate::join::{JoinStats, Scene};
use crate::lifecycle::{ChartState, Lifecycle, LifecycleAction, LifecycleEvent};
use crate::mark::Mark;
use crate::transition::TRANSITION_DURATION;

/// A chart type: turns a dataset into keyed marks for a given size.
pub trait ReconcilableChart {
    fn name(&self) -> &'static str;

    /// Lay out `data` inside a container of `size`.
    ///
    /// Mark ids must be unique; they are the identity used to match elements
    /// across updates.
    fn layout(&self, data: &[Record], size: Size) -> Vec<Mark>;
}

pub struct ChartRuntime<C: ReconcilableChart> {
    chart: C,
    container: Option<Box<dyn Container>>,
    observer: Option<ObserverToken>,
    lifecycle: Lifecycle,
    dataset: Vec<Record>,
    scene: Scene,
    clicks: ClickSlot,
    transition: Duration,
}

impl<C: ReconcilableChart> ChartRuntime<C> {
    /// Create a chart bound to `container`.
    ///
    /// Nothing is drawn yet: the chart subscribes to size changes and waits
    /// for the first drawable size. A chart without a container never
    /// renders.
    pub fn new(chart: C, container: Option<Box<dyn Container>>) -> Self {
        let mut container = container;
        let observer = container.as_mut().map(|c| c.observe());
        tracing::debug!(chart = chart.name(), observing = observer.is_some(), "chart created");
        Self {
            chart,
            container,
            observer,
            lifecycle: Lifecycle::new(),
            dataset: Vec::new(),
            scene: Scene::new(),
            clicks: ClickSlot::new(),
            transition: TRANSITION_DURATION,
        }
    }

    /// Create a chart with an initial dataset, drawn on first render.
    pub fn with_data(chart: C, container: Option<Box<dyn Container>>, data: Vec<Record>) -> Self {
        let mut runtime = Self::new(chart, container);
        runtime.dataset = data;
        runtime
    }

    pub fn with_transition(mut self, duration: Duration) -> Self {
        self.transition = duration;
        self
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn state(&self) -> ChartState {
        self.lifecycle.state()
    }

    pub fn is_rendered(&self) -> bool {
        self.lifecycle.is_rendered()
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Dataset drawn (or waiting to be drawn).
    pub fn dataset(&self) -> &[Record] {
        &self.dataset
    }

    /// Feed a size change from the container's size stream.
    ///
    /// Returns `true` when this call performed the initial render.
    pub fn on_resize(&mut self, size: Size) -> bool {
        match self.lifecycle.send(LifecycleEvent::Resize(size)) {
            LifecycleAction::InitialRender(size) => {
                tracing::info!(
                    chart = self.chart.name(),
                    width = size.width,
                    height = size.height,
                    records = self.dataset.len(),
                    "initial render"
                );
                // The first paint places elements directly.
                self.reconcile(size, Duration::ZERO);
                true
            }
            LifecycleAction::None | LifecycleAction::Release => false,
        }
    }

    /// Read the container's current size and treat it as a resize.
    pub fn poll_size(&mut self) -> bool {
        match self.container.as_ref().map(|c| c.size()) {
            Some(size) => self.on_resize(size),
            None => false,
        }
    }

    /// Replace the dataset.
    ///
    /// Before the first render the dataset is only stored and `None` is
    /// returned. Afterwards the drawn elements are reconciled against it.
    pub fn update(&mut self, data: Vec<Record>) -> Option<JoinStats> {
        self.dataset = data;
        let size = self.lifecycle.render_size()?;
        if self.lifecycle.is_disposed() {
            return None;
        }
        Some(self.reconcile(size, self.transition))
    }

    /// Install the click callback, replacing any previous one.
    pub fn on_element_clicked<F>(&mut self, callback: F)
    where
        F: FnMut(&ElementClicked) + 'static,
    {
        self.clicks.set(callback);
        if self.is_rendered() {
            self.bind_listeners();
        }
    }

    /// Deliver a click on a drawn element.
    ///
    /// Returns whether a callback ran. Unknown keys and clicks before the
    /// first render are ignored.
    pub fn click(&mut self, key: ElementKey) -> bool {
        let Some(el) = self.scene.get(key) else {
            return false;
        };
        let event = ElementClicked {
            key,
            id: el.mark.id.clone(),
            datum: el.mark.datum.clone(),
        };
        self.clicks.dispatch(&event)
    }

    /// Click the element drawn for `id`.
    pub fn click_id(&mut self, id: &str) -> bool {
        match self.scene.key_of(id) {
            Some(key) => self.click(key),
            None => false,
        }
    }

    /// Step running update transitions by `dt`.
    ///
    /// Returns whether any transition is still running afterwards.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let frames = self.scene.advance(dt);
        self.emit(frames);
        self.scene.is_animating()
    }

    /// Stop observing the container. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.lifecycle.send(LifecycleEvent::Dispose) != LifecycleAction::Release {
            return;
        }
        if let (Some(container), Some(token)) = (self.container.as_mut(), self.observer.take()) {
            container.unobserve(token);
        }
        tracing::debug!(chart = self.chart.name(), "chart disposed");
    }

    fn reconcile(&mut self, size: Size, duration: Duration) -> JoinStats {
        let marks = self.chart.layout(&self.dataset, size);
        let plan = self.scene.plan(marks);
        let (stats, ops) = self.scene.apply(plan, duration);
        tracing::debug!(
            chart = self.chart.name(),
            entered = stats.entered,
            updated = stats.updated,
            exited = stats.exited,
            "reconciled"
        );
        self.emit(ops);
        self.bind_listeners();
        stats
    }

    fn bind_listeners(&mut self) {
        let keys = self.clicks.rebind(self.scene.keys());
        self.emit(keys.into_iter().map(|key| SceneOp::BindClick { key }).collect());
    }

    fn emit(&mut self, ops: Vec<SceneOp>) {
        if let Some(container) = self.container.as_mut() {
            for op in ops {
                container.apply(op);
            }
        }
    }
}

impl<C: ReconcilableChart> Drop for ChartRuntime<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<C: ReconcilableChart + std::fmt::Debug> std::fmt::Debug for ChartRuntime<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRuntime")
            .field("chart", &self.chart)
            .field("state", &self.lifecycle.state())
            .field("elements", &self.scene.len())
            .field("clicks", &self.clicks)
            .finish()
    }
}
