//! Rendering target collaborator.
//!
//! A chart never draws pixels itself. It observes a [`Container`]'s size and
//! sends it [`SceneOp`]s describing which keyed elements to create, refresh,
//! or remove. The host turns those into SVG nodes, canvas paths, or whatever
//! it renders with.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rustc_hash::FxHashMap;
use slotmap::new_key_type;

use crate::geometry::{Geometry, Size};
use crate::mark::Mark;

new_key_type! {
    /// Handle of one drawn element, stable for as long as its id persists
    pub struct ElementKey;
}

/// Handle of a size-observation subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverToken(pub u64);

/// Drawing instruction sent to a container.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneOp {
    /// New element (enter)
    Create { key: ElementKey, mark: Mark },
    /// Existing element gets new attributes, animated over `duration` (update)
    Update {
        key: ElementKey,
        mark: Mark,
        duration: Duration,
    },
    /// Intermediate geometry while an update transition runs
    Frame { key: ElementKey, geometry: Geometry },
    /// Element removed (exit)
    Remove { key: ElementKey },
    /// Attach the click listener to an element
    BindClick { key: ElementKey },
}

/// Host-side element a chart renders into.
pub trait Container {
    /// Current layout size.
    fn size(&self) -> Size;

    /// Start delivering size changes to the chart.
    fn observe(&mut self) -> ObserverToken;

    /// Stop delivering size changes.
    fn unobserve(&mut self, token: ObserverToken);

    fn apply(&mut self, op: SceneOp);
}

#[derive(Debug, Default)]
struct RecordingState {
    size: Size,
    ops: Vec<SceneOp>,
    observers: Vec<ObserverToken>,
    next_token: u64,
}

/// In-memory container that records every operation.
///
/// Clones share state, so a test can keep one handle while the chart owns
/// another.
#[derive(Clone, Debug, Default)]
pub struct RecordingContainer(Arc<Mutex<RecordingState>>);

impl RecordingContainer {
    pub fn new(size: Size) -> Self {
        Self(Arc::new(Mutex::new(RecordingState {
            size,
            ..RecordingState::default()
        })))
    }

    pub fn set_size(&self, size: Size) {
        if let Ok(mut s) = self.0.lock() {
            s.size = size;
        }
    }

    pub fn ops(&self) -> Vec<SceneOp> {
        self.0.lock().map(|s| s.ops.clone()).unwrap_or_default()
    }

    pub fn clear_ops(&self) {
        if let Ok(mut s) = self.0.lock() {
            s.ops.clear();
        }
    }

    pub fn active_observers(&self) -> usize {
        self.0.lock().map(|s| s.observers.len()).unwrap_or(0)
    }

    /// Elements currently alive after replaying all operations, with their
    /// latest mark.
    pub fn live_elements(&self) -> FxHashMap<ElementKey, Mark> {
        let mut live = FxHashMap::default();
        for op in self.ops() {
            match op {
                SceneOp::Create { key, mark } | SceneOp::Update { key, mark, .. } => {
                    live.insert(key, mark);
                }
                SceneOp::Remove { key } => {
                    live.remove(&key);
                }
                SceneOp::Frame { .. } | SceneOp::BindClick { .. } => {}
            }
        }
        live
    }
}

impl Container for RecordingContainer {
    fn size(&self) -> Size {
        self.0.lock().map(|s| s.size).unwrap_or_default()
    }

    fn observe(&mut self) -> ObserverToken {
        let Ok(mut s) = self.0.lock() else {
            return ObserverToken(u64::MAX);
        };
        s.next_token += 1;
        let token = ObserverToken(s.next_token);
        s.observers.push(token);
        token
    }

    fn unobserve(&mut self, token: ObserverToken) {
        if let Ok(mut s) = self.0.lock() {
            s.observers.retain(|t| *t != token);
        }
    }

    fn apply(&mut self, op: SceneOp) {
        if let Ok(mut s) = self.0.lock() {
            s.ops.push(op);
        }
    }
}
