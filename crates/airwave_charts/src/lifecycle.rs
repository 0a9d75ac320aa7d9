//! Chart lifecycle state machine.
//!
//! `Uninitialized --(resize, width > 0)--> Rendered`. There is no way back:
//! later resizes are recorded but never trigger a second initial render.
//! Disposal is orthogonal to the state and only stops size observation.

use crate::geometry::Size;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChartState {
    Uninitialized,
    /// Initial render done at `size`
    Rendered { size: Size },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifecycleEvent {
    Resize(Size),
    Dispose,
}

/// What the runtime must do in response to an event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifecycleAction {
    /// Nothing to draw
    None,
    /// Perform the one-time initial render at this size
    InitialRender(Size),
    /// Release the size subscription
    Release,
}

#[derive(Clone, Debug)]
pub struct Lifecycle {
    state: ChartState,
    disposed: bool,
    last_size: Option<Size>,
    /// (from, event, to) of every event that produced an action
    history: Vec<(ChartState, LifecycleEvent, ChartState)>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: ChartState::Uninitialized,
            disposed: false,
            last_size: None,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> ChartState {
        self.state
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self.state, ChartState::Rendered { .. })
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Size the initial render used, if it happened.
    pub fn render_size(&self) -> Option<Size> {
        match self.state {
            ChartState::Rendered { size } => Some(size),
            ChartState::Uninitialized => None,
        }
    }

    /// Most recent size reported by the container.
    pub fn last_size(&self) -> Option<Size> {
        self.last_size
    }

    pub fn history(&self) -> &[(ChartState, LifecycleEvent, ChartState)] {
        &self.history
    }

    pub fn send(&mut self, event: LifecycleEvent) -> LifecycleAction {
        let from = self.state;
        let action = match event {
            LifecycleEvent::Resize(_) if self.disposed => LifecycleAction::None,
            LifecycleEvent::Resize(size) => {
                self.last_size = Some(size);
                match self.state {
                    ChartState::Uninitialized if size.is_drawable() => {
                        self.state = ChartState::Rendered { size };
                        LifecycleAction::InitialRender(size)
                    }
                    _ => LifecycleAction::None,
                }
            }
            LifecycleEvent::Dispose if self.disposed => LifecycleAction::None,
            LifecycleEvent::Dispose => {
                self.disposed = true;
                LifecycleAction::Release
            }
        };
        if action != LifecycleAction::None {
            self.history.push((from, event, self.state));
        }
        action
    }
}
