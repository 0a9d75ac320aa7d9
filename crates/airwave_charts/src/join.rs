//! Keyed data join (enter / update / exit).
//!
//! Identity is the mark id, never position or value equality. An element
//! whose id survives an update keeps its [`ElementKey`], so listeners and
//! running transitions attached to it stay valid.

use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::container::{ElementKey, SceneOp};
use crate::geometry::Geometry;
use crate::mark::Mark;
use crate::transition::GeometryTransition;

/// Counts of one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Diff between the drawn scene and a new mark set.
#[derive(Debug, Default)]
pub struct JoinPlan {
    pub enter: Vec<Mark>,
    pub update: Vec<(ElementKey, Mark)>,
    pub exit: Vec<ElementKey>,
    /// Surviving ids in mark order
    sequence: Vec<String>,
}

impl JoinPlan {
    pub fn stats(&self) -> JoinStats {
        JoinStats {
            entered: self.enter.len(),
            updated: self.update.len(),
            exited: self.exit.len(),
        }
    }
}

/// A drawn element.
#[derive(Clone, Debug)]
pub struct Element {
    pub mark: Mark,
    /// Geometry currently on screen (differs from `mark.geometry` mid-transition)
    pub shown: Geometry,
    transition: Option<GeometryTransition>,
}

impl Element {
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }
}

/// Elements currently drawn into a container, indexed by id.
#[derive(Debug, Default)]
pub struct Scene {
    elements: SlotMap<ElementKey, Element>,
    by_id: FxHashMap<String, ElementKey>,
    /// Draw order (last mark set's order)
    order: Vec<ElementKey>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn key_of(&self, id: &str) -> Option<ElementKey> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, key: ElementKey) -> Option<&Element> {
        self.elements.get(key)
    }

    /// Keys in draw order.
    pub fn keys(&self) -> &[ElementKey] {
        &self.order
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter_map(|k| self.elements.get(*k))
            .map(|e| e.mark.id.as_str())
    }

    /// Compute the join of `marks` against the drawn elements.
    ///
    /// Duplicate ids keep their first occurrence.
    pub fn plan(&self, marks: Vec<Mark>) -> JoinPlan {
        let mut plan = JoinPlan::default();
        let mut seen: FxHashSet<String> = FxHashSet::default();

        for mark in marks {
            if !seen.insert(mark.id.clone()) {
                tracing::warn!(id = %mark.id, "duplicate mark id; keeping first occurrence");
                continue;
            }
            plan.sequence.push(mark.id.clone());
            match self.by_id.get(&mark.id) {
                Some(&key) => plan.update.push((key, mark)),
                None => plan.enter.push(mark),
            }
        }

        plan.exit = self
            .order
            .iter()
            .copied()
            .filter(|key| {
                self.elements
                    .get(*key)
                    .is_some_and(|e| !seen.contains(&e.mark.id))
            })
            .collect();
        plan
    }

    /// Apply a plan: exits first, then in-place updates, then enters.
    ///
    /// Returns the pass statistics and the operations the container must
    /// replay, in order.
    pub fn apply(&mut self, plan: JoinPlan, duration: Duration) -> (JoinStats, Vec<SceneOp>) {
        let stats = plan.stats();
        let mut ops = Vec::with_capacity(stats.entered + stats.updated + stats.exited);

        for key in plan.exit {
            if let Some(el) = self.elements.remove(key) {
                self.by_id.remove(&el.mark.id);
                ops.push(SceneOp::Remove { key });
            }
        }

        for (key, mark) in plan.update {
            let Some(el) = self.elements.get_mut(key) else {
                continue;
            };
            let from = el.shown.clone();
            el.transition = if from == mark.geometry {
                None
            } else {
                Some(GeometryTransition::new(from, mark.geometry.clone(), duration))
            };
            el.mark = mark.clone();
            ops.push(SceneOp::Update {
                key,
                mark,
                duration,
            });
        }

        for mark in plan.enter {
            let id = mark.id.clone();
            let key = self.elements.insert(Element {
                shown: mark.geometry.clone(),
                mark: mark.clone(),
                transition: None,
            });
            self.by_id.insert(id, key);
            ops.push(SceneOp::Create { key, mark });
        }
        self.order = plan
            .sequence
            .iter()
            .filter_map(|id| self.by_id.get(id).copied())
            .collect();
        (stats, ops)
    }

    pub fn is_animating(&self) -> bool {
        self.elements.values().any(Element::is_animating)
    }

    /// Advance running transitions by `dt` and return one frame per
    /// animating element.
    pub fn advance(&mut self, dt: Duration) -> Vec<SceneOp> {
        let mut frames = Vec::new();
        for key in self.order.iter().copied() {
            let Some(el) = self.elements.get_mut(key) else {
                continue;
            };
            let Some(tr) = el.transition.as_mut() else {
                continue;
            };
            let geometry = tr.step(dt);
            if tr.is_finished() {
                el.transition = None;
            }
            el.shown = geometry.clone();
            frames.push(SceneOp::Frame { key, geometry });
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Rect};
    use airwave_core::Record;

    fn mark(id: &str, w: f32) -> Mark {
        Mark::new(
            id,
            Geometry::Rect {
                rect: Rect::new(0.0, 0.0, w, 10.0),
                corner_radius: 0.0,
            },
            Color::hex("#2563eb"),
            Record::new(),
        )
    }

    #[test]
    fn enter_update_exit_by_id() {
        let mut scene = Scene::new();
        let (stats, ops) = scene.apply(scene.plan(vec![mark("a", 1.0), mark("b", 2.0)]), Duration::ZERO);
        assert_eq!(stats.entered, 2);
        assert!(ops.iter().all(|op| matches!(op, SceneOp::Create { .. })));
        let key_b = scene.key_of("b").unwrap();

        let (stats, ops) = scene.apply(
            scene.plan(vec![mark("b", 5.0), mark("c", 3.0)]),
            Duration::from_millis(300),
        );
        assert!(matches!(ops[0], SceneOp::Remove { .. }));
        assert!(matches!(ops[1], SceneOp::Update { key, .. } if key == key_b));
        assert_eq!(
            stats,
            JoinStats {
                entered: 1,
                updated: 1,
                exited: 1
            }
        );
        assert_eq!(scene.key_of("b"), Some(key_b));
        assert!(scene.key_of("a").is_none());
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec!["b", "c"]);

        // Draw order follows the mark order, not enter/update grouping.
        scene.apply(scene.plan(vec![mark("d", 1.0), mark("b", 5.0)]), Duration::ZERO);
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec!["d", "b"]);
    }

    #[test]
    fn duplicates_keep_first() {
        let scene = Scene::new();
        let plan = scene.plan(vec![mark("a", 1.0), mark("a", 9.0)]);
        assert_eq!(plan.enter.len(), 1);
        assert_eq!(plan.enter[0], mark("a", 1.0));
    }

    #[test]
    fn updates_animate_until_finished() {
        let mut scene = Scene::new();
        scene.apply(scene.plan(vec![mark("a", 0.0)]), Duration::ZERO);
        scene.apply(scene.plan(vec![mark("a", 100.0)]), Duration::from_millis(300));
        let key = scene.key_of("a").unwrap();
        assert!(scene.get(key).unwrap().is_animating());
        assert_eq!(scene.advance(Duration::from_millis(100)).len(), 1);
        assert!(scene.is_animating());
        assert_eq!(scene.advance(Duration::from_millis(250)).len(), 1);
        assert!(!scene.is_animating());
        assert!(scene.advance(Duration::from_millis(10)).is_empty());
        assert_eq!(scene.get(key).unwrap().shown, mark("a", 100.0).geometry);
    }

    #[test]
    fn unchanged_geometry_does_not_animate() {
        let mut scene = Scene::new();
        scene.apply(scene.plan(vec![mark("a", 4.0)]), Duration::ZERO);
        scene.apply(scene.plan(vec![mark("a", 4.0)]), Duration::from_millis(300));
        let key = scene.key_of("a").unwrap();
        assert!(!scene.get(key).unwrap().is_animating());
    }
}
