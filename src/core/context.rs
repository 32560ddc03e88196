//! Per-machine context handed to states and guards.

use super::spatial::Spatial;
use crate::machine::NO_STATE;
use crate::properties::PropertyStore;
use crate::triggers::TriggerSet;
use glam::Vec3;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Everything a state or guard may read or write while the machine runs.
///
/// The context is owned by the machine and borrowed mutably by whichever
/// hook or guard is running. It carries:
///
/// - the anchor (the agent being driven) and an optional target
/// - the property store for tunables and scratch values
/// - the trigger set
/// - the owner's shared payload `C`, which the engine never inspects
/// - read-only bookkeeping: current state name and frame counters
///
/// Geometry accessors are recomputed on every call and return `None` when
/// no target is assigned.
pub struct MachineContext<C> {
    anchor: Rc<dyn Spatial>,
    target: Option<Rc<dyn Spatial>>,
    pub properties: PropertyStore,
    pub triggers: TriggerSet,
    pub shared: C,
    pub(crate) state_name: String,
    pub(crate) frame: u64,
    pub(crate) entered_frame: u64,
}

impl<C> MachineContext<C> {
    pub fn new(anchor: impl Spatial + 'static, shared: C) -> Self {
        Self {
            anchor: Rc::new(anchor),
            target: None,
            properties: PropertyStore::new(),
            triggers: TriggerSet::new(),
            shared,
            state_name: NO_STATE.to_string(),
            frame: 0,
            entered_frame: 0,
        }
    }

    /// Name of the active state, or [`NO_STATE`] before the first tick.
    pub fn current_state_name(&self) -> &str {
        &self.state_name
    }

    /// Number of ticks the machine has processed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Ticks since the current state was entered. Zero on the entry frame.
    pub fn frames_in_state(&self) -> u64 {
        self.frame.saturating_sub(self.entered_frame)
    }

    pub fn anchor(&self) -> &dyn Spatial {
        self.anchor.as_ref()
    }

    pub fn anchor_position(&self) -> Vec3 {
        self.anchor.position()
    }

    pub fn target(&self) -> Option<&dyn Spatial> {
        self.target.as_deref()
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn set_target(&mut self, target: impl Spatial + 'static) {
        self.target = Some(Rc::new(target));
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn target_position(&self) -> Option<Vec3> {
        self.target.as_ref().map(|target| target.position())
    }

    /// Straight-line distance from anchor to target.
    pub fn distance_to_target(&self) -> Option<f32> {
        self.offset_to_target().map(Vec3::length)
    }

    /// Distance from anchor to target ignoring height.
    pub fn flat_distance_to_target(&self) -> Option<f32> {
        self.offset_to_target().map(|offset| flatten(offset).length())
    }

    /// Unit vector from anchor to target, zero when they coincide.
    pub fn direction_to_target(&self) -> Option<Vec3> {
        self.offset_to_target().map(Vec3::normalize_or_zero)
    }

    /// Unit vector from anchor to target on the horizontal plane.
    pub fn flat_direction_to_target(&self) -> Option<Vec3> {
        self.offset_to_target()
            .map(|offset| flatten(offset).normalize_or_zero())
    }

    /// Angle in degrees between the anchor's facing and the direction to
    /// the target, in `[0, 180]`.
    pub fn angle_to_target(&self) -> Option<f32> {
        let direction = self.direction_to_target()?;
        if direction == Vec3::ZERO {
            return Some(0.0);
        }
        let forward = self.anchor.forward().normalize_or_zero();
        let cos = forward.dot(direction).clamp(-1.0, 1.0);
        Some(cos.acos().to_degrees())
    }

    fn offset_to_target(&self) -> Option<Vec3> {
        let target = self.target.as_ref()?;
        Some(target.position() - self.anchor.position())
    }

    pub(crate) fn enter(&mut self, name: &str) {
        self.state_name.clear();
        self.state_name.push_str(name);
        self.entered_frame = self.frame;
    }
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

impl<C> fmt::Debug for MachineContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineContext")
            .field("state", &self.state_name)
            .field("frame", &self.frame)
            .field("anchor", &self.anchor.position())
            .field("target", &self.target_position())
            .field("properties", &self.properties)
            .field("triggers", &self.triggers)
            .finish_non_exhaustive()
    }
}

/// Shared flag telling machines that game time is frozen.
///
/// Replaces a global time-scale check: the owner creates one signal, hands
/// clones to every machine that should respect it, and raises it while the
/// game is paused.
#[derive(Clone, Debug, Default)]
pub struct PauseSignal(Rc<Cell<bool>>);

impl PauseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.0.set(true);
    }

    pub fn resume(&self) {
        self.0.set(false);
    }

    pub fn set_paused(&self, paused: bool) {
        self.0.set(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.0.get()
    }
}
