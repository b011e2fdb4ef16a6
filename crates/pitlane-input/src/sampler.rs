//! Input sampler with an explicit attach/detach lifecycle.
//!
//! Key events arrive between simulation ticks and are folded into a
//! [`KeyboardState`]. Once per tick the session calls
//! [`InputSampler::snapshot`], which returns the held level of every control
//! plus the rising edges of edge-triggered controls. Each edge is handed out
//! exactly once per physical press.

use std::collections::HashSet;
use tracing::{debug, trace};
use winit::event::KeyEvent;
use winit::keyboard::PhysicalKey;

use crate::controls::{Control, ControlMap};
use crate::keyboard::{KeyTransition, KeyboardState, RawKeyEvent};

/// Held state of every driving control for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub brake: bool,
    pub camera_cycle: bool,
}

impl InputState {
    /// No control held.
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
        boost: false,
        brake: false,
        camera_cycle: false,
    };

    /// Whether `control` is held.
    #[must_use]
    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Backward => self.backward,
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Boost => self.boost,
            Control::Brake => self.brake,
            Control::CameraCycle => self.camera_cycle,
        }
    }

    /// Set the held flag of `control`.
    pub fn set(&mut self, control: Control, held: bool) {
        let slot = match control {
            Control::Forward => &mut self.forward,
            Control::Backward => &mut self.backward,
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Boost => &mut self.boost,
            Control::Brake => &mut self.brake,
            Control::CameraCycle => &mut self.camera_cycle,
        };
        *slot = held;
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, control: Control) -> Self {
        self.set(control, true);
        self
    }
}

/// What one tick reads from the sampler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Level state of all controls.
    pub held: InputState,
    /// A camera-cycle press happened since the previous snapshot.
    pub cycle_camera: bool,
}

/// Whether the host should suppress its default handling of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The key drives a control; the host should not act on it.
    Consumed,
    /// Not ours, or the sampler is detached.
    Ignored,
}

/// Keyboard listener scoped to a drive session.
///
/// A new sampler starts detached. While detached every event is ignored and
/// every snapshot is idle, so a session can be torn down without unhooking
/// the host's event loop.
#[derive(Debug, Clone)]
pub struct InputSampler {
    map: ControlMap,
    keyboard: KeyboardState,
    pending_edges: HashSet<Control>,
    attached: bool,
}

impl InputSampler {
    /// Create a detached sampler using `map`.
    #[must_use]
    pub fn new(map: ControlMap) -> Self {
        Self {
            map,
            keyboard: KeyboardState::new(),
            pending_edges: HashSet::new(),
            attached: false,
        }
    }

    /// Start listening. Any state from a previous attachment is discarded.
    pub fn attach(&mut self) {
        self.reset();
        self.attached = true;
        debug!("Input sampler attached");
    }

    /// Stop listening and drop all held keys and pending edges.
    pub fn detach(&mut self) {
        if self.attached {
            debug!("Input sampler detached");
        }
        self.reset();
        self.attached = false;
    }

    /// Whether the sampler is currently listening.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The active control map.
    #[must_use]
    pub fn control_map(&self) -> &ControlMap {
        &self.map
    }

    /// Feed a winit [`KeyEvent`].
    pub fn handle_event(&mut self, event: &KeyEvent) -> KeyDisposition {
        self.handle_raw(RawKeyEvent::from(event))
    }

    /// Feed a [`RawKeyEvent`].
    pub fn handle_raw(&mut self, event: RawKeyEvent) -> KeyDisposition {
        if !self.attached {
            return KeyDisposition::Ignored;
        }
        let PhysicalKey::Code(code) = event.key else {
            return KeyDisposition::Ignored;
        };
        let controls: Vec<Control> = self.map.controls_for(code).collect();
        if controls.is_empty() {
            return KeyDisposition::Ignored;
        }

        let before: Vec<bool> = controls.iter().map(|c| self.control_held(*c)).collect();
        let transition = self.keyboard.process_raw(event);
        if transition == KeyTransition::Pressed {
            for (control, was_held) in controls.iter().zip(before) {
                if control.is_edge_triggered() && !was_held {
                    trace!(?control, "rising edge");
                    self.pending_edges.insert(*control);
                }
            }
        }
        KeyDisposition::Consumed
    }

    /// Current held level of every control, without consuming edges.
    #[must_use]
    pub fn state(&self) -> InputState {
        let mut state = InputState::IDLE;
        if !self.attached {
            return state;
        }
        for control in Control::ALL {
            state.set(control, self.control_held(control));
        }
        state
    }

    /// Consume the pending rising edge of `control`, if any.
    pub fn take_edge(&mut self, control: Control) -> bool {
        self.pending_edges.remove(&control)
    }

    /// Read the tick snapshot: held levels plus consumed edges.
    pub fn snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            held: self.state(),
            cycle_camera: self.take_edge(Control::CameraCycle),
        }
    }

    fn control_held(&self, control: Control) -> bool {
        self.map
            .keys(control)
            .iter()
            .any(|binding| self.keyboard.is_pressed(PhysicalKey::Code(binding.0)))
    }

    fn reset(&mut self) {
        self.keyboard.clear();
        self.pending_edges.clear();
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new(ControlMap::default())
    }
}
