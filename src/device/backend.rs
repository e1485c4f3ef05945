//! # Gamepad Backend Module
//!
//! Trait abstraction over the platform gamepad layer to enable testing, plus
//! the production implementation on top of `gilrs`.
//!
//! The backend owns every native controller resource; the rest of the crate
//! reaches a controller only through its native index, handed out in
//! [`PadEvent`] notifications and interpreted by the registry.
//!
//! ## Event Mapping (gilrs)
//!
//! | gilrs event | Notification |
//! |-------------|--------------|
//! | `Connected` | `Attached(index)` |
//! | `Disconnected` | `Detached(index)` |
//! | `ButtonPressed` / `ButtonReleased` | `InputChanged` |
//! | `AxisChanged` on a trigger, activity flipped | `InputChanged` |
//! | `AxisChanged` on a stick | (dropped) |
//! | anything else | `Other` |
//!
//! Trigger activity is evaluated against the configured threshold when the
//! axis event arrives, so a held trigger produces one `InputChanged` when it
//! engages and one when it releases, not one per analog step. Controllers
//! already connected at startup are announced as `Attached` events on the
//! first poll.

use std::collections::{HashMap, VecDeque};

use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use tracing::{debug, info};

use crate::error::{PadcmdError, Result};
use crate::input::{PadAxis, PadButton};

/// One notification from the gamepad layer, consumed by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadEvent {
    /// A controller appeared at the given native index.
    Attached(usize),
    /// The controller at the given native index went away.
    Detached(usize),
    /// A button or trigger transitioned on some attached controller.
    InputChanged,
    /// Stop the dispatch loop.
    Quit,
    /// Any notification kind the engine does not recognize; ignored.
    Other,
}

/// Unified access to the platform gamepad layer.
///
/// One implementation wraps `gilrs`; tests substitute a scripted fake.
/// Native indices are stable for the lifetime of a physical attachment and
/// identify the device in every call.
pub trait GamepadBackend {
    /// Drain all pending notifications, in arrival order. Non-blocking.
    fn poll(&mut self) -> Vec<PadEvent>;

    /// Open the controller at `index` and return its display name.
    ///
    /// # Errors
    ///
    /// Returns [`PadcmdError::Attach`] if the controller cannot be opened.
    fn open(&mut self, index: usize) -> Result<String>;

    /// Release the controller at `index`. Unknown indices are a no-op.
    fn close(&mut self, index: usize);

    /// Is the button currently pressed? Unknown or gone devices, and buttons
    /// the device cannot report, read as not pressed.
    fn is_pressed(&self, index: usize, button: PadButton) -> bool;

    /// Current axis reading. Unknown or gone devices, and axes the device
    /// cannot report, read as centered (0.0).
    fn axis_value(&self, index: usize, axis: PadAxis) -> f32;
}

/// Production backend on top of `gilrs`.
///
/// `gilrs` identifies controllers by an opaque `GamepadId`; this backend
/// assigns each id a small native index on first sight and keeps the pair
/// stable for the rest of the run, so a reconnecting controller announces
/// itself under its old index while the registry still mints a fresh device
/// id for it.
///
/// # Examples
///
/// ```no_run
/// use padcmd::device::GilrsBackend;
///
/// let backend = GilrsBackend::new(0.0)?;
/// # Ok::<(), padcmd::error::PadcmdError>(())
/// ```
pub struct GilrsBackend {
    gilrs: Gilrs,
    /// Native index per gamepad id, stable for the process lifetime.
    natives: HashMap<GamepadId, usize>,
    /// Reverse lookup; position is the native index.
    by_native: Vec<GamepadId>,
    /// Notifications synthesized outside the gilrs event stream.
    pending: VecDeque<PadEvent>,
    /// Last seen activity per trigger, for transition detection.
    trigger_active: HashMap<(usize, PadAxis), bool>,
    axis_threshold: f32,
}

impl GilrsBackend {
    /// Initialize the platform gamepad layer.
    ///
    /// Controllers already connected when padcmd starts are queued as
    /// `Attached` notifications and show up in the first [`poll`] call.
    ///
    /// # Errors
    ///
    /// Returns [`PadcmdError::Backend`] if `gilrs` fails to initialize;
    /// fatal at startup.
    ///
    /// [`poll`]: GamepadBackend::poll
    pub fn new(axis_threshold: f32) -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| PadcmdError::Backend(e.to_string()))?;
        info!("gamepad layer initialized");

        let mut backend = Self {
            gilrs,
            natives: HashMap::new(),
            by_native: Vec::new(),
            pending: VecDeque::new(),
            trigger_active: HashMap::new(),
            axis_threshold,
        };

        // Announce controllers that were plugged in before we started
        let present: Vec<GamepadId> = backend.gilrs.gamepads().map(|(id, _)| id).collect();
        for id in present {
            let native = backend.native_of(id);
            debug!("controller present at startup: index {}", native);
            backend.pending.push_back(PadEvent::Attached(native));
        }

        Ok(backend)
    }

    /// Native index for a gamepad id, assigned on first sight.
    fn native_of(&mut self, id: GamepadId) -> usize {
        if let Some(&native) = self.natives.get(&id) {
            return native;
        }
        let native = self.by_native.len();
        self.natives.insert(id, native);
        self.by_native.push(id);
        native
    }

    fn gamepad(&self, index: usize) -> Option<gilrs::Gamepad<'_>> {
        let id = *self.by_native.get(index)?;
        self.gilrs.connected_gamepad(id)
    }

    /// Map a trigger axis event to a notification if its activity flipped.
    fn axis_transition(&mut self, native: usize, axis: Axis, value: f32) -> Option<PadEvent> {
        let trigger = trigger_from_gilrs(axis)?;
        let active = value.abs() > self.axis_threshold;
        let previous = self.trigger_active.insert((native, trigger), active);
        if previous.unwrap_or(false) != active {
            Some(PadEvent::InputChanged)
        } else {
            None
        }
    }
}

impl GamepadBackend for GilrsBackend {
    fn poll(&mut self) -> Vec<PadEvent> {
        let mut events: Vec<PadEvent> = self.pending.drain(..).collect();

        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            let native = self.native_of(id);
            let mapped = match event {
                EventType::Connected => Some(PadEvent::Attached(native)),
                EventType::Disconnected => Some(PadEvent::Detached(native)),
                EventType::ButtonPressed(..) | EventType::ButtonReleased(..) => {
                    Some(PadEvent::InputChanged)
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.axis_transition(native, axis, value)
                }
                _ => Some(PadEvent::Other),
            };
            if let Some(event) = mapped {
                events.push(event);
            }
        }

        events
    }

    fn open(&mut self, index: usize) -> Result<String> {
        let id = self
            .by_native
            .get(index)
            .copied()
            .ok_or_else(|| PadcmdError::Attach {
                index,
                reason: "no controller at this index".to_string(),
            })?;

        match self.gilrs.connected_gamepad(id) {
            Some(gamepad) => Ok(gamepad.name().to_string()),
            None => Err(PadcmdError::Attach {
                index,
                reason: "controller is not connected".to_string(),
            }),
        }
    }

    fn close(&mut self, index: usize) {
        // gilrs releases the OS handle itself on disconnect; only the
        // transition bookkeeping for this index needs to go
        self.trigger_active.retain(|(native, _), _| *native != index);
    }

    fn is_pressed(&self, index: usize, button: PadButton) -> bool {
        self.gamepad(index)
            .map(|gamepad| gamepad.is_pressed(button_to_gilrs(button)))
            .unwrap_or(false)
    }

    fn axis_value(&self, index: usize, axis: PadAxis) -> f32 {
        self.gamepad(index)
            .map(|gamepad| gamepad.value(axis_to_gilrs(axis)))
            .unwrap_or(0.0)
    }
}

/// Vocabulary button to the gilrs unified layout.
///
/// gilrs names face buttons by position (`South` is the bottom button, A on
/// an Xbox pad) and shoulder buttons `LeftTrigger`/`RightTrigger`; the analog
/// triggers are the `LeftZ`/`RightZ` axes.
fn button_to_gilrs(button: PadButton) -> Button {
    match button {
        PadButton::A => Button::South,
        PadButton::B => Button::East,
        PadButton::X => Button::West,
        PadButton::Y => Button::North,
        PadButton::LeftShoulder => Button::LeftTrigger,
        PadButton::RightShoulder => Button::RightTrigger,
        PadButton::DpadUp => Button::DPadUp,
        PadButton::DpadDown => Button::DPadDown,
        PadButton::DpadLeft => Button::DPadLeft,
        PadButton::DpadRight => Button::DPadRight,
        PadButton::Start => Button::Start,
        PadButton::Back => Button::Select,
        PadButton::Guide => Button::Mode,
        PadButton::LeftStick => Button::LeftThumb,
        PadButton::RightStick => Button::RightThumb,
    }
}

fn axis_to_gilrs(axis: PadAxis) -> Axis {
    match axis {
        PadAxis::LeftTrigger => Axis::LeftZ,
        PadAxis::RightTrigger => Axis::RightZ,
    }
}

/// The inverse of [`axis_to_gilrs`], partial: stick axes are not in the
/// vocabulary and return `None`.
fn trigger_from_gilrs(axis: Axis) -> Option<PadAxis> {
    match axis {
        Axis::LeftZ => Some(PadAxis::LeftTrigger),
        Axis::RightZ => Some(PadAxis::RightTrigger),
        _ => None,
    }
}
