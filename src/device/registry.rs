//! # Device Registry Module
//!
//! Tracks currently-attached controllers under stable, process-unique ids
//! and hands out read-only per-device state views for matching.
//!
//! The registry exclusively owns every device: controllers are reachable
//! only through it, and ids are minted from a monotonic counter so a
//! late-arriving notification for a removed controller can never address a
//! newly attached, unrelated one — even after unplug/replug of the same
//! physical device.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::device::backend::{GamepadBackend, PadEvent};
use crate::error::{PadcmdError, Result};
use crate::input::{InputState, PadInput};

/// Stable identifier for one attached controller.
///
/// Valid for the lifetime of a single physical attachment; never reused
/// within a process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct DeviceEntry {
    native: usize,
    name: String,
}

/// The set of currently-attached controllers.
///
/// An id present in the registry always denotes a currently-open, queryable
/// controller; a failed open never enters it. Iteration order is ascending
/// id, which equals attach order — the device-level tie-break the dispatcher
/// relies on.
pub struct PadRegistry<B: GamepadBackend> {
    backend: B,
    devices: BTreeMap<DeviceId, DeviceEntry>,
    next_id: u64,
    axis_threshold: f32,
}

impl<B: GamepadBackend> PadRegistry<B> {
    /// Create an empty registry over a backend.
    ///
    /// `axis_threshold` is the trigger activity threshold applied by every
    /// state view this registry hands out.
    pub fn new(backend: B, axis_threshold: f32) -> Self {
        Self {
            backend,
            devices: BTreeMap::new(),
            next_id: 0,
            axis_threshold,
        }
    }

    /// Drain pending notifications from the backend.
    pub fn poll(&mut self) -> Vec<PadEvent> {
        self.backend.poll()
    }

    /// Open the controller at `native` and register it under a fresh id.
    ///
    /// A failed open is logged and ignored; other controllers continue to
    /// function and the registry is left unchanged. Attaching a native index
    /// that is already registered returns the existing id without opening
    /// again (backends may re-announce devices they reported at startup).
    pub fn attach(&mut self, native: usize) -> Option<DeviceId> {
        if let Some(existing) = self.id_by_native(native) {
            debug!("controller index {} already attached as {}", native, existing);
            return Some(existing);
        }

        match self.backend.open(native) {
            Ok(name) => {
                let id = DeviceId(self.next_id);
                self.next_id += 1;
                info!("opened controller {} ({})", name, id);
                self.devices.insert(id, DeviceEntry { native, name });
                Some(id)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Release and remove the controller, if present.
    ///
    /// Removing an absent id is a no-op: a detach notification can race with
    /// a prior failed attach or an already-removed entry.
    pub fn detach(&mut self, id: DeviceId) {
        if let Some(entry) = self.devices.remove(&id) {
            self.backend.close(entry.native);
            info!("closed controller {} ({})", entry.name, id);
        }
    }

    /// Release and remove the controller announced under `native`, if any.
    pub fn detach_native(&mut self, native: usize) {
        if let Some(id) = self.id_by_native(native) {
            self.detach(id);
        }
    }

    /// Read-only state view for one controller.
    ///
    /// # Errors
    ///
    /// Returns [`PadcmdError::UnknownDevice`] if the id is not currently
    /// registered, e.g. a change notification arriving after detach. Callers
    /// treat this as "device gone, skip", never as fatal.
    pub fn query(&self, id: DeviceId) -> Result<StateView<'_, B>> {
        let entry = self
            .devices
            .get(&id)
            .ok_or(PadcmdError::UnknownDevice(id))?;
        Ok(self.view(entry))
    }

    /// State views for every attached controller, in ascending id order.
    pub fn all_states(&self) -> impl Iterator<Item = (DeviceId, StateView<'_, B>)> {
        self.devices.iter().map(|(id, entry)| (*id, self.view(entry)))
    }

    /// Release every held controller. Idempotent; also runs on drop.
    pub fn teardown(&mut self) {
        while let Some((id, entry)) = self.devices.pop_first() {
            self.backend.close(entry.native);
            info!("closed controller {} ({})", entry.name, id);
        }
    }

    /// Number of attached controllers.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// True if no controller is attached.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    fn id_by_native(&self, native: usize) -> Option<DeviceId> {
        self.devices
            .iter()
            .find(|(_, entry)| entry.native == native)
            .map(|(id, _)| *id)
    }

    fn view<'a>(&'a self, entry: &DeviceEntry) -> StateView<'a, B> {
        StateView {
            backend: &self.backend,
            native: entry.native,
            threshold: self.axis_threshold,
        }
    }
}

impl<B: GamepadBackend> Drop for PadRegistry<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Read-only snapshot view of one controller's live input state.
///
/// Borrows the backend for the duration of a single query; never retained
/// across dispatch cycles.
pub struct StateView<'a, B: GamepadBackend> {
    backend: &'a B,
    native: usize,
    threshold: f32,
}

impl<B: GamepadBackend> InputState for StateView<'_, B> {
    fn is_active(&self, input: PadInput) -> bool {
        match input {
            PadInput::Button(button) => self.backend.is_pressed(self.native, button),
            PadInput::Axis(axis) => {
                self.backend.axis_value(self.native, axis).abs() > self.threshold
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::backend::mocks::{FakeBackend, FakePad};
    use crate::input::{PadAxis, PadButton};

    fn registry_with_pads(pads: &[(usize, FakePad)]) -> PadRegistry<FakeBackend> {
        let mut backend = FakeBackend::new();
        for (index, pad) in pads {
            backend.pads.insert(*index, pad.clone());
        }
        PadRegistry::new(backend, 0.0)
    }

    #[test]
    fn test_attach_registers_an_openable_pad() {
        let mut registry = registry_with_pads(&[(0, FakePad::named("Test Pad"))]);

        let id = registry.attach(0);

        assert!(id.is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.query(id.unwrap()).is_ok());
    }

    #[test]
    fn test_failed_open_leaves_registry_unchanged() {
        let mut pad = FakePad::named("Broken Pad");
        pad.openable = false;
        let mut registry = registry_with_pads(&[(0, pad)]);

        let id = registry.attach(0);

        assert!(id.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_attach_unknown_index_leaves_registry_unchanged() {
        let mut registry = registry_with_pads(&[]);

        assert!(registry.attach(7).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reattach_of_registered_index_is_idempotent() {
        let mut registry = registry_with_pads(&[(0, FakePad::named("Test Pad"))]);

        let first = registry.attach(0).unwrap();
        let second = registry.attach(0).unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_query_after_detach_fails_with_unknown_device() {
        let mut registry = registry_with_pads(&[(0, FakePad::named("Test Pad"))]);
        let id = registry.attach(0).unwrap();

        registry.detach(id);

        match registry.query(id) {
            Err(PadcmdError::UnknownDevice(gone)) => assert_eq!(gone, id),
            other => panic!("expected UnknownDevice, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_detach_of_never_attached_id_is_a_noop() {
        let mut registry = registry_with_pads(&[(0, FakePad::named("Test Pad"))]);
        let id = registry.attach(0).unwrap();

        // Detach twice; the second call must not disturb anything
        registry.detach(id);
        registry.detach(id);

        assert!(registry.is_empty());
    }

    #[test]
    fn test_replug_never_reuses_a_device_id() {
        let mut registry = registry_with_pads(&[(0, FakePad::named("Test Pad"))]);

        let first = registry.attach(0).unwrap();
        registry.detach_native(0);
        let second = registry.attach(0).unwrap();

        assert_ne!(first, second, "ids must be distinct across attachments");
    }

    #[test]
    fn test_detach_closes_the_native_handle() {
        let backend = FakeBackend::new().with_pad(3, FakePad::named("Test Pad"));
        let closed = backend.close_log();
        let mut registry = PadRegistry::new(backend, 0.0);

        let id = registry.attach(3).unwrap();
        registry.detach(id);

        assert_eq!(*closed.lock().unwrap(), vec![3]);
    }

    #[test]
    fn test_teardown_releases_everything_and_is_idempotent() {
        let backend = FakeBackend::new()
            .with_pad(0, FakePad::named("Pad A"))
            .with_pad(1, FakePad::named("Pad B"));
        let closed = backend.close_log();
        let mut registry = PadRegistry::new(backend, 0.0);
        registry.attach(0);
        registry.attach(1);

        registry.teardown();
        registry.teardown();

        assert!(registry.is_empty());
        let closed = closed.lock().unwrap();
        assert_eq!(closed.len(), 2, "each pad closed exactly once");
    }

    #[test]
    fn test_all_states_iterates_in_attach_order() {
        let mut registry = registry_with_pads(&[
            (2, FakePad::named("Pad C")),
            (0, FakePad::named("Pad A")),
            (1, FakePad::named("Pad B")),
        ]);

        // Attach in a deliberately shuffled native order
        let c = registry.attach(2).unwrap();
        let a = registry.attach(0).unwrap();
        let b = registry.attach(1).unwrap();

        let order: Vec<DeviceId> = registry.all_states().map(|(id, _)| id).collect();
        assert_eq!(order, vec![c, a, b]);
    }

    #[test]
    fn test_state_view_reports_pressed_buttons() {
        let mut registry = registry_with_pads(&[(
            0,
            FakePad::named("Test Pad").holding(&[PadButton::A, PadButton::LeftShoulder]),
        )]);
        let id = registry.attach(0).unwrap();

        let view = registry.query(id).unwrap();
        assert!(view.is_active(PadInput::Button(PadButton::A)));
        assert!(view.is_active(PadInput::Button(PadButton::LeftShoulder)));
        assert!(!view.is_active(PadInput::Button(PadButton::B)));
    }

    #[test]
    fn test_state_view_applies_axis_threshold() {
        let pad = FakePad::named("Test Pad").with_axis(PadAxis::LeftTrigger, 0.3);
        let backend = FakeBackend::new().with_pad(0, pad);
        let mut registry = PadRegistry::new(backend, 0.5);
        let id = registry.attach(0).unwrap();

        let view = registry.query(id).unwrap();
        assert!(
            !view.is_active(PadInput::Axis(PadAxis::LeftTrigger)),
            "0.3 is below the 0.5 threshold"
        );
        assert!(!view.is_active(PadInput::Axis(PadAxis::RightTrigger)));
    }

    #[test]
    fn test_any_nonzero_reading_is_active_at_default_threshold() {
        let pad = FakePad::named("Test Pad")
            .with_axis(PadAxis::LeftTrigger, 0.01)
            .with_axis(PadAxis::RightTrigger, -0.01);
        let mut registry = registry_with_pads(&[(0, pad)]);
        let id = registry.attach(0).unwrap();

        let view = registry.query(id).unwrap();
        // Threshold 0.0: any non-centered reading counts, regardless of sign
        assert!(view.is_active(PadInput::Axis(PadAxis::LeftTrigger)));
        assert!(view.is_active(PadInput::Axis(PadAxis::RightTrigger)));
    }

    #[test]
    fn test_unsupported_inputs_read_as_inactive() {
        let mut registry = registry_with_pads(&[(0, FakePad::named("Test Pad"))]);
        let id = registry.attach(0).unwrap();

        let view = registry.query(id).unwrap();
        // The fake pad reports nothing at all; no input is ever active
        assert!(!view.is_active(PadInput::Button(PadButton::Guide)));
        assert!(!view.is_active(PadInput::Axis(PadAxis::RightTrigger)));
    }
}
