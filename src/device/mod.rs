//! # Device Module
//!
//! Controller lifecycle handling.
//!
//! This module handles:
//! - The [`GamepadBackend`] trait seam over the platform gamepad layer
//! - The production `gilrs` backend with hotplug notifications
//! - The [`PadRegistry`] tracking attached controllers under stable ids
//! - Read-only per-device state views for the matching engine

pub mod backend;
pub mod registry;

pub use backend::{GamepadBackend, GilrsBackend, PadEvent};
pub use registry::{DeviceId, PadRegistry, StateView};
