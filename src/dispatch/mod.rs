//! # Dispatch Module
//!
//! The control loop core: consumes gamepad notifications, keeps the device
//! registry current, and fires matched commands.
//!
//! The dispatcher is a two-state machine — idle between notifications,
//! dispatching while handling one — driven from the outside: the binary's
//! poll loop feeds it events and stops when it reports [`Flow::Quit`]. Every
//! runtime failure (a controller that will not open, a query racing a
//! detach) is local to one notification; only an explicit quit ends the
//! loop.

pub mod exec;

pub use exec::{CommandRunner, ShellRunner};

use tracing::{debug, info, trace};

use crate::device::backend::{GamepadBackend, PadEvent};
use crate::device::registry::PadRegistry;
use crate::mapping::{first_match, MappingTable};

/// Whether the dispatch loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Receives notifications, updates the registry, and triggers execution.
pub struct Dispatcher<B: GamepadBackend, R: CommandRunner> {
    registry: PadRegistry<B>,
    table: MappingTable,
    runner: R,
}

impl<B: GamepadBackend, R: CommandRunner> Dispatcher<B, R> {
    /// Build a dispatcher over a registry, a loaded mapping table, and an
    /// execution facility.
    pub fn new(registry: PadRegistry<B>, table: MappingTable, runner: R) -> Self {
        Self {
            registry,
            table,
            runner,
        }
    }

    /// Drain pending backend notifications and handle each in order.
    ///
    /// Stops early and reports [`Flow::Quit`] if a quit notification is
    /// among them.
    pub fn pump(&mut self) -> Flow {
        for event in self.registry.poll() {
            if self.handle(event) == Flow::Quit {
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Handle one notification.
    ///
    /// - `Attached` / `Detached` mutate the registry; a failed attach is
    ///   logged there and ignored.
    /// - `InputChanged` scans attached controllers in registry order and
    ///   fires the first match found, at most one command per notification.
    /// - `Other` is ignored.
    /// - `Quit` is the only transition that ends the loop.
    pub fn handle(&mut self, event: PadEvent) -> Flow {
        match event {
            PadEvent::Quit => {
                info!("quit requested, stopping dispatch loop");
                Flow::Quit
            }
            PadEvent::Attached(native) => {
                self.registry.attach(native);
                Flow::Continue
            }
            PadEvent::Detached(native) => {
                self.registry.detach_native(native);
                Flow::Continue
            }
            PadEvent::InputChanged => {
                self.dispatch_match();
                Flow::Continue
            }
            PadEvent::Other => {
                trace!("ignoring unrecognized notification");
                Flow::Continue
            }
        }
    }

    /// Scan every attached controller and fire the first match.
    ///
    /// The mapping-level tie-break (first mapping in table order) nests
    /// inside the device-level one (first device in registry order); once a
    /// device matches, later devices are not evaluated. With no devices or
    /// an empty table this is a no-op.
    fn dispatch_match(&mut self) {
        for (id, state) in self.registry.all_states() {
            if let Some(command) = first_match(&self.table, &state) {
                debug!("device {} matched, running: {}", id, command);
                self.runner.run(command);
                break;
            }
        }
    }

    /// Release every device. Idempotent; called once at shutdown.
    pub fn teardown(&mut self) {
        self.registry.teardown();
    }

    /// The registry owned by this dispatcher.
    pub fn registry(&self) -> &PadRegistry<B> {
        &self.registry
    }
}
