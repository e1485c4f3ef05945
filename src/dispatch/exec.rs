//! # Command Execution Module
//!
//! Fire-and-forget shell execution for matched mappings.
//!
//! The dispatch loop hands a command string to a [`CommandRunner`] and moves
//! on; nothing about the spawned process is observed. Any number of commands
//! may be running at once and repeated triggers are not deduplicated.

use tokio::process::Command;
use tracing::{debug, warn};

/// Execution facility for matched commands.
///
/// One implementation spawns real shell processes; tests substitute a
/// recorder.
pub trait CommandRunner {
    /// Launch the command without blocking on or observing its completion.
    fn run(&mut self, command: &str);
}

/// Runs commands through `sh -c`, detached.
///
/// The child's exit status is not collected here; a command that fails after
/// a successful spawn is invisible to the engine. A spawn failure itself is
/// logged at warn and otherwise swallowed.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str) {
        debug!("spawning command: {}", command);
        match Command::new("sh").arg("-c").arg(command).spawn() {
            Ok(_child) => {}
            Err(e) => warn!("failed to spawn command '{}': {}", command, e),
        }
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Command runner for testing; records instead of spawning.
    #[derive(Clone, Default)]
    pub struct RecordingRunner {
        commands: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Handle to the command log, usable after the runner moves into a
        /// dispatcher.
        pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.commands)
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, command: &str) {
            self.commands.lock().unwrap().push(command.to_string());
        }
    }
}
