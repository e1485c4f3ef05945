//! # padcmd
//!
//! Turn a game controller into a programmable macro pad.
//!
//! padcmd loads a TOML file binding gamepad input combinations to shell
//! commands, then watches every attached controller and runs the first
//! matching command whenever a bound combination becomes active.

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::info;
use tracing_subscriber;

use padcmd::config::Config;
use padcmd::device::{GilrsBackend, PadEvent, PadRegistry};
use padcmd::dispatch::{Dispatcher, Flow, ShellRunner};
use padcmd::mapping::MappingTable;

/// Controller poll rate in Hz; each tick drains pending notifications.
const POLL_RATE_HZ: u32 = 250;

/// Configuration file used when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "padcmd.toml";

/// Main entry point for padcmd
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load the configuration and build the mapping table (any error here
///      aborts startup; no partially-loaded table ever reaches the loop)
///    - Initialize the gamepad layer and an empty device registry
///
/// 2. **Main Loop**
///    - Poll the gamepad layer at 250Hz, feeding notifications to the
///      dispatcher: attach/detach maintain the registry, input changes
///      trigger match scans, matched commands run fire-and-forget
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Release every controller
///    - Clean exit
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be read or parsed
/// - The gamepad layer fails to initialize
///
/// Runtime problems (a controller that will not open, a device disappearing
/// mid-scan) are logged and never end the loop.
///
/// # Examples
///
/// Run with the default configuration path:
/// ```bash
/// padcmd
/// ```
///
/// Or name a configuration file:
/// ```bash
/// padcmd /etc/padcmd/padcmd.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("padcmd v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;
    let table = MappingTable::from_entries(&config.mappings)?;
    info!("loaded {} mappings from {}", table.len(), config_path);

    let backend = GilrsBackend::new(config.controller.axis_threshold)?;
    let registry = PadRegistry::new(backend, config.controller.axis_threshold);
    let mut dispatcher = Dispatcher::new(registry, table, ShellRunner);

    // 250Hz poll interval (4ms period)
    let period_ms = 1000 / POLL_RATE_HZ;
    let mut poll_interval = interval(Duration::from_millis(period_ms as u64));

    info!("watching controllers at {}Hz", POLL_RATE_HZ);
    info!("Press Ctrl+C to exit");

    // Main dispatch loop
    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                if dispatcher.pump() == Flow::Quit {
                    break;
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                dispatcher.handle(PadEvent::Quit);
                break;
            }
        }
    }

    dispatcher.teardown();
    info!("shutdown complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_rate_constant() {
        // Fast enough that a held combination fires without visible lag
        assert_eq!(POLL_RATE_HZ, 250);
    }

    #[test]
    fn test_poll_period_calculation() {
        let period_ms = 1000 / POLL_RATE_HZ;
        assert_eq!(period_ms, 4, "Period should be 4ms at 250Hz");
    }

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "padcmd.toml");
    }
}
