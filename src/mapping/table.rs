//! # Mapping Table Module
//!
//! An ordered list of (input-set, command) pairs, built once at startup from
//! configuration records and immutable for the process lifetime.
//!
//! Table order is significant: when several mappings could match the same
//! state, the first one listed wins (see [`crate::mapping::engine`]). A
//! three-button combo must therefore be listed before its two-button subset
//! to take precedence.

use serde::de::Error;

use crate::config::MappingEntry;
use crate::error::{PadcmdError, Result};
use crate::input::PadInput;

/// A required set of simultaneously-active inputs bound to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Inputs that must all be active at once. Non-empty; configured order
    /// is preserved for readability but does not affect matching.
    pub inputs: Vec<PadInput>,
    /// Shell command to run when the combination becomes active. Non-empty.
    pub command: String,
}

/// The ordered, immutable mapping table.
///
/// Read-only after construction; shared references may be used from any
/// number of dispatch cycles without synchronization.
///
/// # Examples
///
/// ```
/// use padcmd::config::MappingEntry;
/// use padcmd::mapping::MappingTable;
///
/// let entries = vec![MappingEntry {
///     inputs: vec!["a".into(), "b".into()],
///     command: "notify-send hi".into(),
/// }];
/// let table = MappingTable::from_entries(&entries)?;
/// assert_eq!(table.len(), 1);
/// # Ok::<(), padcmd::error::PadcmdError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    mappings: Vec<Mapping>,
}

impl MappingTable {
    /// Build the table from raw configuration records, in order.
    ///
    /// The whole load is atomic: any entry with an empty input list, a blank
    /// command, or an input name outside the vocabulary fails the load and no
    /// table is produced.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending entry (entries are
    /// numbered from 1, matching their position in the file).
    pub fn from_entries(entries: &[MappingEntry]) -> Result<Self> {
        let mut mappings = Vec::with_capacity(entries.len());

        for (pos, entry) in entries.iter().enumerate() {
            let mapping = Self::convert_entry(entry).map_err(|e| {
                PadcmdError::Config(toml::de::Error::custom(format!(
                    "mapping #{}: {}",
                    pos + 1,
                    e
                )))
            })?;
            mappings.push(mapping);
        }

        Ok(Self { mappings })
    }

    fn convert_entry(entry: &MappingEntry) -> Result<Mapping> {
        if entry.inputs.is_empty() {
            return Err(PadcmdError::Config(toml::de::Error::custom(
                "inputs must not be empty",
            )));
        }
        if entry.command.trim().is_empty() {
            return Err(PadcmdError::Config(toml::de::Error::custom(
                "command must not be empty",
            )));
        }

        let inputs = entry
            .inputs
            .iter()
            .map(|name| name.parse::<PadInput>())
            .collect::<Result<Vec<_>>>()?;

        Ok(Mapping {
            inputs,
            command: entry.command.clone(),
        })
    }

    /// The mappings in table order.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Number of mappings in the table.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// True if the table holds no mappings at all.
    ///
    /// An empty table is valid configuration; no device can ever match.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
