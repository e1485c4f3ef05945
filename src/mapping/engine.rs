//! # Matching Engine Module
//!
//! Decides which mapping, if any, fires for a device's current input state.
//!
//! The scan walks the table in stored order and returns the command of the
//! first mapping whose inputs are all active, without evaluating the rest.
//! The short-circuit is the tie-break, not an optimization: when combinations
//! overlap, configuration order controls precedence deterministically.

use crate::input::InputState;
use crate::mapping::MappingTable;

/// Return the command of the first mapping in table order that is fully
/// satisfied by `state`, or `None` if no mapping matches.
///
/// A mapping matches iff every input in its set is active; button and axis
/// members are ANDed together like any others. No match is not an error, and
/// an empty table never matches any state.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use padcmd::config::MappingEntry;
/// use padcmd::input::{InputState, PadInput};
/// use padcmd::mapping::{first_match, MappingTable};
///
/// struct Held(HashSet<PadInput>);
/// impl InputState for Held {
///     fn is_active(&self, input: PadInput) -> bool {
///         self.0.contains(&input)
///     }
/// }
///
/// let table = MappingTable::from_entries(&[MappingEntry {
///     inputs: vec!["a".into()],
///     command: "echo hi".into(),
/// }])?;
/// let held = Held(["a".parse()?].into_iter().collect());
/// assert_eq!(first_match(&table, &held), Some("echo hi"));
/// # Ok::<(), padcmd::error::PadcmdError>(())
/// ```
pub fn first_match<'t, S: InputState>(table: &'t MappingTable, state: &S) -> Option<&'t str> {
    table
        .mappings()
        .iter()
        .find(|mapping| mapping.inputs.iter().all(|input| state.is_active(*input)))
        .map(|mapping| mapping.command.as_str())
}
