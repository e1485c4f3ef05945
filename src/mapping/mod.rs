//! # Mapping Module
//!
//! The mapping table (input combinations bound to commands) and the matching
//! engine that decides which mapping, if any, fires for a given device state.

pub mod engine;
pub mod table;

pub use engine::first_match;
pub use table::{Mapping, MappingTable};
