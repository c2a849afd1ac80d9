//! Reusable rendering pieces

pub mod badge;
pub mod call_list;

pub use badge::{Badge, Tone, outcome_badge, scenario_badge, status_badge};
pub use call_list::{call_entry, call_list};
