//! Matching engine for pairing gift-exchange participants
//!
//! This module implements the grouping, shuffling, cycle-pairing and
//! leftover-escalation logic that turns a flat participant list into an
//! ordered list of giver/receiver assignments.

pub mod engine;

pub use engine::{AssignmentMatcher, RegionalCycleMatcher};
