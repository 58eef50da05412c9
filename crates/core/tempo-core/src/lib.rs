//! Core types shared by the Tempo timer crates.
//!
//! This crate holds the host-testable pieces that every other crate leans
//! on: the leveled log facility, timer identifiers, and the `RacyCell`
//! used for write-once statics in the interrupt glue.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod cell;
pub mod id;
pub mod log;
