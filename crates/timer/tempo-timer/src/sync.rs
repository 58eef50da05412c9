//! Loom compatibility shim.
//!
//! Under `cfg(loom)` the registry and dispatch atomics come from loom so the
//! allocation protocol can be model-checked; otherwise they are the plain
//! `core` atomics.

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicPtr, AtomicU8, AtomicU32, AtomicUsize, Ordering};

#[cfg(not(loom))]
pub(crate) use core::sync::atomic::{AtomicPtr, AtomicU8, AtomicU32, AtomicUsize, Ordering};
