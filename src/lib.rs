//! netbounce - Per-request network latency bounce visualizer
//!
//! Each finished network request becomes a colored marker bouncing across a
//! track, one full traversal taking time proportional to that request's
//! measured latency. The library holds the whole pipeline: capture events,
//! the latency-ordered request ledger, the per-marker bounce state machines,
//! and the viewport reconciliation that keeps bounds consistent on resize.

pub mod capture;
pub mod panel;
