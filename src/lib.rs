//! `Stockroom` - a parts inventory and purchasing backend
//!
//! This crate tracks physical parts across vendors, flags low-stock parts for
//! replenishment, drives the purchase-order lifecycle from draft through
//! receiving, and converts customer carts into sales orders. Every stock
//! change is paired with an append-only stock-movement ledger entry inside
//! the same database transaction, so counters and audit trail never diverge.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
)]

/// Configuration management for database settings and the seed catalog
pub mod config;
/// Core business logic - catalog, reorder, ledger, purchasing, receiving, checkout
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Purchase-order snapshot notification seam (email stub)
pub mod notify;

#[cfg(test)]
pub mod test_utils;
