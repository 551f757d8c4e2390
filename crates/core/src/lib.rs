//! Pure domain logic for Lockbase.
//!
//! This crate has no database, async, or I/O dependencies. It provides:
//!
//! - The locker code contract: format validation, random generation, and
//!   the bounded-retry fallback used by the import reconciler ([`code`]).
//! - Portable export/import document types and the pure parts of the
//!   reconciliation pipeline ([`transfer`]).
//! - Dashboard statistics shapes and bucketing helpers ([`stats`]).
//! - The shared error taxonomy ([`error`]) and ID/timestamp aliases
//!   ([`types`]).

pub mod code;
pub mod error;
pub mod roles;
pub mod stats;
pub mod transfer;
pub mod types;
