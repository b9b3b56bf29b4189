//! Photo identifiers and capture stamps.
//!
//! Every captured photo carries a [`PhotoId`] assigned at the shutter press and never changed
//! afterwards. Dentfolio uses a *canonical* string form for these identifiers: **32 lowercase
//! hexadecimal characters** (no hyphens), which is what photo logs and CLI output contain.
//!
//! This crate provides:
//! - [`PhotoId`], a wrapper that *guarantees* the canonical format once constructed.
//! - [`CaptureStamp`], a capture timestamp paired with a fresh [`PhotoId`] whose timestamps are
//!   strictly increasing within one capture session.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! Non-canonical values (uppercase, hyphenated, wrong length, non-hex) are rejected by
//! [`PhotoId::parse`].

mod service;

pub use service::{CaptureStamp, PhotoId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
