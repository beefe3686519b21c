//! # Filing Platform Test Suite
//!
//! Cross-crate integration scenarios: the full upload flow through the
//! gateway, status broadcast ordering, and durable recovery. Single-crate
//! behavior is covered by each crate's own unit tests.

#[cfg(test)]
mod integration;
#[cfg(test)]
mod support;
