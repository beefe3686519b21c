//! # DF-03 Raw Ingestion
//!
//! Streaming ingestion pipeline: an uploaded text file becomes one ordered
//! `AddLine` command per line against exactly one submission entity.
//!
//! ## Guarantees
//!
//! - The entity's log grows by exactly one entry per input line, in input
//!   order, regardless of I/O chunk boundaries.
//! - All lines of one upload share a single timestamp captured at upload
//!   start.
//! - Flow control is demand-driven: bytes are only pulled from the source as
//!   fast as the target entity accepts commands, so a slow entity throttles
//!   the upstream reader instead of buffering the file in memory.
//! - On any mid-stream failure the entity receives a `Shutdown`;
//!   already-ingested lines remain in the log (no rollback).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod framing;
pub mod ingestor;

pub use framing::{LineFramer, MAX_FRAME_BYTES};
pub use ingestor::{IngestError, RawDataIngestor};
