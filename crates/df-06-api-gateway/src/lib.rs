//! # DF-06 API Gateway
//!
//! External interface of the filing platform: resolves which submission a
//! request addresses, translates it into entity commands, and maps typed
//! failures onto the wire error shape.
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/institutions/{id}/filings/{period}/submissions` | Create the next submission |
//! | GET  | `/institutions/{id}/filings/{period}/submissions/{seq}` | Read current record |
//! | POST | `/institutions/{id}/filings/{period}/submissions/{seq}` | Multipart `.txt` upload |
//!
//! ## Error contract
//!
//! `{ "statusCode": u16, "message": string, "path": string }`: 404 for
//! missing institution/filing/submission, 400 for malformed uploads and
//! duplicate-submission conflicts, 500 with a generic message (full detail
//! is logged server-side, never exposed).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod directory;
pub mod error;
pub mod routes;
pub mod service;

pub use config::GatewayConfig;
pub use directory::{InMemoryInstitutionDirectory, InstitutionDirectory};
pub use error::{ApiError, ErrorResponse, GatewayError};
pub use service::{ApiGatewayService, AppState};
