//! Integration scenarios.

mod broadcast;
mod recovery;
mod upload_flow;
