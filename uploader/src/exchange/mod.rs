//! Exchange protocol client
//!
//! This module drives one exchange server endpoint through a single session:
//! authenticate, negotiate the transfer policy, upload files in chunks, then
//! ask the server to import them.
//!
//! # Architecture
//!
//! ```text
//! checkauth → Session ──────────────┐
//!    ↓                              ↓ (cookie + session param on every request)
//!  init → TransferPolicy → file (chunk, chunk, ...) → import (progress ... success)
//! ```
//!
//! # Communication Pattern
//!
//! 1. Every request is a POST with `type` and `mode` query parameters
//! 2. Response bodies are line sets; line 0 is the status token
//! 3. Messages arrive in Windows-1251 and are decoded at the boundary
//! 4. Import is polled without delay until the server leaves `progress`
//!
//! No request is retried. Any failure ends the run.

pub mod archive;
pub mod client;
pub mod import;
pub mod response;
pub mod session;
pub mod transfer;

pub use client::{Credentials, ExchangeClient};
pub use import::{import_all, ImportSummary};
pub use response::{decode_body, ProtocolResponse, Status};
pub use session::{authenticate, negotiate_transfer, Session, TransferPolicy};
pub use transfer::{upload_all, FileJob, TransferSummary};
