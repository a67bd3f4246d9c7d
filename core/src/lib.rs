//! API client core for the job-application tracker.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! tracker's JSON:API backend, and keeps per-resource client state
//! (postings list, current posting, profile) up to date. The caller, or the
//! bundled [`UreqTransport`], executes the actual HTTP round-trip.
//!
//! # Design
//! - `ApiClient` is stateless apart from configuration: base URL, app token
//!   and a handle to the persisted user token.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response); failures are classified into `ApiError`
//!   at that boundary.
//! - Stores split actions into `begin_*` / `finish_*` around a `Command`,
//!   and drop responses whose ticket is no longer the latest for the slot.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod jsonapi;
pub mod postings;
pub mod profile;
pub mod transport;

pub use auth::{FileTokenStore, MemoryTokenStore, TokenStore, USER_TOKEN_KEY};
pub use client::ApiClient;
pub use command::{Command, Slot, Ticket};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use postings::{ListQuery, PostingForm, PostingsStore};
pub use profile::{ProfileForm, ProfileStore};
pub use transport::Transport;
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
