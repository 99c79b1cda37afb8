//! Core library for codegen
//!
//! This crate implements the **Functional Core** of the codegen client,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`codegen_core`** (this crate): Pure data model and decisions with zero I/O
//! - **`codegen`**: HTTP calls, terminal rendering and orchestration (the Imperative Shell)
//!
//! Everything here can be tested with fixture data: the shell performs a request,
//! then hands the raw status and body to [`api::classify_generation`] and friends,
//! stores the outcome in a [`session::Session`] and asks [`quality`] and
//! [`download`] how to present it.
//!
//! # Module Organization
//!
//! - [`language`]: Target languages and their file extensions
//! - [`api`]: Wire types and response classification
//! - [`error`]: Input and service error taxonomy
//! - [`session`]: Session state, phases and request ordering
//! - [`quality`]: Quality bands and the validation display projection
//! - [`notice`]: Transient user-facing status messages
//! - [`download`]: Filename selection and download artifacts
//!
//! # Example Usage
//!
//! ```rust
//! use codegen_core::api::classify_generation;
//! use codegen_core::session::{Phase, Session};
//!
//! let body = r#"{"success": true, "code": "print(1)", "filename": "one.py"}"#;
//! let artifact = classify_generation(200, body).unwrap();
//!
//! let mut session = Session::new();
//! let ticket = session.issue_ticket();
//! assert!(session.apply_generation(ticket, artifact));
//! assert_eq!(session.phase(), Phase::Generated);
//! ```

pub mod api;
pub mod download;
pub mod error;
pub mod language;
pub mod notice;
pub mod quality;
pub mod session;
