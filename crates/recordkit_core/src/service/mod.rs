//! Use-case services over the generic repositories.
//!
//! # Responsibility
//! - Keep CLI/transport callers decoupled from storage details.
//! - Translate parsed caller input into repository calls.

pub mod record_service;

pub use record_service::RecordService;
