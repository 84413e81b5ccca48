//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-facing catalog APIs.
//! - Keep callers decoupled from storage details and error plumbing.

pub mod product_service;
