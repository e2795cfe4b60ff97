//! # Wasil Support
//!
//! Shared utilities for the Wasil injection crates.
//!
//! This crate provides text rendering for diagnostics: shortened type
//! names, "did you mean?" suggestions and scope chains.

pub mod rendering;
