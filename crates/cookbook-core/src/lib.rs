// ABOUTME: Core types and constants for the cookbook metadata service
// ABOUTME: Foundation crate with error handling, domain models and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

#![deny(unsafe_code)]

//! # Cookbook Core
//!
//! Foundation crate providing shared types and constants for the cookbook metadata
//! service. It is designed to change infrequently so the service crate can rebuild
//! incrementally.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `DatabaseError`
//! - **constants**: User-visible messages and validation limits
//! - **models**: Metadata entity DTOs, metadata kinds and search DTOs

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Domain models for metadata entities and search
pub mod models;
