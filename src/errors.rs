// ABOUTME: Unified error handling re-exported from the core crate
// ABOUTME: AppError, ErrorCode, DatabaseError and the JSON error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! # Unified Error Handling System
//!
//! The taxonomy lives in `cookbook-core` so the models and the service share it.
//! This module re-exports it under the service crate's namespace.

pub use cookbook_core::errors::{
    AppError, AppResult, DatabaseError, ErrorCode, ErrorResponse,
};
