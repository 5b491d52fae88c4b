// ABOUTME: Shared helpers for the HTTP integration tests
// ABOUTME: Oneshot request builder and captured response wrapper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

pub mod axum_test;
