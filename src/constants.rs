// ABOUTME: System-wide constants re-exported from the core crate
// ABOUTME: Messages, limits, configuration defaults, environment names and route roots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! # Constants Module

pub use cookbook_core::constants::{
    defaults, env_config, limits, messages, routes, service_names,
};
