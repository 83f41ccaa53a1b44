// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Provisio integration tests.
//!
//! Provides sample providers and instrumented collaborators for fast,
//! deterministic tests of the registry.
//!
//! # Components
//!
//! - [`Greeter`] and its English, Spanish, French, and Argentine providers
//! - [`CountingResolver`] - resolver that counts, delays, or fails resolutions

pub mod greeters;
pub mod resolver;

pub use greeters::{
    ArgentineGreeter, EnglishGreeter, FrenchGreeter, Greeter, SpanishGreeter, argentine_substitution,
    english_fallback, greeter_declarations, greeter_types,
};
pub use resolver::CountingResolver;
