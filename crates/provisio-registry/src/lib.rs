// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazy provider registry.
//!
//! A [`ProviderRegistry`] turns declarations (name, type identifier,
//! parameters) into initialized provider instances on demand. Each provider is
//! built at most once per generation of the declaration list, concurrent
//! requests share that build, and failures are memoized by default.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use provisio_core::{BoxError, Declaration, Parameters, Provider};
//! use provisio_registry::{ProviderRegistry, StaticSource, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Echo {
//!     name: String,
//! }
//!
//! impl Provider for Echo {
//!     fn initialize(&mut self, name: &str, _parameters: &Parameters) -> Result<(), BoxError> {
//!         self.name = name.to_string();
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//! }
//!
//! let registry: ProviderRegistry<dyn Provider> = ProviderRegistry::builder()
//!     .source(StaticSource::from_declarations([Declaration::new("Echo", "echo")]))
//!     .resolver(TypeRegistry::<dyn Provider>::new().with("echo", || Box::new(Echo::default())))
//!     .build();
//!
//! let echo = registry.get("echo").unwrap();
//! assert_eq!(echo.name(), "Echo");
//! assert!(Arc::ptr_eq(&echo, &registry.get_default().unwrap()));
//! ```

pub mod builder;
pub mod cell;
pub mod registry;
pub mod resolver;
pub mod source;

pub use builder::{DEFAULT_SECTION, RegistryBuilder};
pub use cell::{BuildCell, FailurePolicy};
pub use registry::ProviderRegistry;
pub use resolver::{ResolveError, TypeRegistry};
pub use source::StaticSource;
