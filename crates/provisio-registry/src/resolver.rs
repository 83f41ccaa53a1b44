// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static type table mapping type identifiers to constructors.
//!
//! The `TypeRegistry` is the default [`InstanceResolver`]: constructors are
//! registered at startup under a type identifier, and the registry looks them
//! up by exact identifier when a declared provider is first requested.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use provisio_core::{BoxError, InstanceResolver, suggest};
use thiserror::Error;

/// Errors produced by [`TypeRegistry`] resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No constructor is registered under the requested type identifier.
    #[error("unknown provider type `{type_identifier}`{}", format_suggestion(.suggestion.as_deref()))]
    UnknownType {
        type_identifier: String,
        suggestion: Option<String>,
    },
}

fn format_suggestion(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!(", did you mean `{s}`?"),
        None => String::new(),
    }
}

type Constructor<P> = Arc<dyn Fn(&str) -> Result<Box<P>, BoxError> + Send + Sync>;

/// Registry of provider constructors keyed by type identifier.
pub struct TypeRegistry<P: ?Sized> {
    constructors: IndexMap<String, Constructor<P>>,
}

impl<P: ?Sized> TypeRegistry<P> {
    /// Create a new empty type registry.
    pub fn new() -> Self {
        Self {
            constructors: IndexMap::new(),
        }
    }

    /// Register a default-constructing constructor under `type_identifier`.
    ///
    /// A later registration under the same identifier replaces the earlier one.
    pub fn register<F>(&mut self, type_identifier: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn() -> Box<P> + Send + Sync + 'static,
    {
        self.register_fallible(type_identifier, move |_name| Ok(constructor()))
    }

    /// Register a constructor that receives the provider name and may fail.
    pub fn register_fallible<F>(
        &mut self,
        type_identifier: impl Into<String>,
        constructor: F,
    ) -> &mut Self
    where
        F: Fn(&str) -> Result<Box<P>, BoxError> + Send + Sync + 'static,
    {
        self.constructors
            .insert(type_identifier.into(), Arc::new(constructor));
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with<F>(mut self, type_identifier: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Box<P> + Send + Sync + 'static,
    {
        self.register(type_identifier, constructor);
        self
    }

    pub fn contains(&self, type_identifier: &str) -> bool {
        self.constructors.contains_key(type_identifier)
    }

    /// Registered type identifiers, in registration order.
    pub fn type_identifiers(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<P: ?Sized> InstanceResolver<P> for TypeRegistry<P> {
    fn resolve(&self, type_identifier: &str, name: &str) -> Result<Box<P>, BoxError> {
        match self.constructors.get(type_identifier) {
            Some(constructor) => constructor(name),
            None => Err(Box::new(ResolveError::UnknownType {
                type_identifier: type_identifier.to_string(),
                suggestion: suggest(type_identifier, self.type_identifiers()).map(str::to_string),
            })),
        }
    }
}

impl<P: ?Sized> Default for TypeRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> Clone for TypeRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            constructors: self.constructors.clone(),
        }
    }
}

impl<P: ?Sized> fmt::Debug for TypeRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape: Send + Sync {
        fn sides(&self) -> u32;
    }

    struct Triangle;
    impl Shape for Triangle {
        fn sides(&self) -> u32 {
            3
        }
    }

    struct Square;
    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    fn shapes() -> TypeRegistry<dyn Shape> {
        TypeRegistry::<dyn Shape>::new()
            .with("shapes.triangle", || Box::new(Triangle))
            .with("shapes.square", || Box::new(Square))
    }

    #[test]
    fn resolves_registered_type() {
        let types = shapes();
        let shape = types.resolve("shapes.square", "box").unwrap();
        assert_eq!(shape.sides(), 4);
        assert!(types.contains("shapes.triangle"));
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn type_identifiers_keep_registration_order() {
        let types = shapes();
        let ids: Vec<&str> = types.type_identifiers().collect();
        assert_eq!(ids, vec!["shapes.triangle", "shapes.square"]);
    }

    #[test]
    fn unknown_type_suggests_closest_identifier() {
        let err = shapes().resolve("shapes.sqare", "box").err().unwrap();
        let resolve = err.downcast_ref::<ResolveError>().expect("ResolveError");
        assert_eq!(
            resolve,
            &ResolveError::UnknownType {
                type_identifier: "shapes.sqare".into(),
                suggestion: Some("shapes.square".into()),
            }
        );
        assert_eq!(
            err.to_string(),
            "unknown provider type `shapes.sqare`, did you mean `shapes.square`?"
        );
    }

    #[test]
    fn fallible_constructor_sees_provider_name() {
        let mut types = TypeRegistry::<dyn Shape>::new();
        types.register_fallible("shapes.named", |name| {
            if name == "forbidden" {
                Err("name not allowed".into())
            } else {
                Ok(Box::new(Triangle))
            }
        });
        assert!(types.resolve("shapes.named", "ok").is_ok());
        let err = types.resolve("shapes.named", "forbidden").err().unwrap();
        assert_eq!(err.to_string(), "name not allowed");
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let types = TypeRegistry::<dyn Shape>::default();
        assert!(types.is_empty());
        assert!(types.resolve("anything", "x").is_err());
    }
}
