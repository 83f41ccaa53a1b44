// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Provisio provider registry.
//!
//! This crate provides the declaration model, the collaborator traits the
//! registry is composed from, and the error taxonomy shared by every crate in
//! the workspace.

pub mod error;
pub mod suggest;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, RegistryError, SharedError};
pub use suggest::suggest;
pub use types::{Declaration, DeclarationSet, Parameters, name_key};

pub use traits::{
    DeclarationSource, EmptySource, FALLBACK_TYPE, FallbackDeclarations, FallbackProvider,
    IdentityHook, InstanceResolver, NoFallback, PostInitHook, Provider,
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Default)]
    struct Named {
        name: String,
    }

    impl Provider for Named {
        fn initialize(&mut self, name: &str, _parameters: &Parameters) -> Result<(), BoxError> {
            self.name = name.to_string();
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn registry_error_messages_name_the_provider() {
        let not_found = RegistryError::ProviderNotFound {
            name: "Klingon".into(),
            section: "greeters".into(),
        };
        assert_eq!(
            not_found.to_string(),
            "the provider with the name Klingon is not configured on the greeters section"
        );
        assert_eq!(not_found.provider_name(), Some("Klingon"));

        let creation = RegistryError::creation(
            "Spanish",
            "greeting.spanish",
            Box::new(std::io::Error::other("boom")),
        );
        let msg = creation.to_string();
        assert!(msg.contains("greeting.spanish"), "got: {msg}");
        assert!(msg.contains("Spanish"), "got: {msg}");
        assert!(std::error::Error::source(&creation).is_some());

        let missing = RegistryError::MissingConfiguration {
            section: "greeters".into(),
        };
        assert!(missing.to_string().contains("greeters"));
        assert_eq!(missing.provider_name(), None);
    }

    #[test]
    fn cloned_creation_error_shares_its_cause() {
        let err = RegistryError::creation("a", "t", Box::new(std::io::Error::other("x")));
        let clone = err.clone();
        match (&err, &clone) {
            (
                RegistryError::ProviderCreation { source: a, .. },
                RegistryError::ProviderCreation { source: b, .. },
            ) => assert!(std::sync::Arc::ptr_eq(a, b)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn parameters_preserve_insertion_order() {
        let params: Parameters = [("zeta", "1"), ("alpha", "2"), ("mid", "3")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn parameters_prefer_exact_key_over_case_insensitive_match() {
        let mut params = Parameters::new();
        params.insert("GreetName", "upper");
        params.insert("greetname", "lower");
        assert_eq!(params.get("greetname"), Some("lower"));
        assert_eq!(params.get("GreetName"), Some("upper"));
        assert_eq!(params.get("GREETNAME"), Some("upper"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn declaration_set_ignores_blank_default() {
        let set = DeclarationSet::new(vec![Declaration::new("English", "greeting.english")])
            .with_default("  ");
        assert_eq!(set.default_name, None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_source_declares_nothing() {
        let set = EmptySource.load().expect("empty source never fails");
        assert!(set.is_empty());
        assert!(!EmptySource.has_changed());
    }

    #[test]
    fn fallback_declaration_uses_fallback_type() {
        let fb = FallbackProvider::<dyn Provider>::new("English", || Box::new(Named::default()));
        let decl = fb.declaration();
        assert_eq!(decl.name, "English");
        assert_eq!(decl.type_identifier, FALLBACK_TYPE);
        assert!(decl.parameters.is_empty());
        let mut instance = fb.create().expect("factory is infallible");
        instance.initialize("English", &decl.parameters).unwrap();
        assert_eq!(instance.name(), "English");
    }

    #[test]
    fn identity_hook_returns_same_instance() {
        let instance: Box<dyn Provider> = Box::new(Named::default());
        let ptr = &*instance as *const dyn Provider as *const ();
        let decl = Declaration::new("x", "y");
        let out = IdentityHook.after_initialize(instance, &decl).unwrap();
        assert_eq!(&*out as *const dyn Provider as *const (), ptr);
    }

    proptest! {
        #[test]
        fn parameter_lookup_ignores_ascii_case(key in "[a-zA-Z]{1,12}", value in ".*") {
            let mut params = Parameters::new();
            params.insert(key.clone(), value.clone());
            prop_assert_eq!(params.get(&key.to_ascii_uppercase()), Some(value.as_str()));
            prop_assert_eq!(params.get(&key.to_ascii_lowercase()), Some(value.as_str()));
        }

        #[test]
        fn name_key_is_case_insensitive(name in "[a-zA-Z0-9_-]{1,16}") {
            prop_assert_eq!(name_key(&name.to_uppercase()), name_key(&name.to_lowercase()));
        }
    }
}
