// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazy, name-keyed provider registry.
//!
//! The `ProviderRegistry` adopts declarations from its [`DeclarationSource`]
//! as a *generation*: an ordered list of entries, each owning a [`BuildCell`]
//! that constructs its provider on first request. A generation is replaced
//! wholesale when the source reports a change; cells are never shared across
//! generations.
//!
//! Two locks are involved. The generation lock serializes (re)loading the
//! declaration list. Each cell synchronizes its own construction, so building
//! one provider never blocks a request for another.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use provisio_core::{
    BoxError, Declaration, DeclarationSource, FallbackDeclarations, FallbackProvider,
    InstanceResolver, PostInitHook, Provider, RegistryError, name_key,
};
use tracing::{debug, info, warn};

use crate::builder::RegistryBuilder;
use crate::cell::{BuildCell, FailurePolicy};

/// Where a cell gets its raw instance from.
enum Origin<P: ?Sized> {
    /// Resolved from the declaration's type identifier.
    Declared,
    /// Produced by a fallback factory.
    Fallback(FallbackProvider<P>),
}

struct Entry<P: ?Sized> {
    declaration: Arc<Declaration>,
    origin: Origin<P>,
    cell: BuildCell<Arc<P>, RegistryError>,
}

impl<P: ?Sized> Entry<P> {
    fn new(declaration: Declaration, origin: Origin<P>) -> Self {
        Self {
            declaration: Arc::new(declaration),
            origin,
            cell: BuildCell::new(),
        }
    }
}

/// One complete load of the declaration list.
struct Generation<P: ?Sized> {
    number: u64,
    entries: Vec<Entry<P>>,
    /// Normalized name -> index of the first entry with that name.
    index: HashMap<String, usize>,
    default_name: Option<String>,
}

impl<P: ?Sized> Generation<P> {
    fn new(number: u64, entries: Vec<Entry<P>>, default_name: Option<String>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(name_key(&entry.declaration.name)).or_insert(i);
        }
        Self {
            number,
            entries,
            index,
            // A blank explicit default means "no explicit default".
            default_name: default_name.filter(|name| !name.trim().is_empty()),
        }
    }

    fn find(&self, name: &str) -> Option<&Entry<P>> {
        self.index.get(&name_key(name)).map(|&i| &self.entries[i])
    }

    /// Explicit default if one was declared, otherwise the first entry.
    /// A declared default is reported in its declared spelling.
    fn default_name(&self) -> &str {
        match &self.default_name {
            Some(name) => self
                .find(name)
                .map_or(name.as_str(), |entry| entry.declaration.name.as_str()),
            None => &self.entries[0].declaration.name,
        }
    }
}

/// Registry that lazily constructs, initializes, and caches named providers.
///
/// Designed to be shared (`Arc<ProviderRegistry<P>>`) across threads for the
/// lifetime of the process. `P` is usually a trait object such as
/// `dyn Greeter` where `Greeter: Provider`.
pub struct ProviderRegistry<P: ?Sized + Provider> {
    section: String,
    source: Box<dyn DeclarationSource>,
    resolver: Box<dyn InstanceResolver<P>>,
    post_init: Box<dyn PostInitHook<P>>,
    fallback: Box<dyn FallbackDeclarations<P>>,
    failure_policy: FailurePolicy,
    current: Mutex<Option<Arc<Generation<P>>>>,
}

impl<P: ?Sized + Provider> ProviderRegistry<P> {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder<P> {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(
        section: String,
        source: Box<dyn DeclarationSource>,
        resolver: Box<dyn InstanceResolver<P>>,
        post_init: Box<dyn PostInitHook<P>>,
        fallback: Box<dyn FallbackDeclarations<P>>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            section,
            source,
            resolver,
            post_init,
            fallback,
            failure_policy,
            current: Mutex::new(None),
        }
    }

    /// Name of the configuration section this registry reads, used in errors.
    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Get the provider declared under `name` (case-insensitive), building it
    /// on first request.
    ///
    /// # Errors
    /// - `InvalidArgument` if `name` is blank
    /// - `ProviderNotFound` if no declaration matches
    /// - `ProviderCreation` if building it failed (now or earlier in this generation)
    /// - `MissingConfiguration` / `Source` if the declarations cannot be loaded
    pub fn get(&self, name: &str) -> Result<Arc<P>, RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidArgument(
                "provider name must not be blank".to_string(),
            ));
        }
        let generation = self.ensure_declarations()?;
        self.get_in(&generation, name)
    }

    /// Get the default provider: the explicitly configured default if the
    /// source named one, otherwise the first declared provider.
    pub fn get_default(&self) -> Result<Arc<P>, RegistryError> {
        let generation = self.ensure_declarations()?;
        self.get_in(&generation, generation.default_name())
    }

    /// Build every declared provider and return them in declaration order.
    ///
    /// All-or-nothing: the first construction failure is returned.
    pub fn get_all(&self) -> Result<Vec<Arc<P>>, RegistryError> {
        let generation = self.ensure_declarations()?;
        generation
            .entries
            .iter()
            .map(|entry| self.build(entry))
            .collect()
    }

    /// Declared provider names in declaration order. Builds nothing.
    pub fn get_names(&self) -> Result<Vec<String>, RegistryError> {
        let generation = self.ensure_declarations()?;
        Ok(generation
            .entries
            .iter()
            .map(|entry| entry.declaration.name.clone())
            .collect())
    }

    /// Name of the provider `get_default` resolves to. Builds nothing.
    pub fn default_name(&self) -> Result<String, RegistryError> {
        let generation = self.ensure_declarations()?;
        Ok(generation.default_name().to_string())
    }

    /// Declarations of the current generation in declaration order.
    pub fn declarations(&self) -> Result<Vec<Arc<Declaration>>, RegistryError> {
        let generation = self.ensure_declarations()?;
        Ok(generation
            .entries
            .iter()
            .map(|entry| Arc::clone(&entry.declaration))
            .collect())
    }

    /// Returns true if `name` is declared in the current generation.
    pub fn contains(&self, name: &str) -> Result<bool, RegistryError> {
        let generation = self.ensure_declarations()?;
        Ok(generation.find(name).is_some())
    }

    /// Returns true if `name` has been built successfully in the loaded
    /// generation. Never loads or builds.
    pub fn is_built(&self, name: &str) -> bool {
        self.current
            .lock()
            .as_ref()
            .and_then(|generation| generation.find(name).map(|entry| entry.cell.is_built()))
            .unwrap_or(false)
    }

    /// Number of the loaded generation; 0 before the first successful load.
    pub fn generation(&self) -> u64 {
        self.current
            .lock()
            .as_ref()
            .map_or(0, |generation| generation.number)
    }

    /// Load the declaration list if it is absent or the source changed.
    ///
    /// Callers are serialized on the generation lock; a caller that waited
    /// while another reloaded sees the fresh generation and does not reload
    /// again. The lock is released before any provider is built.
    fn ensure_declarations(&self) -> Result<Arc<Generation<P>>, RegistryError> {
        let mut current = self.current.lock();
        let previous = match current.as_ref() {
            Some(generation) if !self.source.has_changed() => return Ok(Arc::clone(generation)),
            Some(generation) => {
                debug!(
                    section = %self.section,
                    generation = generation.number,
                    "declaration source changed, reloading"
                );
                generation.number
            }
            None => 0,
        };

        let generation = Arc::new(self.load_generation(previous + 1)?);
        *current = Some(Arc::clone(&generation));
        Ok(generation)
    }

    fn load_generation(&self, number: u64) -> Result<Generation<P>, RegistryError> {
        let set = self
            .source
            .load()
            .map_err(|e| RegistryError::load_failure(&self.section, e))?;

        let from_fallback = set.is_empty();
        let generation = if from_fallback {
            let fallback = self.fallback.fallback();
            if fallback.is_empty() {
                return Err(RegistryError::MissingConfiguration {
                    section: self.section.clone(),
                });
            }
            let entries = fallback
                .into_iter()
                .map(|provider| Entry::new(provider.declaration(), Origin::Fallback(provider)))
                .collect();
            Generation::new(number, entries, None)
        } else {
            let entries = set
                .declarations
                .into_iter()
                .map(|declaration| Entry::new(declaration, Origin::Declared))
                .collect();
            Generation::new(number, entries, set.default_name)
        };

        info!(
            section = %self.section,
            generation = number,
            providers = generation.entries.len(),
            fallback = from_fallback,
            "adopted provider declarations"
        );
        Ok(generation)
    }

    fn get_in(&self, generation: &Generation<P>, name: &str) -> Result<Arc<P>, RegistryError> {
        let entry = generation
            .find(name)
            .ok_or_else(|| RegistryError::ProviderNotFound {
                name: name.to_string(),
                section: self.section.clone(),
            })?;
        self.build(entry)
    }

    fn build(&self, entry: &Entry<P>) -> Result<Arc<P>, RegistryError> {
        entry
            .cell
            .get_or_try_init(self.failure_policy, || self.construct(entry))
    }

    /// Resolve, initialize, and post-process one provider.
    fn construct(&self, entry: &Entry<P>) -> Result<Arc<P>, RegistryError> {
        let declaration = &entry.declaration;
        debug!(
            provider = %declaration.name,
            type_identifier = %declaration.type_identifier,
            "building provider"
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.instantiate(entry)))
            .unwrap_or_else(|payload| Err(panic_cause(payload.as_ref())));

        match outcome {
            Ok(instance) => {
                debug!(provider = %declaration.name, "provider ready");
                Ok(Arc::from(instance))
            }
            Err(cause) => {
                warn!(
                    provider = %declaration.name,
                    type_identifier = %declaration.type_identifier,
                    error = %cause,
                    "provider construction failed"
                );
                Err(RegistryError::creation(
                    &declaration.name,
                    &declaration.type_identifier,
                    cause,
                ))
            }
        }
    }

    fn instantiate(&self, entry: &Entry<P>) -> Result<Box<P>, BoxError> {
        let declaration = &entry.declaration;
        let mut instance = match &entry.origin {
            Origin::Declared => self
                .resolver
                .resolve(&declaration.type_identifier, &declaration.name)?,
            Origin::Fallback(provider) => provider.create()?,
        };
        instance.initialize(&declaration.name, &declaration.parameters)?;
        self.post_init.after_initialize(instance, declaration)
    }
}

/// Turn a panic raised by a collaborator into a construction failure.
fn panic_cause(payload: &(dyn Any + Send)) -> BoxError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("provider construction panicked: {message}").into()
}

impl<P: ?Sized + Provider> fmt::Debug for ProviderRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("section", &self.section)
            .field("failure_policy", &self.failure_policy)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provisio_core::{DeclarationSet, EmptySource, Parameters};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    use crate::resolver::TypeRegistry;
    use crate::source::StaticSource;

    #[derive(Default)]
    struct Echo {
        name: String,
        parameters: Parameters,
    }

    impl Provider for Echo {
        fn initialize(&mut self, name: &str, parameters: &Parameters) -> Result<(), BoxError> {
            self.name = name.to_string();
            self.parameters = parameters.clone();
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn echo_types() -> TypeRegistry<dyn Provider> {
        TypeRegistry::<dyn Provider>::new().with("echo", || Box::new(Echo::default()))
    }

    fn registry(set: DeclarationSet) -> ProviderRegistry<dyn Provider> {
        ProviderRegistry::builder()
            .section("echoes")
            .source(StaticSource::new(set))
            .resolver(echo_types())
            .build()
    }

    #[test]
    fn nothing_loads_until_first_call() {
        let reg = registry(DeclarationSet::new(vec![Declaration::new("a", "echo")]));
        assert_eq!(reg.generation(), 0);
        assert!(!reg.is_built("a"));
        reg.get_names().unwrap();
        assert_eq!(reg.generation(), 1);
        assert!(!reg.is_built("a"));
    }

    #[test]
    fn duplicate_names_resolve_to_first_declaration() {
        let reg = registry(DeclarationSet::new(vec![
            Declaration::new("Echo", "echo").with_parameter("n", "1"),
            Declaration::new("ECHO", "echo").with_parameter("n", "2"),
        ]));
        assert_eq!(reg.get_names().unwrap(), vec!["Echo", "ECHO"]);
        let first = reg.get("echo").unwrap();
        let all = reg.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(Arc::ptr_eq(&first, &all[0]));
        assert!(!Arc::ptr_eq(&first, &all[1]));
    }

    #[test]
    fn blank_name_is_invalid_argument() {
        let reg = registry(DeclarationSet::new(vec![Declaration::new("a", "echo")]));
        assert!(matches!(reg.get(""), Err(RegistryError::InvalidArgument(_))));
        assert!(matches!(reg.get("   "), Err(RegistryError::InvalidArgument(_))));
        // Argument validation happens before anything is loaded.
        assert_eq!(reg.generation(), 0);
    }

    #[test]
    fn explicit_default_that_is_not_declared_is_not_found() {
        let reg = registry(
            DeclarationSet::new(vec![Declaration::new("a", "echo")]).with_default("missing"),
        );
        assert_eq!(reg.default_name().unwrap(), "missing");
        match reg.get_default() {
            Err(RegistryError::ProviderNotFound { name, section }) => {
                assert_eq!(name, "missing");
                assert_eq!(section, "echoes");
            }
            other => panic!("expected ProviderNotFound, got {:?}", other.map(|p| p.name().to_string())),
        }
    }

    #[test]
    fn failing_source_is_not_memoized() {
        struct Flaky(AtomicUsize);
        impl DeclarationSource for Flaky {
            fn load(&self) -> Result<DeclarationSet, BoxError> {
                if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("disk on fire".into())
                } else {
                    Ok(DeclarationSet::new(vec![Declaration::new("a", "echo")]))
                }
            }
        }

        let reg: ProviderRegistry<dyn Provider> = ProviderRegistry::builder()
            .source(Flaky(AtomicUsize::new(0)))
            .resolver(echo_types())
            .build();
        assert!(matches!(reg.get("a"), Err(RegistryError::Source { .. })));
        assert_eq!(reg.get("a").unwrap().name(), "a");
        assert_eq!(reg.generation(), 1);
    }

    #[test]
    fn empty_source_without_fallback_is_missing_configuration() {
        let reg: ProviderRegistry<dyn Provider> = ProviderRegistry::builder()
            .section("echoes")
            .source(EmptySource)
            .build();
        for result in [reg.get_names().map(|_| ()), reg.get_default().map(|_| ())] {
            match result {
                Err(RegistryError::MissingConfiguration { section }) => assert_eq!(section, "echoes"),
                other => panic!("expected MissingConfiguration, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_explicit_default_falls_back_to_first_declared() {
        struct Raw;
        impl DeclarationSource for Raw {
            fn load(&self) -> Result<DeclarationSet, BoxError> {
                Ok(DeclarationSet {
                    declarations: vec![Declaration::new("a", "echo"), Declaration::new("b", "echo")],
                    default_name: Some("   ".to_string()),
                })
            }
        }

        let reg: ProviderRegistry<dyn Provider> = ProviderRegistry::builder()
            .source(Raw)
            .resolver(echo_types())
            .build();
        assert_eq!(reg.default_name().unwrap(), "a");
        assert_eq!(reg.get_default().unwrap().name(), "a");
    }

    /// Provider whose `initialize` always fails, counting its calls.
    struct Refusing {
        initialized: Arc<AtomicUsize>,
    }

    impl Provider for Refusing {
        fn initialize(&mut self, _name: &str, _parameters: &Parameters) -> Result<(), BoxError> {
            self.initialized.fetch_add(1, Ordering::SeqCst);
            Err("missing api key".into())
        }

        fn name(&self) -> &str {
            "refusing"
        }
    }

    #[test]
    fn initialize_failure_is_memoized() {
        let initialized = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&initialized);
        let reg = ProviderRegistry::<dyn Provider>::builder()
            .source(StaticSource::from_declarations([Declaration::new("a", "refusing")]))
            .resolver_fn(move |_, _| {
                Ok(Box::new(Refusing {
                    initialized: Arc::clone(&counter),
                }))
            })
            .build();

        for _ in 0..3 {
            match reg.get("a") {
                Err(RegistryError::ProviderCreation {
                    name,
                    type_identifier,
                    source,
                }) => {
                    assert_eq!(name, "a");
                    assert_eq!(type_identifier, "refusing");
                    assert_eq!(source.to_string(), "missing api key");
                }
                other => panic!("expected ProviderCreation, got {:?}", other.map(|p| p.name().to_string())),
            }
        }
        assert_eq!(initialized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_resolver_is_memoized_as_creation_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let reg: ProviderRegistry<dyn Provider> = ProviderRegistry::builder()
            .source(StaticSource::from_declarations([Declaration::new("a", "echo")]))
            .resolver_fn(move |_, _| -> Result<Box<dyn Provider>, BoxError> {
                counter.fetch_add(1, Ordering::SeqCst);
                panic!("constructor exploded")
            })
            .build();

        for _ in 0..3 {
            match reg.get("a") {
                Err(RegistryError::ProviderCreation { source, .. }) => {
                    assert!(source.to_string().contains("constructor exploded"));
                }
                other => panic!("expected ProviderCreation, got {:?}", other.map(|p| p.name().to_string())),
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_resolver_is_retried_under_retry_policy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let reg: ProviderRegistry<dyn Provider> = ProviderRegistry::builder()
            .source(StaticSource::from_declarations([Declaration::new("a", "echo")]))
            .resolver_fn(move |_, _| -> Result<Box<dyn Provider>, BoxError> {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("first attempt exploded");
                }
                Ok(Box::new(Echo::default()))
            })
            .failure_policy(FailurePolicy::Retry)
            .build();

        assert!(matches!(reg.get("a"), Err(RegistryError::ProviderCreation { .. })));
        assert_eq!(reg.get("a").unwrap().name(), "a");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn fallback_declaration_carries_parameters() {
        let reg: ProviderRegistry<dyn Provider> = ProviderRegistry::builder()
            .fallback(|| {
                vec![
                    FallbackProvider::<dyn Provider>::new("first", || Box::new(Echo::default()))
                        .with_parameters([("k", "v")].into_iter().collect()),
                ]
            })
            .build();
        let declarations = reg.declarations().unwrap();
        assert_eq!(declarations[0].type_identifier, provisio_core::FALLBACK_TYPE);
        assert_eq!(declarations[0].parameters.get("k"), Some("v"));
        assert_eq!(reg.get_default().unwrap().name(), "first");
    }

    #[test]
    #[traced_test]
    fn logs_generation_adoption_and_build_failures() {
        let reg = registry(DeclarationSet::new(vec![
            Declaration::new("a", "echo"),
            Declaration::new("b", "missing"),
        ]));
        reg.get("a").unwrap();
        assert!(reg.get("b").is_err());
        assert!(logs_contain("adopted provider declarations"));
        assert!(logs_contain("provider construction failed"));
    }
}
