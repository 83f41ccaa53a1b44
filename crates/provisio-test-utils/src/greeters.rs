// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Greeting providers used as sample plugins.

use provisio_core::{BoxError, Declaration, FallbackProvider, Parameters, Provider};
use provisio_registry::TypeRegistry;

/// Parameter key holding the name to greet.
pub const GREET_NAME: &str = "greetname";

/// A provider that greets someone in a given language.
pub trait Greeter: Provider {
    /// Language tag of the greeting (e.g. "en", "es-AR").
    fn language(&self) -> &'static str;

    fn greet_name(&self) -> &str;

    fn greet(&self) -> String;
}

/// Name and greet-name shared by every greeter.
#[derive(Debug, Default, Clone)]
struct GreeterState {
    name: String,
    greet_name: String,
}

impl GreeterState {
    fn with_greet_name(greet_name: &str) -> Self {
        Self {
            name: String::new(),
            greet_name: greet_name.to_string(),
        }
    }

    fn initialize(&mut self, name: &str, parameters: &Parameters) {
        self.name = name.to_string();
        if let Some(greet_name) = parameters.get(GREET_NAME).filter(|v| !v.trim().is_empty()) {
            self.greet_name = greet_name.to_string();
        }
    }
}

macro_rules! greeter {
    ($ty:ident, $language:literal, $salutation:literal) => {
        #[derive(Debug, Default, Clone)]
        pub struct $ty {
            state: GreeterState,
        }

        impl $ty {
            /// Create a greeter with a preset greet-name, overridable by parameters.
            pub fn with_greet_name(greet_name: &str) -> Self {
                Self {
                    state: GreeterState::with_greet_name(greet_name),
                }
            }
        }

        impl Provider for $ty {
            fn initialize(&mut self, name: &str, parameters: &Parameters) -> Result<(), BoxError> {
                self.state.initialize(name, parameters);
                Ok(())
            }

            fn name(&self) -> &str {
                &self.state.name
            }
        }

        impl Greeter for $ty {
            fn language(&self) -> &'static str {
                $language
            }

            fn greet_name(&self) -> &str {
                &self.state.greet_name
            }

            fn greet(&self) -> String {
                if self.state.greet_name.is_empty() {
                    $salutation.to_string()
                } else {
                    format!(concat!($salutation, " {}"), self.state.greet_name)
                }
            }
        }
    };
}

greeter!(EnglishGreeter, "en", "Hello");
greeter!(SpanishGreeter, "es", "Hola");
greeter!(FrenchGreeter, "fr", "Bonjour");

/// Specialized Spanish greeter, substituted for [`SpanishGreeter`] by
/// [`argentine_substitution`].
#[derive(Debug, Default, Clone)]
pub struct ArgentineGreeter {
    spanish: SpanishGreeter,
}

impl ArgentineGreeter {
    pub fn from_spanish(spanish: SpanishGreeter) -> Self {
        Self { spanish }
    }
}

impl Provider for ArgentineGreeter {
    fn initialize(&mut self, name: &str, parameters: &Parameters) -> Result<(), BoxError> {
        self.spanish.initialize(name, parameters)
    }

    fn name(&self) -> &str {
        self.spanish.name()
    }
}

impl Greeter for ArgentineGreeter {
    fn language(&self) -> &'static str {
        "es-AR"
    }

    fn greet_name(&self) -> &str {
        self.spanish.greet_name()
    }

    fn greet(&self) -> String {
        format!("Che, {}", self.spanish.greet())
    }
}

/// Type table for the sample greeters.
pub fn greeter_types() -> TypeRegistry<dyn Greeter> {
    TypeRegistry::<dyn Greeter>::new()
        .with("greeting.english", || Box::new(EnglishGreeter::default()))
        .with("greeting.spanish", || Box::new(SpanishGreeter::default()))
        .with("greeting.french", || Box::new(FrenchGreeter::default()))
        .with("greeting.argentine", || Box::new(ArgentineGreeter::default()))
}

/// English, Spanish, and French declarations, in that order.
pub fn greeter_declarations() -> Vec<Declaration> {
    vec![
        Declaration::new("English", "greeting.english").with_parameter(GREET_NAME, "John Doe"),
        Declaration::new("Spanish", "greeting.spanish").with_parameter(GREET_NAME, "Juan Perez"),
        Declaration::new("French", "greeting.french")
            .with_parameter(GREET_NAME, "Monsieur Dupont"),
    ]
}

/// Fallback supplier declaring only an English greeter for "John Doe".
pub fn english_fallback() -> Vec<FallbackProvider<dyn Greeter>> {
    vec![FallbackProvider::<dyn Greeter>::new("English", || {
        Box::new(EnglishGreeter::with_greet_name("John Doe"))
    })]
}

/// Post-init hook replacing every Spanish greeter with an Argentine one.
///
/// The replacement is initialized with the declared name and parameters so it
/// observes the same state as the instance it replaces.
pub fn argentine_substitution(
    instance: Box<dyn Greeter>,
    declaration: &Declaration,
) -> Result<Box<dyn Greeter>, BoxError> {
    if instance.language() != "es" {
        return Ok(instance);
    }
    let mut replacement =
        ArgentineGreeter::from_spanish(SpanishGreeter::with_greet_name(instance.greet_name()));
    replacement.initialize(&declaration.name, &declaration.parameters)?;
    Ok(Box::new(replacement))
}
