//! Interpolation filters.
//!
//! A filter is a pure text transform applied with pipe syntax:
//! `{{ user | capitalize }}`. Filters in a pipeline run left to right.
//!
//! # Adding a Filter
//!
//! ```ignore
//! let mut registry = FilterRegistry::with_defaults();
//! registry.register_fn("shout", |text| format!("{}!", text.to_uppercase()));
//! ```

use std::sync::LazyLock;

use crate::util::{capitalize, title_case};

/// A named text transform.
pub trait Filter: Send + Sync {
    /// The name used after `|` in an interpolation.
    fn name(&self) -> &str;

    /// Transform the rendered value.
    fn apply(&self, input: &str) -> String;
}

/// A filter backed by a closure.
pub struct FnFilter<F> {
    name: String,
    func: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Filter for FnFilter<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, input: &str) -> String {
        (self.func)(input)
    }
}

/// Uppercase the first character, leave the rest unchanged.
pub struct Capitalize;

impl Filter for Capitalize {
    fn name(&self) -> &str {
        "capitalize"
    }

    fn apply(&self, input: &str) -> String {
        capitalize(input)
    }
}

/// Number of characters in the rendered value.
pub struct Length;

impl Filter for Length {
    fn name(&self) -> &str {
        "length"
    }

    fn apply(&self, input: &str) -> String {
        input.chars().count().to_string()
    }
}

/// Registry of filters available to interpolations.
pub struct FilterRegistry {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Create a registry with the built-in filters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Capitalize);
        registry.register(Length);
        registry.register_fn("upper", |s| s.to_uppercase());
        registry.register_fn("lower", |s| s.to_lowercase());
        registry.register_fn("trim", |s| s.trim().to_string());
        registry.register_fn("title", title_case);
        registry
    }

    /// The process-wide registry of built-in filters.
    ///
    /// Built on first use and never modified afterwards.
    pub fn global() -> &'static FilterRegistry {
        static DEFAULTS: LazyLock<FilterRegistry> = LazyLock::new(FilterRegistry::with_defaults);
        &DEFAULTS
    }

    /// Register a filter.
    ///
    /// Later registrations take precedence over earlier ones with the same name.
    pub fn register<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Register a closure as a filter.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.register(FnFilter::new(name, func))
    }

    /// Find a filter by name.
    pub fn get(&self, name: &str) -> Option<&dyn Filter> {
        self.filters
            .iter()
            .rev()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
    }

    /// Run `input` through the named filters, left to right.
    ///
    /// On failure returns the first name that is not registered.
    pub fn apply_all<'n>(&self, input: String, names: &'n [String]) -> Result<String, &'n str> {
        names.iter().try_fold(input, |text, name| {
            self.get(name)
                .map(|filter| filter.apply(&text))
                .ok_or(name.as_str())
        })
    }

    /// Names of all registered filters, sorted and deduplicated.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.filters.iter().map(|f| f.name().to_string()).collect();
        names.sort();
        names.dedup();
        names
    }
}

/// An empty registry, same as [`FilterRegistry::new`].
impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
