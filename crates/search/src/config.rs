//! Search queue configuration.

use vista_materialize::PrototypeOptions;

/// Configuration of a `SearchQueue`.
///
/// # Example
///
/// ```
/// use vista_search::SearchQueueConfig;
///
/// let config = SearchQueueConfig::new("clients")
///     .max_depth(2)
///     .follow_referents(true);
/// assert_eq!(config.name(), "clients");
/// assert_eq!(config.prototype_options().max_depth, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQueueConfig {
    name: String,
    prototype: PrototypeOptions,
}

impl Default for SearchQueueConfig {
    fn default() -> Self {
        Self {
            name: "vista-search".into(),
            prototype: PrototypeOptions::default(),
        }
    }
}

impl SearchQueueConfig {
    /// A default configuration for the queue `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Maximum number of steps of the prototype paths.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.prototype = self.prototype.max_depth(max_depth);
        self
    }

    /// Whether lines also include the rows referencing each row.
    pub fn follow_referents(mut self, follow: bool) -> Self {
        self.prototype = self.prototype.follow_referents(follow);
        self
    }

    /// The queue name, also used as the worker thread name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn prototype_options(&self) -> PrototypeOptions {
        self.prototype
    }
}
