//! Level resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use academy_core::error::GameError;
use async_trait::async_trait;
use tracing::debug;

use crate::contract::LevelModule;

/// Builds a fresh instance of one level.
pub type LevelFactory = Arc<dyn Fn() -> Result<Box<dyn LevelModule>, GameError> + Send + Sync>;

/// Resolves a level index to a new module instance.
#[async_trait]
pub trait LevelLoader: Send + Sync {
    /// Build the module for `level`.
    ///
    /// Fails with `GameError::ModuleNotFound` when nothing is registered for
    /// `level`, or `GameError::ModuleLoad` when construction fails.
    async fn resolve(&self, level: u32) -> Result<Box<dyn LevelModule>, GameError>;

    /// The highest defined level index.
    fn level_count(&self) -> u32;
}

/// Explicit mapping from level index to factory.
#[derive(Clone, Default)]
pub struct LevelRegistry {
    factories: BTreeMap<u32, LevelFactory>,
}

impl LevelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the factory for `level`.
    pub fn register<F>(&mut self, level: u32, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Box<dyn LevelModule>, GameError> + Send + Sync + 'static,
    {
        self.factories.insert(level, Arc::new(factory));
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_level<F>(mut self, level: u32, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn LevelModule>, GameError> + Send + Sync + 'static,
    {
        self.register(level, factory);
        self
    }

    /// Registered level indices in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.factories.keys().copied()
    }
}

impl fmt::Debug for LevelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelRegistry")
            .field("levels", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl LevelLoader for LevelRegistry {
    async fn resolve(&self, level: u32) -> Result<Box<dyn LevelModule>, GameError> {
        let factory = self
            .factories
            .get(&level)
            .ok_or(GameError::ModuleNotFound(level))?;
        debug!(level, "constructing level module");
        factory().map_err(|err| match err {
            GameError::ModuleLoad { .. } | GameError::ModuleNotFound(_) => err,
            other => GameError::ModuleLoad {
                level,
                reason: other.to_string(),
            },
        })
    }

    fn level_count(&self) -> u32 {
        self.factories.keys().next_back().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{LevelContainer, LevelContext, OutcomeReporter};

    struct Blank;

    impl LevelModule for Blank {
        fn init(
            &mut self,
            _container: &mut LevelContainer,
            _ctx: &mut LevelContext<'_>,
            _reporter: OutcomeReporter,
        ) {
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_level_returns_module_not_found() {
        let registry = LevelRegistry::new().with_level(1, || Ok(Box::new(Blank)));

        let result = registry.resolve(7).await;

        match result {
            Err(GameError::ModuleNotFound(level)) => assert_eq!(level, 7),
            Err(other) => panic!("expected ModuleNotFound, got {other:?}"),
            Ok(_) => panic!("expected ModuleNotFound, got a module"),
        }
    }

    #[tokio::test]
    async fn test_resolve_wraps_factory_errors_as_module_load() {
        let registry = LevelRegistry::new()
            .with_level(2, || Err(GameError::Validation("no questions".into())));

        let result = registry.resolve(2).await;

        match result {
            Err(GameError::ModuleLoad { level, reason }) => {
                assert_eq!(level, 2);
                assert!(reason.contains("no questions"));
            }
            Err(other) => panic!("expected ModuleLoad, got {other:?}"),
            Ok(_) => panic!("expected ModuleLoad, got a module"),
        }
    }

    #[tokio::test]
    async fn test_resolve_builds_fresh_instance_each_call() {
        // Arrange
        let built = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = Arc::clone(&built);
        let registry = LevelRegistry::new().with_level(1, move || {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Box::new(Blank))
        });

        // Act
        registry.resolve(1).await.unwrap();
        registry.resolve(1).await.unwrap();

        // Assert
        assert_eq!(built.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_level_count_is_highest_registered_index() {
        let registry = LevelRegistry::new()
            .with_level(1, || Ok(Box::new(Blank)))
            .with_level(3, || Ok(Box::new(Blank)));

        assert_eq!(registry.level_count(), 3);
        assert_eq!(registry.levels().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(LevelRegistry::new().level_count(), 0);
    }
}
