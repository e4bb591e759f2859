use crate::tools::{Snippet, ToolKind, ToolProvider};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default upper bound on a single provider call.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ToolRegistry {
    providers: HashMap<ToolKind, Arc<dyn ToolProvider>>,
    timeout: Duration,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn register(&mut self, kind: ToolKind, provider: Arc<dyn ToolProvider>) {
        self.providers.insert(kind, provider);
    }

    pub fn get(&self, kind: ToolKind) -> Option<&Arc<dyn ToolProvider>> {
        self.providers.get(&kind)
    }

    /// Check if a provider is registered for `kind`
    pub fn has_tool(&self, kind: ToolKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Kinds with a registered provider
    pub fn kinds(&self) -> Vec<ToolKind> {
        self.providers.keys().copied().collect()
    }

    /// Run a search, degrading every failure to an empty result set.
    ///
    /// Missing providers, provider errors and timeouts are logged and yield
    /// `[]` so the calling agent can continue without that context.
    pub async fn search_or_empty(&self, kind: ToolKind, query: &str, limit: usize) -> Vec<Snippet> {
        let Some(provider) = self.providers.get(&kind) else {
            tracing::debug!(tool = %kind, "No provider registered, skipping");
            return Vec::new();
        };

        match tokio::time::timeout(self.timeout, provider.search(query, limit)).await {
            Ok(Ok(mut results)) => {
                results.truncate(limit);
                tracing::debug!(
                    tool = %kind,
                    provider = provider.name(),
                    count = results.len(),
                    "Tool search completed"
                );
                results
            }
            Ok(Err(e)) => {
                tracing::warn!(tool = %kind, provider = provider.name(), error = %e, "Tool search failed, continuing without results");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    tool = %kind,
                    provider = provider.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Tool search timed out, continuing without results"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppError, Result};
    use async_trait::async_trait;

    struct Fixed(Vec<Snippet>);

    #[async_trait]
    impl ToolProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Snippet>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl ToolProvider for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Snippet>> {
            Err(AppError::Tool("quota exceeded".into()))
        }
    }

    struct Slow;

    #[async_trait]
    impl ToolProvider for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Snippet>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![Snippet::new("late", "late")])
        }
    }

    #[tokio::test]
    async fn test_results_are_truncated_to_limit() {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolKind::News,
            Arc::new(Fixed(vec![
                Snippet::new("a", "1"),
                Snippet::new("b", "2"),
                Snippet::new("c", "3"),
            ])),
        );
        let results = registry.search_or_empty(ToolKind::News, "q", 2).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "a");
    }

    #[tokio::test]
    async fn test_missing_provider_is_empty() {
        let registry = ToolRegistry::new();
        assert!(!registry.has_tool(ToolKind::Jobs));
        assert!(registry.search_or_empty(ToolKind::Jobs, "q", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_failing_provider_is_empty() {
        let mut registry = ToolRegistry::new();
        registry.register(ToolKind::Recipes, Arc::new(Broken));
        assert!(registry
            .search_or_empty(ToolKind::Recipes, "q", 5)
            .await
            .is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let mut registry = ToolRegistry::new().with_timeout(Duration::from_secs(1));
        registry.register(ToolKind::Web, Arc::new(Slow));
        assert!(registry.search_or_empty(ToolKind::Web, "q", 5).await.is_empty());
    }
}
