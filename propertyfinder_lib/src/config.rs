//! Crawl configuration: targets plus fetch and runtime settings.
//!
//! Values come from an optional YAML file; anything it leaves out falls
//! back to the `PROPERTYFINDER_*` environment variables and then to the
//! built-in defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use propertyfinder_api::RetryPolicy;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::target::SearchTarget;

/// Searches crawled when no targets are configured: three-bedroom-plus
/// residential listings on each country site.
pub const DEFAULT_TARGETS: [&str; 5] = [
    "https://www.propertyfinder.ae/en/search?l=50&c=1&t=1&bdr%5B%5D=3&btr%5B%5D=4&fu=0&ob=mr",
    "https://www.propertyfinder.qa/en/search?l=9&c=1&t=1&bdr[]=3&btr[]=3&fu=0&ob=mr",
    "https://www.propertyfinder.sa/en/search?l=4&c=1&t=1&bdr[]=2&bdr[]=3&btr[]=1&btr[]=2&fu=0&ob=mr",
    "https://www.propertyfinder.bh/en/search?l=34&c=1&t=1&bdr[]=2&btr[]=1&btr[]=2&fu=0&ob=mr",
    "https://www.propertyfinder.eg/en/search?l=2255&c=1&t=1&bdr[]=4&btr[]=4&fu=0&am[]=VW&ob=mr",
];

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CrawlConfig {
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Worker threads for the run's runtime; defaults to one per core.
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub backoff_unit_ms: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl CrawlConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == Some(0) {
            return Err(ConfigError::Invalid("worker_threads must be at least 1".into()));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parses the configured targets, or the defaults when none are set.
    ///
    /// Two targets on hosts with the same last label would write the same
    /// artifact, so that is rejected.
    pub fn search_targets(&self) -> Result<Vec<SearchTarget>, ConfigError> {
        let urls: Vec<&str> = if self.targets.is_empty() {
            DEFAULT_TARGETS.to_vec()
        } else {
            self.targets.iter().map(String::as_str).collect()
        };

        let targets = urls
            .into_iter()
            .map(SearchTarget::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_token: HashMap<&str, &SearchTarget> = HashMap::new();
        for target in &targets {
            if let Some(previous) = by_token.insert(target.token(), target) {
                return Err(ConfigError::Invalid(format!(
                    "targets {} and {} would both write {}",
                    previous,
                    target,
                    target.artifact_name("*")
                )));
            }
        }
        Ok(targets)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let env = RetryPolicy::from_env();
        RetryPolicy::new(
            self.max_attempts.unwrap_or(env.max_attempts()),
            self.backoff_unit_ms
                .map(Duration::from_millis)
                .unwrap_or(env.backoff_unit()),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(propertyfinder_api::request_timeout_from_env)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
