//! Configuration for the friendgraph pipeline.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`FRIENDGRAPH__PIPELINE__` prefix)
//! 2. Config file (`friendgraph.toml`, `[pipeline]` section)
//! 3. Defaults

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FriendGraphError, Result};

/// Placeholder in [`PipelineConfig::friendships_query`] replaced by the batch's uids.
pub const IDS_PLACEHOLDER: &str = "{ids}";

/// Pipeline configuration, passed explicitly to the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Maximum identifiers per batched relationship query.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Shuffle identifiers before partitioning them into batches.
    #[serde(default)]
    pub randomize_chunks: bool,

    /// Seed for the shuffle. Unset means a fresh OS-seeded generator per run.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Maximum batch queries in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// FQL selecting the current user's friends.
    #[serde(default = "default_friends_query")]
    pub friends_query: String,

    /// FQL selecting friendships among one batch of friends.
    /// Must contain `{ids}`.
    #[serde(default = "default_friendships_query")]
    pub friendships_query: String,
}

fn default_chunk_size() -> usize {
    50
}

fn default_max_concurrent() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_friends_query() -> String {
    "SELECT uid, name FROM user WHERE uid IN (SELECT uid2 FROM friend WHERE uid1 = me())"
        .to_string()
}

fn default_friendships_query() -> String {
    "SELECT uid1, uid2 FROM friend WHERE uid1 IN ({ids}) \
     AND uid2 IN (SELECT uid2 FROM friend WHERE uid1 = me())"
        .to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            randomize_chunks: false,
            random_seed: None,
            max_concurrent_requests: default_max_concurrent(),
            request_timeout_secs: default_timeout_secs(),
            friends_query: default_friends_query(),
            friendships_query: default_friendships_query(),
        }
    }
}

impl PipelineConfig {
    /// Load from `<file_prefix>.toml` (optional) and the environment, then validate.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("FRIENDGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| FriendGraphError::Config(e.to_string()))?;

        let loaded = match cfg.get::<PipelineConfig>("pipeline") {
            Ok(c) => c,
            Err(config::ConfigError::NotFound(_)) => PipelineConfig::default(),
            Err(e) => return Err(FriendGraphError::Config(e.to_string())),
        };

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(FriendGraphError::InvalidArgument(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(FriendGraphError::InvalidArgument(
                "max_concurrent_requests must be positive".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(FriendGraphError::InvalidArgument(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if !self.friendships_query.contains(IDS_PLACEHOLDER) {
            return Err(FriendGraphError::Config(format!(
                "friendships_query must contain the {IDS_PLACEHOLDER} placeholder"
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.chunk_size, 50);
        assert!(!config.randomize_chunks);
        assert_eq!(config.random_seed, None);
        assert_eq!(config.max_concurrent_requests, 4);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = PipelineConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FriendGraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let config = PipelineConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FriendGraphError::InvalidArgument(ref m)) if m.contains("request_timeout_secs")
        ));
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let config = PipelineConfig {
            friendships_query: "SELECT uid1, uid2 FROM friend".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FriendGraphError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent");
        let config = PipelineConfig::load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(config.chunk_size, default_chunk_size());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("friendgraph.toml"),
            "[pipeline]\nchunk_size = 25\nrandomize_chunks = true\nrandom_seed = 7\n",
        )
        .unwrap();

        let prefix = dir.path().join("friendgraph");
        let config = PipelineConfig::load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(config.chunk_size, 25);
        assert!(config.randomize_chunks);
        assert_eq!(config.random_seed, Some(7));
        assert_eq!(config.max_concurrent_requests, 4);
    }

    #[test]
    fn test_load_rejects_zero_chunk_size() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("friendgraph.toml"),
            "[pipeline]\nchunk_size = 0\n",
        )
        .unwrap();

        let prefix = dir.path().join("friendgraph");
        assert!(PipelineConfig::load(prefix.to_str().unwrap()).is_err());
    }
}
