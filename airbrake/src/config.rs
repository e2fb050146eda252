use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::logger::{LogLevel, Logger, TracingLogger};
use crate::promise::Promise;

pub mod validator;

/// Host notices are delivered to unless the user overrides it.
pub const DEFAULT_HOST: &str = "https://api.airbrake.io";

const DEFAULT_WORKERS: usize = 1;
const DEFAULT_QUEUE_SIZE: usize = 100;
const DEFAULT_PERFORMANCE_STATS_FLUSH_PERIOD: u64 = 15;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    Load(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid host '{host}': {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },
    #[error("workers must be greater than zero")]
    ZeroWorkers,
    #[error("queue_size must be greater than zero")]
    ZeroQueueSize,
    #[error("performance_stats_flush_period must be greater than zero")]
    ZeroFlushPeriod,
    #[error("could not resolve root directory: {0}")]
    RootDirectory(std::io::Error),
}

/// User-supplied options, merged over defaults by [`Config::new`].
///
/// Unknown keys are rejected during deserialization so a typo in a config
/// file fails loudly instead of being silently dropped.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOptions {
    pub project_id: Option<u64>,
    pub project_key: Option<String>,
    pub host: Option<String>,
    pub workers: Option<usize>,
    pub queue_size: Option<usize>,
    pub root_directory: Option<PathBuf>,
    pub environment: Option<String>,
    pub ignore_environments: Option<Vec<String>>,
    pub timeout: Option<u64>,
    pub blacklist_keys: Option<Vec<String>>,
    pub whitelist_keys: Option<Vec<String>>,
    pub performance_stats: Option<bool>,
    pub performance_stats_flush_period: Option<u64>,
    pub app_version: Option<String>,
    pub versions: Option<HashMap<String, String>>,
}

/// All notifier settings, user-supplied and derived.
///
/// Construction merges [`ConfigOptions`] over defaults, parses the host and
/// eagerly derives the delivery endpoint. Credentials are not checked at
/// construction time; validity is a separate query ([`Config::validate`]) so
/// a misconfigured notifier can still be inspected.
#[derive(Clone)]
pub struct Config {
    project_id: Option<u64>,
    project_key: Option<String>,
    host: Url,
    endpoint: Url,
    workers: usize,
    queue_size: usize,
    root_directory: PathBuf,
    environment: Option<String>,
    ignore_environments: Vec<String>,
    timeout: Option<u64>,
    blacklist_keys: Vec<String>,
    whitelist_keys: Vec<String>,
    performance_stats: bool,
    performance_stats_flush_period: u64,
    app_version: Option<String>,
    versions: HashMap<String, String>,
    logger: Arc<dyn Logger>,
}

impl Config {
    pub fn new(options: ConfigOptions) -> Result<Self, ConfigError> {
        Self::with_logger(options, Arc::new(TracingLogger))
    }

    /// Builds a config with a caller-supplied log sink instead of the
    /// default `tracing`-backed one.
    pub fn with_logger(
        options: ConfigOptions,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, ConfigError> {
        let host_str = options.host.as_deref().unwrap_or(DEFAULT_HOST);
        let host = Url::parse(host_str).map_err(|source| ConfigError::InvalidHost {
            host: host_str.to_string(),
            source,
        })?;

        let workers = options.workers.unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }

        let queue_size = options.queue_size.unwrap_or(DEFAULT_QUEUE_SIZE);
        if queue_size == 0 {
            return Err(ConfigError::ZeroQueueSize);
        }

        let performance_stats_flush_period = options
            .performance_stats_flush_period
            .unwrap_or(DEFAULT_PERFORMANCE_STATS_FLUSH_PERIOD);
        if performance_stats_flush_period == 0 {
            return Err(ConfigError::ZeroFlushPeriod);
        }

        let root_directory = match options.root_directory {
            Some(dir) => dir,
            None => std::env::current_dir()
                .and_then(|dir| dir.canonicalize())
                .map_err(ConfigError::RootDirectory)?,
        };

        let project_id = options.project_id;
        let endpoint = build_endpoint(&host, project_id);

        let config = Config {
            project_id,
            project_key: options.project_key,
            host,
            endpoint,
            workers,
            queue_size,
            root_directory,
            environment: options.environment,
            ignore_environments: options.ignore_environments.unwrap_or_default(),
            timeout: options.timeout,
            blacklist_keys: options.blacklist_keys.unwrap_or_default(),
            whitelist_keys: options.whitelist_keys.unwrap_or_default(),
            performance_stats: options.performance_stats.unwrap_or(true),
            performance_stats_flush_period,
            app_version: options.app_version,
            versions: options.versions.unwrap_or_default(),
            logger,
        };

        if !config.ignore_environments.is_empty() && config.environment.is_none() {
            config.logger.write(
                LogLevel::Warn,
                "ignore_environments has no effect when environment is not set",
            );
        }

        Ok(config)
    }

    /// Loads options from a YAML file and builds a config from them.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let options: ConfigOptions = serde_yaml::from_reader(file)?;

        Self::new(options)
    }

    pub fn project_id(&self) -> Option<u64> {
        self.project_id
    }

    pub fn project_key(&self) -> Option<&str> {
        self.project_key.as_deref()
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Fully qualified URL notices are POSTed to, derived from the host and
    /// project id. Kept in sync by [`set_host`](Self::set_host) and
    /// [`set_project_id`](Self::set_project_id).
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    pub fn ignore_environments(&self) -> &[String] {
        &self.ignore_environments
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn blacklist_keys(&self) -> &[String] {
        &self.blacklist_keys
    }

    pub fn whitelist_keys(&self) -> &[String] {
        &self.whitelist_keys
    }

    pub fn performance_stats(&self) -> bool {
        self.performance_stats
    }

    pub fn performance_stats_flush_period(&self) -> u64 {
        self.performance_stats_flush_period
    }

    pub fn app_version(&self) -> Option<&str> {
        self.app_version.as_deref()
    }

    pub fn versions(&self) -> &HashMap<String, String> {
        &self.versions
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Replaces the host and re-derives the endpoint.
    pub fn set_host(&mut self, host: &str) -> Result<(), ConfigError> {
        self.host = Url::parse(host).map_err(|source| ConfigError::InvalidHost {
            host: host.to_string(),
            source,
        })?;
        self.endpoint = build_endpoint(&self.host, self.project_id);

        Ok(())
    }

    /// Replaces the project id and re-derives the endpoint.
    pub fn set_project_id(&mut self, project_id: Option<u64>) {
        self.project_id = project_id;
        self.endpoint = build_endpoint(&self.host, self.project_id);
    }

    pub fn set_project_key(&mut self, project_key: Option<String>) {
        self.project_key = project_key;
    }

    pub fn set_environment(&mut self, environment: Option<String>) {
        self.environment = environment;
    }

    pub fn set_ignore_environments(&mut self, ignore_environments: Vec<String>) {
        self.ignore_environments = ignore_environments;
    }

    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }

    /// Runs the structural checks alone: credentials present and well
    /// formed. Environment restrictions are not consulted.
    pub fn validate(&self) -> Promise {
        validator::check_credentials(self)
    }

    /// True iff [`validate`](Self::validate) resolves. Never panics,
    /// whatever the configuration holds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_resolved()
    }

    /// True when notices must not be sent from the current environment.
    ///
    /// Any rejection of the notify-ability check surfaces here, so a
    /// notifier with missing credentials also reads as ignored.
    pub fn is_ignored_environment(&self) -> bool {
        validator::check_notify_ability(self).is_rejected()
    }

    /// The composed verdict consulted before transmitting a report:
    /// resolved when the configuration is structurally valid and the
    /// current environment is not on the ignore list. Rejections are logged
    /// at debug level; callers are expected to skip transmission.
    pub fn check_configuration(&self) -> Promise {
        let promise = validator::check_notify_ability(self);
        if let Some(reason) = promise.reason() {
            self.logger
                .write(LogLevel::Debug, &format!("not sending notices: {reason}"));
        }

        promise
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("project_id", &self.project_id)
            .field("project_key", &self.project_key)
            .field("host", &self.host.as_str())
            .field("endpoint", &self.endpoint.as_str())
            .field("workers", &self.workers)
            .field("queue_size", &self.queue_size)
            .field("root_directory", &self.root_directory)
            .field("environment", &self.environment)
            .field("ignore_environments", &self.ignore_environments)
            .field("timeout", &self.timeout)
            .field("performance_stats", &self.performance_stats)
            .finish_non_exhaustive()
    }
}

/// Derives the notices endpoint from the host and project id.
///
/// The host may carry a path slug with or without a trailing slash; exactly
/// one trailing slash is stripped before the fixed suffix is appended, so
/// `https://localhost/bingo/` and `https://localhost/bingo` both map to
/// `https://localhost/bingo/api/v3/projects/<id>/notices`. An absent project
/// id renders as an empty segment, keeping the endpoint derivable before
/// credentials are configured.
fn build_endpoint(host: &Url, project_id: Option<u64>) -> Url {
    let id = project_id.map(|id| id.to_string()).unwrap_or_default();
    let path = host.path();
    let base = path.strip_suffix('/').unwrap_or(path);

    let mut endpoint = host.clone();
    endpoint.set_path(&format!("{base}/api/v3/projects/{id}/notices"));
    endpoint
}
