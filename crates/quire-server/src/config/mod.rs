//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    net::{IpAddr, SocketAddr},
    num::{NonZeroU32, NonZeroUsize},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

mod cli;

pub use cli::CliArgs;

const LOCAL_CONFIG_BASENAME: &str = "quire";
const ENV_PREFIX: &str = "QUIRE";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_REQUEST_BYTES: u64 = 32 * 1024 * 1024;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_RETENTION_SECS: u64 = 5 * 60;
const DEFAULT_MAX_UPTIME_SECS: u64 = 24 * 60 * 60;
const DEFAULT_SCRATCH_DIR: &str = "tex_files";
const DEFAULT_PDFLATEX_PATH: &str = "pdflatex";
const DEFAULT_RENDER_PASSES: u32 = 2;
const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 120;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub jobs: JobsSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub max_request_bytes: NonZeroUsize,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct JobsSettings {
    pub retention: Duration,
    pub max_uptime: Duration,
    pub scratch_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub pdflatex_path: PathBuf,
    pub passes: NonZeroU32,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_cli_overrides(cli);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    jobs: RawJobsSettings,
    render: RawRenderSettings,
}

impl RawSettings {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(host) = cli.host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = cli.port.or(cli.legacy_port) {
            self.server.port = Some(port);
        }
        if let Some(bytes) = cli.max_request_bytes {
            self.server.max_request_bytes = Some(bytes);
        }
        if let Some(level) = cli.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = cli.log_json {
            self.logging.json = Some(json);
        }
        if let Some(seconds) = cli.retention_seconds {
            self.jobs.retention_seconds = Some(seconds);
        }
        if let Some(seconds) = cli.max_uptime_seconds {
            self.jobs.max_uptime_seconds = Some(seconds);
        }
        if let Some(dir) = cli.scratch_dir.as_ref() {
            self.jobs.scratch_dir = Some(dir.clone());
        }
        if let Some(path) = cli.pdflatex_path.as_ref() {
            self.render.pdflatex_path = Some(path.clone());
        }
        if let Some(passes) = cli.render_passes {
            self.render.passes = Some(passes);
        }
        if let Some(seconds) = cli.render_timeout_seconds {
            self.render.timeout_seconds = Some(seconds);
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    max_request_bytes: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawJobsSettings {
    retention_seconds: Option<u64>,
    max_uptime_seconds: Option<u64>,
    scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    pdflatex_path: Option<PathBuf>,
    passes: Option<u32>,
    timeout_seconds: Option<u64>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            server: ServerSettings::from_raw(raw.server)?,
            logging: LoggingSettings::from_raw(raw.logging)?,
            jobs: JobsSettings::from_raw(raw.jobs)?,
            render: RenderSettings::from_raw(raw.render)?,
        })
    }
}

impl ServerSettings {
    fn from_raw(raw: RawServerSettings) -> Result<Self, LoadError> {
        let host = raw.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip = IpAddr::from_str(host.trim())
            .map_err(|err| LoadError::invalid("server.host", format!("`{host}`: {err}")))?;
        let port = raw.port.unwrap_or(DEFAULT_PORT);

        let bytes = raw.max_request_bytes.unwrap_or(DEFAULT_MAX_REQUEST_BYTES);
        let max_request_bytes = usize::try_from(bytes)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                LoadError::invalid("server.max_request_bytes", "must be a positive size")
            })?;

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            max_request_bytes,
        })
    }
}

impl LoggingSettings {
    fn from_raw(raw: RawLoggingSettings) -> Result<Self, LoadError> {
        let level = raw.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let level = LevelFilter::from_str(level.trim())
            .map_err(|err| LoadError::invalid("logging.level", format!("`{level}`: {err}")))?;
        let format = if raw.json.unwrap_or(false) {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };
        Ok(Self { level, format })
    }
}

impl JobsSettings {
    fn from_raw(raw: RawJobsSettings) -> Result<Self, LoadError> {
        let retention = positive_secs(
            "jobs.retention_seconds",
            raw.retention_seconds.unwrap_or(DEFAULT_RETENTION_SECS),
        )?;
        let max_uptime = positive_secs(
            "jobs.max_uptime_seconds",
            raw.max_uptime_seconds.unwrap_or(DEFAULT_MAX_UPTIME_SECS),
        )?;
        let scratch_dir = raw
            .scratch_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_DIR));
        if scratch_dir.as_os_str().is_empty() {
            return Err(LoadError::invalid("jobs.scratch_dir", "must not be empty"));
        }

        Ok(Self {
            retention,
            max_uptime,
            scratch_dir,
        })
    }
}

impl RenderSettings {
    fn from_raw(raw: RawRenderSettings) -> Result<Self, LoadError> {
        let pdflatex_path = raw
            .pdflatex_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PDFLATEX_PATH));
        let passes = NonZeroU32::new(raw.passes.unwrap_or(DEFAULT_RENDER_PASSES))
            .ok_or_else(|| LoadError::invalid("render.passes", "must be at least 1"))?;
        let timeout = positive_secs(
            "render.timeout_seconds",
            raw.timeout_seconds.unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS),
        )?;

        Ok(Self {
            pdflatex_path,
            passes,
            timeout,
        })
    }
}

fn positive_secs(key: &'static str, seconds: u64) -> Result<Duration, LoadError> {
    if seconds == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    Ok(Duration::from_secs(seconds))
}
