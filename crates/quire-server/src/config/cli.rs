use std::path::PathBuf;

use clap::{Parser, builder::BoolishValueParser};

/// Command-line arguments for the quire-server binary.
#[derive(Debug, Default, Parser)]
#[command(
    name = "quire-server",
    version,
    about = "Compile LaTeX documents over HTTP"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "QUIRE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Override the listener host.
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Override the listener port.
    #[arg(long = "port", env = "PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// Listener port under its older name; `--port`/`PORT` wins when both are set.
    #[arg(long = "c9-port", env = "C9_PORT", value_name = "PORT", hide = true)]
    pub legacy_port: Option<u16>,

    /// Override the maximum request body size in bytes.
    #[arg(long = "max-request-bytes", value_name = "BYTES")]
    pub max_request_bytes: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// How long a compiled document stays retrievable.
    #[arg(long = "retention-seconds", value_name = "SECONDS")]
    pub retention_seconds: Option<u64>,

    /// Exit the process after this much uptime.
    #[arg(long = "max-uptime-seconds", value_name = "SECONDS")]
    pub max_uptime_seconds: Option<u64>,

    /// Directory under which per-job scratch areas are created.
    #[arg(long = "scratch-dir", value_name = "PATH")]
    pub scratch_dir: Option<PathBuf>,

    /// Override the pdflatex executable.
    #[arg(long = "pdflatex-path", value_name = "PATH")]
    pub pdflatex_path: Option<PathBuf>,

    /// Number of compiler passes per document.
    #[arg(long = "render-passes", value_name = "COUNT")]
    pub render_passes: Option<u32>,

    /// Wall-clock limit for all passes of one document.
    #[arg(long = "render-timeout-seconds", value_name = "SECONDS")]
    pub render_timeout_seconds: Option<u64>,
}
