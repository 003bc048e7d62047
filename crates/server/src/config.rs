use clap::Parser;
use config::builder::DefaultState;
use config::{ConfigBuilder, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when `--config` is not given. Absent files are ignored.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/default/csp-report-logger";

/// Prefix for environment overrides, e.g. `CSP_REPORT_LOGGER_PORT=9000`.
pub const ENV_PREFIX: &str = "CSP_REPORT_LOGGER";

/// Command-line flags. Flags win over the environment and the config file.
#[derive(Debug, Clone, Parser)]
#[command(name = "csp-report-logger", version, about = "Sanitize and log CSP violation reports")]
pub struct Cli {
    /// PATH of key=value config file
    #[arg(long, value_name = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// PATH of log file [default: /var/log/csp.log]
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Port to listen on [default: 8080]
    #[arg(long, value_name = "N")]
    pub port: Option<u16>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// File accepted reports are appended to
    #[serde(rename = "log", default = "default_log_path")]
    pub log_path: PathBuf,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in KiB
    #[serde(default = "default_max_body_size_kb")]
    pub max_body_size_kb: usize,

    /// Answer CORS preflights permissively
    #[serde(default)]
    pub enable_cors: bool,

    /// Log level / `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            log_path: default_log_path(),
            timeout_secs: default_timeout_secs(),
            max_body_size_kb: default_max_body_size_kb(),
            enable_cors: false,
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Merge defaults, the config file named by `cli.config`, environment
    /// variables and finally the command-line flags.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        Self::load_layers(cli, None)
    }

    /// `env` replaces the process environment when given.
    fn load_layers(cli: &Cli, env: Option<Map<String, String>>) -> anyhow::Result<Self> {
        let config: ServerConfig = sources(&cli.config, env)
            .set_override_option("port", cli.port.map(i64::from))?
            .set_override_option(
                "log",
                cli.log.as_ref().map(|path| path.display().to_string()),
            )?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load from a config file and the environment only.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let config: ServerConfig = sources(path, None).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if self.max_body_size_kb == 0 {
            anyhow::bail!("max_body_size_kb must be greater than zero");
        }
        if self.log_path.as_os_str().is_empty() {
            anyhow::bail!("log path must not be empty");
        }
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_kb * 1024
    }
}

fn sources(path: &Path, env: Option<Map<String, String>>) -> ConfigBuilder<DefaultState> {
    config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(FileFormat::Ini)
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env),
        )
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_path() -> PathBuf {
    PathBuf::from("/var/log/csp.log")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_kb() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.log_path, PathBuf::from("/var/log/csp.log"));
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size(), 1024 * 1024);
        assert!(!cfg.enable_cors);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::from_file(&dir.path().join("absent")).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn config_file_values_are_read() {
        let file = write_config("port = 9090\nlog = /tmp/csp-reports.log\nenable_cors = true\n");
        let cfg = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/csp-reports.log"));
        assert!(cfg.enable_cors);
    }

    #[test]
    fn flags_override_config_file() {
        let file = write_config("port = 9090\nlog = /tmp/from-file.log\n");
        let cli = Cli::try_parse_from([
            "csp-report-logger",
            "--config",
            file.path().to_str().unwrap(),
            "--port",
            "7000",
        ])
        .unwrap();

        let cfg = ServerConfig::load(&cli).unwrap();
        assert_eq!(cfg.port, 7000);
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/from-file.log"));
    }

    #[test]
    fn environment_sits_between_file_and_flags() {
        let file = write_config("port = 9090\n");
        let config_path = file.path().to_str().unwrap();
        let env = Map::from([(format!("{ENV_PREFIX}_PORT"), "9191".to_string())]);

        let cli = Cli::try_parse_from(["csp-report-logger", "--config", config_path]).unwrap();
        let cfg = ServerConfig::load_layers(&cli, Some(env.clone())).unwrap();
        assert_eq!(cfg.port, 9191);

        let cli = Cli::try_parse_from([
            "csp-report-logger",
            "--config",
            config_path,
            "--port",
            "7000",
        ])
        .unwrap();
        let cfg = ServerConfig::load_layers(&cli, Some(env)).unwrap();
        assert_eq!(cfg.port, 7000);
    }

    #[test]
    fn environment_overrides_defaults_without_a_file() {
        let env = Map::from([
            (format!("{ENV_PREFIX}_LOG"), "/tmp/from-env.log".to_string()),
            (format!("{ENV_PREFIX}_ENABLE_CORS"), "true".to_string()),
        ]);
        let cli = Cli::try_parse_from(["csp-report-logger", "--config", "/nonexistent"]).unwrap();

        let cfg = ServerConfig::load_layers(&cli, Some(env)).unwrap();
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/from-env.log"));
        assert!(cfg.enable_cors);
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn log_flag_overrides_config_file() {
        let file = write_config("log = /tmp/from-file.log\n");
        let cli = Cli::try_parse_from([
            "csp-report-logger",
            "--config",
            file.path().to_str().unwrap(),
            "--log",
            "/tmp/from-flag.log",
        ])
        .unwrap();

        let cfg = ServerConfig::load(&cli).unwrap();
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/from-flag.log"));
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn cli_defaults_to_system_config_path() {
        let cli = Cli::try_parse_from(["csp-report-logger"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(cli.port.is_none());
        assert!(cli.log.is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let file = write_config("timeout_secs = 0\n");
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn unparsable_port_is_rejected() {
        let file = write_config("port = eighty\n");
        assert!(ServerConfig::from_file(file.path()).is_err());
    }
}
