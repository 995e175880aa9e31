use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "olt-console.toml";
pub const ENV_PREFIX: &str = "OLTC";

#[derive(Debug, Parser)]
#[command(name = "olt-onu-console", version, about = "Query and unlock ONUs on an OLT")]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Backend base URL, e.g. http://10.0.0.10:169
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log filter, e.g. info or olt_onu_console=debug
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// One choice of the OLT selector
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OltEntry {
    pub name: String,
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub olts: Vec<OltEntry>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "http://127.0.0.1:169".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConsoleConfig {
    /// Loads defaults, then the TOML file, then `OLTC__*` variables, then CLI flags.
    pub fn load(args: &Args) -> Result<Self> {
        use config::{Config, Environment, File};

        // A missing .env is normal
        let _ = dotenvy::dotenv();

        let settings = Config::builder()
            .add_source(File::with_name(&args.config).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", args.config))?;

        let mut cfg: ConsoleConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if let Some(base_url) = &args.base_url {
            cfg.server.base_url = base_url.clone();
        }
        if let Some(level) = &args.log_level {
            cfg.logging.level = level.clone();
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.server.base_url)
            .with_context(|| format!("Invalid server.base_url '{}'", self.server.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("server.base_url must use http or https, got '{}'", url.scheme());
        }
        if self.server.timeout_secs == 0 {
            bail!("server.timeout_secs must be greater than zero");
        }

        let mut ips = HashSet::new();
        for olt in &self.olts {
            if olt.name.trim().is_empty() || olt.ip.trim().is_empty() {
                bail!("Every OLT entry needs a name and an ip");
            }
            if !ips.insert(olt.ip.as_str()) {
                bail!("OLT ip {} is listed more than once", olt.ip);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn olt(name: &str, ip: &str) -> OltEntry {
        OltEntry {
            name: name.into(),
            ip: ip.into(),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = ConsoleConfig::default();
        assert_eq!(cfg.server.base_url, "http://127.0.0.1:169");
        assert_eq!(cfg.server.timeout(), Duration::from_secs(60));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut cfg = ConsoleConfig::default();
        cfg.server.base_url = "ftp://olt".into();
        assert!(cfg.validate().is_err());

        cfg.server.base_url = "not a url".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_or_blank_olts() {
        let mut cfg = ConsoleConfig::default();
        cfg.olts = vec![olt("OLT1", "10.0.0.1"), olt("OLT2", "10.0.0.1")];
        assert!(cfg.validate().is_err());

        cfg.olts = vec![olt(" ", "10.0.0.1")];
        assert!(cfg.validate().is_err());

        cfg.olts = vec![olt("OLT1", "10.0.0.1"), olt("OLT2", "10.0.0.2")];
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_olt_list_from_toml() {
        let text = r#"
            [server]
            base_url = "http://10.0.0.10:169"

            [[olts]]
            name = "Centro"
            ip = "10.0.0.1"
        "#;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .unwrap();
        let cfg: ConsoleConfig = settings.try_deserialize().unwrap();

        assert_eq!(cfg.server.base_url, "http://10.0.0.10:169");
        assert_eq!(cfg.server.timeout_secs, 60);
        assert_eq!(cfg.olts, vec![olt("Centro", "10.0.0.1")]);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn cli_flags_parse() {
        let args = Args::parse_from(["olt-onu-console", "--base-url", "http://olt:169"]);
        assert_eq!(args.config, DEFAULT_CONFIG_PATH);
        assert_eq!(args.base_url.as_deref(), Some("http://olt:169"));
    }
}
