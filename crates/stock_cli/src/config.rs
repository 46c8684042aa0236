//! CLI configuration, consumed once at startup.
//!
//! # Responsibility
//! - Collect the store path, logging options and mail credentials from the
//!   process environment.
//!
//! # Invariants
//! - Configuration is read exactly once; nothing inside `stock_core`
//!   touches the environment.
//! - Mail settings are all-or-nothing: the notifier is only offered when
//!   every mail variable is present.

use std::path::PathBuf;
use stock_core::MailerConfig;

const ENV_DB_PATH: &str = "STOCK_DB_PATH";
const ENV_LOG_DIR: &str = "STOCK_LOG_DIR";
const ENV_LOG_LEVEL: &str = "STOCK_LOG_LEVEL";
const ENV_SMTP_HOST: &str = "STOCK_SMTP_HOST";
const ENV_SMTP_USERNAME: &str = "STOCK_SMTP_USERNAME";
const ENV_SMTP_PASSWORD: &str = "STOCK_SMTP_PASSWORD";
const ENV_MAIL_SENDER: &str = "STOCK_MAIL_SENDER";
const ENV_MAIL_RECEIVER: &str = "STOCK_MAIL_RECEIVER";

const DEFAULT_DB_PATH: &str = "stock-data/db.csv";
const DEFAULT_LOG_DIR: &str = "stock-data/logs";

/// Startup configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Flat-file store location.
    pub store_path: PathBuf,
    /// Rolling log directory.
    pub log_dir: PathBuf,
    /// Log level name.
    pub log_level: String,
    /// Outbound mail settings, when fully configured.
    pub mail: Option<MailerConfig>,
}

impl CliConfig {
    /// Reads configuration from the environment, applying defaults for
    /// the store path, log directory and log level.
    pub fn from_env() -> Self {
        let store_path = env_or(ENV_DB_PATH, DEFAULT_DB_PATH).into();
        let log_dir = env_or(ENV_LOG_DIR, DEFAULT_LOG_DIR).into();
        let log_level = env_or(ENV_LOG_LEVEL, stock_core::default_log_level());

        let mail = match (
            env_var(ENV_SMTP_HOST),
            env_var(ENV_SMTP_USERNAME),
            env_var(ENV_SMTP_PASSWORD),
            env_var(ENV_MAIL_SENDER),
            env_var(ENV_MAIL_RECEIVER),
        ) {
            (Some(smtp_host), Some(username), Some(password), Some(sender), Some(receiver)) => {
                Some(MailerConfig {
                    smtp_host,
                    username,
                    password,
                    sender,
                    receiver,
                })
            }
            _ => None,
        };

        Self {
            store_path,
            log_dir,
            log_level,
            mail,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_var(name).unwrap_or_else(|| default.to_string())
}
