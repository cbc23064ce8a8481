//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::auth::AuthConfig;

/// CLI argument parsing structure
#[derive(Debug, Clone, Parser)]
#[command(name = "blind-timer")]
#[command(about = "A tournament blind-level clock with pause/resume, chat commands and a queue consumer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, env = "BLIND_TIMER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "BLIND_TIMER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// File holding the persisted timer state
    #[arg(short, long, env = "BLIND_TIMER_STATE_FILE")]
    pub state_file: PathBuf,

    /// Accepted API tokens for structured writes
    #[arg(long = "api-token", env = "BLIND_TIMER_API_TOKENS", value_delimiter = ',')]
    pub api_tokens: Vec<String>,

    /// Chat request signing secrets
    #[arg(long = "slack-secret", env = "BLIND_TIMER_SLACK_SECRETS", value_delimiter = ',')]
    pub slack_secrets: Vec<String>,

    /// Chat user ids allowed to issue commands
    #[arg(long = "slack-user", env = "BLIND_TIMER_SLACK_USERS", value_delimiter = ',')]
    pub slack_users: Vec<String>,

    /// Maximum age of a signed chat request, in seconds
    #[arg(long, default_value = "300")]
    pub signature_max_skew: i64,

    /// Spool directory to consume update messages from
    #[arg(long, env = "BLIND_TIMER_QUEUE_DIR")]
    pub queue_dir: Option<PathBuf>,

    /// Queue polling interval in seconds
    #[arg(long, default_value = "1")]
    pub queue_poll: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn queue_poll_interval(&self) -> Duration {
        Duration::from_secs(self.queue_poll.max(1))
    }

    /// Credential configuration passed to the router
    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            api_tokens: non_empty(&self.api_tokens),
            slack_secrets: non_empty(&self.slack_secrets),
            slack_users: non_empty(&self.slack_users),
            max_skew_secs: self.signature_max_skew,
        }
    }
}

fn non_empty(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
