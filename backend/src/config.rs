//! Server configuration from command line flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::gateway::provider::DEFAULT_GEMINI_BASE_URL;
use crate::gateway::GatewayConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "screener", version, about = "Solution screening server")]
pub struct ServerConfig {
    #[arg(long, env = "SCREENER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "SCREENER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// CSV loaded into the store once at startup. A missing file is skipped.
    #[arg(long, env = "SCREENER_DATA_FILE", default_value = "data/solutions.csv")]
    pub data_file: PathBuf,

    /// Without a key the server starts with evaluation disabled.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long, env = "SCREENER_MAX_OUTPUT_TOKENS", default_value_t = 2048)]
    pub max_output_tokens: u32,

    /// Model calls allowed per window.
    #[arg(long, env = "SCREENER_RATE_LIMIT_MAX", default_value_t = 10)]
    pub rate_limit_max: usize,

    #[arg(long, env = "SCREENER_RATE_LIMIT_WINDOW_SECS", default_value_t = 60)]
    pub rate_limit_window_secs: u64,

    /// Open the UI in the default browser once the server is up.
    #[arg(long, env = "SCREENER_OPEN_BROWSER", default_value_t = false)]
    pub open_browser: bool,
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            max_output_tokens: self.max_output_tokens,
            rate_limit_max: self.rate_limit_max,
            rate_limit_window: Duration::from_secs(self.rate_limit_window_secs),
        }
    }
}
