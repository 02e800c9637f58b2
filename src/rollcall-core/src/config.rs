use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: String,

    // Bearer tokens the server accepts; empty means every search is refused
    #[serde(default)]
    pub access_tokens: Vec<String>,

    // CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    // Log file configuration
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_cors_enabled() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,

    #[serde(default = "default_log_file_name")]
    pub file_name: String,

    /// Rotate once the active file reaches this size
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Rotated files kept per day
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

fn default_log_file_name() -> String {
    "rollcall.log".to_string()
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_max_files() -> usize {
    9
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file_name: default_log_file_name(),
            max_file_size_mb: default_max_file_size_mb(),
            max_files: default_max_files(),
        }
    }
}

fn default_dataset_path() -> String {
    "./dataset.json".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> String {
    "8080".to_string()
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn accepts_token(&self, token: &str) -> bool {
        self.access_tokens.iter().any(|accepted| accepted == token)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            bind_address: default_bind_address(),
            port: default_port(),
            access_tokens: Vec::new(),
            cors: CorsConfig::default(),
            logging: LogConfig::default(),
        }
    }
}
