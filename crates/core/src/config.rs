use serde::{Deserialize, Serialize};

// ─── Config ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Request pipeline policies
    pub cors: CorsConfig,
    pub allowed_hosts: Vec<String>,

    // Logging
    pub logging_to_file: bool,
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors: CorsConfig::default(),
            allowed_hosts: vec!["*".to_string()],
            logging_to_file: false,
            log_dir: None,
        }
    }
}

impl Config {
    /// Load config from a YAML file, sanitize, and validate.
    pub fn load(path: &str) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yml::from_str(&contents)?;
        config.sanitize();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration. Misconfiguration is a startup error, never a
    /// runtime error path.
    fn validate(&self) -> Result<(), anyhow::Error> {
        anyhow::ensure!(!self.host.is_empty(), "host must not be empty");
        for origin in &self.cors.allowed_origins {
            if origin != "*" {
                anyhow::ensure!(
                    origin.parse::<axum::http::HeaderValue>().is_ok(),
                    "invalid CORS origin: {origin}"
                );
            }
        }
        anyhow::ensure!(
            !self.allowed_hosts.is_empty(),
            "allowed-hosts must not be empty (use \"*\" to accept any host)"
        );
        Ok(())
    }

    /// Sanitize and normalize configuration.
    fn sanitize(&mut self) {
        sanitize_entries(&mut self.cors.allowed_origins);
        sanitize_entries(&mut self.allowed_hosts);
    }
}

/// Trim whitespace, drop empty entries, deduplicate preserving order.
fn sanitize_entries(entries: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    let sanitized: Vec<String> = entries
        .iter()
        .map(|e| e.trim().trim_end_matches('/').to_string())
        .filter(|e| !e.is_empty())
        .filter(|e| seen.insert(e.clone()))
        .collect();
    *entries = sanitized;
}

// ─── Sub-configs ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://localhost:3000".to_string(),
                "http://localhost:4000".to_string(),
            ],
            allow_credentials: true,
        }
    }
}
