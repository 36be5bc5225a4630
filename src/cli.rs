//! CLI argument parsing.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "chattrace",
    version,
    about = "Chat API service with request-scoped log tagging"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.yaml", env = "CHATTRACE_CONFIG")]
    pub config: String,

    /// Listen host
    #[arg(long, env = "CHATTRACE_HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, env = "CHATTRACE_PORT")]
    pub port: Option<u16>,

    /// Log level
    #[arg(long, default_value = "info", env = "CHATTRACE_LOG_LEVEL")]
    pub log_level: String,
}
