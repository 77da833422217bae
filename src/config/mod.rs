use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::WikiError;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_FRONT_PAGE: &str = "FrontPage";

/// How page titles are taken from request paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleMode {
    /// Path must match `/(edit|save|view)/<alphanumeric>`
    #[default]
    Validated,
    /// Everything after the handler prefix, unchecked
    Prefix,
}

impl FromStr for TitleMode {
    type Err = WikiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "validated" => Ok(TitleMode::Validated),
            "prefix" => Ok(TitleMode::Prefix),
            other => Err(WikiError::Config(format!("unknown title mode '{}'", other))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub template_dir: PathBuf,
    pub port: u16,
    pub host: String,
    pub title_mode: TitleMode,
    pub front_page: String,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            template_dir: PathBuf::from("."),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            title_mode: TitleMode::default(),
            front_page: DEFAULT_FRONT_PAGE.to_string(),
        }
    }

    /// Build configuration from `WIKI_*` environment variables
    pub fn from_env() -> Result<Self, WikiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, WikiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(dir) = lookup("WIKI_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("WIKI_TEMPLATE_DIR") {
            config.template_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("WIKI_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("WIKI_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| WikiError::Config(format!("invalid WIKI_PORT '{}'", port)))?;
        }
        if let Some(mode) = lookup("WIKI_TITLE_MODE") {
            config.title_mode = mode.parse()?;
        }
        if let Some(front) = lookup("WIKI_FRONT_PAGE") {
            config.front_page = front;
        }

        Ok(config)
    }

    /// Address to bind, as accepted by `TcpListener::bind`
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
