use serde::Deserialize;

/// Host-page configuration handed to `init_viewer` as JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewerConfig {
    /// Base URL of the pages gateway. Required.
    #[serde(default)]
    pub api_url: String,
    /// Base URL articles are embedded from.
    #[serde(default = "default_article_url")]
    pub article_url: String,
    /// Zoom level at which searching becomes available.
    #[serde(default = "default_zoom_begin")]
    pub zoom_begin: f64,
    /// Width passed to the thumbnails endpoint.
    #[serde(default = "default_thumb_width")]
    pub thumb_width: u32,
    /// Start center, used until geolocation (if any) comes through.
    #[serde(default = "default_start_center")]
    pub start_center: [f64; 2],
    #[serde(default = "default_start_zoom")]
    pub start_zoom: f64,
}

fn default_article_url() -> String {
    "https://en.wikipedia.org".to_string()
}

fn default_zoom_begin() -> f64 {
    search::DEFAULT_ZOOM_BEGIN
}

fn default_thumb_width() -> u32 {
    200
}

fn default_start_center() -> [f64; 2] {
    // Timisoara, the fallback when the browser denies geolocation.
    [45.75, 21.22]
}

fn default_start_zoom() -> f64 {
    16.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Decode(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing config value: {key}"),
            ConfigError::Decode(msg) => write!(f, "config decode failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Decode(e.to_string()))?;
        if config.api_url.trim().is_empty() {
            return Err(ConfigError::Missing("api_url"));
        }
        Ok(config)
    }
}
