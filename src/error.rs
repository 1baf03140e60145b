use std::path::PathBuf;

use thiserror::Error;

/// Why a source-list candidate was rejected.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to fetch manifest {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("manifest {location} answered with HTTP {status}")]
    Status { location: String, status: u16 },
    #[error("failed to read manifest {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest is not a JSON array of paths: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("image list is empty")]
    Empty,
}

/// Why a single image could not become a slide.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read image {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to download image {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("image {url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode image {0}: {1}")]
    Decode(String, String),
    #[error("failed to create texture for {0}: {1}")]
    Texture(String, String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("shader is missing uniform `{0}`, GPU shaders are probably unavailable")]
    Shader(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no platform config directory")]
    NoConfigDir,
    #[error("config io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
