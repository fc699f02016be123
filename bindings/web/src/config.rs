//! Server configuration.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use studentphoto::{CropConfig, DEFAULT_JPEG_QUALITY};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Max request body size
    pub max_upload_bytes: usize,
    /// SeetaFace frontal model file
    pub model_path: PathBuf,
    /// JPEG quality of the download
    pub jpeg_quality: u8,
    /// Framing constants
    pub crop: CropConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 20 * 1024 * 1024, // 20MB
            model_path: PathBuf::from("model/seeta_fd_frontal_v1.0.bin"),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            crop: CropConfig::default(),
        }
    }
}

impl WebConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key/value source; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            host: lookup("STUDENTPHOTO_HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "STUDENTPHOTO_PORT", defaults.port)?,
            max_upload_bytes: parse(&lookup, "STUDENTPHOTO_MAX_UPLOAD", defaults.max_upload_bytes)?,
            model_path: lookup("STUDENTPHOTO_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            jpeg_quality: parse(&lookup, "STUDENTPHOTO_JPEG_QUALITY", defaults.jpeg_quality)?,
            crop: CropConfig {
                height_multiplier: parse(
                    &lookup,
                    "STUDENTPHOTO_HEIGHT_MULTIPLIER",
                    defaults.crop.height_multiplier,
                )?,
                vertical_offset: parse(
                    &lookup,
                    "STUDENTPHOTO_VERTICAL_OFFSET",
                    defaults.crop.vertical_offset,
                )?,
            },
        };

        if !(1..=100).contains(&config.jpeg_quality) {
            return Err(ConfigError {
                key: "STUDENTPHOTO_JPEG_QUALITY",
                value: config.jpeg_quality.to_string(),
                reason: "must be between 1 and 100".to_string(),
            });
        }
        if config.max_upload_bytes == 0 {
            return Err(ConfigError {
                key: "STUDENTPHOTO_MAX_UPLOAD",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Err(e) = config.crop.validate() {
            return Err(ConfigError {
                key: "STUDENTPHOTO_HEIGHT_MULTIPLIER/STUDENTPHOTO_VERTICAL_OFFSET",
                value: format!("{}/{}", config.crop.height_multiplier, config.crop.vertical_offset),
                reason: e.to_string(),
            });
        }

        Ok(config)
    }

    /// `host:port` string for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
