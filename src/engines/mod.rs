//! OCR engine implementations
//!
//! This module contains implementations of the OcrEngine trait for different
//! OCR backends. Engines are conditionally compiled based on feature flags.

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

#[cfg(feature = "engine-leptess")]
pub mod leptess;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::VerifyError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Information about an available engine
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_languages: Vec<String>,
}

impl EngineInfo {
    pub fn of(engine: &dyn OcrEngine) -> Self {
        Self {
            name: engine.name(),
            description: engine.description(),
            supported_languages: engine.supported_languages(),
        }
    }
}

/// Registry of available OCR engines
pub struct EngineRegistry {
    engines: Vec<Arc<dyn OcrEngine>>,
    default_engine: String,
}

impl EngineRegistry {
    /// Initialize every compiled-in engine
    ///
    /// Fails with `EngineUnavailable` when nothing could be initialized or
    /// when `config.engine` names an engine that is not available.
    pub fn new(config: &Config) -> Result<Self, VerifyError> {
        #[allow(unused_mut)]
        let mut engines: Vec<Arc<dyn OcrEngine>> = Vec::new();

        #[cfg(feature = "engine-ocrs")]
        {
            tracing::info!("Initializing ocrs engine...");
            engines.push(Arc::new(ocrs::OcrsEngine::new(config)?));
        }

        #[cfg(feature = "engine-leptess")]
        {
            tracing::info!("Initializing leptess engine...");
            engines.push(Arc::new(leptess::LeptessEngine::new(config)?));
        }

        Self::from_engines(engines, config.engine.as_deref())
    }

    /// Build a registry from already constructed engines
    pub fn from_engines(
        engines: Vec<Arc<dyn OcrEngine>>,
        preferred: Option<&str>,
    ) -> Result<Self, VerifyError> {
        let first = engines.first().ok_or_else(|| {
            VerifyError::EngineUnavailable(
                "No OCR engines available. Build with --features engine-ocrs or --features engine-leptess".to_string(),
            )
        })?;

        let default_engine = match preferred {
            Some(name) if engines.iter().any(|e| e.name() == name) => name.to_string(),
            Some(name) => {
                return Err(VerifyError::EngineUnavailable(format!(
                    "Engine '{}' is not available (compiled engines: {})",
                    name,
                    engines.iter().map(|e| e.name()).collect::<Vec<_>>().join(", ")
                )))
            }
            None => first.name().to_string(),
        };

        Ok(Self {
            engines,
            default_engine,
        })
    }

    /// Get an engine by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn OcrEngine>> {
        self.engines.iter().find(|e| e.name() == name).cloned()
    }

    /// Get the default engine
    pub fn default_engine(&self) -> Arc<dyn OcrEngine> {
        self.get(&self.default_engine)
            .unwrap_or_else(|| Arc::clone(&self.engines[0]))
    }

    /// List all available engine names
    pub fn list(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Get info about all available engines
    pub fn info(&self) -> Vec<EngineInfo> {
        self.engines.iter().map(|e| EngineInfo::of(e.as_ref())).collect()
    }
}

/// Cache directory for downloaded models and training data
#[allow(dead_code)]
pub(crate) fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("certverify")
}

/// Download `url` to `path` unless it is already cached
#[allow(dead_code)]
pub(crate) fn ensure_downloaded(url: &str, path: &Path) -> Result<(), VerifyError> {
    if path.exists() {
        tracing::info!("Using cached file {:?}", path);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            VerifyError::EngineUnavailable(format!("Failed to create cache directory: {}", e))
        })?;
    }

    tracing::info!("Downloading {} (this may take a moment)...", url);

    let response = ureq::get(url)
        .call()
        .map_err(|e| VerifyError::EngineUnavailable(format!("Failed to download {}: {}", url, e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        VerifyError::EngineUnavailable(format!("Failed to read response body: {}", e))
    })?;

    // Partial downloads must never appear at the cached path
    let partial = path.with_extension("partial");
    std::fs::write(&partial, &buffer)
        .and_then(|_| std::fs::rename(&partial, path))
        .map_err(|e| {
            VerifyError::EngineUnavailable(format!("Failed to write {:?}: {}", path, e))
        })?;

    tracing::info!("Downloaded {} to {:?}", url, path);
    Ok(())
}
