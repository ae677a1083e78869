//! Lazily populated, per-version cache of model providers

use crate::io::error::{CloudMaskError, Result};
use crate::model::provider::{ProviderError, SegmentationModel};
use crate::model::version::ModelVersion;
use once_cell::sync::OnceCell;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Builds a model provider from an artifact on disk
pub trait ModelLoader: Send + Sync {
    /// Construct the provider for `version` from the artifact at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be read or deserialized
    fn load(
        &self,
        version: ModelVersion,
        path: &Path,
    ) -> std::result::Result<Arc<dyn SegmentationModel>, ProviderError>;
}

/// Loader used when the crate is built without a model runtime
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRuntimeLoader;

impl ModelLoader for NoRuntimeLoader {
    fn load(
        &self,
        _version: ModelVersion,
        _path: &Path,
    ) -> std::result::Result<Arc<dyn SegmentationModel>, ProviderError> {
        Err("no model runtime compiled in (rebuild with the `onnx` feature)".into())
    }
}

/// Artifact location for each model version
///
/// An explicit per-version override wins; otherwise the version's default
/// file name is used, joined onto the model directory when one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactPaths {
    model_dir: Option<PathBuf>,
    overrides: [Option<PathBuf>; 3],
}

impl ArtifactPaths {
    /// Paths with no overrides and no model directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Read overrides through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut paths = Self::new();
        for version in ModelVersion::ALL {
            if let Some(value) = lookup(version.config().artifact_env) {
                if !value.is_empty() {
                    paths = paths.with_override(version, PathBuf::from(value));
                }
            }
        }
        paths
    }

    /// Resolve default file names inside `dir`
    #[must_use]
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    /// Use `path` for `version` regardless of defaults
    #[must_use]
    pub fn with_override(mut self, version: ModelVersion, path: impl Into<PathBuf>) -> Self {
        let [v1, v2, v3] = &mut self.overrides;
        let slot = match version {
            ModelVersion::V1 => v1,
            ModelVersion::V2 => v2,
            ModelVersion::V3 => v3,
        };
        *slot = Some(path.into());
        self
    }

    /// Artifact location for `version`
    pub fn resolve(&self, version: ModelVersion) -> PathBuf {
        let [v1, v2, v3] = &self.overrides;
        let explicit = match version {
            ModelVersion::V1 => v1,
            ModelVersion::V2 => v2,
            ModelVersion::V3 => v3,
        };
        if let Some(path) = explicit {
            return path.clone();
        }

        let file_name = version.config().default_artifact;
        self.model_dir
            .as_ref()
            .map_or_else(|| PathBuf::from(file_name), |dir| dir.join(file_name))
    }
}

/// Process-lifetime cache of model providers, one slot per version
///
/// The first request for a version resolves and loads its artifact. Concurrent
/// first requests for the same version wait on a single load; a failed load
/// leaves the slot empty so a later request can try again. Providers are never
/// evicted.
pub struct ModelRegistry {
    loader: Box<dyn ModelLoader>,
    paths: ArtifactPaths,
    slots: [OnceCell<Arc<dyn SegmentationModel>>; 3],
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new(loader: Box<dyn ModelLoader>, paths: ArtifactPaths) -> Self {
        Self {
            loader,
            paths,
            slots: [OnceCell::new(), OnceCell::new(), OnceCell::new()],
        }
    }

    /// Artifact locations this registry resolves against
    pub const fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Get the provider for `version`, loading it on first use
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` if:
    /// - The resolved artifact does not exist
    /// - The loader fails to build a provider from it
    pub fn get_model(&self, version: ModelVersion) -> Result<Arc<dyn SegmentationModel>> {
        self.slot(version)
            .get_or_try_init(|| self.build(version))
            .map(Arc::clone)
    }

    /// Whether a provider for `version` is already cached
    pub fn is_loaded(&self, version: ModelVersion) -> bool {
        self.slot(version).get().is_some()
    }

    fn slot(&self, version: ModelVersion) -> &OnceCell<Arc<dyn SegmentationModel>> {
        let [v1, v2, v3] = &self.slots;
        match version {
            ModelVersion::V1 => v1,
            ModelVersion::V2 => v2,
            ModelVersion::V3 => v3,
        }
    }

    fn build(&self, version: ModelVersion) -> Result<Arc<dyn SegmentationModel>> {
        let path = self.paths.resolve(version);
        tracing::info!(%version, path = %path.display(), "loading model");

        if !path.exists() {
            tracing::warn!(%version, path = %path.display(), "model artifact not found");
            return Err(CloudMaskError::ModelUnavailable {
                version,
                path,
                reason: "artifact not found".to_string(),
            });
        }

        let start = Instant::now();
        match self.loader.load(version, &path) {
            Ok(model) => {
                tracing::info!(
                    %version,
                    elapsed_ms = %start.elapsed().as_millis(),
                    "model loaded"
                );
                Ok(model)
            }
            Err(e) => {
                tracing::warn!(%version, error = %e, "model load failed");
                Err(CloudMaskError::ModelUnavailable {
                    version,
                    path,
                    reason: e.to_string(),
                })
            }
        }
    }
}
