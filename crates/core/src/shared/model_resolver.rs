use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{
    AGE_MODEL_NAME, AGE_MODEL_URL, FACE_MODEL_NAME, FACE_MODEL_URL, GENDER_MODEL_NAME,
    GENDER_MODEL_URL,
};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Name/URL pair for one of the three networks the pipeline loads at startup.
#[derive(Clone, Copy, Debug)]
pub struct ModelSpec {
    pub name: &'static str,
    pub url: &'static str,
}

pub const FACE_DETECTOR: ModelSpec = ModelSpec {
    name: FACE_MODEL_NAME,
    url: FACE_MODEL_URL,
};

pub const AGE_CLASSIFIER: ModelSpec = ModelSpec {
    name: AGE_MODEL_NAME,
    url: AGE_MODEL_URL,
};

pub const GENDER_CLASSIFIER: ModelSpec = ModelSpec {
    name: GENDER_MODEL_NAME,
    url: GENDER_MODEL_URL,
};

/// Resolve a model file, checking local locations before downloading.
///
/// Resolution order:
/// 1. `models_dir` (the conventional `models/` directory next to the binary,
///    or whatever `--models-dir` points at)
/// 2. User cache directory (platform-specific)
/// 3. Download from the release URL into the cache
pub fn resolve(
    spec: &ModelSpec,
    models_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(dir) = models_dir {
        let local_path = dir.join(spec.name);
        if local_path.exists() {
            return Ok(local_path);
        }
    }

    let cache_dir = model_cache_dir()?;
    let cached_path = cache_dir.join(spec.name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    log::info!("Model {} not found locally, downloading", spec.name);
    fs::create_dir_all(&cache_dir).map_err(ModelResolveError::CacheDir)?;
    download(spec.url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/AgeLens/models/`
/// - Linux: `$XDG_CACHE_HOME/AgeLens/models/` or `~/.cache/AgeLens/models/`
/// - Windows: `%LOCALAPPDATA%/AgeLens/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("AgeLens").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("AgeLens").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let response = reqwest::blocking::get(url).map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let mut file = fs::File::create(&temp_path).map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;

    let bytes = response.bytes().map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    // Report progress in chunks to avoid excessive callbacks
    let chunk_size = 1024 * 1024; // 1MB
    for chunk in bytes.chunks(chunk_size) {
        file.write_all(chunk)
            .map_err(|e| ModelResolveError::Write {
                path: temp_path.clone(),
                source: e,
            })?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_prefers_models_dir() {
        let tmp = TempDir::new().unwrap();
        let models_dir = tmp.path().join("models");
        fs::create_dir_all(&models_dir).unwrap();
        let local = models_dir.join(FACE_DETECTOR.name);
        fs::write(&local, b"fake model data").unwrap();

        let resolved = resolve(&FACE_DETECTOR, Some(&models_dir), None).unwrap();
        assert_eq!(resolved, local);
    }

    #[test]
    fn test_resolve_ignores_missing_models_dir_entry() {
        let tmp = TempDir::new().unwrap();
        let empty_dir = tmp.path().join("empty");
        fs::create_dir_all(&empty_dir).unwrap();
        // Nothing in the local dir → resolver moves on to cache/download;
        // the local path must not be returned.
        let local = empty_dir.join(GENDER_CLASSIFIER.name);
        assert!(!local.exists());
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let dir = model_cache_dir().unwrap();
        assert!(dir.to_string_lossy().contains("AgeLens"));
        assert!(dir.to_string_lossy().contains("models"));
    }

    #[test]
    fn test_model_specs_are_distinct() {
        let names = [FACE_DETECTOR.name, AGE_CLASSIFIER.name, GENDER_CLASSIFIER.name];
        assert_eq!(
            names.iter().collect::<std::collections::HashSet<_>>().len(),
            3
        );
    }

    #[test]
    fn test_download_invalid_url_returns_error() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.onnx");
        let result = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(result.is_err());
    }
}
