use std::fs;
use std::path::{Path, PathBuf};

/// Error raised when a shader source file cannot be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to read shader source {}: {source}", path.display())]
pub struct SourceError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Vertex and fragment shader text, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn load(vertex_path: &Path, fragment_path: &Path) -> Result<Self, SourceError> {
        let sources = Self {
            vertex: read_source(vertex_path)?,
            fragment: read_source(fragment_path)?,
        };
        tracing::debug!(
            vertex = %vertex_path.display(),
            vertex_bytes = sources.vertex.len(),
            fragment = %fragment_path.display(),
            fragment_bytes = sources.fragment.len(),
            "loaded shader sources"
        );
        Ok(sources)
    }
}

fn read_source(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError {
        path: path.to_path_buf(),
        source,
    })
}
