use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("import of '{}' failed: {message}", path.display())]
    Import { path: PathBuf, message: String },

    #[error("model has {count} bones, at most {max} are supported")]
    TooManyBones { count: usize, max: usize },

    #[error("bone {bone} has parent {parent}, parents must precede their children")]
    NonTopologicalOrder { bone: usize, parent: usize },

    #[error("invalid bone hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("mesh '{mesh}': {message}")]
    InvalidMesh { mesh: String, message: String },

    #[error("bone index {index} out of range for skeleton with {count} bones")]
    BoneIndexOutOfRange { index: usize, count: usize },

    #[error("gpu error: {0}")]
    Gpu(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub fn import(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ModelError::Import {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<wgpu::RequestAdapterError> for ModelError {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        ModelError::Gpu(err.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for ModelError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        ModelError::Gpu(err.to_string())
    }
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;
