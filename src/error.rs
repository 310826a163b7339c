use std::path::PathBuf;

pub use anyhow::{anyhow, Result};

use thiserror::Error as TError;

#[derive(Debug, TError)]
pub enum ScopeError {
    #[error(transparent)]
    Kube(#[from] kube::Error),
    #[error(transparent)]
    Kubeconfig(#[from] kube::config::KubeconfigError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{0} should not be empty")]
    MissingEnv(&'static str),
    #[error("Kubeconfig not found: {0}")]
    KubeconfigNotFound(PathBuf),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}
