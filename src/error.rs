use std::path::PathBuf;
use thiserror::Error;

/// 実行全体を中断するエラー
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("package.json が見つかりません: {0}")]
    MissingPackageJson(PathBuf),

    #[error("No @angular/core detected in {0}")]
    MissingAngularCore(PathBuf),

    #[error("Cannot pass both \"path\" and \"project\"")]
    ConflictingSelection,

    #[error("\"{0}\" does not exist")]
    PathNotFound(PathBuf),

    #[error("\"{0}\" project not found")]
    ProjectNotFound(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl MigrateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MigrateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// ソース 1 つの変換に失敗した (そのファイルはスキップされる)
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T, E = MigrateError> = std::result::Result<T, E>;
