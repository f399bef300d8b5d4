//! Angular のルート定義 (`Routes`) にある `component: X` を
//! `loadComponent: () => import('...').then((c) => c.X)` に書き換えるツール。
//!
//! 変換はファイルごとに独立しており、各ファイルの import 文だけを使って参照を解決する。

pub mod classifier;
pub mod config;
pub mod emitter;
pub mod error;
pub mod format;
pub mod locator;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod symbols;
pub mod transform;
pub mod tree;
pub mod workspace;

pub use config::RouteConvention;
pub use error::{MigrateError, TransformError};
pub use migrate::{run, MigrateOptions};
pub use model::{FileReport, RunReport, SkipReason};
pub use transform::{transform_source, FileTransform};
