use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{MigrateError, Result};
use crate::tree::Tree;

/// 走査しないディレクトリ
const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "tmp",
    ".angular",
    ".nx",
    "coverage",
];

/// 変換対象の選び方
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// ファイル 1 つ (またはその配下のディレクトリ)
    Path(PathBuf),
    /// 名前で指定したプロジェクト 1 つ
    Project(String),
    /// ワークスペース内の全プロジェクト
    AllProjects,
}

impl Selection {
    /// `--path` と `--project` から選択を決める。両方指定はエラー
    pub fn from_options(path: Option<PathBuf>, project: Option<String>) -> Result<Self> {
        match (path, project) {
            (Some(_), Some(_)) => Err(MigrateError::ConflictingSelection),
            (Some(path), None) => Ok(Selection::Path(path)),
            (None, Some(project)) => Ok(Selection::Project(project)),
            (None, None) => Ok(Selection::AllProjects),
        }
    }
}

/// ワークスペース内のプロジェクト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    /// プロジェクトのルートディレクトリ (絶対パス)
    pub root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ProjectJson {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AngularJson {
    #[serde(default)]
    projects: BTreeMap<String, AngularProject>,
}

#[derive(Debug, Deserialize)]
struct AngularProject {
    #[serde(default)]
    root: String,
}

/// `package.json` の `dependencies` に `@angular/core` があるか確認する。
/// ソースを読む前に必ず通す。
pub fn check_angular_dependency(tree: &Tree) -> Result<String> {
    let path = tree.resolve(Path::new("package.json"));
    if !tree.exists(&path) {
        return Err(MigrateError::MissingPackageJson(path));
    }
    let text = tree.read(&path)?;
    let package: PackageJson =
        serde_json::from_str(&text).map_err(|source| MigrateError::Json {
            path: path.clone(),
            source,
        })?;

    match package.dependencies.get("@angular/core") {
        Some(version) => {
            let version = version.as_str().unwrap_or_default().to_string();
            debug!(%version, "@angular/core を検出");
            Ok(version)
        }
        None => Err(MigrateError::MissingAngularCore(path)),
    }
}

/// ワークスペース内のプロジェクトを列挙する。
///
/// - `project.json` があるディレクトリを 1 プロジェクトとみなす (名前は `name`、なければディレクトリ名)
/// - ルートに `angular.json` があれば、その `projects` も加える
///
/// どちらも見つからなければ、ワークスペースルート全体を 1 つのプロジェクトとして返す。
pub fn discover_projects(tree: &Tree) -> Result<Vec<Project>> {
    let root = tree.root();
    let mut projects: BTreeMap<String, PathBuf> = BTreeMap::new();

    for entry in walk(root) {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name() != "project.json" {
            continue;
        }
        let Some(dir) = entry.path().parent() else {
            continue;
        };
        let text = tree.read(entry.path())?;
        let config: ProjectJson = match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "project.json を読めませんでした");
                continue;
            }
        };
        let name = config.name.unwrap_or_else(|| {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        projects.entry(name).or_insert_with(|| dir.to_path_buf());
    }

    let angular_json = root.join("angular.json");
    if tree.exists(&angular_json) {
        let text = tree.read(&angular_json)?;
        let config: AngularJson =
            serde_json::from_str(&text).map_err(|source| MigrateError::Json {
                path: angular_json.clone(),
                source,
            })?;
        for (name, project) in config.projects {
            projects.entry(name).or_insert_with(|| root.join(project.root));
        }
    }

    if projects.is_empty() {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());
        projects.insert(name, root.to_path_buf());
    }

    Ok(projects
        .into_iter()
        .map(|(name, root)| Project { name, root })
        .collect())
}

/// 選択を具体的な `.ts` ファイルの一覧にする (ソート・重複除去済み)
pub fn resolve_selection(tree: &Tree, selection: &Selection) -> Result<Vec<PathBuf>> {
    let mut files = match selection {
        Selection::Path(path) => {
            let path = tree.resolve(path);
            let path = path
                .absolutize()
                .map_err(|e| MigrateError::io(&path, e))?
                .to_path_buf();
            if !tree.exists(&path) {
                return Err(MigrateError::PathNotFound(path));
            }
            if path.is_dir() {
                collect_sources(&path)?
            } else if is_typescript_source(&path) {
                vec![path]
            } else {
                Vec::new()
            }
        }
        Selection::Project(name) => {
            let projects = discover_projects(tree)?;
            let project = projects
                .iter()
                .find(|p| &p.name == name)
                .ok_or_else(|| MigrateError::ProjectNotFound(name.clone()))?;
            collect_sources(&project.root)?
        }
        Selection::AllProjects => {
            let mut files = Vec::new();
            for project in discover_projects(tree)? {
                debug!(project = %project.name, root = %project.root.display(), "プロジェクトを走査");
                files.extend(collect_sources(&project.root)?);
            }
            files
        }
    };

    // ネストしたプロジェクトで同じファイルが 2 回拾われることがある
    files.sort();
    files.dedup();
    Ok(files)
}

/// ディレクトリ以下の `.ts` ファイルを再帰的に集める
fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walk(dir) {
        let entry = entry?;
        if entry.file_type().is_file() && is_typescript_source(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

fn walk(dir: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

// `.d.ts` は宣言のみなので対象外
fn is_typescript_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "ts")
        && !path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".d.ts"))
}
