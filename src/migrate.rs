use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::config::RouteConvention;
use crate::error::{MigrateError, Result};
use crate::format::format_files;
use crate::model::{FileReport, RunReport};
use crate::transform::transform_source;
use crate::tree::Tree;
use crate::workspace::{check_angular_dependency, resolve_selection, Selection};

/// 1 回の実行の設定
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// ワークスペースルート (絶対パス)
    pub workspace_root: PathBuf,
    /// 変換するファイル (ワークスペースルートからの相対パスも可)
    pub path: Option<PathBuf>,
    /// 変換するプロジェクト名
    pub project: Option<String>,
    /// 書き込みを行わない
    pub dry_run: bool,
    /// 整形をスキップ
    pub skip_format: bool,
    /// 整形コマンド。`None` なら `node_modules/.bin/prettier --write`
    pub formatter: Option<String>,
    /// 並列数。`None` なら CPU 数
    pub jobs: Option<usize>,
    pub convention: RouteConvention,
}

/// 1 ファイル分の読み込み結果
struct SourceFile {
    path: PathBuf,
    text: String,
}

/// ワークスペースに対して `component` → `loadComponent` の変換を実行する。
///
/// `@angular/core` の確認、`--path`/`--project` の矛盾、存在しないパスは
/// 実行全体のエラーになる。プロジェクトが見つからない場合はエラーをログに出して
/// 何も変更せずに終わる。
pub fn run(options: &MigrateOptions) -> Result<RunReport> {
    let mut tree = Tree::new(&options.workspace_root);

    // 1) ソースを読む前に依存関係を確認
    check_angular_dependency(&tree)?;

    // 2) 対象ファイルを決める
    let selection = Selection::from_options(options.path.clone(), options.project.clone())?;
    let paths = match resolve_selection(&tree, &selection) {
        Ok(paths) => paths,
        Err(MigrateError::ProjectNotFound(name)) => {
            error!("\"{name}\" project not found");
            return Ok(RunReport {
                dry_run: options.dry_run,
                ..RunReport::default()
            });
        }
        Err(e) => return Err(e),
    };
    debug!(candidates = paths.len(), "対象ファイルを収集");

    // 3) 読み込みと事前フィルタ
    let sources = read_sources(&tree, paths, &options.convention);
    info!(files = sources.len(), "解析開始");

    // 4) ファイル単位で並列に変換
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.unwrap_or(0))
        .build()?;
    let results: Vec<(FileReport, Option<String>)> = pool.install(|| {
        sources
            .par_iter()
            .map(|source| transform_file(source, &options.convention))
            .collect()
    });

    // 5) 変更のあったファイルだけを書き込み予定にする
    let mut report = RunReport {
        dry_run: options.dry_run,
        scanned: sources.len(),
        ..RunReport::default()
    };
    for (file_report, output) in results {
        if let Some(output) = output {
            info!(
                path = %file_report.path.display(),
                rewritten = file_report.rewritten_count(),
                "変換"
            );
            tree.write(&file_report.path, output);
        }
        report.files.push(file_report);
    }

    if options.dry_run {
        info!(
            changed = report.changed_files().count(),
            "dry run のため書き込みません"
        );
        return Ok(report);
    }

    report.written = tree.commit()?;

    if !options.skip_format {
        format_files(
            &options.workspace_root,
            options.formatter.as_deref(),
            &report.written,
        );
    }

    info!(
        "Conversion completed. Please check the content and run your formatter as needed."
    );
    Ok(report)
}

fn read_sources(tree: &Tree, paths: Vec<PathBuf>, convention: &RouteConvention) -> Vec<SourceFile> {
    let mut sources = Vec::new();
    for path in paths {
        let text = match tree.read(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "ファイルを読めませんでした");
                continue;
            }
        };
        if !convention.may_contain_routes(&text) {
            continue;
        }
        sources.push(SourceFile { path, text });
    }
    sources
}

fn transform_file(source: &SourceFile, convention: &RouteConvention) -> (FileReport, Option<String>) {
    let name = source.path.display().to_string();
    match transform_source(&name, &source.text, convention) {
        Ok(result) => {
            let changed = result.changed(&source.text);
            let report = FileReport {
                path: source.path.clone(),
                changed,
                parse_error: None,
                entries: result.entries,
            };
            (report, changed.then_some(result.output))
        }
        Err(e) => {
            warn!(path = %name, error = %e, "パースに失敗したためスキップ");
            let report = FileReport {
                path: source.path.clone(),
                changed: false,
                parse_error: Some(e.to_string()),
                entries: Vec::new(),
            };
            (report, None)
        }
    }
}
