// src/main.rs

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use path_absolutize::Absolutize;
use tracing::error;

use angular_lazy_routes::logging::init_tracing;
use angular_lazy_routes::{run, MigrateOptions, RouteConvention};

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "angular-lazy-routes",
    version,
    about = "Angular の Routes 配列にある component を loadComponent (遅延ロード) に書き換える CLI ツール"
)]
struct Cli {
    /// ワークスペースのルート (package.json があるディレクトリ)
    #[arg(short = 'r', long = "workspace-root", value_name = "DIR", default_value = ".")]
    workspace_root: PathBuf,

    /// 変換するファイルまたはディレクトリ (--project とは同時に指定できない)
    #[arg(long, value_name = "PATH")]
    path: Option<PathBuf>,

    /// 変換するプロジェクト名 (project.json の name / angular.json のキー)
    #[arg(long, value_name = "NAME")]
    project: Option<String>,

    /// 書き込みを行わずに結果だけを表示する
    #[arg(long)]
    dry_run: bool,

    /// 結果のレポートを JSON で標準出力に出す
    #[arg(long)]
    json: bool,

    /// 書き換えたファイルの整形を行わない
    #[arg(long)]
    skip_format: bool,

    /// 整形に使うコマンド (既定: node_modules/.bin/prettier --write)
    #[arg(long, value_name = "CMD")]
    formatter: Option<String>,

    /// 並列に処理するファイル数
    #[arg(short = 'j', long, value_name = "N")]
    jobs: Option<usize>,

    /// 詳細なログを出す
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let workspace_root = cli
        .workspace_root
        .absolutize()
        .context("ワークスペースルートを絶対パスにできません")?
        .to_path_buf();

    let options = MigrateOptions {
        workspace_root,
        path: cli.path,
        project: cli.project,
        dry_run: cli.dry_run,
        skip_format: cli.skip_format,
        formatter: cli.formatter,
        jobs: cli.jobs,
        convention: RouteConvention::default(),
    };

    let report = run(&options)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{}", json);
    }
    Ok(())
}
