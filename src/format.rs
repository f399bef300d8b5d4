use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

/// 書き換えたファイルだけに整形コマンドを実行する。
///
/// 整形は見た目だけの処理なので、失敗しても書き換え自体は取り消さない。
/// 戻り値は整形が成功したかどうか。
pub fn format_files(workspace_root: &Path, formatter: Option<&str>, files: &[PathBuf]) -> bool {
    if files.is_empty() {
        return true;
    }

    let (program, mut args) = match formatter {
        Some(cmd) => {
            let mut parts = cmd.split_whitespace().map(str::to_string);
            let Some(program) = parts.next() else {
                return false;
            };
            (PathBuf::from(program), parts.collect::<Vec<_>>())
        }
        None => {
            let prettier = workspace_root.join("node_modules").join(".bin").join("prettier");
            if !prettier.exists() {
                debug!("prettier が見つからないため整形をスキップ");
                return false;
            }
            (prettier, vec!["--write".to_string()])
        }
    };
    args.extend(files.iter().map(|f| f.display().to_string()));

    match Command::new(&program)
        .args(&args)
        .current_dir(workspace_root)
        .output()
    {
        Ok(output) if output.status.success() => {
            info!(files = files.len(), "整形完了");
            true
        }
        Ok(output) => {
            warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "整形コマンドが失敗しました (書き換えはそのまま残ります)"
            );
            false
        }
        Err(e) => {
            warn!(program = %program.display(), error = %e, "整形コマンドを起動できませんでした");
            false
        }
    }
}
