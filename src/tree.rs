use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{MigrateError, Result};

/// ディスクの上に書き込み予定の内容を重ねた仮想ファイルツリー。
///
/// `write` は変更を溜めるだけで、`commit` を呼ぶまでディスクには触れない。
#[derive(Debug)]
pub struct Tree {
    root: PathBuf,
    staged: BTreeMap<PathBuf, String>,
}

impl Tree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Tree {
            root: root.into(),
            staged: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// ワークスペースルートからの相対パスを絶対パスにする
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn exists(&self, path: &Path) -> bool {
        let path = self.resolve(path);
        self.staged.contains_key(&path) || path.exists()
    }

    /// 書き込み予定の内容があればそれを、なければディスク上の内容を返す
    pub fn read(&self, path: &Path) -> Result<String> {
        let path = self.resolve(path);
        if let Some(text) = self.staged.get(&path) {
            return Ok(text.clone());
        }
        fs::read_to_string(&path).map_err(|e| MigrateError::io(path, e))
    }

    pub fn write(&mut self, path: &Path, text: String) {
        let path = self.resolve(path);
        self.staged.insert(path, text);
    }

    pub fn staged_paths(&self) -> impl Iterator<Item = &Path> {
        self.staged.keys().map(PathBuf::as_path)
    }

    /// 溜めた変更をディスクに書き出す。
    ///
    /// 各ファイルは同じディレクトリの一時ファイルに書いてから rename するので、
    /// 書きかけの内容が見えることはない。
    pub fn commit(&mut self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (path, text) in std::mem::take(&mut self.staged) {
            write_atomically(&path, &text)?;
            debug!(path = %path.display(), "書き込み完了");
            written.push(path);
        }
        Ok(written)
    }
}

fn write_atomically(path: &Path, text: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| MigrateError::io(dir, e))?;
    tmp.write_all(text.as_bytes())
        .map_err(|e| MigrateError::io(tmp.path(), e))?;

    // 元ファイルのパーミッションを引き継ぐ
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| MigrateError::io(path, e))?;
    }

    tmp.persist(path).map_err(|source| MigrateError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
