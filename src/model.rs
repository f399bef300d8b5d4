// src/model.rs
use serde::Serialize;
use std::path::PathBuf;

/// import 文が導入する束縛の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingKind {
    /// `import { X }` / `import { X as Y }`
    Named,
    /// `import * as NS from '...'`
    Namespace,
}

/// import 文 1 つ分の解決済み束縛
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// ローカルで使える識別子 (エイリアス名、または名前空間名)
    pub local_name: String,
    /// エクスポート元での本来の名前。名前空間 import では `None`
    pub original_name: Option<String>,
    /// import 文に書かれたモジュール指定子 (そのまま保持)
    pub module_specifier: String,
    pub kind: BindingKind,
}

/// 遅延ロードに書き換えるべき参照先
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReference {
    pub module_specifier: String,
    pub exported_name: String,
}

/// ルートエントリを書き換えずに残した理由
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "camelCase")]
pub enum SkipReason {
    /// 配列要素がオブジェクトリテラルではない (スプレッド、識別子など)
    NotObjectLiteral,
    /// `loadComponent` が既に存在する
    AlreadyLazy,
    /// `component` を持たない (redirect のみのルートなど)
    NoComponent,
    /// `component` の値が識別子でも 1 段のメンバアクセスでもない
    UnsupportedShape,
    /// 識別子がどの import にも辿れない
    Unresolved(String),
    /// 文字列リテラル名でエクスポートされており `c.<name>` で参照できない
    UnsupportedExportName(String),
}

/// ソース上のバイト範囲を置き換える 1 件の編集
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// ルートエントリ 1 件の分類結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Skip(SkipReason),
    Rewrite {
        reference: ResolvedReference,
        edit: TextEdit,
    },
}

/// ルートエントリ 1 件の処理結果 (レポート用)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryReport {
    /// 定義されている変数名 (例: "MenuRoutes")
    pub declaration: String,
    /// 配列内のインデックス
    pub index: usize,
    /// `path: '...'` が文字列リテラルなら、その値
    pub route_path: Option<String>,
    /// 書き換えた場合の参照先
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten: Option<ResolvedReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

/// ファイル 1 つ分の変換結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// このファイルへの絶対パス
    pub path: PathBuf,
    /// 書き換えが発生したか
    pub changed: bool,
    /// パースに失敗した場合のメッセージ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    pub entries: Vec<EntryReport>,
}

impl FileReport {
    pub fn rewritten_count(&self) -> usize {
        self.entries.iter().filter(|e| e.rewritten.is_some()).count()
    }
}

/// 実行全体のレポート。`--json` でそのまま標準出力に出す
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub dry_run: bool,
    /// 事前フィルタを通過して解析したファイル数
    pub scanned: usize,
    pub files: Vec<FileReport>,
    /// 実際にディスクへ書き込んだファイル
    pub written: Vec<PathBuf>,
}

impl RunReport {
    pub fn changed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.changed)
    }
}
