use crate::config::RouteConvention;
use crate::model::{ResolvedReference, TextEdit};

/// 置き換え後のプロパティテキストを組み立てる
///
/// ```text
/// loadComponent: () => import('./menu-list/menu-list.component').then((c) => c.MenuListComponent)
/// ```
pub fn lazy_property_text(reference: &ResolvedReference, convention: &RouteConvention) -> String {
    format!(
        "{key}: () => import('{module}').then(({param}) => {param}.{name})",
        key = convention.lazy_key,
        module = escape_single_quoted(&reference.module_specifier),
        param = convention.callback_param,
        name = reference.exported_name,
    )
}

/// 単一引用符の文字列リテラルに入れられるようにエスケープする
fn escape_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

/// 編集をまとめて適用する。
///
/// 後ろの編集から順に当てるので、前方のオフセットはずれない。
/// 範囲が重なる編集や文字境界にない編集は適用せずに捨てる。
pub fn apply_edits(source: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut out = source.to_string();
    // 直前に適用した編集の開始位置。これより後ろにかかる編集は重なっている
    let mut limit = source.len();
    for edit in edits {
        if edit.start > edit.end
            || edit.end > limit
            || !source.is_char_boundary(edit.start)
            || !source.is_char_boundary(edit.end)
        {
            tracing::warn!(start = edit.start, end = edit.end, "重なる編集を無視しました");
            continue;
        }
        out.replace_range(edit.start..edit.end, &edit.replacement);
        limit = edit.start;
    }
    out
}
