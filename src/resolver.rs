use crate::classifier::EagerReference;
use crate::model::{BindingKind, ResolvedReference, SkipReason};
use crate::symbols::SymbolTable;

/// `component:` の参照を、同じファイルの import テーブルだけを使って
/// モジュール指定子とエクスポート名に解決する。
///
/// - `X` → 名前付き import を探し、エイリアスではなく本来の名前を使う
/// - `NS.X` → 名前空間 import を探し、`X` をそのままエクスポート名にする
///
/// どの import にも辿れない識別子 (ファイル内で定義されたコンポーネントなど) は
/// `Unresolved` として書き換えない。
pub fn resolve_reference(
    reference: &EagerReference,
    symbols: &SymbolTable,
) -> Result<ResolvedReference, SkipReason> {
    match reference {
        EagerReference::Identifier(name) => {
            let binding = symbols
                .lookup(name, BindingKind::Named)
                .ok_or_else(|| SkipReason::Unresolved(name.clone()))?;
            let exported_name = binding
                .original_name
                .clone()
                .unwrap_or_else(|| binding.local_name.clone());
            if !is_identifier_name(&exported_name) {
                return Err(SkipReason::UnsupportedExportName(exported_name));
            }
            Ok(ResolvedReference {
                module_specifier: binding.module_specifier.clone(),
                exported_name,
            })
        }
        EagerReference::Qualified { namespace, member } => {
            let binding = symbols
                .lookup(namespace, BindingKind::Namespace)
                .ok_or_else(|| SkipReason::Unresolved(format!("{namespace}.{member}")))?;
            Ok(ResolvedReference {
                module_specifier: binding.module_specifier.clone(),
                exported_name: member.clone(),
            })
        }
    }
}

/// `c.<name>` としてそのまま書ける名前か
fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first == '$' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}
