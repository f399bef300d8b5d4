use std::collections::HashMap;

use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

use crate::model::{BindingKind, ImportBinding};

/// ファイル 1 つ分の import テーブル (ローカル名 → 束縛)
#[derive(Debug, Default)]
pub struct SymbolTable {
    bindings: HashMap<String, ImportBinding>,
}

impl SymbolTable {
    /// モジュール内の import 文をすべて走査してテーブルを作る
    pub fn build(module: &Module) -> Self {
        let mut collector = ImportCollector::default();
        module.visit_with(&mut collector);
        collector.table
    }

    pub fn get(&self, local_name: &str) -> Option<&ImportBinding> {
        self.bindings.get(local_name)
    }

    /// `local_name` が `kind` の束縛として登録されていれば返す
    pub fn lookup(&self, local_name: &str, kind: BindingKind) -> Option<&ImportBinding> {
        self.get(local_name).filter(|b| b.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    // 同じローカル名が 2 度出てきたら最初のものを残す
    fn insert(&mut self, binding: ImportBinding) {
        self.bindings
            .entry(binding.local_name.clone())
            .or_insert(binding);
    }
}

#[derive(Default)]
struct ImportCollector {
    table: SymbolTable,
}

impl Visit for ImportCollector {
    fn visit_import_decl(&mut self, import: &ImportDecl) {
        let module_specifier = import.src.value.to_string();

        for specifier in &import.specifiers {
            match specifier {
                ImportSpecifier::Namespace(ImportStarAsSpecifier { local, .. }) => {
                    self.table.insert(ImportBinding {
                        local_name: local.sym.to_string(),
                        original_name: None,
                        module_specifier: module_specifier.clone(),
                        kind: BindingKind::Namespace,
                    });
                }
                ImportSpecifier::Named(ImportNamedSpecifier { local, imported, .. }) => {
                    let local_name = local.sym.to_string();
                    let original_name = match imported {
                        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                        Some(ModuleExportName::Str(s)) => s.value.to_string(),
                        None => local_name.clone(),
                    };
                    self.table.insert(ImportBinding {
                        local_name,
                        original_name: Some(original_name),
                        module_specifier: module_specifier.clone(),
                        kind: BindingKind::Named,
                    });
                }
                // default import は対象外
                ImportSpecifier::Default(_) => {}
            }
        }
    }
}
