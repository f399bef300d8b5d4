use swc_common::Spanned;
use swc_ecma_ast::*;

use crate::config::RouteConvention;
use crate::model::BindingKind;
use crate::parser::ParsedSource;
use crate::symbols::SymbolTable;

/// `Routes` 型で宣言されたトップレベル変数 1 つ
#[derive(Debug)]
pub struct RouteArrayCandidate<'m> {
    /// 変数名 (例: "MenuRoutes")
    pub name: String,
    /// 型注釈のテキスト
    pub declared_type_name: String,
    /// 初期化子の配列要素
    pub elements: &'m [Option<ExprOrSpread>],
}

/// `Routes` が router モジュールから名前付き import されているか
pub fn routes_type_is_imported(symbols: &SymbolTable, convention: &RouteConvention) -> bool {
    symbols
        .lookup(&convention.routes_type, BindingKind::Named)
        .is_some_and(|b| b.module_specifier == convention.router_module)
}

/// トップレベルの変数宣言から、書き換え対象のルート配列を集める
pub fn locate_route_arrays<'m>(
    parsed: &'m ParsedSource<'_>,
    symbols: &SymbolTable,
    convention: &RouteConvention,
) -> Vec<RouteArrayCandidate<'m>> {
    // 別モジュールの同名型 (`import { Routes } from '@awesome/router'`) は対象外
    if !routes_type_is_imported(symbols, convention) {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for item in &parsed.module.body {
        let var_decl = match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::Var(var),
                ..
            })) => var,
            _ => continue,
        };

        for declarator in &var_decl.decls {
            if let Some(candidate) = candidate_from_declarator(parsed, declarator, convention) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

fn candidate_from_declarator<'m>(
    parsed: &ParsedSource<'_>,
    declarator: &'m VarDeclarator,
    convention: &RouteConvention,
) -> Option<RouteArrayCandidate<'m>> {
    let Pat::Ident(BindingIdent { id, type_ann }) = &declarator.name else {
        return None;
    };
    let type_ann = type_ann.as_ref()?;
    let declared_type_name = parsed.snippet(type_ann.type_ann.span())?.trim();
    if declared_type_name != convention.routes_type {
        return None;
    }

    // 配列リテラル以外 (`[...] as Routes` や関数呼び出し) は黙って飛ばす
    let Expr::Array(ArrayLit { elems, .. }) = declarator.init.as_deref()? else {
        return None;
    };

    Some(RouteArrayCandidate {
        name: id.sym.to_string(),
        declared_type_name: declared_type_name.to_string(),
        elements: elems,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn names(src: &str) -> Vec<String> {
        let parsed = parse_source("routes.ts", src).unwrap();
        let symbols = SymbolTable::build(&parsed.module);
        locate_route_arrays(&parsed, &symbols, &RouteConvention::default())
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn finds_exported_and_plain_declarations() {
        let found = names(
            "import { Routes } from '@angular/router';\n\
             export const MenuRoutes: Routes = [{ path: 'menu' }];\n\
             const adminRoutes: Routes = [], other = 1;\n\
             let lateRoutes: Routes = [];\n",
        );
        assert_eq!(found, vec!["MenuRoutes", "adminRoutes", "lateRoutes"]);
    }

    #[test]
    fn rejects_routes_imported_from_another_module() {
        let found = names(
            "import { Routes } from '@awesome/router';\n\
             export const MenuRoutes: Routes = [];\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn rejects_untyped_and_differently_typed_declarations() {
        let found = names(
            "import { Routes, Route } from '@angular/router';\n\
             export const untyped = [];\n\
             export const single: Route[] = [];\n\
             export const generic: Array<Routes> = [];\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn skips_non_array_initializers() {
        let found = names(
            "import { Routes } from '@angular/router';\n\
             export const asserted: Routes = [] as Routes;\n\
             export const built: Routes = buildRoutes();\n\
             export declare const declared: Routes;\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn ignores_nested_declarations() {
        let found = names(
            "import { Routes } from '@angular/router';\n\
             function make() { const inner: Routes = []; return inner; }\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn aliased_routes_import_does_not_qualify() {
        let found = names(
            "import { Routes as R } from '@angular/router';\n\
             export const a: R = [];\n\
             export const b: Routes = [];\n",
        );
        assert!(found.is_empty());
    }
}
