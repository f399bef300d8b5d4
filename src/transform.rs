use swc_ecma_ast::{Expr, ExprOrSpread};
use tracing::{debug, instrument, trace};

use crate::classifier::{classify_element, route_path};
use crate::config::RouteConvention;
use crate::emitter::{apply_edits, lazy_property_text};
use crate::error::TransformError;
use crate::locator::locate_route_arrays;
use crate::model::{EntryOutcome, EntryReport, SkipReason, TextEdit};
use crate::parser::{parse_source, ParsedSource};
use crate::resolver::resolve_reference;
use crate::symbols::SymbolTable;

const BOM: char = '\u{feff}';

/// ファイル 1 つ分の変換結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTransform {
    /// 変換後の全文。何も書き換えていなければ入力と同一
    pub output: String,
    pub entries: Vec<EntryReport>,
}

impl FileTransform {
    pub fn changed(&self, input: &str) -> bool {
        self.output != input
    }
}

/// ソース全文を受け取り、`component:` を `loadComponent:` に書き換えた全文を返す。
///
/// 認識できない形はすべてそのまま残す。パースできないソースだけがエラーになる。
#[instrument(level = "debug", skip(text, convention))]
pub fn transform_source(
    file_name: &str,
    text: &str,
    convention: &RouteConvention,
) -> Result<FileTransform, TransformError> {
    let (bom, body) = match text.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let parsed = parse_source(file_name, body)?;
    let symbols = SymbolTable::build(&parsed.module);
    debug!(imports = symbols.len(), "import テーブルを作成");

    let (edits, entries) = plan_edits(&parsed, &symbols, convention);
    if edits.is_empty() {
        return Ok(FileTransform {
            output: text.to_string(),
            entries,
        });
    }

    let rewritten = apply_edits(body, edits);
    let output = if bom {
        format!("{BOM}{rewritten}")
    } else {
        rewritten
    };
    Ok(FileTransform { output, entries })
}

/// 各ルート配列の各要素を分類し、書き換えの編集とレポートを作る
fn plan_edits(
    parsed: &ParsedSource<'_>,
    symbols: &SymbolTable,
    convention: &RouteConvention,
) -> (Vec<TextEdit>, Vec<EntryReport>) {
    let mut edits = Vec::new();
    let mut entries = Vec::new();

    for candidate in locate_route_arrays(parsed, symbols, convention) {
        debug!(
            declaration = %candidate.name,
            ty = %candidate.declared_type_name,
            elements = candidate.elements.len(),
            "ルート配列を発見"
        );

        for (index, element) in candidate.elements.iter().enumerate() {
            let element = element.as_ref();
            let outcome = entry_outcome(parsed, element, symbols, convention);
            let route_path = match element.map(|e| &*e.expr) {
                Some(Expr::Object(obj)) => route_path(obj),
                _ => None,
            };

            let report = match outcome {
                EntryOutcome::Rewrite { reference, edit } => {
                    trace!(index, module = %reference.module_specifier, name = %reference.exported_name, "書き換え");
                    edits.push(edit);
                    EntryReport {
                        declaration: candidate.name.clone(),
                        index,
                        route_path,
                        rewritten: Some(reference),
                        skipped: None,
                    }
                }
                EntryOutcome::Skip(reason) => {
                    trace!(index, ?reason, "スキップ");
                    EntryReport {
                        declaration: candidate.name.clone(),
                        index,
                        route_path,
                        rewritten: None,
                        skipped: Some(reason),
                    }
                }
            };
            entries.push(report);
        }
    }

    (edits, entries)
}

fn entry_outcome(
    parsed: &ParsedSource<'_>,
    element: Option<&ExprOrSpread>,
    symbols: &SymbolTable,
    convention: &RouteConvention,
) -> EntryOutcome {
    let eager = match classify_element(element, convention) {
        Ok(eager) => eager,
        Err(reason) => return EntryOutcome::Skip(reason),
    };
    let reference = match resolve_reference(&eager.reference, symbols) {
        Ok(reference) => reference,
        Err(reason) => return EntryOutcome::Skip(reason),
    };
    let Some(range) = parsed.byte_range(eager.property_span) else {
        return EntryOutcome::Skip(SkipReason::UnsupportedShape);
    };

    let edit = TextEdit {
        start: range.start,
        end: range.end,
        replacement: lazy_property_text(&reference, convention),
    };
    EntryOutcome::Rewrite { reference, edit }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(src: &str) -> FileTransform {
        transform_source("libs/my-file.ts", src, &RouteConvention::default()).unwrap()
    }

    #[test]
    fn single_route_is_converted() {
        let src = "
import { Routes } from '@angular/router';
import { MenuListComponent } from './menu-list/menu-list.component';

export const MenuRoutes: Routes = [
  {
    path: 'menu',
    component: MenuListComponent
  },
];
";
        let expected = "
import { Routes } from '@angular/router';
import { MenuListComponent } from './menu-list/menu-list.component';

export const MenuRoutes: Routes = [
  {
    path: 'menu',
    loadComponent: () => import('./menu-list/menu-list.component').then((c) => c.MenuListComponent)
  },
];
";
        let out = run(src);
        assert_eq!(out.output, expected);
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].route_path.as_deref(), Some("menu"));
    }

    #[test]
    fn inline_entry_keeps_surrounding_text() {
        let src = "import { Routes } from '@angular/router';\n\
                   import { MenuListComponent } from './menu-list/menu-list.component';\n\
                   export const r: Routes = [{ path: 'menu', component: MenuListComponent }];\n";
        let out = run(src);
        assert!(out.output.ends_with(
            "export const r: Routes = [{ path: 'menu', loadComponent: () => import('./menu-list/menu-list.component').then((c) => c.MenuListComponent) }];\n"
        ));
    }

    #[test]
    fn multiple_routes_are_all_converted() {
        let src = "
import { Routes } from '@angular/router';
import { MenuListComponent } from './menu-list/menu-list.component';
import { HelpComponent } from '@/help.component';

export const MenuRoutes: Routes = [
  {
    path: 'menu',
    component: MenuListComponent
  },
  {
    path: 'help',
    component: HelpComponent
  },
];
";
        let out = run(src);
        assert!(out.output.contains(
            "loadComponent: () => import('./menu-list/menu-list.component').then((c) => c.MenuListComponent)"
        ));
        assert!(out.output.contains(
            "loadComponent: () => import('@/help.component').then((c) => c.HelpComponent)"
        ));
        assert!(!out.output.contains("component:"));
    }

    #[test]
    fn aliased_import_uses_real_name() {
        let src = "
import { Routes } from '@angular/router';
import { MenuListComponent as FooComponent } from './menu-list/menu-list.component';

export const MenuRoutes: Routes = [
  {
    path: 'menu',
    component: FooComponent
  },
];
";
        let out = run(src);
        assert!(out.output.contains(".then((c) => c.MenuListComponent)"));
        assert!(!out.output.contains("c.FooComponent"));
    }

    #[test]
    fn namespace_import_is_converted() {
        let src = "
import { Routes } from '@angular/router';
import * as Components from './components';

export const MenuRoutes: Routes = [
  {
    path: 'menu',
    component: Components.MenuListComponent
  },
];
";
        let out = run(src);
        assert!(out.output.contains(
            "loadComponent: () => import('./components').then((c) => c.MenuListComponent)"
        ));
    }

    #[test]
    fn routes_with_load_component_are_untouched() {
        let src = "
import { Routes } from '@angular/router';
import { MenuListComponent } from './menu-list/menu-list.component';

export const MenuRoutes: Routes = [
  {
    path: 'menu',
    component: MenuListComponent,
    loadComponent: () => import('./menu-list/menu-list.component').then(m => m.MenuListComponent)
  },
  {
    path: 'help',
    loadComponent: () => import('@/help.component').then(m => m.HelpComponent)
  },
];
";
        let out = run(src);
        assert_eq!(out.output, src);
        assert!(!out.changed(src));
        assert!(out
            .entries
            .iter()
            .all(|e| e.skipped == Some(SkipReason::AlreadyLazy)));
    }

    #[test]
    fn untyped_route_arrays_are_untouched() {
        let src = "
import { MenuListComponent } from './menu-list/menu-list.component';

export const MenuRoutes = [
  {
    path: 'menu',
    component: MenuListComponent,
  }
];
";
        let out = run(src);
        assert_eq!(out.output, src);
        assert!(out.entries.is_empty());
    }

    #[test]
    fn routes_from_other_router_are_untouched() {
        let src = "
import { Routes } from '@awesome/router';
import { MenuListComponent } from './menu-list/menu-list.component';

export const MenuRoutes: Routes = [
  {
    path: 'menu',
    component: MenuListComponent
  },
];
";
        assert_eq!(run(src).output, src);
    }

    #[test]
    fn mixed_array_rewrites_exactly_one_entry() {
        let src = "import { Routes } from '@angular/router';
import { A } from './a';
import { B } from './b';
export const routes: Routes = [
  { path: 'a', component: A, loadComponent: () => import('./a').then((m) => m.A) },
  { path: 'b', /* keep */ component: B, data: { title: 'B' } },
];
";
        let out = run(src);
        let rewritten: Vec<_> = out.entries.iter().filter(|e| e.rewritten.is_some()).collect();
        assert_eq!(rewritten.len(), 1);
        assert_eq!(rewritten[0].route_path.as_deref(), Some("b"));
        assert_eq!(
            out.output,
            "import { Routes } from '@angular/router';
import { A } from './a';
import { B } from './b';
export const routes: Routes = [
  { path: 'a', component: A, loadComponent: () => import('./a').then((m) => m.A) },
  { path: 'b', /* keep */ loadComponent: () => import('./b').then((c) => c.B), data: { title: 'B' } },
];
"
        );
    }

    #[test]
    fn transform_is_idempotent() {
        let src = "import { Routes } from '@angular/router';
import { A } from './a';
import * as Pages from './pages';
export const routes: Routes = [
  { path: 'a', component: A },
  { path: 'p', component: Pages.Home },
  { path: '', redirectTo: 'a', pathMatch: 'full' },
];
";
        let once = run(src).output;
        let twice = run(&once).output;
        assert_ne!(once, src);
        assert_eq!(twice, once);
    }

    #[test]
    fn unresolved_and_unsupported_entries_are_reported_not_rewritten() {
        let src = "import { Routes } from '@angular/router';
const Local = class {};
export const routes: Routes = [
  { path: 'local', component: Local },
  { path: 'deep', component: a.b.c },
  ...extraRoutes,
];
";
        let out = run(src);
        assert_eq!(out.output, src);
        let reasons: Vec<_> = out.entries.iter().filter_map(|e| e.skipped.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::Unresolved("Local".into()),
                SkipReason::UnsupportedShape,
                SkipReason::NotObjectLiteral,
            ]
        );
    }

    #[test]
    fn byte_order_mark_is_preserved() {
        let src = "\u{feff}import { Routes } from '@angular/router';
import { A } from './a';
export const routes: Routes = [{ component: A }];
";
        let out = run(src);
        assert!(out.output.starts_with('\u{feff}'));
        assert!(out
            .output
            .ends_with("[{ loadComponent: () => import('./a').then((c) => c.A) }];\n"));
    }

    #[test]
    fn non_ascii_text_before_the_edit_is_preserved() {
        let src = "// メニュー画面のルート定義
import { Routes } from '@angular/router';
import { A } from './a';
export const routes: Routes = [{ title: 'メニュー', component: A }];
";
        let out = run(src);
        assert!(out.output.starts_with("// メニュー画面のルート定義\n"));
        assert!(out.output.contains(
            "[{ title: 'メニュー', loadComponent: () => import('./a').then((c) => c.A) }]"
        ));
    }

    #[test]
    fn parse_errors_are_returned() {
        let err = transform_source("bad.ts", "export const = [", &RouteConvention::default());
        assert!(err.is_err());
    }
}
