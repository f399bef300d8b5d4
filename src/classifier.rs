use swc_common::{Span, Spanned};
use swc_ecma_ast::*;

use crate::config::RouteConvention;
use crate::model::SkipReason;

/// `component:` の値として受け付ける式の形
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EagerReference {
    /// `component: MenuListComponent`
    Identifier(String),
    /// `component: Components.MenuListComponent`
    Qualified { namespace: String, member: String },
}

/// 書き換え候補のエントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EagerEntry {
    pub reference: EagerReference,
    /// `component: X` のキー先頭から値の末尾まで
    pub property_span: Span,
}

/// 配列要素 1 つを分類する
pub fn classify_element(
    element: Option<&ExprOrSpread>,
    convention: &RouteConvention,
) -> Result<EagerEntry, SkipReason> {
    match element {
        Some(ExprOrSpread { spread: None, expr }) => match &**expr {
            Expr::Object(obj) => classify_route_object(obj, convention),
            _ => Err(SkipReason::NotObjectLiteral),
        },
        _ => Err(SkipReason::NotObjectLiteral),
    }
}

/// ルートオブジェクト (例: `{ path: 'menu', component: MenuListComponent }`) を分類する
pub fn classify_route_object(
    obj: &ObjectLit,
    convention: &RouteConvention,
) -> Result<EagerEntry, SkipReason> {
    // キーの存在だけを見る。値が関数かどうかは問わない
    if find_property(obj, &convention.lazy_key).is_some() {
        return Err(SkipReason::AlreadyLazy);
    }

    let prop = find_property(obj, &convention.eager_key).ok_or(SkipReason::NoComponent)?;
    let Prop::KeyValue(KeyValueProp { key, value }) = prop else {
        return Err(SkipReason::UnsupportedShape);
    };

    let reference = match &**value {
        Expr::Ident(ident) => EagerReference::Identifier(ident.sym.to_string()),
        Expr::Member(MemberExpr {
            obj,
            prop: MemberProp::Ident(member),
            ..
        }) => match &**obj {
            Expr::Ident(namespace) => EagerReference::Qualified {
                namespace: namespace.sym.to_string(),
                member: member.sym.to_string(),
            },
            // `a.b.c` のような多段アクセスは扱わない
            _ => return Err(SkipReason::UnsupportedShape),
        },
        _ => return Err(SkipReason::UnsupportedShape),
    };

    Ok(EagerEntry {
        reference,
        property_span: key.span().to(value.span()),
    })
}

/// `path: '...'` が文字列リテラルならその値を返す
pub fn route_path(obj: &ObjectLit) -> Option<String> {
    match find_property(obj, "path")? {
        Prop::KeyValue(KeyValueProp { value, .. }) => match &**value {
            Expr::Lit(Lit::Str(Str { value: s, .. })) => Some(s.to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// 指定した名前のプロパティを探す (ショートハンドやメソッドも含む)
fn find_property<'o>(obj: &'o ObjectLit, name: &str) -> Option<&'o Prop> {
    obj.props.iter().find_map(|prop| match prop {
        PropOrSpread::Prop(prop) if property_name(prop) == Some(name) => Some(&**prop),
        _ => None,
    })
}

fn property_name(prop: &Prop) -> Option<&str> {
    let key = match prop {
        Prop::Shorthand(ident) => return Some(&*ident.sym),
        Prop::KeyValue(KeyValueProp { key, .. }) => key,
        Prop::Getter(GetterProp { key, .. }) => key,
        Prop::Setter(SetterProp { key, .. }) => key,
        Prop::Method(MethodProp { key, .. }) => key,
        Prop::Assign(_) => return None,
    };
    match key {
        PropName::Ident(ident) => Some(&*ident.sym),
        PropName::Str(s) => Some(&*s.value),
        _ => None,
    }
}
