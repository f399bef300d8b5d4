/// 変換エンジンが照合する名前の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConvention {
    /// `Routes` を import すべきモジュール
    pub router_module: String,
    /// ルート配列の型名
    pub routes_type: String,
    /// 書き換え前のプロパティ名
    pub eager_key: String,
    /// 書き換え後のプロパティ名
    pub lazy_key: String,
    /// `.then((c) => c.X)` のコールバック引数名
    pub callback_param: String,
}

impl Default for RouteConvention {
    fn default() -> Self {
        RouteConvention {
            router_module: "@angular/router".to_string(),
            routes_type: "Routes".to_string(),
            eager_key: "component".to_string(),
            lazy_key: "loadComponent".to_string(),
            callback_param: "c".to_string(),
        }
    }
}

impl RouteConvention {
    /// 安価な事前チェック。
    /// エンジン側の判定に必要な文字列がすべて含まれていなければ解析しない。
    pub fn may_contain_routes(&self, text: &str) -> bool {
        text.contains(&self.router_module)
            && text.contains(&self.routes_type)
            && text.contains(&self.eager_key)
    }
}
