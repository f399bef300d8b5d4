use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Span};
use swc_ecma_ast::Module;
use swc_ecma_parser::{lexer::Lexer, Parser as SwcParser, StringInput, Syntax, TsConfig};

use crate::error::TransformError;

/// パース済みのソース。ファイル 1 つの変換が終わるまでだけ保持する
pub struct ParsedSource<'a> {
    pub module: Module,
    /// パースしたテキスト (BOM を除いたもの)
    text: &'a str,
    /// SourceMap 上でこのファイルが始まる位置
    start_pos: BytePos,
}

impl<'a> ParsedSource<'a> {
    /// Span を `text` 上のバイト範囲に変換する
    pub fn byte_range(&self, span: Span) -> Option<std::ops::Range<usize>> {
        let lo = span.lo.0.checked_sub(self.start_pos.0)? as usize;
        let hi = span.hi.0.checked_sub(self.start_pos.0)? as usize;
        (lo <= hi && hi <= self.text.len()).then_some(lo..hi)
    }

    /// Span が指すソーステキストをそのまま返す
    pub fn snippet(&self, span: Span) -> Option<&'a str> {
        let range = self.byte_range(span)?;
        self.text.get(range)
    }
}

/// TypeScript としてソースをパースする。
///
/// 回復可能なエラーが 1 つでもあれば失敗扱いにする。
/// 壊れた木の上で書き換えるよりも、ファイルごと触らない方が安全なため。
pub fn parse_source<'a>(file_name: &str, text: &'a str) -> Result<ParsedSource<'a>, TransformError> {
    let cm: Lrc<SourceMap> = Default::default();

    let fm = cm.new_source_file(FileName::Custom(file_name.to_string()), text.to_string());

    // TypeScript構文でパースする設定
    let syntax = Syntax::Typescript(TsConfig {
        tsx: false,
        decorators: true,
        dts: false,
        no_early_errors: true,
        disallow_ambiguous_jsx_like: true,
    });

    let lexer = Lexer::new(
        syntax,
        Default::default(), // es version
        StringInput::from(&*fm),
        None,
    );

    let mut parser = SwcParser::new_from(lexer);

    let module = parser
        .parse_module()
        .map_err(|e| TransformError::Parse(format!("{:?}", e.kind())))?;

    if let Some(first) = parser.take_errors().into_iter().next() {
        return Err(TransformError::Parse(format!("{:?}", first.kind())));
    }

    Ok(ParsedSource {
        module,
        text,
        start_pos: fm.start_pos,
    })
}
