//! Scanning shader text for `#pragma include` directives.
//!
//! Only includes are recognized. Everything else, other preprocessor directives included,
//! is skipped over. Comments are tracked so that a commented-out include is not treated as
//! a dependency. Text is scanned as bytes, so comments in other encodings do not matter.

use std::ops::Range;

/// A single `#pragma include "token"` found in a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// The path or package name between the delimiters, decoded lossily if not UTF-8.
    pub token: String,

    /// Line on which the directive starts (1-based).
    pub line: usize,

    /// Byte range of the token within the source text, without the delimiters.
    pub span: Range<usize>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (line {line})")]
pub struct SyntaxError {
    pub message: &'static str,
    pub line: usize,
    pub span: Range<usize>,
}

/// Returns every include directive in `source`, in the order they appear.
pub fn parse_includes(source: impl AsRef<[u8]>) -> Result<Vec<IncludeDirective>, SyntaxError> {
    Scanner::new(source.as_ref()).run()
}

struct Scanner<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a [u8]) -> Self {
        Scanner {
            source,
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        if self.peek() == Some(b'\n') {
            self.line += 1;
        }
        self.pos += 1;
    }

    fn run(mut self) -> Result<Vec<IncludeDirective>, SyntaxError> {
        let mut directives = Vec::new();

        while let Some(c) = self.peek() {
            match (c, self.peek_at(1)) {
                (b'/', Some(b'/')) => self.skip_line_comment(),
                (b'/', Some(b'*')) => self.skip_block_comment(),
                (b'#', _) => {
                    if let Some(directive) = self.directive()? {
                        directives.push(directive);
                    }
                }
                _ => self.bump(),
            }
        }

        Ok(directives)
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                b'\n' => break,
                // a backslash at the end of the line continues the comment
                b'\\' if self.peek_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump();
                }
                b'\\' if self.peek_at(1) == Some(b'\r') && self.peek_at(2) == Some(b'\n') => {
                    self.bump();
                    self.bump();
                    self.bump();
                }
                _ => self.bump(),
            }
        }
    }

    fn skip_block_comment(&mut self) {
        // opening `/*`
        self.bump();
        self.bump();

        while let Some(c) = self.peek() {
            if c == b'*' && self.peek_at(1) == Some(b'/') {
                self.bump();
                self.bump();
                return;
            }
            self.bump();
        }
    }

    /// Skips spaces, tabs and block comments, but never a line break.
    fn skip_inline_whitespace(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b' ' | b'\t'), _) => self.bump(),
                (Some(b'/'), Some(b'*')) => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn ident(&mut self) -> &'a [u8] {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.bump();
        }
        &self.source[start..self.pos]
    }

    /// Called with the cursor on a `#`. Consumes as much of the directive as needed to
    /// decide whether it is an include.
    fn directive(&mut self) -> Result<Option<IncludeDirective>, SyntaxError> {
        let start = self.pos;
        let line = self.line;
        self.bump();

        self.skip_inline_whitespace();
        if self.ident() != b"pragma" {
            return Ok(None);
        }

        self.skip_inline_whitespace();
        if self.ident() != b"include" {
            return Ok(None);
        }

        self.skip_inline_whitespace();
        let close = match self.peek() {
            Some(b'"') => b'"',
            Some(b'<') => b'>',
            _ => {
                return Err(SyntaxError {
                    message: "expected a quoted path after `#pragma include`",
                    line,
                    span: start..self.pos,
                })
            }
        };
        self.bump();

        let token_start = self.pos;
        loop {
            match self.peek() {
                Some(c) if c == close => break,
                None | Some(b'\n' | b'\r') => {
                    return Err(SyntaxError {
                        message: "unterminated include path",
                        line,
                        span: token_start..self.pos,
                    })
                }
                Some(_) => self.bump(),
            }
        }
        let span = token_start..self.pos;
        self.bump();

        if span.is_empty() {
            return Err(SyntaxError {
                message: "empty include path",
                line,
                span: start..self.pos,
            });
        }

        Ok(Some(IncludeDirective {
            token: String::from_utf8_lossy(&self.source[span.clone()]).into_owned(),
            line,
            span,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<String> {
        parse_includes(source)
            .unwrap()
            .into_iter()
            .map(|directive| directive.token)
            .collect()
    }

    #[test]
    fn finds_quoted_and_angled_includes() {
        let source = "#pragma include \"a.glsl\"\n#pragma include <noise/simplex>\n";
        assert_eq!(tokens(source), ["a.glsl", "noise/simplex"]);
    }

    #[test]
    fn records_line_and_span() {
        let source = "void main() {}\n\n  #pragma include \"lib/b.glsl\"\n";
        let directives = parse_includes(source).unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].line, 3);
        assert_eq!(&source[directives[0].span.clone()], "lib/b.glsl");
    }

    #[test]
    fn several_directives_on_one_line() {
        let source = r#"#pragma include "a.glsl" #pragma include "b.glsl""#;
        assert_eq!(tokens(source), ["a.glsl", "b.glsl"]);
    }

    #[test]
    fn tolerates_spacing_and_inline_comments() {
        let source = "#  pragma\tinclude /* note */ \"a.glsl\"";
        assert_eq!(tokens(source), ["a.glsl"]);
    }

    #[test]
    fn ignores_line_comments() {
        let source = "// #pragma include \"ignored.glsl\"\n#pragma include \"kept.glsl\"\n";
        assert_eq!(tokens(source), ["kept.glsl"]);
    }

    #[test]
    fn line_comment_continues_after_backslash() {
        let source = "// comment \\\n#pragma include \"ignored.glsl\"\n";
        assert!(tokens(source).is_empty());
    }

    #[test]
    fn ignores_block_comments_across_lines() {
        let source = "/*\n#pragma include \"ignored.glsl\"\n*/ #pragma include \"kept.glsl\"";
        let directives = parse_includes(source).unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].token, "kept.glsl");
        assert_eq!(directives[0].line, 3);
    }

    #[test]
    fn unterminated_block_comment_hides_the_rest() {
        let source = "/* #pragma include \"a.glsl\"\n#pragma include \"b.glsl\"";
        assert!(tokens(source).is_empty());
    }

    #[test]
    fn other_directives_are_not_includes() {
        let source = "#version 450\n#pragma optimize(on)\n#define include 1\n#include \"c.h\"\n";
        assert!(tokens(source).is_empty());
    }

    #[test]
    fn handles_crlf_line_endings() {
        let source = "// x\r\n#pragma include \"a.glsl\"\r\n#pragma include \"b.glsl\"\r\n";
        let directives = parse_includes(source).unwrap();
        assert_eq!(directives[0].line, 2);
        assert_eq!(directives[1].line, 3);
        assert_eq!(directives[1].token, "b.glsl");
    }

    #[test]
    fn scans_text_that_is_not_utf8() {
        let source = b"// caf\xe9 au lait\n#pragma include \"a.glsl\"\n/* \xff */\n";
        let directives = parse_includes(source).unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].token, "a.glsl");
        assert_eq!(directives[0].line, 2);
    }

    #[test]
    fn rejects_malformed_includes() {
        let missing = parse_includes("#pragma include a.glsl").unwrap_err();
        assert_eq!(missing.message, "expected a quoted path after `#pragma include`");

        let unterminated = parse_includes("\n#pragma include \"a.glsl\n").unwrap_err();
        assert_eq!(unterminated.message, "unterminated include path");
        assert_eq!(unterminated.line, 2);

        let empty = parse_includes("#pragma include <>").unwrap_err();
        assert_eq!(empty.message, "empty include path");
    }
}
