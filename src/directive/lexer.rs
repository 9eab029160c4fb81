//! Lexer for shader directive markers using logos
//!
//! Shader text is split into directive markers, the three delimiters that
//! matter for argument lists, and opaque runs of everything else. Every byte of
//! the input belongs to exactly one token, so slicing by span reproduces the
//! source verbatim.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `@sh` followed by a command name, e.g. `@shPropertyBool`
    #[regex(r"@sh[A-Za-z0-9_]*")]
    Directive,

    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,

    /// A lone `@` that does not start a directive
    #[token("@")]
    At,

    /// Anything else, passed through untouched
    #[regex(r"[^@(),]+")]
    Text,
}

/// Lex input string into tokens with spans
///
/// Bytes the lexer cannot classify are reported as [`Token::Text`] so that no
/// input is ever dropped.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Text), span))
}

/// Command name of a directive token: the slice without the leading `@`
pub fn command_name<'s>(source: &'s str, span: &Span) -> &'s str {
    &source[span.start + 1..span.end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_tokens() {
        let tokens: Vec<_> = lex("@shPropertyBool(x)").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Directive,
                Token::ParenOpen,
                Token::Text,
                Token::ParenClose
            ]
        );
    }

    #[test]
    fn test_command_name() {
        let src = "a @shGlobalSettingEqual(x, y)";
        let (_, span) = lex(src)
            .find(|(t, _)| *t == Token::Directive)
            .expect("directive token");
        assert_eq!(command_name(src, &span), "shGlobalSettingEqual");
    }

    #[test]
    fn test_lone_at_is_not_a_directive() {
        let tokens: Vec<_> = lex("a@b @s").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![Token::Text, Token::At, Token::Text, Token::At, Token::Text]
        );
    }

    #[test]
    fn test_spans_cover_whole_input() {
        let src = "float4 c = tex2D(s, uv) * @shPropertyString(tint);\n// ünïcode";
        let mut rebuilt = String::new();
        let mut last = 0;
        for (_, span) in lex(src) {
            assert_eq!(span.start, last);
            rebuilt.push_str(&src[span.clone()]);
            last = span.end;
        }
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn test_end_foreach_and_iteration() {
        let src = "@shForeach(2)@shIteration@shEndForeach";
        let names: Vec<_> = lex(src)
            .filter(|(t, _)| *t == Token::Directive)
            .map(|(_, s)| command_name(src, &s).to_string())
            .collect();
        assert_eq!(names, vec!["shForeach", "shIteration", "shEndForeach"]);
    }
}
