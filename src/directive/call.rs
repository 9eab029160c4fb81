//! Parsing of a single directive invocation `@shCommand(args...)`

use super::lexer::{command_name, Span, Token};

/// A parsed directive invocation
///
/// All string slices borrow from the text being scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveCall<'s> {
    /// Command name without the leading `@`, e.g. `shPropertyBool`
    pub command: &'s str,
    /// Span from the `@` through the closing `)`
    pub span: Span,
    /// Span of the text between the parentheses
    pub args_span: Span,
    /// Byte offsets of commas at nesting depth one
    commas: Vec<usize>,
    source: &'s str,
}

impl<'s> DirectiveCall<'s> {
    /// Parse the argument list of a directive whose marker token was just consumed
    ///
    /// `marker` is the span of the `@sh...` token. The next token must be `(`
    /// and the list runs to the balancing `)`. On failure the reason is
    /// returned as a short human-readable message.
    pub fn parse<I>(
        source: &'s str,
        marker: Span,
        tokens: &mut I,
    ) -> Result<Self, String>
    where
        I: Iterator<Item = (Token, Span)>,
    {
        let command = command_name(source, &marker);

        let open = match tokens.next() {
            Some((Token::ParenOpen, span)) if span.start == marker.end => span,
            _ => return Err(format!("expected '(' after @{}", command)),
        };

        let mut depth = 1usize;
        let mut commas = Vec::new();
        for (tok, span) in tokens.by_ref() {
            match tok {
                Token::ParenOpen => depth += 1,
                Token::ParenClose => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Self {
                            command,
                            span: marker.start..span.end,
                            args_span: open.end..span.start,
                            commas,
                            source,
                        });
                    }
                }
                Token::Comma if depth == 1 => commas.push(span.start),
                _ => {}
            }
        }

        Err("unterminated argument list, missing ')'".to_string())
    }

    /// Raw text between the parentheses
    pub fn arguments(&self) -> &'s str {
        &self.source[self.args_span.clone()]
    }

    /// The only argument of a one-argument directive
    pub fn single_argument(&self) -> Result<&'s str, String> {
        if !self.commas.is_empty() {
            return Err("expected a single argument".to_string());
        }
        let arg = self.arguments();
        if arg.is_empty() {
            return Err("missing argument".to_string());
        }
        Ok(arg)
    }

    /// Name and compared-against literal of a two-argument directive
    ///
    /// The literal is everything after the first top-level comma, with the
    /// spaces directly following the comma skipped.
    pub fn name_and_literal(&self) -> Result<(&'s str, &'s str), String> {
        let comma = *self
            .commas
            .first()
            .ok_or_else(|| "expected two arguments separated by ','".to_string())?;

        let name = &self.source[self.args_span.start..comma];
        if name.is_empty() {
            return Err("missing argument".to_string());
        }
        let literal = self.source[comma + 1..self.args_span.end].trim_start_matches(' ');
        Ok((name, literal))
    }
}
