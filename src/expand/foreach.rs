//! Loop unrolling: `@shForeach(N) body @shEndForeach`
//!
//! Blocks pair up by depth: the first `@shEndForeach` closes the closest
//! `@shForeach` before it. Innermost blocks are unrolled first, so an
//! `@shIteration` always takes the index of its nearest enclosing loop.

use crate::directive::lexer::command_name;
use crate::directive::{lex, DirectiveCall, Span, Token, END_FOREACH, FOREACH, ITERATION};
use crate::error::ExpandError;

/// One `@shForeach ... @shEndForeach` block
#[derive(Debug, Clone, PartialEq)]
struct Block {
    /// From the `@` of `@shForeach` through the end of `@shEndForeach`
    span: Span,
    /// Text between the `)` of the header and `@shEndForeach`
    body: Span,
    count: usize,
}

/// Unroll every foreach block in `text`
///
/// `shader` names the shader in diagnostics.
pub fn unroll(text: &str, shader: &str) -> Result<String, ExpandError> {
    let mut current = text.to_string();

    while let Some(block) = innermost_block(&current, shader)? {
        let body = &current[block.body.clone()];
        let mut unrolled = String::new();
        for i in 0..block.count {
            unrolled.push_str(&body.replace(ITERATION, &i.to_string()));
        }
        tracing::debug!(shader, count = block.count, "unrolled foreach block");
        current.replace_range(block.span, &unrolled);
    }

    Ok(current)
}

/// Find the first block whose body contains no other block
fn innermost_block(text: &str, shader: &str) -> Result<Option<Block>, ExpandError> {
    let mut open: Vec<(Span, usize)> = Vec::new();
    let mut tokens = lex(text);

    while let Some((tok, span)) = tokens.next() {
        if tok != Token::Directive {
            continue;
        }

        match command_name(text, &span) {
            FOREACH => {
                let call = DirectiveCall::parse(text, span.clone(), &mut tokens).map_err(
                    |reason| ExpandError::malformed(FOREACH, reason, shader, span.clone(), text),
                )?;
                let count = iteration_count(&call).map_err(|reason| {
                    ExpandError::malformed(FOREACH, reason, shader, call.span.clone(), text)
                })?;
                open.push((call.span, count));
            }
            END_FOREACH => {
                let Some((head, count)) = open.pop() else {
                    return Err(ExpandError::malformed(
                        END_FOREACH,
                        "no matching @shForeach before it",
                        shader,
                        span,
                        text,
                    ));
                };
                return Ok(Some(Block {
                    span: head.start..span.end,
                    body: head.end..span.start,
                    count,
                }));
            }
            command if command.starts_with(FOREACH) || command.starts_with(END_FOREACH) => {
                return Err(ExpandError::unknown(command, shader, span, text));
            }
            _ => {}
        }
    }

    match open.pop() {
        Some((head, _)) => Err(ExpandError::malformed(
            FOREACH,
            "missing @shEndForeach",
            shader,
            head,
            text,
        )),
        None => Ok(None),
    }
}

/// Parse the loop count: a decimal integer in `0..=i32::MAX`
fn iteration_count(call: &DirectiveCall<'_>) -> Result<usize, String> {
    let arg = call.single_argument()?.trim();
    arg.parse::<i32>()
        .ok()
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| format!("invalid iteration count \"{}\"", arg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpandErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unroll_with_iteration_index() {
        assert_eq!(
            unroll("@shForeach(3)light@shIteration,@shEndForeach", "t").unwrap(),
            "light0,light1,light2,"
        );
    }

    #[test]
    fn test_zero_iterations() {
        assert_eq!(
            unroll("a@shForeach(0)never@shEndForeach b", "t").unwrap(),
            "a b"
        );
    }

    #[test]
    fn test_surrounding_text_kept() {
        let src = "uniform float4 lights[2];\n@shForeach(2)\nfloat l@shIteration;\n@shEndForeach\nvoid main(){}";
        assert_eq!(
            unroll(src, "t").unwrap(),
            "uniform float4 lights[2];\n\nfloat l0;\n\nfloat l1;\n\nvoid main(){}"
        );
    }

    #[test]
    fn test_sequential_blocks() {
        assert_eq!(
            unroll(
                "@shForeach(2)a@shIteration@shEndForeach-@shForeach(1)b@shIteration@shEndForeach",
                "t"
            )
            .unwrap(),
            "a0a1-b0"
        );
    }

    #[test]
    fn test_nested_blocks_bind_innermost() {
        let src = "@shForeach(2)[@shIteration:@shForeach(3)@shIteration@shEndForeach]@shEndForeach";
        assert_eq!(unroll(src, "t").unwrap(), "[0:012][1:012]");
    }

    #[test]
    fn test_whitespace_in_count() {
        assert_eq!(unroll("@shForeach( 2 )x@shEndForeach", "t").unwrap(), "xx");
    }

    #[test]
    fn test_missing_end_is_error() {
        let err = unroll("@shForeach(2) body", "water").unwrap_err();
        assert_eq!(
            err.kind,
            ExpandErrorKind::MalformedDirective {
                command: "shForeach".to_string(),
                reason: "missing @shEndForeach".to_string(),
            }
        );
        assert_eq!(err.shader, "water");
        assert_eq!(err.span, 0..13);
    }

    #[test]
    fn test_stray_end_is_error() {
        let err = unroll("x @shEndForeach", "t").unwrap_err();
        assert_eq!(err.command(), "shEndForeach");
        assert_eq!(err.span, 2..15);
    }

    #[test]
    fn test_negative_count_is_error() {
        let err = unroll("@shForeach(-1)x@shEndForeach", "t").unwrap_err();
        assert!(matches!(
            err.kind,
            ExpandErrorKind::MalformedDirective { ref reason, .. } if reason.contains("\"-1\"")
        ));
    }

    #[test]
    fn test_count_beyond_i32_is_error() {
        for count in ["18446744073709551615", "9223372036854775807", "4294967296", "2147483648"] {
            let src = format!("@shForeach({})ab@shEndForeach", count);
            let err = unroll(&src, "t").unwrap_err();
            assert_eq!(
                err.kind,
                ExpandErrorKind::MalformedDirective {
                    command: "shForeach".to_string(),
                    reason: format!("invalid iteration count \"{}\"", count),
                }
            );
            assert_eq!(err.span, 0..src.find(')').unwrap() + 1);
        }
    }

    #[test]
    fn test_unknown_foreach_variant() {
        let err = unroll("@shForeachLight(2)x@shEndForeach", "t").unwrap_err();
        assert!(matches!(err.kind, ExpandErrorKind::UnknownDirective { .. }));
    }

    #[test]
    fn test_iteration_outside_loop_is_left_alone() {
        assert_eq!(unroll("@shIteration", "t").unwrap(), "@shIteration");
    }
}
