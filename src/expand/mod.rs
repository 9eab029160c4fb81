//! Directive expansion
//!
//! Three passes run in order over a private copy of the template:
//!
//! 1. property directives (`@shPropertyBool`, `@shPropertyString`, `@shPropertyEqual`)
//! 2. global-setting directives (`@shGlobalSettingBool`, `@shGlobalSettingEqual`)
//! 3. loop unrolling (`@shForeach(N) ... @shEndForeach`)
//!
//! The result contains none of these markers and is ready for the
//! conditional-compilation preprocessor. Other `@sh` commands, such as the
//! binding commands read by later stages, pass through untouched.
//!
//! # Example
//!
//! ```rust
//! use shiny_expand::{expand, GlobalSettings, Properties, PropertyMap};
//!
//! let props = PropertyMap::new().with("useShadows", true);
//! let settings = GlobalSettings::new().with("rendersystem", "opengl");
//!
//! let text = expand(
//!     "objects",
//!     "@shPropertyBool(useShadows) && @shGlobalSettingEqual(rendersystem, opengl)",
//!     Properties::new(&props),
//!     &settings,
//! )
//! .unwrap();
//! assert_eq!(text, "1 && 1");
//! ```

mod foreach;
mod property;
mod setting;

use crate::directive::lexer::command_name;
use crate::directive::{lex, DirectiveCall, Token};
use crate::error::{ExpandError, ExpandErrorKind};
use crate::properties::Properties;
use crate::settings::GlobalSettings;

pub use foreach::unroll;

/// Upper bound on re-running a pass whose replacements produce new markers
const MAX_PASSES: usize = 64;

/// Expands the directives of one shader against fixed properties and settings
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    /// Shader name used in diagnostics
    shader: &'a str,
    properties: Properties<'a>,
    settings: &'a GlobalSettings,
}

impl<'a> Expander<'a> {
    pub fn new(shader: &'a str, properties: Properties<'a>, settings: &'a GlobalSettings) -> Self {
        Self {
            shader,
            properties,
            settings,
        }
    }

    /// Run all three passes
    pub fn expand(&self, source: &str) -> Result<String, ExpandError> {
        let text = self.expand_properties(source)?;
        let text = self.expand_settings(&text)?;
        unroll(&text, self.shader)
    }
}

/// Expand `source` for the shader named `shader`
///
/// Convenience wrapper around [`Expander::expand`].
pub fn expand(
    shader: &str,
    source: &str,
    properties: Properties<'_>,
    settings: &GlobalSettings,
) -> Result<String, ExpandError> {
    Expander::new(shader, properties, settings).expand(source)
}

/// Whether `text` still contains a directive whose command starts with `prefix`
pub fn contains_directive(text: &str, prefix: &str) -> bool {
    first_directive(text, prefix).is_some()
}

fn first_directive<'s>(text: &'s str, prefix: &str) -> Option<(&'s str, crate::directive::Span)> {
    lex(text)
        .filter(|(tok, _)| *tok == Token::Directive)
        .map(|(_, span)| (command_name(text, &span), span))
        .find(|(command, _)| command.starts_with(prefix))
}

/// Replace every directive with the given prefix in a single forward scan
///
/// Replacement text is copied to the output and never re-scanned. Returns the
/// new text and the number of directives replaced.
fn rewrite<F>(
    text: &str,
    prefix: &str,
    shader: &str,
    replace: &mut F,
) -> Result<(String, usize), ExpandError>
where
    F: FnMut(&DirectiveCall<'_>) -> Result<String, ExpandErrorKind>,
{
    let mut out = String::with_capacity(text.len());
    let mut replaced = 0;
    let mut tokens = lex(text);

    while let Some((tok, span)) = tokens.next() {
        if tok != Token::Directive || !command_name(text, &span).starts_with(prefix) {
            out.push_str(&text[span]);
            continue;
        }
        let command = command_name(text, &span);

        let call = DirectiveCall::parse(text, span.clone(), &mut tokens)
            .map_err(|reason| ExpandError::malformed(command, reason, shader, span, text))?;
        let value = replace(&call)
            .map_err(|kind| ExpandError::new(kind, shader, call.span.clone(), text))?;
        out.push_str(&value);
        replaced += 1;
    }

    Ok((out, replaced))
}

/// Re-run [`rewrite`] until no directive with the prefix remains
fn rewrite_all<F>(
    text: &str,
    prefix: &str,
    shader: &str,
    mut replace: F,
) -> Result<String, ExpandError>
where
    F: FnMut(&DirectiveCall<'_>) -> Result<String, ExpandErrorKind>,
{
    let mut current = text.to_string();
    for pass in 0..MAX_PASSES {
        let (next, replaced) = rewrite(&current, prefix, shader, &mut replace)?;
        tracing::debug!(shader, prefix, pass, replaced, "expanded directives");
        current = next;
        if replaced == 0 || !contains_directive(&current, prefix) {
            return Ok(current);
        }
    }

    let (command, span) = first_directive(&current, prefix)
        .map(|(c, s)| (c.to_string(), s))
        .unwrap_or_else(|| (prefix.to_string(), 0..0));
    Err(ExpandError::malformed(
        &command,
        format!("expansion does not terminate after {} passes", MAX_PASSES),
        shader,
        span,
        &current,
    ))
}

/// Render a boolean the way directives emit it
fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
