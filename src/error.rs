//! Error types for directive expansion and variant construction

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::directive::Span;
use crate::platform::{BackendError, PreprocessError};
use crate::properties::PropertyError;
use crate::settings::SettingError;

/// What went wrong with a directive
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpandErrorKind {
    /// Command with a known prefix but an unrecognized name
    #[error("unknown command \"{command}\"")]
    UnknownDirective { command: String },

    /// Bad argument list, bad loop count or unmatched loop markers
    #[error("malformed \"{command}\": {reason}")]
    MalformedDirective { command: String, reason: String },

    /// The property resolver could not produce a value
    #[error("{command}: {source}")]
    Property {
        command: String,
        source: PropertyError,
    },

    /// Global setting lookup failed
    #[error("{command}: {source}")]
    Setting {
        command: String,
        source: SettingError,
    },
}

/// A directive that could not be expanded
#[derive(Error, Debug, Clone)]
#[error("{kind} in \"{shader}\"")]
pub struct ExpandError {
    pub kind: ExpandErrorKind,
    /// Name of the shader being expanded
    pub shader: String,
    /// Location of the directive in the scanned text
    pub span: Span,
    /// The text the failing pass was scanning
    text: String,
}

impl ExpandError {
    pub(crate) fn new(kind: ExpandErrorKind, shader: &str, span: Span, text: &str) -> Self {
        Self {
            kind,
            shader: shader.to_string(),
            span,
            text: text.to_string(),
        }
    }

    pub(crate) fn unknown(command: &str, shader: &str, span: Span, text: &str) -> Self {
        Self::new(
            ExpandErrorKind::UnknownDirective {
                command: command.to_string(),
            },
            shader,
            span,
            text,
        )
    }

    pub(crate) fn malformed(
        command: &str,
        reason: impl Into<String>,
        shader: &str,
        span: Span,
        text: &str,
    ) -> Self {
        Self::new(
            ExpandErrorKind::MalformedDirective {
                command: command.to_string(),
                reason: reason.into(),
            },
            shader,
            span,
            text,
        )
    }

    /// Name of the offending command, without the leading `@`
    pub fn command(&self) -> &str {
        match &self.kind {
            ExpandErrorKind::UnknownDirective { command }
            | ExpandErrorKind::MalformedDirective { command, .. }
            | ExpandErrorKind::Property { command, .. }
            | ExpandErrorKind::Setting { command, .. } => command,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self) -> String {
        let filename = self.shader.as_str();
        let message = self.kind.to_string();
        let mut buf = Vec::new();

        let written = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("cannot expand shader \"{}\"", filename))
            .with_config(Config::default().with_color(false))
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(self.text.as_str())), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Errors that abort construction of a shader instance
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error(transparent)]
    Expand(#[from] ExpandError),

    #[error("preprocessing \"{shader}\" failed: {source}")]
    Preprocess {
        shader: String,
        source: PreprocessError,
    },

    #[error("compiling \"{shader}\" failed: {source}")]
    Backend {
        shader: String,
        source: BackendError,
    },
}

impl ShaderError {
    /// Format the error for display, with source context when available
    pub fn format(&self) -> String {
        match self {
            ShaderError::Expand(e) => e.format(),
            other => other.to_string(),
        }
    }
}
