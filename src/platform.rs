//! Boundary to the conditional-compilation preprocessor and the platform backend
//!
//! Neither collaborator is implemented here. The traits describe what variant
//! construction needs from them; a pass-through preprocessor is provided for
//! tools that only want to look at expanded text.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Pipeline stage a shader set compiles for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => write!(f, "vertex"),
            Stage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Shading language the backend compiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cg,
    Hlsl,
    #[default]
    Glsl,
    Glsles,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Cg => "cg",
            Language::Hlsl => "hlsl",
            Language::Glsl => "glsl",
            Language::Glsles => "glsles",
        };
        write!(f, "{}", name)
    }
}

/// Failure reported by the conditional-compilation preprocessor
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct PreprocessError {
    pub message: String,
}

impl PreprocessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by the platform backend while creating a program
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Evaluates `#if`-style directives on expanded text
pub trait Preprocessor {
    /// Preprocess `source`, resolving includes against `base_path`
    ///
    /// `definitions` are predefined macros; `name` identifies the shader in
    /// diagnostics.
    fn preprocess(
        &self,
        source: &str,
        base_path: &Path,
        definitions: &[String],
        name: &str,
    ) -> Result<String, PreprocessError>;
}

/// Preprocessor that returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Preprocessor for Passthrough {
    fn preprocess(
        &self,
        source: &str,
        _base_path: &Path,
        _definitions: &[String],
        _name: &str,
    ) -> Result<String, PreprocessError> {
        Ok(source.to_string())
    }
}

/// A compiled program owned by a shader instance
pub trait Program: fmt::Debug {
    /// Whether the active hardware/driver profile can run this program
    fn supported(&self) -> bool;
}

/// Everything the backend needs to create one program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramRequest<'a> {
    /// Key for a backend-side cache; variant construction never sets one
    pub cache_key: Option<&'a str>,
    pub name: &'a str,
    /// Compile profile for the active language, if it has profiles
    pub profile: Option<&'a str>,
    /// Final, fully expanded and preprocessed source
    pub source: &'a str,
    pub language: Language,
}

/// Platform-specific compiler backend
pub trait Platform {
    fn create_vertex_program(
        &self,
        request: &ProgramRequest<'_>,
    ) -> Result<Box<dyn Program>, BackendError>;

    fn create_fragment_program(
        &self,
        request: &ProgramRequest<'_>,
    ) -> Result<Box<dyn Program>, BackendError>;

    /// Dispatch to the stage-specific entry point
    fn create_program(
        &self,
        stage: Stage,
        request: &ProgramRequest<'_>,
    ) -> Result<Box<dyn Program>, BackendError> {
        match stage {
            Stage::Vertex => self.create_vertex_program(request),
            Stage::Fragment => self.create_fragment_program(request),
        }
    }
}

/// The collaborators used to turn expanded text into a program
#[derive(Clone, Copy)]
pub struct Toolchain<'a> {
    pub platform: &'a dyn Platform,
    pub preprocessor: &'a dyn Preprocessor,
    /// Active shading language
    pub language: Language,
}

impl<'a> Toolchain<'a> {
    /// Create a toolchain with the pass-through preprocessor
    pub fn new(platform: &'a dyn Platform, language: Language) -> Self {
        Self {
            platform,
            preprocessor: &Passthrough,
            language,
        }
    }

    /// Use a different conditional-compilation preprocessor
    pub fn with_preprocessor(mut self, preprocessor: &'a dyn Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }
}

impl fmt::Debug for Toolchain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolchain")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
