//! Shader instances: one compiled variant of a shader set

use crate::error::ShaderError;
use crate::expand::Expander;
use crate::platform::{Program, ProgramRequest, Stage, Toolchain};
use crate::properties::Properties;
use crate::shader_set::ShaderSet;

/// One compiled variant of a shader set for a single property combination
///
/// An instance whose program the backend reports as unsupported still exists;
/// callers check [`ShaderInstance::supported`] before using it.
#[derive(Debug)]
pub struct ShaderInstance {
    name: String,
    stage: Stage,
    supported: bool,
    program: Box<dyn Program>,
}

impl ShaderInstance {
    /// Build the variant `name` of `set` for the given properties
    ///
    /// The template is expanded, preprocessed and compiled for the set's
    /// stage. Any failure aborts construction before an instance exists.
    pub fn construct(
        set: &ShaderSet,
        name: &str,
        properties: Properties<'_>,
        toolchain: &Toolchain<'_>,
    ) -> Result<Self, ShaderError> {
        let stage = set.stage();

        let expanded = Expander::new(name, properties, set.global_settings()).expand(set.source())?;

        let source = toolchain
            .preprocessor
            .preprocess(&expanded, set.base_path(), &[], name)
            .map_err(|source| ShaderError::Preprocess {
                shader: name.to_string(),
                source,
            })?;

        let request = ProgramRequest {
            cache_key: None,
            name,
            profile: set.profile(toolchain.language),
            source: &source,
            language: toolchain.language,
        };
        let program = toolchain
            .platform
            .create_program(stage, &request)
            .map_err(|source| ShaderError::Backend {
                shader: name.to_string(),
                source,
            })?;

        let supported = program.supported();
        if supported {
            tracing::info!(name, %stage, set = set.name(), "constructed shader instance");
        } else {
            tracing::warn!(
                name,
                %stage,
                language = %toolchain.language,
                "shader instance is not supported by the active profile"
            );
        }

        Ok(Self {
            name: name.to_string(),
            stage,
            supported,
            program,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether the backend can run this variant on the active hardware
    pub fn supported(&self) -> bool {
        self.supported
    }

    pub fn program(&self) -> &dyn Program {
        self.program.as_ref()
    }
}
