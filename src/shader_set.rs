//! Shader sets: one template source from which variants are built

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::platform::{Language, Stage};
use crate::settings::GlobalSettings;

/// A shader template for one pipeline stage
#[derive(Debug, Clone)]
pub struct ShaderSet {
    name: String,
    source: String,
    stage: Stage,
    /// Directory includes are resolved against
    base_path: PathBuf,
    cg_profile: Option<String>,
    hlsl_profile: Option<String>,
    settings: Arc<GlobalSettings>,
}

impl ShaderSet {
    /// Create a shader set with an empty settings store and no profiles
    pub fn new(name: impl Into<String>, stage: Stage, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            stage,
            base_path: PathBuf::from("."),
            cg_profile: None,
            hlsl_profile: None,
            settings: Arc::new(GlobalSettings::default()),
        }
    }

    /// Set the include search directory
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Set the profile used when compiling Cg
    pub fn with_cg_profile(mut self, profile: impl Into<String>) -> Self {
        self.cg_profile = Some(profile.into());
        self
    }

    /// Set the profile used when compiling HLSL
    pub fn with_hlsl_profile(mut self, profile: impl Into<String>) -> Self {
        self.hlsl_profile = Some(profile.into());
        self
    }

    /// Share a global settings store with this set
    pub fn with_settings(mut self, settings: Arc<GlobalSettings>) -> Self {
        self.settings = settings;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Compile profile for `language`
    ///
    /// Only Cg and HLSL have profiles; GLSL variants compile without one.
    pub fn profile(&self, language: Language) -> Option<&str> {
        match language {
            Language::Cg => self.cg_profile.as_deref(),
            Language::Hlsl => self.hlsl_profile.as_deref(),
            Language::Glsl | Language::Glsles => None,
        }
    }

    pub fn global_settings(&self) -> &GlobalSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_by_language() {
        let set = ShaderSet::new("objects", Stage::Vertex, "")
            .with_cg_profile("vs_2_x")
            .with_hlsl_profile("vs_3_0");
        assert_eq!(set.profile(Language::Cg), Some("vs_2_x"));
        assert_eq!(set.profile(Language::Hlsl), Some("vs_3_0"));
        assert_eq!(set.profile(Language::Glsl), None);
    }

    #[test]
    fn test_shared_settings() {
        let settings = Arc::new(GlobalSettings::new().with("fog", "true"));
        let a = ShaderSet::new("a", Stage::Vertex, "").with_settings(Arc::clone(&settings));
        let b = ShaderSet::new("b", Stage::Fragment, "").with_settings(settings);
        assert_eq!(a.global_settings(), b.global_settings());
        assert_eq!(a.global_settings().is_enabled("fog"), Ok(true));
    }
}
