//! Manifest files describing shader sets, global settings and variants
//!
//! A manifest is a TOML document:
//!
//! ```toml
//! language = "hlsl"
//!
//! [settings]
//! rendersystem = "d3d9"
//! shadows = true
//!
//! [shaders.objects_vertex]
//! source = "objects.shader"
//! stage = "vertex"
//! hlsl_profile = "vs_3_0"
//!
//! [instances.lit]
//! shader = "objects_vertex"
//! properties = { useShadows = true, lighting = "phong" }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::platform::{Language, Stage};
use crate::properties::{PropertyMap, PropertyValue};
use crate::settings::GlobalSettings;
use crate::shader_set::ShaderSet;

/// Errors that can occur when loading a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("shader \"{shader}\" has neither `source` nor `code`")]
    MissingSource { shader: String },

    #[error("instance \"{instance}\" refers to unknown shader \"{shader}\"")]
    UnknownShader { instance: String, shader: String },

    #[error("no instance named \"{0}\" in manifest")]
    UnknownInstance(String),

    #[error("unsupported value for \"{name}\": {reason}")]
    InvalidValue { name: String, reason: String },
}

/// A named variant: which shader set to build and with what properties
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    pub shader: String,
    pub properties: PropertyMap,
    /// Context that `$links` in `properties` resolve against
    pub context: Option<PropertyMap>,
}

/// Everything a manifest describes, with shader sources loaded
#[derive(Debug, Clone)]
pub struct Manifest {
    pub language: Language,
    pub settings: Arc<GlobalSettings>,
    pub shaders: HashMap<String, ShaderSet>,
    pub instances: HashMap<String, InstanceSpec>,
}

/// TOML structure for deserializing manifests
#[derive(Deserialize)]
struct TomlManifest {
    #[serde(default)]
    language: Language,
    #[serde(default)]
    settings: HashMap<String, toml::Value>,
    #[serde(default)]
    shaders: HashMap<String, TomlShader>,
    #[serde(default)]
    instances: HashMap<String, TomlInstance>,
}

#[derive(Deserialize)]
struct TomlShader {
    source: Option<PathBuf>,
    code: Option<String>,
    stage: Stage,
    base_path: Option<PathBuf>,
    cg_profile: Option<String>,
    hlsl_profile: Option<String>,
}

#[derive(Deserialize)]
struct TomlInstance {
    shader: String,
    #[serde(default)]
    properties: HashMap<String, toml::Value>,
    context: Option<HashMap<String, toml::Value>>,
}

impl Manifest {
    /// Load a manifest file; relative paths resolve against its directory
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_str(&content, dir)
    }

    /// Load a manifest from TOML text; relative paths resolve against `dir`
    pub fn from_str(content: &str, dir: &Path) -> Result<Self, ManifestError> {
        let parsed: TomlManifest = toml::from_str(content)?;

        let mut settings = GlobalSettings::new();
        for (name, value) in &parsed.settings {
            settings.set(name.as_str(), value_text(name, value)?);
        }
        let settings = Arc::new(settings);

        let mut shaders = HashMap::new();
        for (name, shader) in parsed.shaders {
            let source = match (&shader.code, &shader.source) {
                (Some(code), _) => code.clone(),
                (None, Some(file)) => {
                    let path = dir.join(file);
                    std::fs::read_to_string(&path)
                        .map_err(|source| ManifestError::Io { path, source })?
                }
                (None, None) => return Err(ManifestError::MissingSource { shader: name }),
            };

            let base_path = match &shader.base_path {
                Some(base) => dir.join(base),
                None => dir.to_path_buf(),
            };

            let mut set = ShaderSet::new(name.as_str(), shader.stage, source)
                .with_base_path(base_path)
                .with_settings(Arc::clone(&settings));
            if let Some(profile) = shader.cg_profile {
                set = set.with_cg_profile(profile);
            }
            if let Some(profile) = shader.hlsl_profile {
                set = set.with_hlsl_profile(profile);
            }
            tracing::debug!(shader = %name, stage = %set.stage(), "loaded shader set");
            shaders.insert(name, set);
        }

        let mut instances = HashMap::new();
        for (name, instance) in parsed.instances {
            if !shaders.contains_key(&instance.shader) {
                return Err(ManifestError::UnknownShader {
                    instance: name,
                    shader: instance.shader,
                });
            }
            let properties = property_map(&instance.properties)?;
            let context = instance.context.as_ref().map(property_map).transpose()?;
            instances.insert(
                name,
                InstanceSpec {
                    shader: instance.shader,
                    properties,
                    context,
                },
            );
        }

        Ok(Manifest {
            language: parsed.language,
            settings,
            shaders,
            instances,
        })
    }

    /// Look up a named instance together with its shader set
    pub fn instance(&self, name: &str) -> Result<(&InstanceSpec, &ShaderSet), ManifestError> {
        let spec = self
            .instances
            .get(name)
            .ok_or_else(|| ManifestError::UnknownInstance(name.to_string()))?;
        let set = self
            .shaders
            .get(&spec.shader)
            .ok_or_else(|| ManifestError::UnknownShader {
                instance: name.to_string(),
                shader: spec.shader.clone(),
            })?;
        Ok((spec, set))
    }
}

/// Convert a table of TOML values into a property set
fn property_map(table: &HashMap<String, toml::Value>) -> Result<PropertyMap, ManifestError> {
    let mut map = PropertyMap::new();
    for (name, value) in table {
        let value = match value {
            toml::Value::Boolean(b) => PropertyValue::Bool(*b),
            other => PropertyValue::parse(&value_text(name, other)?),
        };
        map.set(name.as_str(), value);
    }
    Ok(map)
}

/// Textual form of a scalar TOML value
fn value_text(name: &str, value: &toml::Value) -> Result<String, ManifestError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        other => Err(ManifestError::InvalidValue {
            name: name.to_string(),
            reason: format!("expected a string, boolean or number, found {}", other.type_str()),
        }),
    }
}
