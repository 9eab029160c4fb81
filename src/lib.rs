//! Shiny Expand - shader template directive expansion
//!
//! This library expands the `@sh` directives of shader templates into plain
//! shading-language source and drives construction of compiled shader
//! variants through a platform backend.
//!
//! # Directives
//!
//! | Directive | Result |
//! |-----------|--------|
//! | `@shPropertyBool(name)` | `1` or `0` |
//! | `@shPropertyString(name)` | the property value |
//! | `@shPropertyEqual(name, value)` | `1` if the property equals `value` |
//! | `@shGlobalSettingBool(name)` | `1` if the setting is `true` or `1` |
//! | `@shGlobalSettingEqual(name, value)` | `1` if the setting equals `value` |
//! | `@shForeach(N) ... @shEndForeach` | the body `N` times, `@shIteration` = index |
//!
//! # Example
//!
//! ```rust
//! use shiny_expand::{expand, GlobalSettings, Properties, PropertyMap};
//!
//! let props = PropertyMap::new();
//! let text = expand(
//!     "lights",
//!     "@shForeach(3)light@shIteration,@shEndForeach",
//!     Properties::new(&props),
//!     &GlobalSettings::new(),
//! )
//! .unwrap();
//! assert_eq!(text, "light0,light1,light2,");
//! ```

pub mod directive;
pub mod error;
pub mod expand;
pub mod instance;
pub mod manifest;
pub mod platform;
pub mod properties;
pub mod settings;
pub mod shader_set;

pub use error::{ExpandError, ExpandErrorKind, ShaderError};
pub use expand::{expand, Expander};
pub use instance::ShaderInstance;
pub use manifest::{InstanceSpec, Manifest, ManifestError};
pub use platform::{
    BackendError, Language, Passthrough, Platform, PreprocessError, Preprocessor, Program,
    ProgramRequest, Stage, Toolchain,
};
pub use properties::{Properties, PropertyError, PropertyMap, PropertySet, PropertyValue};
pub use settings::{GlobalSettings, SettingError};
pub use shader_set::ShaderSet;
