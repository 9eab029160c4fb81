//! Typed property values and property sets
//!
//! A shader variant is selected by a set of named properties. Values are read
//! through a property set; linked values (`$name`) are resolved against a
//! second set, the evaluation context, which is usually the material the
//! variant is built for.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur when resolving a property value
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PropertyError {
    /// No property with this name in the set or any parent
    #[error("undefined property \"{name}\"")]
    Undefined { name: String },

    /// A linked value pointing at a name the context does not define
    #[error("property \"{name}\" links to undefined \"{link}\"")]
    UndefinedLink { name: String, link: String },

    /// The value cannot be read as the requested type
    #[error("property \"{name}\" has value \"{value}\", expected a {expected}")]
    TypeMismatch {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// Linked values that refer back to themselves
    #[error("circular property link: {}", chain.join(" -> "))]
    CircularLink { chain: Vec<String> },
}

/// A single property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    String(String),
    /// Reference to a property of the evaluation context
    Linked(String),
}

impl PropertyValue {
    /// Parse a value from its textual form
    ///
    /// A leading `$` makes a linked value, everything else is kept as a string
    /// and converted when it is retrieved.
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix('$') {
            Some(link) => PropertyValue::Linked(link.to_string()),
            None => PropertyValue::String(text.to_string()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

/// Read access to named property values
pub trait PropertySet {
    /// Look up a property by name
    fn get_property(&self, name: &str) -> Option<PropertyValue>;
}

/// Property set backed by a hash map, with an optional parent for fallback
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    values: HashMap<String, PropertyValue>,
    parent: Option<Arc<PropertyMap>>,
}

impl PropertyMap {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set that falls back to `parent` for missing names
    pub fn with_parent(parent: Arc<PropertyMap>) -> Self {
        Self {
            values: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Set a property, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`PropertyMap::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Names defined directly in this set (parents excluded)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }
}

impl PropertySet for PropertyMap {
    fn get_property(&self, name: &str) -> Option<PropertyValue> {
        match self.values.get(name) {
            Some(value) => Some(value.clone()),
            None => self.parent.as_ref().and_then(|p| p.get_property(name)),
        }
    }
}

/// A property value with all links followed
enum Resolved {
    Bool(bool),
    String(String),
}

/// A property set together with the context its linked values resolve in
#[derive(Clone, Copy)]
pub struct Properties<'a> {
    set: &'a dyn PropertySet,
    context: &'a dyn PropertySet,
}

impl<'a> Properties<'a> {
    /// Use `set` as its own evaluation context
    pub fn new(set: &'a dyn PropertySet) -> Self {
        Self { set, context: set }
    }

    /// Resolve linked values against `context` instead
    pub fn with_context(mut self, context: &'a dyn PropertySet) -> Self {
        self.context = context;
        self
    }

    /// Resolve a property as a boolean
    ///
    /// Strings `"true"`/`"1"` and `"false"`/`"0"` convert; other strings are
    /// a type mismatch.
    pub fn get_bool(&self, name: &str) -> Result<bool, PropertyError> {
        match self.resolve(name)? {
            Resolved::Bool(b) => Ok(b),
            Resolved::String(s) => match s.as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(PropertyError::TypeMismatch {
                    name: name.to_string(),
                    value: s,
                    expected: "boolean",
                }),
            },
        }
    }

    /// Resolve a property as a string
    pub fn get_string(&self, name: &str) -> Result<String, PropertyError> {
        match self.resolve(name)? {
            Resolved::Bool(b) => Ok(if b { "true" } else { "false" }.to_string()),
            Resolved::String(s) => Ok(s),
        }
    }

    /// Look up `name` in the set and follow links through the context
    fn resolve(&self, name: &str) -> Result<Resolved, PropertyError> {
        let mut value = self
            .set
            .get_property(name)
            .ok_or_else(|| PropertyError::Undefined {
                name: name.to_string(),
            })?;

        let mut chain = vec![name.to_string()];
        loop {
            let link = match value {
                PropertyValue::Bool(b) => return Ok(Resolved::Bool(b)),
                PropertyValue::String(s) => return Ok(Resolved::String(s)),
                PropertyValue::Linked(link) => link,
            };
            if chain.contains(&link) {
                chain.push(link);
                return Err(PropertyError::CircularLink { chain });
            }
            value = self
                .context
                .get_property(&link)
                .ok_or_else(|| PropertyError::UndefinedLink {
                    name: name.to_string(),
                    link: link.clone(),
                })?;
            chain.push(link);
        }
    }
}

impl std::fmt::Debug for Properties<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Properties").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_conversions() {
        let set = PropertyMap::new()
            .with("a", true)
            .with("b", "1")
            .with("c", "false")
            .with("d", "maybe");
        let props = Properties::new(&set);

        assert_eq!(props.get_bool("a"), Ok(true));
        assert_eq!(props.get_bool("b"), Ok(true));
        assert_eq!(props.get_bool("c"), Ok(false));
        assert!(matches!(
            props.get_bool("d"),
            Err(PropertyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_string_of_bool() {
        let set = PropertyMap::new().with("flag", false);
        assert_eq!(Properties::new(&set).get_string("flag").unwrap(), "false");
    }

    #[test]
    fn test_undefined() {
        let set = PropertyMap::new();
        let err = Properties::new(&set).get_string("missing").unwrap_err();
        assert_eq!(err.to_string(), "undefined property \"missing\"");
    }

    #[test]
    fn test_names_exclude_parent() {
        let parent = Arc::new(PropertyMap::new().with("base", "x"));
        let child = PropertyMap::with_parent(parent).with("own", "y");
        assert_eq!(child.names().collect::<Vec<_>>(), vec!["own"]);
    }

    #[test]
    fn test_parent_fallback() {
        let parent = Arc::new(PropertyMap::new().with("base", "x"));
        let child = PropertyMap::with_parent(parent).with("own", "y");
        let props = Properties::new(&child);
        assert_eq!(props.get_string("base").unwrap(), "x");
        assert_eq!(props.get_string("own").unwrap(), "y");
    }

    #[test]
    fn test_linked_value_resolves_in_context() {
        let material = PropertyMap::new().with("diffuseMap", "rock.png");
        let pass = PropertyMap::new().with("texture", PropertyValue::parse("$diffuseMap"));
        let props = Properties::new(&pass).with_context(&material);
        assert_eq!(props.get_string("texture").unwrap(), "rock.png");
    }

    #[test]
    fn test_missing_link_target() {
        let pass = PropertyMap::new().with("texture", PropertyValue::parse("$nothing"));
        let err = Properties::new(&pass).get_string("texture").unwrap_err();
        assert!(matches!(err, PropertyError::UndefinedLink { .. }));
    }

    #[test]
    fn test_circular_link() {
        let set = PropertyMap::new()
            .with("a", PropertyValue::parse("$b"))
            .with("b", PropertyValue::parse("$a"));
        let err = Properties::new(&set).get_bool("a").unwrap_err();
        assert_eq!(err.to_string(), "circular property link: a -> b -> a");
    }
}
