//! Global settings shared by every shader of a factory

use std::collections::HashMap;

use thiserror::Error;

/// Errors that can occur when reading a global setting
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingError {
    #[error("undefined global setting \"{name}\"")]
    Undefined { name: String },
}

/// Process-wide string settings, e.g. the active render system
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalSettings {
    values: HashMap<String, String>,
}

impl GlobalSettings {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`GlobalSettings::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Look up the stored string for `name`
    pub fn get(&self, name: &str) -> Result<&str, SettingError> {
        self.values
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| SettingError::Undefined {
                name: name.to_string(),
            })
    }

    /// Whether the setting is switched on: stored exactly as `true` or `1`
    pub fn is_enabled(&self, name: &str) -> Result<bool, SettingError> {
        let value = self.get(name)?;
        Ok(value == "true" || value == "1")
    }

    /// Whether the stored string equals `expected` byte for byte
    pub fn equals(&self, name: &str, expected: &str) -> Result<bool, SettingError> {
        Ok(self.get(name)? == expected)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GlobalSettings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_enabled() {
        let settings = GlobalSettings::new()
            .with("a", "true")
            .with("b", "1")
            .with("c", "yes")
            .with("d", "True");
        assert_eq!(settings.is_enabled("a"), Ok(true));
        assert_eq!(settings.is_enabled("b"), Ok(true));
        assert_eq!(settings.is_enabled("c"), Ok(false));
        assert_eq!(settings.is_enabled("d"), Ok(false));
    }

    #[test]
    fn test_equals_is_exact() {
        let settings: GlobalSettings = [("rendersystem", "opengl")].into_iter().collect();
        assert_eq!(settings.equals("rendersystem", "opengl"), Ok(true));
        assert_eq!(settings.equals("rendersystem", "OpenGL"), Ok(false));
        assert_eq!(settings.equals("rendersystem", "opengl "), Ok(false));
    }

    #[test]
    fn test_names() {
        let settings = GlobalSettings::new().with("fog", "1").with("lights", "4");
        let mut names: Vec<_> = settings.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["fog", "lights"]);
    }

    #[test]
    fn test_undefined() {
        let settings = GlobalSettings::new();
        let err = settings.get("shadows").unwrap_err();
        assert_eq!(err.to_string(), "undefined global setting \"shadows\"");
    }
}
