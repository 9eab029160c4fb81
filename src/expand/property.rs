//! Property directives: `@shPropertyBool`, `@shPropertyString`, `@shPropertyEqual`

use crate::directive::{DirectiveCall, PROPERTY_PREFIX};
use crate::error::{ExpandError, ExpandErrorKind};

use super::{flag, rewrite_all, Expander};

impl Expander<'_> {
    /// Replace every property directive with its resolved value
    pub fn expand_properties(&self, text: &str) -> Result<String, ExpandError> {
        rewrite_all(text, PROPERTY_PREFIX, self.shader, |call| {
            self.property_value(call)
        })
    }

    fn property_value(&self, call: &DirectiveCall<'_>) -> Result<String, ExpandErrorKind> {
        let malformed = |reason| ExpandErrorKind::MalformedDirective {
            command: call.command.to_string(),
            reason,
        };
        let failed = |source| ExpandErrorKind::Property {
            command: call.command.to_string(),
            source,
        };

        match call.command {
            "shPropertyBool" => {
                let name = call.single_argument().map_err(malformed)?;
                let value = self.properties.get_bool(name).map_err(failed)?;
                Ok(flag(value))
            }
            "shPropertyString" => {
                let name = call.single_argument().map_err(malformed)?;
                self.properties.get_string(name).map_err(failed)
            }
            "shPropertyEqual" => {
                let (name, literal) = call.name_and_literal().map_err(malformed)?;
                let value = self.properties.get_string(name).map_err(failed)?;
                Ok(flag(value == literal))
            }
            other => Err(ExpandErrorKind::UnknownDirective {
                command: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ExpandErrorKind;
    use crate::expand::Expander;
    use crate::properties::{Properties, PropertyError, PropertyMap};
    use crate::settings::GlobalSettings;

    fn expand_with(src: &str, props: &PropertyMap) -> Result<String, crate::ExpandError> {
        let settings = GlobalSettings::new();
        Expander::new("test", Properties::new(props), &settings).expand_properties(src)
    }

    #[test]
    fn test_bool() {
        let props = PropertyMap::new().with("on", true).with("off", false);
        assert_eq!(
            expand_with("@shPropertyBool(on) @shPropertyBool(off)", &props).unwrap(),
            "1 0"
        );
    }

    #[test]
    fn test_string_verbatim() {
        let props = PropertyMap::new().with("swizzle", "xyz");
        assert_eq!(
            expand_with("color.@shPropertyString(swizzle);", &props).unwrap(),
            "color.xyz;"
        );
    }

    #[test]
    fn test_equal_is_byte_exact() {
        let props = PropertyMap::new().with("mode", "Phong");
        assert_eq!(
            expand_with(
                "@shPropertyEqual(mode, Phong)@shPropertyEqual(mode, phong)@shPropertyEqual(mode,Phong)",
                &props
            )
            .unwrap(),
            "101"
        );
    }

    #[test]
    fn test_multiple_occurrences() {
        let props = PropertyMap::new().with("n", "4");
        assert_eq!(
            expand_with(
                "a@shPropertyString(n)b@shPropertyString(n)c@shPropertyString(n)",
                &props
            )
            .unwrap(),
            "a4b4c4"
        );
    }

    #[test]
    fn test_unknown_command() {
        let props = PropertyMap::new();
        let err = expand_with("x @shPropertyFloat(a)", &props).unwrap_err();
        assert_eq!(
            err.kind,
            ExpandErrorKind::UnknownDirective {
                command: "shPropertyFloat".to_string()
            }
        );
        assert_eq!(err.span, 2..21);
        assert_eq!(
            err.to_string(),
            "unknown command \"shPropertyFloat\" in \"test\""
        );
    }

    #[test]
    fn test_undefined_property() {
        let props = PropertyMap::new();
        let err = expand_with("@shPropertyBool(fog)", &props).unwrap_err();
        assert_eq!(
            err.kind,
            ExpandErrorKind::Property {
                command: "shPropertyBool".to_string(),
                source: PropertyError::Undefined {
                    name: "fog".to_string()
                },
            }
        );
    }

    #[test]
    fn test_missing_parenthesis() {
        let props = PropertyMap::new().with("a", true);
        let err = expand_with("@shPropertyBool a", &props).unwrap_err();
        assert!(matches!(
            err.kind,
            ExpandErrorKind::MalformedDirective { .. }
        ));
    }

    #[test]
    fn test_equal_without_literal() {
        let props = PropertyMap::new().with("a", "x");
        let err = expand_with("@shPropertyEqual(a)", &props).unwrap_err();
        assert!(matches!(
            err.kind,
            ExpandErrorKind::MalformedDirective { ref command, .. } if command == "shPropertyEqual"
        ));
    }

    #[test]
    fn test_settings_untouched() {
        let props = PropertyMap::new();
        let src = "@shGlobalSettingBool(fog)";
        assert_eq!(expand_with(src, &props).unwrap(), src);
    }
}
