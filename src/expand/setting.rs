//! Global-setting directives: `@shGlobalSettingBool`, `@shGlobalSettingEqual`

use crate::directive::{DirectiveCall, GLOBAL_SETTING_PREFIX};
use crate::error::{ExpandError, ExpandErrorKind};

use super::{flag, rewrite_all, Expander};

impl Expander<'_> {
    /// Replace every global-setting directive with `1` or `0`
    pub fn expand_settings(&self, text: &str) -> Result<String, ExpandError> {
        rewrite_all(text, GLOBAL_SETTING_PREFIX, self.shader, |call| {
            self.setting_value(call)
        })
    }

    fn setting_value(&self, call: &DirectiveCall<'_>) -> Result<String, ExpandErrorKind> {
        let malformed = |reason| ExpandErrorKind::MalformedDirective {
            command: call.command.to_string(),
            reason,
        };
        let failed = |source| ExpandErrorKind::Setting {
            command: call.command.to_string(),
            source,
        };

        let value = match call.command {
            "shGlobalSettingBool" => {
                let name = call.single_argument().map_err(malformed)?;
                self.settings.is_enabled(name)
            }
            "shGlobalSettingEqual" => {
                let (name, literal) = call.name_and_literal().map_err(malformed)?;
                self.settings.equals(name, literal)
            }
            other => {
                return Err(ExpandErrorKind::UnknownDirective {
                    command: other.to_string(),
                })
            }
        };
        value.map(flag).map_err(failed)
    }
}
