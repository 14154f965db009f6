//! Pass configuration.

use thiserror::Error;

/// Options of the interop preparation pass.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct PrepConfig {
    /// Replace unresolved `classOf[T]` tokens with a type literal instead of
    /// reporting them. Needed when compiling the library that defines
    /// `classOf` itself.
    pub fix_class_of: bool,
}

/// A pass option that could not be understood.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum OptionError {
    #[error("unknown interop preparation option `{0}`")]
    Unknown(String),
}

impl PrepConfig {
    /// Option name enabling [`PrepConfig::fix_class_of`].
    pub const FIX_CLASS_OF: &'static str = "fixClassOf";

    /// Build a configuration from plugin-style options.
    ///
    /// Options are matched exactly; an empty option list yields the default.
    pub fn from_options<'o>(options: impl IntoIterator<Item = &'o str>) -> Result<Self, OptionError> {
        let mut config = PrepConfig::default();
        for option in options {
            match option {
                Self::FIX_CLASS_OF => config.fix_class_of = true,
                other => return Err(OptionError::Unknown(other.to_string())),
            }
        }
        Ok(config)
    }
}
