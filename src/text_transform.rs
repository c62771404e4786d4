use crate::errors::ConfigError;

// @module: Injectable cue-text transform

/// A `text -> text` transform applied to every cue as it is written.
///
/// The transform runs on output only; input parsing never sees it. When no
/// transform is configured the identity is used. Callers embedding the crate
/// inject their own converter with [`TextTransform::from_fn`]; the CLI
/// resolves its `--convert` selector through [`TextTransform::by_name`].
pub struct TextTransform {
    // @field: Selector name, "identity" when unset
    name: String,

    // @field: Conversion function, None = pass-through
    func: Option<Box<dyn Fn(&str) -> String + Send + Sync>>,
}

impl TextTransform {
    /// The pass-through transform
    pub fn identity() -> Self {
        TextTransform {
            name: "identity".to_string(),
            func: None,
        }
    }

    /// Wrap an arbitrary conversion function under a selector name
    pub fn from_fn<F>(name: &str, func: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        TextTransform {
            name: name.to_string(),
            func: Some(Box::new(func)),
        }
    }

    /// Resolve a selector name to a registered transform.
    ///
    /// No converters ship with the binary, so every name fails with a
    /// descriptive error. Embedders register transforms through
    /// [`TextTransform::from_fn`].
    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        Err(ConfigError::UnknownTransform(name.to_string()))
    }

    // @returns: Selector name for logging
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this transform is the pass-through
    pub fn is_identity(&self) -> bool {
        self.func.is_none()
    }

    /// Apply the transform to one cue text
    pub fn apply(&self, text: &str) -> String {
        match &self.func {
            Some(func) => func(text),
            None => text.to_string(),
        }
    }
}

impl Default for TextTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for TextTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextTransform")
            .field("name", &self.name)
            .field("identity", &self.is_identity())
            .finish()
    }
}
