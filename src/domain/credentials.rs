//! API credentials scoped to a single planning request.

use std::fmt;

/// Keys and model selection for one run
///
/// Passed by reference through the pipeline instead of being stored in the
/// process environment. Never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Chat model API key
    pub model_api_key: String,

    /// Web search API key
    pub search_api_key: String,

    /// Chat model name
    pub model: String,
}

impl Credentials {
    pub fn new(
        model_api_key: impl Into<String>,
        search_api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            model_api_key: model_api_key.into(),
            search_api_key: search_api_key.into(),
            model: model.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("model_api_key", &"<redacted>")
            .field("search_api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}
