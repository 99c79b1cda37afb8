use serde::{Deserialize, Serialize};
use std::fmt;

/// Target language of a generation request.
///
/// The service accepts arbitrary language names, so unknown values are carried
/// through verbatim in [`Language::Other`] instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    Python,
    Cpp,
    Java,
    Javascript,
    C,
    Other(String),
}

impl Language {
    /// Lowercase name as sent over the wire
    pub fn as_str(&self) -> &str {
        match self {
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Javascript => "javascript",
            Language::C => "c",
            Language::Other(name) => name,
        }
    }

    /// File extension used when saving generated code
    ///
    /// Unrecognized languages fall back to `txt`.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Javascript => "js",
            Language::C => "c",
            Language::Other(_) => "txt",
        }
    }
}

impl From<&str> for Language {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "python" => Language::Python,
            "cpp" => Language::Cpp,
            "java" => Language::Java,
            "javascript" => Language::Javascript,
            "c" => Language::C,
            "" => Language::default(),
            _ => Language::Other(normalized),
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Language::from(value.as_str())
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
