use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeLanguage {
    #[default]
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "css")]
    Css,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "c++")]
    Cpp,
    #[serde(rename = "typescript")]
    TypeScript,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "markdown")]
    Markdown,
}

impl CodeLanguage {
    pub const ALL: [CodeLanguage; 9] = [
        CodeLanguage::JavaScript,
        CodeLanguage::Python,
        CodeLanguage::Html,
        CodeLanguage::Css,
        CodeLanguage::Java,
        CodeLanguage::Cpp,
        CodeLanguage::TypeScript,
        CodeLanguage::Json,
        CodeLanguage::Markdown,
    ];

    /// Tag used in the code fence and by the front-end highlighter.
    pub fn tag(&self) -> &'static str {
        match self {
            CodeLanguage::JavaScript => "javascript",
            CodeLanguage::Python => "python",
            CodeLanguage::Html => "html",
            CodeLanguage::Css => "css",
            CodeLanguage::Java => "java",
            CodeLanguage::Cpp => "c++",
            CodeLanguage::TypeScript => "typescript",
            CodeLanguage::Json => "json",
            CodeLanguage::Markdown => "markdown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CodeLanguage::JavaScript => "JavaScript",
            CodeLanguage::Python => "Python",
            CodeLanguage::Html => "HTML",
            CodeLanguage::Css => "CSS",
            CodeLanguage::Java => "Java",
            CodeLanguage::Cpp => "C++",
            CodeLanguage::TypeScript => "TypeScript",
            CodeLanguage::Json => "JSON",
            CodeLanguage::Markdown => "Markdown",
        }
    }
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CodeLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CodeLanguage::ALL
            .into_iter()
            .find(|lang| lang.tag() == wanted)
            .ok_or_else(|| format!("Unsupported language: {}", s.trim()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeExplainerState {
    pub code: String,
    pub language: CodeLanguage,
    pub explanation: String,
    pub error: Option<String>,
    pub pending: bool,
}
