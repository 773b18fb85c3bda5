use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Languages the patcher recognizes from the target file's extension.
///
/// Detection only informs reporting: the brace scan runs on any text, but it
/// is structurally meaningful only for languages whose blocks are delimited
/// by braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// Rust (.rs)
    Rust,
    /// C (.c, .h)
    C,
    /// C++ (.cpp, .cc, .cxx, .hpp, .hxx, .hh)
    Cpp,
    /// C# (.cs)
    CSharp,
    /// Go (.go)
    Go,
    /// Java (.java)
    Java,
    /// JavaScript (.js, .mjs, .cjs, .jsx)
    JavaScript,
    /// TypeScript (.ts, .tsx, .mts, .cts)
    TypeScript,
    /// Python (.py, .pyi)
    Python,
    /// Unknown or unsupported language
    Unknown,
}

impl Language {
    /// Get the language name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Language::Rust => "Rust",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Python => "Python",
            Language::Unknown => "Unknown",
        }
    }

    /// Whether the language delimits blocks with braces.
    ///
    /// Python blocks are indentation-delimited, so a brace-depth scan over
    /// Python source can only match literal dict or set braces.
    pub fn uses_braces(&self) -> bool {
        !matches!(self, Language::Python | Language::Unknown)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the programming language from a file path.
///
/// Examines the file extension and returns the corresponding variant,
/// `Language::Unknown` when the extension is not recognized.
///
/// # Examples
/// ```
/// use block_patch::{Language, detect_language};
/// assert_eq!(detect_language("main.rs"), Language::Rust);
/// assert_eq!(detect_language("Component.tsx"), Language::TypeScript);
/// assert_eq!(detect_language("notes.xyz"), Language::Unknown);
/// ```
pub fn detect_language<P: AsRef<Path>>(path: P) -> Language {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "rs" => Language::Rust,
        "c" | "h" => Language::C,
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Language::Cpp,
        "cs" => Language::CSharp,
        "go" => Language::Go,
        "java" => Language::Java,
        "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
        "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
        "py" | "pyi" => Language::Python,
        _ => Language::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_brace_languages() {
        assert_eq!(detect_language("main.rs"), Language::Rust);
        assert_eq!(detect_language("header.hpp"), Language::Cpp);
        assert_eq!(detect_language("Service.cs"), Language::CSharp);
        assert_eq!(detect_language("server.go"), Language::Go);
        assert_eq!(detect_language("Main.java"), Language::Java);
        assert_eq!(detect_language("app.js"), Language::JavaScript);
        assert_eq!(detect_language("widget.jsx"), Language::JavaScript);
        assert_eq!(detect_language("components/Trainings.tsx"), Language::TypeScript);
    }

    #[test]
    fn test_detect_python_and_unknown() {
        assert_eq!(detect_language("script.py"), Language::Python);
        assert_eq!(detect_language("stubs.pyi"), Language::Python);
        assert_eq!(detect_language("README"), Language::Unknown);
        assert_eq!(detect_language("data.xyz"), Language::Unknown);
        assert_eq!(detect_language(""), Language::Unknown);
    }

    #[test]
    fn test_uses_braces() {
        assert!(Language::Rust.uses_braces());
        assert!(Language::TypeScript.uses_braces());
        assert!(Language::Go.uses_braces());
        assert!(!Language::Python.uses_braces());
        assert!(!Language::Unknown.uses_braces());
    }

    #[test]
    fn test_display() {
        assert_eq!(Language::TypeScript.to_string(), "TypeScript");
        assert_eq!(Language::Cpp.to_string(), "C++");
        assert_eq!(Language::CSharp.to_string(), "C#");
    }
}
