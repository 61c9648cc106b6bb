//! Language identification
//!
//! Maps the language tags written after a fence (```` ```py ````) or inside an
//! inline tag (`` `{rs} ...` ``) to the grammars the tokenizer knows.

/// Languages with a bundled grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    Rust,
    JavaScript,
    Json,
    Python,
    Go,
    Php,
    C,
    Cpp,
    Java,
    Bash,
    Scheme,
    Ini,
}

impl LanguageId {
    /// Every supported language
    pub const ALL: &'static [LanguageId] = &[
        LanguageId::Rust,
        LanguageId::JavaScript,
        LanguageId::Json,
        LanguageId::Python,
        LanguageId::Go,
        LanguageId::Php,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::Java,
        LanguageId::Bash,
        LanguageId::Scheme,
        LanguageId::Ini,
    ];

    /// Resolve a fence / inline language tag (case-insensitive, aliases allowed)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = match tag.trim().to_lowercase().as_str() {
            "rust" | "rs" => LanguageId::Rust,
            "javascript" | "js" | "mjs" | "cjs" | "jsx" => LanguageId::JavaScript,
            "json" | "jsonc" => LanguageId::Json,
            "python" | "py" | "python3" => LanguageId::Python,
            "go" | "golang" => LanguageId::Go,
            "php" => LanguageId::Php,
            "c" | "h" => LanguageId::C,
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => LanguageId::Cpp,
            "java" => LanguageId::Java,
            "bash" | "sh" | "shell" | "zsh" => LanguageId::Bash,
            "scheme" | "racket" | "rkt" | "scm" => LanguageId::Scheme,
            "ini" | "cfg" | "conf" => LanguageId::Ini,
            _ => return None,
        };
        Some(lang)
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::Rust => "Rust",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::Json => "JSON",
            LanguageId::Python => "Python",
            LanguageId::Go => "Go",
            LanguageId::Php => "PHP",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Java => "Java",
            LanguageId::Bash => "Bash",
            LanguageId::Scheme => "Scheme",
            LanguageId::Ini => "INI",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(LanguageId::from_tag("rust"), Some(LanguageId::Rust));
        assert_eq!(LanguageId::from_tag("RS"), Some(LanguageId::Rust));
        assert_eq!(LanguageId::from_tag("py"), Some(LanguageId::Python));
        assert_eq!(LanguageId::from_tag("c++"), Some(LanguageId::Cpp));
        assert_eq!(LanguageId::from_tag("sh"), Some(LanguageId::Bash));
        assert_eq!(LanguageId::from_tag("brainfuck"), None);
        assert_eq!(LanguageId::from_tag(""), None);
    }

    #[test]
    fn test_all_languages_resolve_by_display_name() {
        for lang in LanguageId::ALL {
            let tag = match lang {
                LanguageId::Cpp => "cpp",
                other => other.display_name(),
            };
            assert_eq!(LanguageId::from_tag(tag), Some(*lang));
        }
    }
}
