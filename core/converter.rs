use crate::error::Result;
use std::path::Path;

/// Scheduling priority of a converter relative to the other converters a
/// host has registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Lowest,
    Low,
    Normal,
    High,
    Highest,
}

/// Static registration declarations read by the host at registration time.
/// Plain data, so the conversion logic itself carries no dependency on any
/// particular plugin-loading mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterInfo {
    /// Whether the converter may run when the host is restricted to safe
    /// plugins.
    pub safe: bool,
    pub priority: Priority,
}

/// A converter transforms the body of a recognized source file into a new
/// textual representation with a declared output extension.
pub trait Converter {
    /// Registration metadata consumed by the host.
    fn info(&self) -> ConverterInfo;

    /// True if the converter claims source files with this extension.
    /// `ext` carries its leading dot (e.g. `".copy"`).
    fn matches(&self, ext: &str) -> bool;

    /// The output extension produced for a matched source extension.
    fn output_ext(&self, ext: &str) -> String;

    /// Transform the body of a source file.
    fn convert(&self, content: &str) -> Result<String>;

    /// True if `path` has an extension this converter matches.
    fn claims(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.matches(&format!(".{}", ext)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UpcaseConverter;

    impl Converter for UpcaseConverter {
        fn info(&self) -> ConverterInfo {
            ConverterInfo {
                safe: true,
                priority: Priority::Normal,
            }
        }
        fn matches(&self, ext: &str) -> bool {
            ext.eq_ignore_ascii_case(".up")
        }
        fn output_ext(&self, _ext: &str) -> String {
            ".txt".to_string()
        }
        fn convert(&self, content: &str) -> Result<String> {
            Ok(content.to_uppercase())
        }
    }

    #[test]
    fn priorities_order_from_lowest_to_highest() {
        assert!(Priority::Lowest < Priority::Low);
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
        assert!(Priority::High < Priority::Highest);
    }

    #[test]
    fn claims_consults_the_extension_predicate() {
        let converter = UpcaseConverter;
        assert!(converter.claims(Path::new("notes/today.up")));
        assert!(converter.claims(Path::new("today.UP")));
        assert!(!converter.claims(Path::new("today.txt")));
        assert!(!converter.claims(Path::new("no-extension")));
    }
}
