//! Version command for the mindmap CLI.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Text printed by `--version`.
pub fn version_line() -> String {
    format!("mindmap {}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_line_format() {
        // Version should be in semver format (e.g., "0.1.0")
        let line = version_line();
        let version = line.strip_prefix("mindmap ").unwrap();
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }
}
