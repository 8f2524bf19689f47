//! CLI configuration files.

use std::path::Path;

use anyhow::{Context, Result};
use rewrite_core::RewriterConfig;

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["rewrite.toml", ".rewrite.toml", "rewrite.json"];

/// Load a rewriter config from a TOML or JSON file.
pub fn load(path: &Path) -> Result<RewriterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Generate a default rewrite.toml.
pub fn generate_default_config() -> String {
    r#"# Streaming HTML rewriter configuration

encoding = "utf-8"
strict = true
chunk_size = 8192
# max_memory_bytes = 1048576

# Upgrade links to https.
[[rules]]
selector = "a[href]"
action = "replace_attribute"
attribute = "href"
from = "http:"
to = "https:"

# [[rules]]
# selector = "script[src*='tracker']"
# action = "remove"

# [[rules]]
# selector = "body"
# action = "insert"
# position = "append"
# content = "<footer>rewritten</footer>"
# html = true
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_core::RewriteRule;

    #[test]
    fn test_default_config_parses_and_validates() {
        let config: RewriterConfig = toml::from_str(&generate_default_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.rules, vec![RewriteRule::upgrade_scheme("a[href]", "href")]);
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(Path::new("rewrite.json")));
        assert!(!is_json(Path::new("rewrite.toml")));
        assert!(!is_json(Path::new("json")));
    }

    #[test]
    fn test_load_toml_and_json() {
        let dir = std::env::temp_dir().join(format!("rewrite-cli-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let toml_path = dir.join("rewrite.toml");
        std::fs::write(&toml_path, "chunk_size = 64\n").unwrap();
        assert_eq!(load(&toml_path).unwrap().chunk_size, 64);

        let json_path = dir.join("rewrite.json");
        std::fs::write(&json_path, r#"{"encoding": "latin1", "strict": false}"#).unwrap();
        let config = load(&json_path).unwrap();
        assert_eq!(config.encoding, "latin1");
        assert!(!config.strict);

        let missing = dir.join("missing.toml");
        assert!(load(&missing).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
