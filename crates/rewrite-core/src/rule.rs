//! Declarative selector-scoped rewrite rules.

use serde::{Deserialize, Serialize};

/// Where inserted content goes relative to the matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    /// Before the start tag.
    Before,
    /// After the end tag.
    After,
    /// Right after the start tag.
    Prepend,
    /// Right before the end tag.
    Append,
}

impl InsertPosition {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Prepend => "prepend",
            Self::Append => "append",
        }
    }
}

/// What a rule does to each matched element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuleAction {
    /// Replace `from` with `to` inside an attribute value.
    ///
    /// Only the first occurrence is replaced unless `all` is set. Elements
    /// without the attribute are left untouched.
    ReplaceAttribute {
        attribute: String,
        from: String,
        to: String,
        #[serde(default)]
        all: bool,
    },
    /// Set an attribute, adding it if missing.
    SetAttribute { attribute: String, value: String },
    /// Remove an attribute.
    RemoveAttribute { attribute: String },
    /// Rename the element's tag.
    RenameTag { tag: String },
    /// Insert content around or inside the element.
    Insert {
        position: InsertPosition,
        content: String,
        #[serde(default)]
        html: bool,
    },
    /// Replace the element's children.
    SetInnerContent {
        content: String,
        #[serde(default)]
        html: bool,
    },
    /// Replace the whole element.
    Replace {
        content: String,
        #[serde(default)]
        html: bool,
    },
    /// Remove the element and its content.
    Remove,
    /// Remove the element's tags but keep its content.
    Unwrap,
}

/// A selector bound to a single action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// CSS selector the rule applies to (e.g., `a[href]`).
    pub selector: String,
    /// Action applied to every matched element.
    #[serde(flatten)]
    pub action: RuleAction,
}

impl RewriteRule {
    /// Create a new rule.
    pub fn new(selector: impl Into<String>, action: RuleAction) -> Self {
        Self {
            selector: selector.into(),
            action,
        }
    }

    /// Rule rewriting the `http:` scheme of an attribute to `https:`.
    pub fn upgrade_scheme(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::new(
            selector,
            RuleAction::ReplaceAttribute {
                attribute: attribute.into(),
                from: "http:".to_string(),
                to: "https:".to_string(),
                all: false,
            },
        )
    }

    /// Short human-readable summary for logs and listings.
    pub fn describe(&self) -> String {
        let action = match &self.action {
            RuleAction::ReplaceAttribute {
                attribute,
                from,
                to,
                all,
            } => {
                let scope = if *all { "all" } else { "first" };
                format!("replace {} '{}' -> '{}' in @{}", scope, from, to, attribute)
            }
            RuleAction::SetAttribute { attribute, value } => {
                format!("set @{}='{}'", attribute, value)
            }
            RuleAction::RemoveAttribute { attribute } => format!("remove @{}", attribute),
            RuleAction::RenameTag { tag } => format!("rename to <{}>", tag),
            RuleAction::Insert { position, .. } => format!("insert {}", position.as_str()),
            RuleAction::SetInnerContent { .. } => "set inner content".to_string(),
            RuleAction::Replace { .. } => "replace element".to_string(),
            RuleAction::Remove => "remove element".to_string(),
            RuleAction::Unwrap => "unwrap element".to_string(),
        };

        format!("{}: {}", self.selector, action)
    }

    /// Attribute name the action targets, if any.
    pub fn attribute(&self) -> Option<&str> {
        match &self.action {
            RuleAction::ReplaceAttribute { attribute, .. }
            | RuleAction::SetAttribute { attribute, .. }
            | RuleAction::RemoveAttribute { attribute } => Some(attribute),
            _ => None,
        }
    }
}

/// Apply a `replace_attribute` edit to a value.
///
/// A value without `from` comes back unchanged.
pub fn replace_in_value(value: &str, from: &str, to: &str, all: bool) -> String {
    if from.is_empty() {
        value.to_string()
    } else if all {
        value.replace(from, to)
    } else {
        value.replacen(from, to, 1)
    }
}
