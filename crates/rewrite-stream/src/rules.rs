//! Compiling declarative rules into element handlers.

use lol_html::html_content::{ContentType, Element};
use lol_html::HandlerResult;
use rewrite_core::{replace_in_value, InsertPosition, RewriteRule, RuleAction};

use crate::handlers::ElementHandlers;

/// Build the element handlers for a rule.
pub fn compile_rule(rule: &RewriteRule) -> ElementHandlers {
    let action = rule.action.clone();
    ElementHandlers::new().element(move |el| apply_action(&action, el))
}

fn content_type(html: bool) -> ContentType {
    if html {
        ContentType::Html
    } else {
        ContentType::Text
    }
}

/// Apply a single action to a matched element.
pub fn apply_action(action: &RuleAction, el: &mut Element<'_, '_>) -> HandlerResult {
    match action {
        RuleAction::ReplaceAttribute {
            attribute,
            from,
            to,
            all,
        } => {
            // Written back even when unchanged, which normalises quoting.
            if let Some(value) = el.get_attribute(attribute) {
                el.set_attribute(attribute, &replace_in_value(&value, from, to, *all))?;
            }
        }
        RuleAction::SetAttribute { attribute, value } => el.set_attribute(attribute, value)?,
        RuleAction::RemoveAttribute { attribute } => el.remove_attribute(attribute),
        RuleAction::RenameTag { tag } => el.set_tag_name(tag)?,
        RuleAction::Insert {
            position,
            content,
            html,
        } => {
            let ct = content_type(*html);
            match position {
                InsertPosition::Before => el.before(content, ct),
                InsertPosition::After => el.after(content, ct),
                InsertPosition::Prepend => el.prepend(content, ct),
                InsertPosition::Append => el.append(content, ct),
            }
        }
        RuleAction::SetInnerContent { content, html } => {
            el.set_inner_content(content, content_type(*html))
        }
        RuleAction::Replace { content, html } => el.replace(content, content_type(*html)),
        RuleAction::Remove => el.remove(),
        RuleAction::Unwrap => el.remove_and_keep_content(),
    }

    Ok(())
}
