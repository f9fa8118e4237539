//! Rich-text expansion of inline tag markup
//!
//! Messages carry `||`-separated nodes. A node starting with one of the
//! 4-character prefixes `ttp:`, `url:`, `cmd:`, `sgt:` or `ins:` attaches
//! hover text, a click action or an insertion to the preceding text node;
//! every other node starts a new text component. Plain-text contexts strip
//! tag nodes entirely.

use serde::{Deserialize, Serialize};
use std::fmt;

const TAG_PREFIX_LENGTH: usize = 4;
const NODE_SEPARATOR: &str = "||";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    HoverText,
    Url,
    Command,
    Suggestion,
    Insertion,
}

fn tag_kind(node: &str) -> Option<TagKind> {
    // A tag needs its prefix plus at least one body character.
    if node.len() < TAG_PREFIX_LENGTH + 1 {
        return None;
    }
    match node.get(..TAG_PREFIX_LENGTH)? {
        "ttp:" => Some(TagKind::HoverText),
        "url:" => Some(TagKind::Url),
        "cmd:" => Some(TagKind::Command),
        "sgt:" => Some(TagKind::Suggestion),
        "ins:" => Some(TagKind::Insertion),
        _ => None,
    }
}

/// Click behavior attached to a text component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickAction {
    OpenUrl(String),
    RunCommand(String),
    SuggestCommand(String),
}

/// One text node with its attached interactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub text: String,
    pub hover: Option<String>,
    pub click: Option<ClickAction>,
    pub insertion: Option<String>,
}

/// A message expanded into structured rich-text components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub components: Vec<Component>,
}

impl RenderedMessage {
    /// The plain-text view, with tag bodies stripped
    #[must_use]
    pub fn plain(&self) -> String {
        self.components
            .iter()
            .map(|component| component.text.as_str())
            .collect()
    }
}

impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

/// Expand inline tag markup into a structured rich-text message
#[must_use]
pub fn expand(message: &str) -> RenderedMessage {
    let mut components = Vec::new();
    let mut current: Option<Component> = None;
    for node in message.split(NODE_SEPARATOR) {
        match tag_kind(node) {
            None => {
                if let Some(component) = current.take() {
                    components.push(component);
                }
                current = Some(Component {
                    text: node.to_string(),
                    ..Component::default()
                });
            }
            Some(kind) => {
                if let Some(component) = &mut current {
                    let value = &node[TAG_PREFIX_LENGTH..];
                    match kind {
                        TagKind::HoverText => component.hover = Some(value.to_string()),
                        TagKind::Url => {
                            let url = if value.starts_with("https://")
                                || value.starts_with("http://")
                            {
                                value.to_string()
                            } else {
                                format!("http://{value}")
                            };
                            component.click = Some(ClickAction::OpenUrl(url));
                        }
                        TagKind::Command => {
                            component.click = Some(ClickAction::RunCommand(value.to_string()));
                        }
                        TagKind::Suggestion => {
                            component.click = Some(ClickAction::SuggestCommand(value.to_string()));
                        }
                        TagKind::Insertion => component.insertion = Some(value.to_string()),
                    }
                }
            }
        }
    }
    if let Some(component) = current.take() {
        components.push(component);
    }
    RenderedMessage { components }
}

/// Drop tag nodes, keeping only plain text
#[must_use]
pub fn strip_tags(message: &str) -> String {
    message
        .split(NODE_SEPARATOR)
        .filter(|node| tag_kind(node).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_hover_and_click() {
        let message = "You are banned.||ttp:Reason: spam||Appeal here||url:example.com/appeal";
        let rendered = expand(message);

        assert_eq!(rendered.components.len(), 2);
        assert_eq!(rendered.components[0].text, "You are banned.");
        assert_eq!(
            rendered.components[0].hover,
            Some("Reason: spam".to_string())
        );
        assert_eq!(rendered.components[1].text, "Appeal here");
        assert_eq!(
            rendered.components[1].click,
            Some(ClickAction::OpenUrl("http://example.com/appeal".to_string()))
        );
        assert_eq!(rendered.plain(), "You are banned.Appeal here");
    }

    #[test]
    fn test_url_scheme_preserved() {
        let rendered = expand("click||url:https://example.com");
        assert_eq!(
            rendered.components[0].click,
            Some(ClickAction::OpenUrl("https://example.com".to_string()))
        );
    }

    #[test]
    fn test_command_suggestion_insertion() {
        let rendered = expand("ban them||cmd:/ban Alice||sgt:/ban ||ins:Alice");
        let component = &rendered.components[0];
        // Later click tags overwrite earlier ones
        assert_eq!(
            component.click,
            Some(ClickAction::SuggestCommand("/ban ".to_string()))
        );
        assert_eq!(component.insertion, Some("Alice".to_string()));
    }

    #[test]
    fn test_short_nodes_are_text() {
        // "url:" with no body is below the tag length floor
        let rendered = expand("a||url:||b");
        assert_eq!(rendered.components.len(), 3);
        assert_eq!(rendered.plain(), "aurl:b");
    }

    #[test]
    fn test_leading_tag_without_text_is_dropped() {
        let rendered = expand("ttp:orphan hover||text");
        assert_eq!(rendered.components.len(), 1);
        assert_eq!(rendered.components[0].text, "text");
        assert_eq!(rendered.components[0].hover, None);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("You are banned.||ttp:Reason: spam||Appeal||url:example.com"),
            "You are banned.Appeal"
        );
        assert_eq!(strip_tags("no tags here"), "no tags here");
    }
}
