use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use gleaner_core::ExtractConfig;

pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, html: &str) -> String;
}

/// Drops navigation, chrome and ad/paywall containers, then joins the
/// remaining text nodes with single spaces.
#[derive(Debug, Clone)]
pub struct BoilerplateStripper {
    removed_tags: Vec<String>,
    class_patterns: Vec<String>,
    id_patterns: Vec<String>,
}

impl BoilerplateStripper {
    pub fn new(config: &ExtractConfig) -> Self {
        let lower = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            removed_tags: lower(&config.removed_tags),
            class_patterns: lower(&config.class_patterns),
            id_patterns: lower(&config.id_patterns),
        }
    }

    fn is_removed(&self, element: &ElementRef) -> bool {
        let value = element.value();
        let tag = value.name().to_ascii_lowercase();
        if self.removed_tags.iter().any(|t| *t == tag) {
            return true;
        }
        let attr_matches = |name: &str, patterns: &[String]| {
            value.attr(name).is_some_and(|raw| {
                let raw = raw.to_ascii_lowercase();
                patterns.iter().any(|p| raw.contains(p.as_str()))
            })
        };
        attr_matches("class", &self.class_patterns) || attr_matches("id", &self.id_patterns)
    }

    fn collect<'a>(&self, node: NodeRef<'a, Node>, out: &mut Vec<&'a str>) {
        match node.value() {
            Node::Text(text) => {
                let piece: &str = text;
                if !piece.trim().is_empty() {
                    out.push(piece);
                }
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    if self.is_removed(&element) {
                        return;
                    }
                }
                for child in node.children() {
                    self.collect(child, out);
                }
            }
            Node::Comment(_) | Node::ProcessingInstruction(_) | Node::Doctype(_) => {}
            _ => {
                for child in node.children() {
                    self.collect(child, out);
                }
            }
        }
    }
}

impl Default for BoilerplateStripper {
    fn default() -> Self {
        Self::new(&ExtractConfig::default())
    }
}

impl TextExtractor for BoilerplateStripper {
    fn extract_text(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }
        if !looks_like_markup(html) {
            return join_words(std::iter::once(html));
        }
        let document = Html::parse_document(html);
        let mut pieces = Vec::new();
        self.collect(document.tree.root(), &mut pieces);
        join_words(pieces)
    }
}

/// Markup starts with a tag or carries a document-level one. Anything else,
/// including text produced by an earlier extraction, is already plain text
/// and must not have its entities or literal tags interpreted again.
fn looks_like_markup(input: &str) -> bool {
    let head = input.trim_start_matches('\u{feff}').trim_start();
    if head.starts_with('<') {
        return true;
    }
    let lower = input.to_ascii_lowercase();
    ["<!doctype", "<html", "<head", "<body"]
        .iter()
        .any(|marker| lower.contains(marker))
}

fn join_words<'a>(pieces: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = String::new();
    for word in pieces.into_iter().flat_map(str::split_whitespace) {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(word);
    }
    text
}
