//! Markdown embedding into AppStream descriptor XML.
//!
//! AppStream descriptions accept a small XHTML subset: no headings and no
//! nested lists. Markdown is rendered to HTML, parsed as an XML fragment,
//! and rewritten so that headings become bold paragraphs and nested list
//! items become siblings of their parent item.

use pulldown_cmark::{html, Event, Options, Parser, TagEnd};
use tracing::debug;
use xmltree::{Element, XMLNode};

use crate::readme::cutoff_on_mark;
use crate::{MetadataError, Result};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const LISTS: &[&str] = &["ul", "ol"];

/// Renders markdown into HTML
pub trait MarkdownRenderer {
    /// Render a markdown document to an HTML fragment
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer with tables, footnotes and strikethrough
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkRenderer;

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let parser = Parser::new_ext(markdown, options);
        let mut output = String::new();
        html::push_html(&mut output, parser);
        output
    }
}

/// Convert markdown into descriptor-safe XML nodes
pub fn markdown_to_nodes(markdown: &str, renderer: &dyn MarkdownRenderer) -> Result<Vec<XMLNode>> {
    let rendered = renderer.render(cutoff_on_mark(markdown));
    let wrapped = format!("<wrapper>{}</wrapper>", rendered);

    let mut wrapper = Element::parse(wrapped.as_bytes()).map_err(|e| {
        MetadataError::Xml(format!("rendered markdown is not well-formed XML: {}", e))
    })?;

    demote_headings(&mut wrapper);
    flatten_lists(&mut wrapper);
    debug!(nodes = wrapper.children.len(), "converted markdown to descriptor nodes");
    Ok(wrapper.children)
}

/// Append markdown, converted to descriptor XML, to an element
pub fn insert_markdown(
    parent: &mut Element,
    markdown: &str,
    renderer: &dyn MarkdownRenderer,
) -> Result<()> {
    let nodes = markdown_to_nodes(markdown, renderer)?;
    parent.children.extend(nodes);
    Ok(())
}

/// Text content of a markdown document with whitespace collapsed
pub fn markdown_to_plain(markdown: &str) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace every heading with `<p><strong>…</strong></p>`
fn demote_headings(element: &mut Element) {
    for child in element.children.iter_mut() {
        let XMLNode::Element(inner) = child else {
            continue;
        };
        if !HEADINGS.contains(&inner.name.as_str()) {
            demote_headings(inner);
            continue;
        }

        let mut strong = Element::new("strong");
        strong.children = std::mem::take(&mut inner.children);
        let mut paragraph = Element::new("p");
        paragraph.children.push(XMLNode::Element(strong));
        *child = XMLNode::Element(paragraph);
    }
}

/// Move items of nested lists next to the item that contained them.
///
/// Runs bottom-up so arbitrarily deep nesting collapses into the outermost
/// list, preserving document order.
fn flatten_lists(element: &mut Element) {
    for child in element.children.iter_mut() {
        if let XMLNode::Element(inner) = child {
            flatten_lists(inner);
        }
    }

    if !LISTS.contains(&element.name.as_str()) {
        return;
    }

    let children = std::mem::take(&mut element.children);
    for child in children {
        match child {
            XMLNode::Element(mut item) if item.name == "li" => {
                let nested = take_nested_lists(&mut item);
                element.children.push(XMLNode::Element(item));
                for list in nested {
                    element.children.extend(
                        list.children
                            .into_iter()
                            .filter(|node| matches!(node, XMLNode::Element(e) if e.name == "li")),
                    );
                }
            }
            other => element.children.push(other),
        }
    }
}

fn take_nested_lists(item: &mut Element) -> Vec<Element> {
    let mut lists = Vec::new();
    for child in std::mem::take(&mut item.children) {
        match child {
            XMLNode::Element(e) if LISTS.contains(&e.name.as_str()) => lists.push(e),
            other => item.children.push(other),
        }
    }

    if !lists.is_empty() {
        while let Some(XMLNode::Text(text)) = item.children.last_mut() {
            let trimmed = text.trim_end().len();
            if trimmed > 0 {
                text.truncate(trimmed);
                break;
            }
            item.children.pop();
        }
    }
    lists
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn element_text(element: &Element) -> String {
        let mut text = String::new();
        for child in &element.children {
            match child {
                XMLNode::Text(t) | XMLNode::CData(t) => text.push_str(t),
                XMLNode::Element(e) => text.push_str(&element_text(e)),
                _ => {}
            }
        }
        text
    }

    fn elements(nodes: &[XMLNode]) -> Vec<&Element> {
        nodes.iter().filter_map(|n| n.as_element()).collect()
    }

    #[test]
    fn test_paragraphs_are_preserved() {
        let nodes = markdown_to_nodes("First *one*\n\nSecond", &CommonMarkRenderer).unwrap();
        let elements = elements(&nodes);
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].name, "p");
        assert_eq!(element_text(elements[0]), "First one");
        assert!(elements[0].get_child("em").is_some());
    }

    #[test]
    fn test_headings_become_bold_paragraphs() {
        let nodes =
            markdown_to_nodes("## Features\n\nText\n\n#### With `code`", &CommonMarkRenderer).unwrap();
        let elements = elements(&nodes);

        assert_eq!(elements[0].name, "p");
        let strong = elements[0].get_child("strong").unwrap();
        assert_eq!(element_text(strong), "Features");

        assert_eq!(elements[1].name, "p");
        assert_eq!(element_text(elements[1]), "Text");

        let strong = elements[2].get_child("strong").unwrap();
        assert!(strong.get_child("code").is_some());
        assert!(elements
            .iter()
            .all(|e| !HEADINGS.contains(&e.name.as_str())));
    }

    #[test]
    fn test_nested_list_is_flattened_in_order() {
        let markdown = "- a\n  - b\n  - c\n- d\n";
        let nodes = markdown_to_nodes(markdown, &CommonMarkRenderer).unwrap();
        let elements = elements(&nodes);
        assert_eq!(elements.len(), 1);

        let list = elements[0];
        assert_eq!(list.name, "ul");
        let items: Vec<String> = list
            .children
            .iter()
            .filter_map(|n| n.as_element())
            .map(|li| {
                assert_eq!(li.name, "li");
                assert!(li.get_child("ul").is_none());
                element_text(li)
            })
            .collect();
        assert_eq!(items, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_deeply_nested_lists_are_flattened() {
        let markdown = "1. one\n   - two\n     - three\n2. four\n";
        let nodes = markdown_to_nodes(markdown, &CommonMarkRenderer).unwrap();
        let list = elements(&nodes)[0];
        assert_eq!(list.name, "ol");
        let items: Vec<String> = list
            .children
            .iter()
            .filter_map(|n| n.as_element())
            .map(element_text)
            .collect();
        assert_eq!(items, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_end_of_description_is_honored() {
        let nodes = markdown_to_nodes(
            "Kept\n\n<!-- end-of-description -->\n\nDropped",
            &CommonMarkRenderer,
        )
        .unwrap();
        let elements = elements(&nodes);
        assert_eq!(elements.len(), 1);
        assert_eq!(element_text(elements[0]), "Kept");
    }

    #[test]
    fn test_malformed_html_is_an_error() {
        let result = markdown_to_nodes("line<br>break", &CommonMarkRenderer);
        assert!(matches!(result, Err(MetadataError::Xml(_))));
    }

    #[test]
    fn test_custom_renderer_is_used() {
        struct Fixed;
        impl MarkdownRenderer for Fixed {
            fn render(&self, _markdown: &str) -> String {
                "<h1>Title</h1><ul><li>x<ol><li>y</li></ol></li></ul>".to_string()
            }
        }

        let mut parent = Element::new("description");
        insert_markdown(&mut parent, "ignored", &Fixed).unwrap();

        let elements = elements(&parent.children);
        assert_eq!(elements[0].name, "p");
        let items: Vec<String> = elements[1]
            .children
            .iter()
            .filter_map(|n| n.as_element())
            .map(element_text)
            .collect();
        assert_eq!(items, vec!["x", "y"]);
    }

    #[test]
    fn test_markdown_to_plain() {
        assert_eq!(
            markdown_to_plain("The *main* screen\nwith `dice`"),
            "The main screen with dice"
        );
        assert_eq!(markdown_to_plain("  Plain caption  "), "Plain caption");
    }
}
