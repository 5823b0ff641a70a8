use crate::render::node::{Element, Node};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn html_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Serializes a rendered tree to HTML.
pub fn to_html(element: &Element) -> String {
    let mut html = String::new();
    write_element(element, &mut html);
    html
}

fn write_node(node: &Node, html: &mut String) {
    match node {
        Node::Element(el) => write_element(el, html),
        Node::Text { text } => html.push_str(&html_escape(text)),
        Node::Markup { html: markup } => html.push_str(markup),
    }
}

fn write_element(element: &Element, html: &mut String) {
    html.push('<');
    html.push_str(&element.tag);
    if !element.classes.is_empty() {
        html.push_str(" class=\"");
        html.push_str(&html_escape(&element.classes.join(" ")));
        html.push('"');
    }
    for (name, value) in &element.attrs {
        html.push(' ');
        html.push_str(name);
        html.push_str("=\"");
        html.push_str(&html_escape(value));
        html.push('"');
    }
    html.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    for child in &element.children {
        write_node(child, html);
    }
    html.push_str("</");
    html.push_str(&element.tag);
    html.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text_and_attributes() {
        let el = Element::new("span")
            .with_attr("data-filter", r#"{"tags":["c++"]}"#)
            .with_child(Node::text("<C++ & co>"));
        assert_eq!(
            to_html(&el),
            r#"<span data-filter="{&quot;tags&quot;:[&quot;c++&quot;]}">&lt;C++ &amp; co&gt;</span>"#
        );
    }

    #[test]
    fn test_markup_is_inserted_raw() {
        let el = Element::new("p").with_child(Node::markup("<b>bold</b>"));
        assert_eq!(to_html(&el), "<p><b>bold</b></p>");
    }

    #[test]
    fn test_classes_and_void_elements() {
        let el = Element::new("div")
            .with_class("job")
            .with_class("selected")
            .with_child(Node::Element(Element::new("br")));
        assert_eq!(to_html(&el), r#"<div class="job selected"><br></div>"#);
    }
}
