//! Debug rendering: pretty-print the parsed tree inside an HTML shell.
//!
//! A pass-through alternate output path for inspecting what was actually
//! extracted from the container. No classification or interpretation
//! happens here; the tree is serialized as indented, escaped XML.

use crate::tree::{Element, Node};

/// Render the tree as an escaped, indented XML dump wrapped in a minimal
/// HTML document.
pub fn debug_html(root: &Element) -> String {
    let mut xml = String::with_capacity(1024);
    write_element(root, 0, &mut xml);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>XFA Content (Debug)</title>
</head>
<body>
<pre>{}</pre>
</body>
</html>
"#,
        escape(&xml)
    )
}

fn write_element(el: &Element, depth: usize, out: &mut String) {
    indent(depth, out);
    out.push('<');
    out.push_str(&el.name);
    for (key, value) in &el.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }

    if el.text.is_empty() && el.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");

    if !el.text.is_empty() {
        indent(depth + 1, out);
        out.push_str(el.text.trim());
        out.push('\n');
    }
    for child in &el.children {
        match child {
            Node::Element(child_el) => write_element(child_el, depth + 1, out),
            Node::Comment(text) => {
                indent(depth + 1, out);
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->\n");
            }
        }
    }

    indent(depth, out);
    out.push_str("</");
    out.push_str(&el.name);
    out.push_str(">\n");
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_tree;

    #[test]
    fn test_debug_dump_is_indented_and_escaped() {
        let root = parse_tree(
            "<template><subform name=\"P\"><!-- note --><field name=\"a\"/></subform></template>",
        )
        .unwrap();
        let html = debug_html(&root);
        assert!(html.contains("<title>XFA Content (Debug)</title>"));
        assert!(html.contains("&lt;template&gt;"));
        assert!(html.contains("&lt;subform name=\"P\"&gt;"));
        assert!(html.contains("&lt;field name=\"a\"/&gt;"));
        assert!(html.contains("&lt;!-- note --&gt;"));
        // Children are indented below their parent.
        assert!(html.contains("\n  &lt;subform"));
    }

    #[test]
    fn test_debug_dump_keeps_text() {
        let root = parse_tree("<text>hello</text>").unwrap();
        let html = debug_html(&root);
        assert!(html.contains("hello"));
    }
}
