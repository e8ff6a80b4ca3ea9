//! The stacked UI interpreter: element classification, recursive markup
//! rendering, and script aggregation.
//!
//! Absolute x/y coordinates in the source form are deliberately ignored;
//! every element renders as a block so the output flows top to bottom.
//! All elements and their cascade (linkage) attributes are preserved.
//! The transform is pure and deterministic: the same input tree always
//! yields byte-identical output.

use crate::document::assemble_document;
use crate::runtime::synthesize_shim;
use crate::tree::{Element, Node};

/// Semantic kind of a form element, derived purely from its local tag
/// name, case-insensitively. Anything unmatched is [`ElementKind::Other`]
/// and passes its children through transparently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// `subform` — container group with a labeled wrapper.
    Subform,
    /// `field` — editable control, or clickable when hinted as a button.
    Field,
    /// `button` — clickable control labeled by its direct text.
    Button,
    /// `text` — non-interactive text block.
    Text,
    /// `textEdit` — text-restricted editable control.
    TextEdit,
    /// `numericEdit` — numeric-restricted editable control.
    NumericEdit,
    /// `choiceList` — selectable options sourced from descendant items.
    ChoiceList,
    /// `draw` — decorative bordered container.
    Draw,
    /// `exclGroup` — mutually exclusive selectors sharing one group name.
    ExclGroup,
    /// `checkButton` — single checkable control.
    CheckButton,
    /// Anything else — transparent pass-through.
    Other,
}

impl ElementKind {
    /// Classify a tag name. Never fails; unmatched names resolve to
    /// [`ElementKind::Other`].
    pub fn classify(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "subform" => ElementKind::Subform,
            "field" => ElementKind::Field,
            "button" => ElementKind::Button,
            "text" => ElementKind::Text,
            "textedit" => ElementKind::TextEdit,
            "numericedit" => ElementKind::NumericEdit,
            "choicelist" => ElementKind::ChoiceList,
            "draw" => ElementKind::Draw,
            "exclgroup" => ElementKind::ExclGroup,
            "checkbutton" => ElementKind::CheckButton,
            _ => ElementKind::Other,
        }
    }
}

/// Result of rendering one subtree: the markup fragment plus whether any
/// node in it requested cross-element linkage. Returned explicitly so the
/// recursion carries no hidden shared state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Markup fragment for this subtree.
    pub html: String,
    /// True when any node in the subtree bears a cascade attribute.
    pub linkage_required: bool,
}

/// Render one node to a markup fragment.
///
/// Non-element nodes (comments) render to an empty fragment and are
/// otherwise skipped.
pub fn render_node(node: &Node) -> Rendered {
    match node {
        Node::Element(el) => render_element(el),
        Node::Comment(_) => Rendered::default(),
    }
}

/// Render one element per its classified kind, recursing depth-first.
pub fn render_element(el: &Element) -> Rendered {
    let cascade = el.attr("cascade");
    let cascade_attr = match cascade {
        Some(group) => format!(" data-cascade='{}'", group),
        None => String::new(),
    };
    let mut linkage = cascade.is_some();
    let mut parts: Vec<String> = Vec::with_capacity(4);

    match ElementKind::classify(el.local_name()) {
        ElementKind::Subform => {
            let name = el.attr_or("name", "Subform");
            parts.push("<div class='subform'>".to_string());
            parts.push(format!("<h2>{}</h2>", name));
            render_children(el, &mut parts, &mut linkage);
            parts.push("</div>".to_string());
        }
        ElementKind::Field => {
            let name = el.attr_or("name", "UnnamedField");
            let label = el.attr_or("label", name);
            let value = el.attr_or("value", "");
            let field_type = el.attr_or("type", "text");
            let ui_type = el.attr_or("uiType", "").to_ascii_lowercase();
            parts.push("<div class='field'>".to_string());
            if renders_as_button(name, &ui_type) {
                parts.push(format!(
                    "<button type='button' id='{name}' name='{name}'{cascade_attr}>{label}</button>"
                ));
            } else {
                parts.push(format!("<label for='{name}'>{label}</label>"));
                parts.push(format!(
                    "<input type='{field_type}' id='{name}' name='{name}' value='{value}'{cascade_attr} />"
                ));
            }
            parts.push("</div>".to_string());
            linkage |= children_request_linkage(el);
        }
        ElementKind::Button => {
            let text = if el.text.is_empty() {
                "Button"
            } else {
                el.text.as_str()
            };
            let id = el.attr_or("name", "button");
            parts.push("<div class='button'>".to_string());
            parts.push(format!(
                "<button type='button' id='{id}' name='{id}'{cascade_attr}>{text}</button>"
            ));
            parts.push("</div>".to_string());
            linkage |= children_request_linkage(el);
        }
        ElementKind::Text => {
            parts.push(format!("<div class='static-text'>{}</div>", el.text));
            linkage |= children_request_linkage(el);
        }
        ElementKind::TextEdit => {
            let name = el.attr_or("name", "TextEdit");
            let value = el.attr_or("value", "");
            parts.push("<div class='textedit'>".to_string());
            parts.push(format!("<label for='{name}'>{name}</label>"));
            parts.push(format!(
                "<input type='text' id='{name}' name='{name}' value='{value}'{cascade_attr} />"
            ));
            parts.push("</div>".to_string());
            linkage |= children_request_linkage(el);
        }
        ElementKind::NumericEdit => {
            let name = el.attr_or("name", "NumericEdit");
            let value = el.attr_or("value", "");
            parts.push("<div class='numericedit'>".to_string());
            parts.push(format!("<label for='{name}'>{name}</label>"));
            parts.push(format!(
                "<input type='number' id='{name}' name='{name}' value='{value}'{cascade_attr} />"
            ));
            parts.push("</div>".to_string());
            linkage |= children_request_linkage(el);
        }
        ElementKind::ChoiceList => {
            let name = el.attr_or("name", "ChoiceList");
            parts.push("<div class='choicelist'>".to_string());
            parts.push(format!("<label for='{name}'>{name}</label>"));
            parts.push(format!("<select id='{name}' name='{name}'{cascade_attr}>"));
            for item in el.descendants_by_local_name("item") {
                let (value, text) = option_value_text(item);
                parts.push(format!("<option value='{}'>{}</option>", value, text));
            }
            parts.push("</select>".to_string());
            parts.push("</div>".to_string());
            linkage |= children_request_linkage(el);
        }
        ElementKind::Draw => {
            parts.push(
                "<div class='draw' style='border:1px solid #aaa; padding:5px;'>".to_string(),
            );
            let trimmed = el.text.trim();
            if !trimmed.is_empty() {
                parts.push(format!("<span>{}</span>", trimmed));
            }
            render_children(el, &mut parts, &mut linkage);
            parts.push("</div>".to_string());
        }
        ElementKind::ExclGroup => {
            let group = el.attr_or("name", "ExclGroup");
            parts.push("<div class='exclgroup'>".to_string());
            for choice in el.descendants_by_local_name("exclchoice") {
                let (value, label) = option_value_text(choice);
                parts.push(format!(
                    "<label><input type='radio' name='{group}' value='{value}'{cascade_attr}/> {label}</label>"
                ));
            }
            parts.push("</div>".to_string());
            linkage |= children_request_linkage(el);
        }
        ElementKind::CheckButton => {
            let name = el.attr_or("name", "CheckButton");
            parts.push("<div class='checkbutton'>".to_string());
            parts.push(format!(
                "<label><input type='checkbox' id='{name}' name='{name}'{cascade_attr}/> {name}</label>"
            ));
            parts.push("</div>".to_string());
            linkage |= children_request_linkage(el);
        }
        ElementKind::Other => {
            render_children(el, &mut parts, &mut linkage);
        }
    }

    Rendered {
        html: parts.join("\n"),
        linkage_required: linkage,
    }
}

/// Render every child in document order, folding linkage flags.
fn render_children(el: &Element, parts: &mut Vec<String>, linkage: &mut bool) {
    for child in &el.children {
        let rendered = render_node(child);
        *linkage |= rendered.linkage_required;
        if !rendered.html.is_empty() {
            parts.push(rendered.html);
        }
    }
}

/// Linkage requests below a kind whose markup ignores its children.
///
/// Such nodes still activate the cascade script for the document; a
/// cascade attribute is never silently lost just because its carrier
/// sits under a leaf-rendered control.
fn children_request_linkage(el: &Element) -> bool {
    el.child_elements().any(subtree_requests_linkage)
}

fn subtree_requests_linkage(el: &Element) -> bool {
    el.attr("cascade").is_some() || el.child_elements().any(subtree_requests_linkage)
}

/// A field renders as a clickable control when its UI-type hint contains
/// "button" or its name looks like a button name.
fn renders_as_button(name: &str, ui_type: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ui_type.contains("button")
        || lower.starts_with("btn")
        || lower.starts_with("button")
        || lower.ends_with("btn")
}

/// `value`/label fallback rule shared by choice-list items and exclusive
/// choices: value defaults to the text, label defaults to the value.
fn option_value_text(el: &Element) -> (String, String) {
    let value = match el.attr("value") {
        Some(value) => value.to_string(),
        None => el.text.clone(),
    };
    let text = if el.text.is_empty() {
        value.clone()
    } else {
        el.text.clone()
    };
    (value, text)
}

/// Concatenate the text of every scripting node in document order.
///
/// Script content is treated as an opaque token stream: no dedup, no
/// validation, verbatim reproduction, single line-break join.
pub fn collect_scripts(root: &Element) -> String {
    let parts: Vec<&str> = root
        .descendants_by_local_name("script")
        .into_iter()
        .filter(|el| !el.text.is_empty())
        .map(|el| el.text.as_str())
        .collect();
    parts.join("\n")
}

/// Interpret an extracted form tree into a standalone HTML document.
///
/// Terminal entry point of the core: renders the template subtree (or the
/// whole tree when no `template` element exists), aggregates embedded
/// scripts from the full tree, synthesizes the runtime shim, and
/// assembles the output document with the fixed script ordering.
pub fn interpret_stacked(root: &Element) -> String {
    let template = root.find_template();
    let rendered = render_element(template);
    let body = format!("<div class='xfa-container'>\n{}\n</div>", rendered.html);

    let scripts = collect_scripts(root);
    let shim = synthesize_shim(rendered.linkage_required);
    let full_js = format!("{}\n{}\n{}", shim.prelude, scripts, shim.dispatcher);

    assemble_document(&body, &full_js)
}
