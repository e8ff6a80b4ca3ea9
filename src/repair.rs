//! Repair of raw XFA packet text into a single well-formed document.
//!
//! PDF producers routinely store the XFA payload as several packets, each
//! with its own XML declaration, and occasionally truncate the final
//! packet. This stage normalizes the concatenated payload so the parser
//! sees exactly one declaration and one closed root element. It is pure
//! string surgery and never fails; input it cannot improve is returned
//! unchanged.

/// Normalize raw extracted XFA text into one parseable document.
///
/// Steps, in order:
/// 1. strip leading whitespace;
/// 2. remember the first XML declaration, then delete every declaration
///    found anywhere in the text and re-prepend the remembered one;
/// 3. if a known root (`<xdp:xdp`, else `<config`) occurs, slice from it
///    to just past its closing tag, appending the closing tag when the
///    producer truncated it. When a root is found the slice starts at the
///    root, so the declaration prepended in step 2 is dropped again; it
///    only survives for inputs with no recognizable root.
pub fn repair_xml(raw: &str) -> String {
    let trimmed = raw.trim_start();

    let first_decl = leading_declaration(trimmed);
    let mut cleaned = strip_declarations(trimmed);
    if let Some(decl) = first_decl {
        cleaned.insert_str(0, decl);
    }

    let (start, closing_tag) = if let Some(idx) = cleaned.find("<xdp:xdp") {
        (idx, "</xdp:xdp>")
    } else if let Some(idx) = cleaned.find("<config") {
        (idx, "</config>")
    } else {
        return cleaned;
    };

    match cleaned[start..].find(closing_tag) {
        Some(rel_end) => {
            let end = start + rel_end + closing_tag.len();
            cleaned[start..end].to_string()
        }
        None => format!("{}\n{}", &cleaned[start..], closing_tag),
    }
}

/// The XML declaration at the very start of the text, if any.
fn leading_declaration(text: &str) -> Option<&str> {
    if !text.starts_with("<?xml") {
        return None;
    }
    let end = text.find("?>")?;
    Some(&text[..end + 2])
}

/// Remove every `<?xml ... ?>` declaration anywhere in the text.
fn strip_declarations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("<?xml") {
        out.push_str(&rest[..start]);
        match rest[start..].find("?>") {
            Some(rel_end) => rest = &rest[start + rel_end + 2..],
            None => {
                // Unterminated declaration swallows the remainder.
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
