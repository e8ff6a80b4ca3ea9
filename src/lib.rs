//! Extracts embedded XFA forms from PDF containers and interprets them
//! into standalone interactive HTML documents.
//!
//! The pipeline has four stages, each usable on its own:
//!
//! 1. [`extract::extract_xfa`] — locate and decode the XFA packet inside
//!    the PDF (FlateDecode inflation, multi-packet joining);
//! 2. [`repair::repair_xml`] — normalize the raw packet text into one
//!    well-formed document (declaration dedup, root closing);
//! 3. [`tree::parse_tree`] — build the immutable element tree;
//! 4. [`interpret::interpret_stacked`] — render the tree into a single
//!    self-contained HTML document whose embedded runtime shim emulates
//!    the Acrobat scripting host (dialogs, node resolution, event
//!    dispatch, cascade value linkage, delegated button wiring).
//!
//! Layout is intentionally simplified: source x/y coordinates are
//! discarded and controls stack top to bottom.
//!
//! # Usage
//!
//! ```rust,no_run
//! # fn example() -> Result<(), xfa_stream::XfaError> {
//! let pdf = std::fs::read("form.pdf")?;
//! let html = xfa_stream::pdf_to_html(&pdf)?;
//! std::fs::write("stacked_UI.html", html)?;
//! # Ok(())
//! # }
//! ```

pub mod debug;
pub mod document;
pub mod error;
pub mod extract;
pub mod interpret;
pub mod repair;
pub mod runtime;
pub mod tree;

pub use error::XfaError;
pub use extract::{extract_xfa, extract_xfa_from_path, ExtractLimits};
pub use interpret::{collect_scripts, interpret_stacked, render_node, ElementKind, Rendered};
pub use repair::repair_xml;
pub use runtime::{synthesize_shim, RuntimeShim};
pub use tree::{parse_tree, Element, Node, ParseLimits};

/// Run the whole pipeline: PDF bytes in, interpreted HTML document out.
pub fn pdf_to_html(pdf: &[u8]) -> Result<String, XfaError> {
    let raw = extract::extract_xfa(pdf)?;
    let repaired = repair::repair_xml(&raw);
    let root = tree::parse_tree(&repaired)?;
    Ok(interpret::interpret_stacked(&root))
}

/// Run the pipeline up to parsing and return the debug rendering instead
/// of the interpreted document.
pub fn pdf_to_debug_html(pdf: &[u8]) -> Result<String, XfaError> {
    let raw = extract::extract_xfa(pdf)?;
    let repaired = repair::repair_xml(&raw);
    let root = tree::parse_tree(&repaired)?;
    Ok(debug::debug_html(&root))
}
