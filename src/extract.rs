//! XFA packet extraction from a PDF container.
//!
//! The interactive form's XML lives in the document catalog's AcroForm
//! dictionary under `/XFA`, either as one indirect stream reference or as
//! an array alternating packet-name strings with stream references. This
//! module scans the raw bytes for that entry, resolves the referenced
//! stream objects, inflates `FlateDecode` (zlib) data, and returns the
//! decoded text with multi-packet arrays joined by line breaks — the
//! exact payload the repair stage expects.
//!
//! Extraction is deliberately tolerant: in the array form, a packet that
//! cannot be resolved or inflated is skipped with a warning as long as at
//! least one packet decodes. Cross-reference tables and object streams
//! are not consulted; objects are located by their `N G obj` header,
//! which holds for the uncompressed-object PDFs XFA producers emit.

use crate::error::XfaError;

/// Limits for packet extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractLimits {
    /// Maximum decoded byte size for any single packet.
    pub max_packet_bytes: usize,
    /// Maximum number of stream references accepted from the array form.
    pub max_packets: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_packet_bytes: 16 * 1024 * 1024,
            max_packets: 64,
        }
    }
}

/// Extract the XFA packet text from raw PDF bytes with default limits.
pub fn extract_xfa(pdf: &[u8]) -> Result<String, XfaError> {
    extract_xfa_with_limits(pdf, ExtractLimits::default())
}

/// Extract the XFA packet text from a PDF file on disk.
pub fn extract_xfa_from_path(path: &str) -> Result<String, XfaError> {
    let bytes = std::fs::read(path)?;
    extract_xfa(&bytes)
}

/// Extract the XFA packet text from raw PDF bytes.
pub fn extract_xfa_with_limits(pdf: &[u8], limits: ExtractLimits) -> Result<String, XfaError> {
    let refs = locate_xfa_refs(pdf, limits)?;

    if refs.len() == 1 {
        let (num, gen) = refs[0];
        let bytes = resolve_stream(pdf, num, gen, limits)?;
        return Ok(decode_packet(&bytes));
    }

    let mut parts = Vec::with_capacity(refs.len());
    for (num, gen) in refs {
        match resolve_stream(pdf, num, gen, limits) {
            Ok(bytes) => parts.push(decode_packet(&bytes)),
            Err(err) => {
                log::warn!("skipping XFA packet {} {} R: {}", num, gen, err);
            }
        }
    }
    if parts.is_empty() {
        return Err(XfaError::Extract(
            "no XFA packet stream could be decoded".into(),
        ));
    }
    Ok(parts.join("\n"))
}

fn decode_packet(bytes: &[u8]) -> String {
    // Strip a UTF-8 BOM; producers emit one per packet.
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Scan for the `/XFA` entry and collect the stream reference(s) of its
/// value. Several `/XFA` byte occurrences can exist (hex strings, page
/// content); the first one whose value parses as a reference or a
/// reference array wins.
fn locate_xfa_refs(pdf: &[u8], limits: ExtractLimits) -> Result<Vec<(u32, u32)>, XfaError> {
    let mut search_from = 0;
    while let Some(rel) = find(&pdf[search_from..], b"/XFA") {
        let after = search_from + rel + b"/XFA".len();
        search_from = after;
        let pos = skip_whitespace(pdf, after);

        if pdf.get(pos) == Some(&b'[') {
            match parse_ref_array(pdf, pos + 1, limits) {
                Ok(refs) if !refs.is_empty() => return Ok(refs),
                Ok(_) => continue,
                Err(err) => return Err(err),
            }
        }
        if let Some((reference, _)) = parse_ref(pdf, pos) {
            return Ok(vec![reference]);
        }
    }
    Err(XfaError::Extract("no XFA data found in the PDF".into()))
}

/// Parse the array form: alternating `(name)` strings and `N G R`
/// references, in any interleaving. Packet-name strings are skipped;
/// only the stream references matter.
fn parse_ref_array(
    pdf: &[u8],
    mut pos: usize,
    limits: ExtractLimits,
) -> Result<Vec<(u32, u32)>, XfaError> {
    let mut refs = Vec::with_capacity(8);
    loop {
        pos = skip_whitespace(pdf, pos);
        match pdf.get(pos) {
            None => return Err(XfaError::Extract("unterminated /XFA array".into())),
            Some(b']') => return Ok(refs),
            Some(b'(') => pos = skip_literal_string(pdf, pos)?,
            Some(byte) if byte.is_ascii_digit() => {
                let (reference, next) = parse_ref(pdf, pos).ok_or_else(|| {
                    XfaError::Extract(format!("malformed object reference at byte {}", pos))
                })?;
                if refs.len() >= limits.max_packets {
                    return Err(XfaError::Limit(format!(
                        "XFA packet count exceeds max_packets ({})",
                        limits.max_packets
                    )));
                }
                refs.push(reference);
                pos = next;
            }
            Some(other) => {
                return Err(XfaError::Extract(format!(
                    "unexpected byte 0x{:02x} in /XFA array at {}",
                    other, pos
                )));
            }
        }
    }
}

/// Skip a `(...)` literal string, honoring nesting and backslash escapes.
fn skip_literal_string(pdf: &[u8], open: usize) -> Result<usize, XfaError> {
    let mut depth = 0usize;
    let mut pos = open;
    while pos < pdf.len() {
        match pdf[pos] {
            b'\\' => pos += 1,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos + 1);
                }
            }
            _ => {}
        }
        pos += 1;
    }
    Err(XfaError::Extract("unterminated string in /XFA array".into()))
}

/// Parse an `N G R` indirect reference starting at `pos`.
fn parse_ref(pdf: &[u8], pos: usize) -> Option<((u32, u32), usize)> {
    let (num, pos) = parse_uint(pdf, pos)?;
    let pos = skip_whitespace(pdf, pos);
    let (gen, pos) = parse_uint(pdf, pos)?;
    let pos = skip_whitespace(pdf, pos);
    if pdf.get(pos) != Some(&b'R') {
        return None;
    }
    Some(((num, gen), pos + 1))
}

fn parse_uint(pdf: &[u8], mut pos: usize) -> Option<(u32, usize)> {
    let start = pos;
    let mut value: u32 = 0;
    while let Some(byte) = pdf.get(pos) {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value.checked_mul(10)?.checked_add(u32::from(byte - b'0'))?;
        pos += 1;
    }
    if pos == start {
        return None;
    }
    Some((value, pos))
}

fn skip_whitespace(pdf: &[u8], mut pos: usize) -> usize {
    while let Some(byte) = pdf.get(pos) {
        if !matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0') {
            break;
        }
        pos += 1;
    }
    pos
}

/// Resolve object `num gen` and return its decoded stream bytes,
/// inflating `FlateDecode` data when the stream dictionary names it.
fn resolve_stream(
    pdf: &[u8],
    num: u32,
    gen: u32,
    limits: ExtractLimits,
) -> Result<Vec<u8>, XfaError> {
    let header = format!("{} {} obj", num, gen);
    let obj_start = find_object_header(pdf, header.as_bytes()).ok_or_else(|| {
        XfaError::Extract(format!("object {} {} not found", num, gen))
    })?;
    let body = &pdf[obj_start + header.len()..];

    let stream_kw = find(body, b"stream")
        .ok_or_else(|| XfaError::Extract(format!("object {} {} has no stream", num, gen)))?;
    let dict = &body[..stream_kw];

    let mut data_start = stream_kw + b"stream".len();
    if body.get(data_start) == Some(&b'\r') {
        data_start += 1;
    }
    if body.get(data_start) == Some(&b'\n') {
        data_start += 1;
    }

    let data_end = data_start
        + find(&body[data_start..], b"endstream").ok_or_else(|| {
            XfaError::Extract(format!("object {} {} has no endstream", num, gen))
        })?;
    let mut data = &body[data_start..data_end];
    // The EOL before the endstream keyword is not stream data.
    if data.last() == Some(&b'\n') {
        data = &data[..data.len() - 1];
    }
    if data.last() == Some(&b'\r') {
        data = &data[..data.len() - 1];
    }

    if data.len() > limits.max_packet_bytes {
        return Err(XfaError::Limit(format!(
            "packet stream exceeds max_packet_bytes ({} > {})",
            data.len(),
            limits.max_packet_bytes
        )));
    }

    if find(dict, b"/FlateDecode").is_some() {
        inflate_packet(data, num, gen, limits)
    } else {
        Ok(data.to_vec())
    }
}

fn inflate_packet(
    data: &[u8],
    num: u32,
    gen: u32,
    limits: ExtractLimits,
) -> Result<Vec<u8>, XfaError> {
    use miniz_oxide::inflate::{decompress_to_vec_with_limit, decompress_to_vec_zlib_with_limit};

    match decompress_to_vec_zlib_with_limit(data, limits.max_packet_bytes) {
        Ok(bytes) => Ok(bytes),
        Err(zlib_err) => {
            // Some producers write raw deflate data without the zlib header.
            log::warn!(
                "zlib inflate failed for object {} {} ({:?}); retrying as raw deflate",
                num,
                gen,
                zlib_err.status
            );
            decompress_to_vec_with_limit(data, limits.max_packet_bytes).map_err(|err| {
                XfaError::Extract(format!(
                    "FlateDecode failed for object {} {}: {:?}",
                    num, gen, err.status
                ))
            })
        }
    }
}

/// Find `N G obj` making sure the match is not the tail of a longer
/// number (e.g. `12 0 obj` matching a search for `2 0 obj`).
fn find_object_header(pdf: &[u8], header: &[u8]) -> Option<usize> {
    let mut search_from = 0;
    while let Some(rel) = find(&pdf[search_from..], header) {
        let at = search_from + rel;
        let boundary_ok = at == 0 || !pdf[at - 1].is_ascii_digit();
        if boundary_ok {
            return Some(at);
        }
        search_from = at + 1;
    }
    None
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
