//! Full pipeline tests over synthetic in-memory PDFs.

use xfa_stream::{pdf_to_debug_html, pdf_to_html, XfaError};

fn plain_stream_object(num: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 64);
    out.extend_from_slice(
        format!("{} 0 obj\n<< /Length {} >>\nstream\n", num, payload.len()).as_bytes(),
    );
    out.extend_from_slice(payload);
    out.extend_from_slice(b"\nendstream\nendobj\n");
    out
}

fn flate_stream_object(num: u32, payload: &[u8]) -> Vec<u8> {
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(payload, 6);
    let mut out = Vec::with_capacity(compressed.len() + 80);
    out.extend_from_slice(
        format!(
            "{} 0 obj\n<< /Length {} /Filter /FlateDecode >>\nstream\n",
            num,
            compressed.len()
        )
        .as_bytes(),
    );
    out.extend_from_slice(&compressed);
    out.extend_from_slice(b"\nendstream\nendobj\n");
    out
}

fn pdf_with(xfa_value: &str, objects: &[Vec<u8>]) -> Vec<u8> {
    let mut pdf = Vec::with_capacity(1024);
    pdf.extend_from_slice(b"%PDF-1.7\n");
    pdf.extend_from_slice(
        format!("1 0 obj\n<< /AcroForm << /XFA {} >> >>\nendobj\n", xfa_value).as_bytes(),
    );
    for object in objects {
        pdf.extend_from_slice(object);
    }
    pdf.extend_from_slice(b"%%EOF\n");
    pdf
}

const FORM_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<xdp:xdp xmlns:xdp="http://ns.adobe.com/xdp/">
  <template xmlns="http://www.xfa.org/schema/xfa-template/3.3/">
    <subform name="Order">
      <field name="txtCustomer" label="Customer" type="text"/>
      <field name="btnSubmit"/>
      <checkButton name="chkRush" cascade="rush"/>
      <numericEdit name="numQty" cascade="rush"/>
      <script>app.alert('loaded');</script>
    </subform>
  </template>
</xdp:xdp>"#;

#[test]
fn flate_encoded_form_interprets_end_to_end() {
    let pdf = pdf_with("8 0 R", &[flate_stream_object(8, FORM_XML)]);
    let html = pdf_to_html(&pdf).expect("pipeline");

    assert!(html.contains("<title>Stacked Interpreted XFA Form</title>"));
    assert!(html.contains("<h2>Order</h2>"));
    assert!(html.contains("<label for='txtCustomer'>Customer</label>"));
    assert!(html.contains("<button type='button' id='btnSubmit' name='btnSubmit'>btnSubmit</button>"));
    assert!(html.contains("data-cascade='rush'"));
    assert!(html.contains("input[data-cascade], button[data-cascade]"));
    assert!(html.contains("app.alert('loaded');"));
}

#[test]
fn multi_packet_array_with_stray_declarations() {
    // Two packets, each carrying its own XML declaration; the second is
    // truncated before its closing tag. Repair must still produce one
    // parseable document.
    let packet_a = b"<?xml version=\"1.0\"?>\n<xdp:xdp xmlns:xdp=\"http://ns.adobe.com/xdp/\">";
    let packet_b: &[u8] = b"<?xml version=\"1.0\"?>\n<template><field name=\"a\"/></template>";
    let pdf = pdf_with(
        "[ (preamble) 3 0 R (template) 4 0 R ]",
        &[
            plain_stream_object(3, packet_a),
            flate_stream_object(4, packet_b),
        ],
    );

    let html = pdf_to_html(&pdf).expect("pipeline");
    assert!(html.contains("id='a' name='a'"));
}

#[test]
fn pdf_without_xfa_reports_extract_error() {
    let err = pdf_to_html(b"%PDF-1.7\n1 0 obj\n<< /Pages 2 0 R >>\nendobj\n%%EOF").unwrap_err();
    assert!(matches!(err, XfaError::Extract(_)));
}

#[test]
fn debug_rendering_dumps_extracted_tree() {
    let pdf = pdf_with("8 0 R", &[flate_stream_object(8, FORM_XML)]);
    let html = pdf_to_debug_html(&pdf).expect("pipeline");

    assert!(html.contains("<title>XFA Content (Debug)</title>"));
    assert!(html.contains("&lt;template"));
    assert!(html.contains("txtCustomer"));
    // Debug output is a dump, not an interpretation.
    assert!(!html.contains("xfa-container"));
}
