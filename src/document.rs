//! Output document assembly.
//!
//! The sole place where the output's byte-for-byte structure is fixed:
//! one HTML5 skeleton with a fixed title and stacked-flow stylesheet,
//! the rendered body, and one embedded script section. The assembler has
//! no knowledge of element kinds and no conditional logic; callers hand
//! it fully composed body and script text.

/// Title of the interpreted output document.
pub const UI_TITLE: &str = "Stacked Interpreted XFA Form";

/// Fixed presentation rules: block flow, spacing, borders. Absolute
/// positioning from the source form is intentionally absent.
const STYLE_RULES: &str = r#"    body {
      margin: 0;
      padding: 20px;
      font-family: Arial, sans-serif;
      background: #eee;
    }
    .xfa-container {
      display: flex;
      flex-direction: column;
      gap: 20px;
      background: #fff;
      padding: 20px;
      box-shadow: 0 0 10px rgba(0,0,0,0.1);
    }
    .subform, .field, .button, .static-text, .textedit, .numericedit, .choicelist, .draw, .exclgroup, .checkbutton {
      display: block;
      width: 100%;
      position: relative;
      margin-bottom: 10px;
    }
    .subform {
      border: 1px dashed #888;
      padding: 10px;
    }
    .field, .button, .static-text, .textedit, .numericedit, .choicelist, .draw, .exclgroup, .checkbutton {
      background: #fff;
      border: 1px solid #ccc;
      padding: 10px;
    }
    label {
      display: block;
      margin-bottom: 5px;
      font-weight: bold;
    }
    input[type="text"], input[type="number"] {
      padding: 5px;
      width: 100%;
      box-sizing: border-box;
    }
    button {
      padding: 10px 15px;
      cursor: pointer;
      font-size: 14px;
    }
    select {
      padding: 5px;
      width: 100%;
      box-sizing: border-box;
    }
    .static-text {
      background: #f9f9f9;
      border: 1px solid #ddd;
    }"#;

/// Assemble the final self-contained document from the rendered body
/// markup and the fully composed script section.
pub fn assemble_document(body: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>
{style}
  </style>
</head>
<body>
{body}
<script>
{script}
</script>
</body>
</html>
"#,
        title = UI_TITLE,
        style = STYLE_RULES,
        body = body,
        script = script,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_is_fixed() {
        let doc = assemble_document("<div class='xfa-container'>x</div>", "js();");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Stacked Interpreted XFA Form</title>"));
        assert!(doc.contains("flex-direction: column"));
        assert!(doc.contains("<div class='xfa-container'>x</div>"));
        assert!(doc.contains("<script>\njs();\n</script>"));
        assert!(doc.ends_with("</html>\n"));
    }

    #[test]
    fn test_assembly_is_verbatim() {
        // The assembler owns structure only; payloads pass through untouched.
        let body = "<p>&lt;kept as-is&gt;</p>";
        let doc = assemble_document(body, "");
        assert!(doc.contains(body));
    }
}
