//! End-to-end interpreter scenarios over parsed trees.

use xfa_stream::{collect_scripts, interpret_stacked, parse_tree};

fn interpret(xml: &str) -> String {
    interpret_stacked(&parse_tree(xml).expect("parse fixture"))
}

#[test]
fn subform_with_text_field() {
    let html = interpret(
        r#"<xdp:xdp xmlns:xdp="http://ns.adobe.com/xdp/">
  <template>
    <subform name="Page1">
      <field name="txtName" type="text"/>
    </subform>
  </template>
</xdp:xdp>"#,
    );

    assert!(html.contains("<h2>Page1</h2>"));
    assert!(html.contains("<input type='text' id='txtName' name='txtName' value='' />"));
    assert!(!html.contains("id='txtName' name='txtName'>"), "must not be a button");
}

#[test]
fn btn_named_field_renders_clickable() {
    let html = interpret("<template><field name='btnSubmit'/></template>");
    assert!(html.contains("<button type='button' id='btnSubmit' name='btnSubmit'>btnSubmit</button>"));
    assert!(!html.contains("<input type='text' id='btnSubmit'"));
}

#[test]
fn no_linkage_means_no_cascade_listener() {
    let html = interpret(
        "<template><subform name='P'><field name='a'/><checkButton name='c'/></subform></template>",
    );
    assert!(!html.contains("input[data-cascade], button[data-cascade]"));
    // The rest of the runtime is still present.
    assert!(html.contains("window.xfa.host"));
    assert!(html.contains("Default action for "));
}

#[test]
fn sibling_controls_share_cascade_group() {
    let html = interpret(
        "<template><subform name='P'>\
           <field name='a' cascade='grp1'/>\
           <field name='b' cascade='grp1'/>\
         </subform></template>",
    );
    assert_eq!(html.matches("data-cascade='grp1'").count(), 2);
    // The listener copies values within the group but excludes the
    // source control itself.
    assert!(html.contains("input[data-cascade], button[data-cascade]"));
    assert!(html.contains("if(cInput !== input)"));
}

#[test]
fn rendering_is_deterministic() {
    let xml = "<template><subform name='P'>\
                 <field name='btnGo' cascade='g'/>\
                 <choiceList name='c'><item>One</item></choiceList>\
                 <script>app.alert('hi');</script>\
               </subform></template>";
    let first = interpret(xml);
    let second = interpret(xml);
    assert_eq!(first, second);
}

#[test]
fn script_blob_round_trip() {
    let root = parse_tree(
        "<template>\
           <field name='x'><event activity='click'><script>a();</script></event></field>\
           <script>b();</script>\
         </template>",
    )
    .unwrap();
    assert_eq!(collect_scripts(&root), "a();\nb();");

    let html = interpret_stacked(&root);
    let a = html.find("a();").expect("first script");
    let b = html.find("b();").expect("second script");
    assert!(a < b, "document order preserved");
}

#[test]
fn choice_list_option_count_matches_descendant_items() {
    let html = interpret(
        "<template><choiceList name='c'>\
           <item value='1'>One</item>\
           <group><item value='2'>Two</item><deep><item>Three</item></deep></group>\
         </choiceList></template>",
    );
    assert_eq!(html.matches("<option").count(), 3);
    assert!(html.contains("<option value='Three'>Three</option>"));
}

#[test]
fn excl_group_shares_identity_across_depths() {
    let html = interpret(
        "<template><exclGroup name='size'>\
           <exclChoice value='s'>Small</exclChoice>\
           <row><exclChoice value='m'>Medium</exclChoice></row>\
           <exclChoice value='l'>Large</exclChoice>\
         </exclGroup></template>",
    );
    assert_eq!(html.matches("type='radio' name='size'").count(), 3);
}

#[test]
fn script_section_has_fixed_order() {
    let html = interpret(
        "<template><field name='a' cascade='g'/><script>original();</script></template>",
    );
    let body = html.find("xfa-container").expect("body container");
    let cascade = html
        .find("input[data-cascade], button[data-cascade]")
        .expect("cascade listener");
    let adapter = html.find("function translateAcrobatJS").expect("adapter");
    let host = html.find("window.xfa.host = {").expect("host shim");
    let blob = html.find("original();").expect("aggregated script");
    let dispatcher = html
        .find("document.body.addEventListener(\"click\"")
        .expect("dispatcher");
    assert!(body < cascade);
    assert!(cascade < adapter && adapter < host && host < blob && blob < dispatcher);
}

#[test]
fn whole_tree_used_when_template_missing() {
    let html = interpret("<subform name='Lone'><field name='f1'/></subform>");
    assert!(html.contains("<h2>Lone</h2>"));
    assert!(html.contains("id='f1'"));
}
