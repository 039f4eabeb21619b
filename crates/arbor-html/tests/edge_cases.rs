//! Edge case and stress tests for arbor-html
//!
//! Rare markup, malformed content and large inputs.

use arbor_dom::{DomTree, NodeId, NodeType};
use arbor_html::{HtmlParser, ParseError, ParseOptions, parse, parse_with_options};

fn fragment(html: &str) -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let doc = tree.create_html_document(None);
    let fragment = HtmlParser::new().parse_fragment(&mut tree, doc, html).unwrap();
    (tree, fragment)
}

fn only_child(tree: &DomTree, parent: NodeId) -> NodeId {
    let children = tree.child_nodes(parent);
    assert_eq!(children.len(), 1, "expected a single child");
    children[0]
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_null_bytes() {
    let parsed = parse("Hello\0World").unwrap();
    let text = only_child(&parsed.tree, parsed.document);
    assert_eq!(parsed.tree.node_value(text), Some("HelloWorld"));
    assert!(!parsed.diagnostics.is_empty());
}

#[test]
fn test_parse_only_whitespace() {
    let parsed = parse("   \t\n\r\n   ").unwrap();
    let text = only_child(&parsed.tree, parsed.document);
    assert_eq!(parsed.tree.node_type(text), NodeType::Text);
}

#[test]
fn test_parse_only_doctype() {
    let parsed = parse("<!DOCTYPE html>").unwrap();
    let doctype = parsed.tree.doctype(parsed.document).unwrap();
    assert_eq!(parsed.tree.node_name(doctype), "html");
    assert_eq!(parsed.tree.document_element(parsed.document), None);
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let (tree, root) = fragment("<div><p><span>text");
    let span = tree.get_elements_by_tag_name(root, "span")[0];
    assert_eq!(tree.text_content(span).as_deref(), Some("text"));
    assert!(tree.inclusive_ancestors(span).filter(|&n| n != root).all(|n| tree.has_implied_close_tag(n)));
}

#[test]
fn test_parse_mismatched_tags() {
    let html = "<div><p></div></p>";
    let (tree, root) = fragment(html);
    let div = only_child(&tree, root);
    let p = only_child(&tree, div);
    assert!(tree.has_implied_close_tag(p));
    assert!(!tree.has_implied_close_tag(div));

    let strict = ParseOptions { strict: true, ..Default::default() };
    let err = parse_with_options(html, &strict).unwrap_err();
    assert!(matches!(err, ParseError::UnbalancedCloseTag(ref name) if name == "p"));
}

#[test]
fn test_parse_extra_closing_tags() {
    let parsed = parse("<div></div></div></div></div>").unwrap();
    assert_eq!(parsed.tree.child_nodes(parsed.document).len(), 1);
    assert_eq!(parsed.diagnostics.len(), 3);
}

#[test]
fn test_parse_orphan_closing_tag() {
    let parsed = parse("</div>").unwrap();
    assert!(!parsed.tree.has_child_nodes(parsed.document));
}

#[test]
fn test_parse_nested_same_tags() {
    let (tree, root) = fragment("<div><div><div>x</div></div></div>");
    let divs = tree.get_elements_by_tag_name(root, "div");
    assert_eq!(divs.len(), 3);
    assert!(divs.iter().all(|&d| !tree.has_implied_close_tag(d)));
    assert_eq!(tree.parent(divs[2]), Some(divs[1]));
}

#[test]
fn test_strict_mode_rejects_tokenizer_errors() {
    let strict = ParseOptions { strict: true, ..Default::default() };
    let err = parse_with_options("<div =x></div>", &strict).unwrap_err();
    assert!(matches!(err, ParseError::Tokenizer(_)));
    assert!(parse("<div =x></div>").is_ok());
}

// ============================================================================
// RAW TEXT ELEMENTS
// ============================================================================

#[test]
fn test_parse_script_content() {
    let (tree, root) = fragment("<script>if (a < b && c > d) { document.write('<p>'); }</script>");
    let script = only_child(&tree, root);
    let text = only_child(&tree, script);
    assert_eq!(tree.node_value(text), Some("if (a < b && c > d) { document.write('<p>'); }"));
}

#[test]
fn test_parse_style_content() {
    let (tree, root) = fragment("<style>a > b { content: '</p>'; }</style>");
    let style = only_child(&tree, root);
    assert_eq!(tree.text_content(style).as_deref(), Some("a > b { content: '</p>'; }"));
}

#[test]
fn test_parse_textarea_content() {
    let (tree, root) = fragment("<textarea><b>not bold</b> &amp;</textarea>");
    let textarea = only_child(&tree, root);
    assert_eq!(tree.text_content(textarea).as_deref(), Some("<b>not bold</b> &"));
    assert!(tree.get_elements_by_tag_name(root, "b").is_empty());
}

#[test]
fn test_parse_title_content() {
    let (tree, root) = fragment("<title><i>Title</i></title>");
    let title = only_child(&tree, root);
    assert_eq!(tree.text_content(title).as_deref(), Some("<i>Title</i>"));
}

#[test]
fn test_parse_xmp_content() {
    let (tree, root) = fragment("<xmp><b>&amp;</b></xmp>");
    let xmp = only_child(&tree, root);
    assert_eq!(tree.text_content(xmp).as_deref(), Some("<b>&amp;</b>"));
}

#[test]
fn test_parse_plaintext() {
    let (tree, root) = fragment("<plaintext><b>x</b></plaintext>");
    let plaintext = only_child(&tree, root);
    assert_eq!(tree.text_content(plaintext).as_deref(), Some("<b>x</b></plaintext>"));
    assert!(tree.has_implied_close_tag(plaintext));
}

// ============================================================================
// VOID ELEMENTS
// ============================================================================

#[test]
fn test_parse_void_elements() {
    let names = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ];
    let html: String = names.iter().map(|n| format!("<{n}>")).collect();
    let (tree, root) = fragment(&html);

    let elements = tree.element_children(root);
    assert_eq!(elements.len(), names.len());
    for (el, name) in elements.into_iter().zip(names) {
        assert_eq!(tree.local_name(el), Some(name));
        assert!(!tree.has_child_nodes(el));
    }
}

#[test]
fn test_parse_void_with_content() {
    let (tree, root) = fragment("<br>text</br>");
    let children = tree.child_nodes(root);
    assert_eq!(children.len(), 2);
    assert!(!tree.has_child_nodes(children[0]));
    assert_eq!(tree.node_value(children[1]), Some("text"));
}

#[test]
fn test_parse_void_self_closing() {
    let (tree, root) = fragment("<img src=a.png /><p>after</p>");
    let elements = tree.element_children(root);
    assert_eq!(elements.len(), 2);
    let (img, p) = (elements[0], elements[1]);
    assert_eq!(tree.get_attribute(img, "src"), Some("a.png"));
    assert_eq!(tree.previous_element_sibling(p), Some(img));
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[test]
fn test_parse_attribute_no_value() {
    let (tree, root) = fragment("<input disabled>");
    let input = only_child(&tree, root);
    assert!(tree.has_attribute(input, "disabled"));
    assert_eq!(tree.get_attribute(input, "disabled"), Some(""));
}

#[test]
fn test_parse_attribute_empty_value() {
    let (tree, root) = fragment(r#"<div title="">x</div>"#);
    let div = only_child(&tree, root);
    assert_eq!(tree.get_attribute(div, "title"), Some(""));
}

#[test]
fn test_parse_attribute_unquoted() {
    let (tree, root) = fragment("<div class=foo data-n=42></div>");
    let div = only_child(&tree, root);
    assert_eq!(tree.class_name(div), "foo");
    assert_eq!(tree.get_attribute(div, "data-n"), Some("42"));
}

#[test]
fn test_parse_attribute_mixed_quotes() {
    let (tree, root) = fragment(r#"<div a='say "hi"' b="it's"></div>"#);
    let div = only_child(&tree, root);
    assert_eq!(tree.get_attribute(div, "a"), Some(r#"say "hi""#));
    assert_eq!(tree.get_attribute(div, "b"), Some("it's"));
}

#[test]
fn test_parse_attribute_special_chars() {
    let (tree, root) = fragment(r#"<a href="/q?a=1&amp;b=<2>">x</a>"#);
    let link = only_child(&tree, root);
    assert_eq!(tree.get_attribute(link, "href"), Some("/q?a=1&b=<2>"));
}

#[test]
fn test_parse_duplicate_attributes() {
    let (tree, root) = fragment(r#"<div id="first" ID="second"></div>"#);
    let div = only_child(&tree, root);
    assert_eq!(tree.id(div), "first");
    assert_eq!(tree.attributes(div).len(), 1);
}

#[test]
fn test_parse_many_attributes() {
    let attrs: String = (0..100).map(|i| format!(r#" data-a{i}="{i}""#)).collect();
    let (tree, root) = fragment(&format!("<div{attrs}></div>"));
    let div = only_child(&tree, root);
    assert_eq!(tree.attributes(div).len(), 100);
    assert_eq!(tree.get_attribute(div, "data-a99"), Some("99"));
}

// ============================================================================
// ENTITIES
// ============================================================================

#[test]
fn test_parse_named_entities() {
    let (tree, root) = fragment("<p>&copy; &reg; &trade;</p>");
    assert_eq!(tree.text_content(root).as_deref(), Some("\u{a9} \u{ae} \u{2122}"));
}

#[test]
fn test_parse_numeric_entities() {
    let (tree, root) = fragment("<p>&#65;&#x42;&#x1F600;</p>");
    assert_eq!(tree.text_content(root).as_deref(), Some("AB\u{1F600}"));
}

#[test]
fn test_parse_invalid_entities() {
    let (tree, root) = fragment("<p>&notanentity; &amp</p>");
    let text = tree.text_content(root).unwrap();
    assert!(text.ends_with(" &"));
}

// ============================================================================
// COMMENTS
// ============================================================================

#[test]
fn test_parse_empty_comment() {
    let (tree, root) = fragment("<!---->");
    let comment = only_child(&tree, root);
    assert_eq!(tree.node_type(comment), NodeType::Comment);
    assert_eq!(tree.node_value(comment), Some(""));
}

#[test]
fn test_parse_comment_with_gt() {
    let (tree, root) = fragment("<!-- a > b -->");
    let comment = only_child(&tree, root);
    assert_eq!(tree.node_value(comment), Some(" a > b "));
}

#[test]
fn test_parse_comment_with_tags() {
    let (tree, root) = fragment("<!-- <div>hidden</div> --><p>shown</p>");
    assert!(tree.get_elements_by_tag_name(root, "div").is_empty());
    assert_eq!(tree.get_elements_by_tag_name(root, "p").len(), 1);
}

#[test]
fn test_parse_cdata_outside_foreign_content() {
    let (tree, root) = fragment("<![CDATA[x]]>");
    let comment = only_child(&tree, root);
    assert_eq!(tree.node_type(comment), NodeType::Comment);
    assert_eq!(tree.node_value(comment), Some("[CDATA[x]]"));
}

// ============================================================================
// STRESS
// ============================================================================

#[test]
fn test_parse_very_long_text() {
    let text = "a".repeat(100_000);
    let (tree, root) = fragment(&format!("<p>{text}</p>"));
    assert_eq!(tree.text_content(root).map(|t| t.len()), Some(100_000));
}

#[test]
fn test_parse_very_long_attribute() {
    let value = "v".repeat(50_000);
    let (tree, root) = fragment(&format!(r#"<div data-long="{value}"></div>"#));
    let div = only_child(&tree, root);
    assert_eq!(tree.get_attribute(div, "data-long").map(str::len), Some(50_000));
}

#[test]
fn test_parse_deeply_nested() {
    let depth = 500;
    let html = format!("{}deep{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let (tree, root) = fragment(&html);

    let divs = tree.get_elements_by_tag_name(root, "div");
    assert_eq!(divs.len(), depth);
    let innermost = divs[depth - 1];
    assert_eq!(tree.ancestors(innermost).count(), depth);
    assert_eq!(tree.text_content(innermost).as_deref(), Some("deep"));
}

#[test]
fn test_parse_many_siblings() {
    let html = "<li>x</li>".repeat(10_000);
    let (tree, root) = fragment(&format!("<ul>{html}</ul>"));
    let ul = only_child(&tree, root);
    assert_eq!(tree.child_element_count(ul), 10_000);
}

// ============================================================================
// UNUSUAL CONTENT
// ============================================================================

#[test]
fn test_parse_template_syntax() {
    let (tree, root) = fragment("<p>{{ name }} {% if x %}</p>");
    assert_eq!(tree.text_content(root).as_deref(), Some("{{ name }} {% if x %}"));
}

#[test]
fn test_parse_custom_elements() {
    let mut tree = DomTree::new();
    let doc = tree.create_html_document(None);
    tree.define_custom_element("user-card", 1, Default::default()).unwrap();
    let fragment = HtmlParser::new()
        .parse_fragment(&mut tree, doc, "<user-card></user-card><user-list></user-list>")
        .unwrap();

    let elements = tree.element_children(fragment);
    let (card, list) = (elements[0], elements[1]);
    let state = |el| tree.get(el).and_then(|n| n.as_element()).map(|e| e.custom_state);
    assert_eq!(state(card), Some(arbor_dom::CustomElementState::Custom));
    assert_eq!(state(list), Some(arbor_dom::CustomElementState::Undefined));
}

#[test]
fn test_parse_data_attributes() {
    let (tree, root) = fragment(r#"<div data-user-id="7" data-role="admin"></div>"#);
    let div = only_child(&tree, root);
    assert_eq!(tree.attribute_names(div), vec!["data-user-id", "data-role"]);
}
