//! Comprehensive tests for arbor-html
//!
//! Whole documents and fragments through tokenizer and tree builder.

use arbor_dom::{DomTree, NodeId, NodeType};
use arbor_html::{HtmlParser, ParseError, parse};

fn fragment(html: &str) -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let doc = tree.create_html_document(None);
    let fragment = HtmlParser::new().parse_fragment(&mut tree, doc, html).unwrap();
    (tree, fragment)
}

fn count_of(tree: &DomTree, root: NodeId, node_type: NodeType) -> usize {
    tree.descendants(root).filter(|&n| tree.node_type(n) == node_type).count()
}

#[test]
fn test_parse_minimal_html() {
    let parsed = parse("").unwrap();
    assert!(!parsed.tree.has_child_nodes(parsed.document));
    assert_eq!(parsed.tree.document_uri(parsed.document), "about:blank");
}

#[test]
fn test_parse_text_only() {
    let parsed = parse("Hello World").unwrap();
    let text = parsed.tree.first_child(parsed.document).unwrap();
    assert_eq!(parsed.tree.node_value(text), Some("Hello World"));
}

#[test]
fn test_parse_self_closing_tags() {
    let (tree, root) = fragment(r#"<br><hr><img src="test.png"><input type="text">"#);
    let elements = tree.element_children(root);
    assert_eq!(elements.len(), 4);
    for el in elements {
        assert!(!tree.has_child_nodes(el));
        assert!(tree.has_implied_close_tag(el));
    }
}

#[test]
fn test_parse_nested_structure() {
    let html = r#"
        <html>
            <head>
                <title>Test Page</title>
                <meta charset="utf-8">
            </head>
            <body>
                <div id="container">
                    <h1>Welcome</h1>
                    <p class="intro">This is a test.</p>
                    <ul>
                        <li>Item 1</li>
                        <li>Item 2</li>
                        <li>Item 3</li>
                    </ul>
                </div>
            </body>
        </html>
    "#;

    let parsed = parse(html).unwrap();
    let tree = &parsed.tree;
    let doc = parsed.document;
    let container = tree.get_element_by_id(doc, "container").unwrap();
    assert_eq!(tree.get_elements_by_tag_name(container, "li").len(), 3);

    let intro = tree.get_elements_by_class_name(doc, "intro");
    assert_eq!(intro.len(), 1);
    assert_eq!(tree.text_content(intro[0]).as_deref(), Some("This is a test."));

    let html_element = tree.document_element(doc).unwrap();
    assert_eq!(tree.element_children(html_element).len(), 2);
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn test_parse_malformed_html() {
    let html = r#"
        <div>
            <p>Unclosed paragraph
            <span>Unclosed span
        </div>
        <p>Another paragraph without closing
    "#;

    let (tree, root) = fragment(html);
    let top = tree.element_children(root);
    assert_eq!(top.len(), 2, "expected div and p at the top level");
    let (div, trailing) = (top[0], top[1]);
    assert!(!tree.has_implied_close_tag(div));
    assert!(tree.has_implied_close_tag(trailing));

    let span = tree.get_elements_by_tag_name(div, "span")[0];
    assert!(tree.has_implied_close_tag(span));
    assert_eq!(tree.local_name(tree.parent(span).unwrap()), Some("p"));
}

#[test]
fn test_parse_with_attributes() {
    let html = r#"
        <div id="main" class="container primary" data-value="123">
            <a href="https://example.com" target="_blank">Link</a>
        </div>
    "#;

    let (tree, root) = fragment(html);
    let div = tree.first_element_child(root).unwrap();
    assert_eq!(tree.id(div), "main");
    assert_eq!(tree.get_attribute(div, "data-value"), Some("123"));
    assert_eq!(tree.attribute_names(div), vec!["id", "class", "data-value"]);

    let link = tree.first_element_child(div).unwrap();
    assert_eq!(tree.get_attribute(link, "href"), Some("https://example.com"));
}

#[test]
fn test_parse_script_and_style() {
    let html = r#"
        <html>
            <head>
                <style>
                    body { background: red; }
                    .foo { color: blue; }
                </style>
                <script>
                    function foo() {
                        return "<div>not parsed</div>";
                    }
                </script>
            </head>
            <body>
                <p>Content</p>
            </body>
        </html>
    "#;

    let parsed = parse(html).unwrap();
    let tree = &parsed.tree;
    assert!(tree.get_elements_by_tag_name(parsed.document, "div").is_empty());

    let script = tree.get_elements_by_tag_name(parsed.document, "script")[0];
    let source = tree.text_content(script).unwrap();
    assert!(source.contains("<div>not parsed</div>"));
}

#[test]
fn test_parse_entities() {
    let (tree, root) = fragment("<p>&lt;tag&gt; &amp; &quot;quotes&quot; &nbsp; &#169;</p>");
    let p = tree.first_child(root).unwrap();
    assert_eq!(tree.text_content(p).as_deref(), Some("<tag> & \"quotes\" \u{a0} \u{a9}"));
}

#[test]
fn test_parse_unicode() {
    let (tree, root) = fragment("<p>Hello 世界! 🚀 Ñoño</p>");
    assert_eq!(tree.text_content(root).as_deref(), Some("Hello 世界! 🚀 Ñoño"));
    let text = tree.first_child(tree.first_child(root).unwrap()).unwrap();
    // The rocket is a surrogate pair
    assert_eq!(tree.length(text), 17);
}

#[test]
fn test_parse_comments() {
    let html = r#"
        <!-- This is a comment -->
        <div>
            <!-- Another comment
                 spanning multiple lines -->
            <p>Content</p>
        </div>
    "#;

    let parsed = parse(html).unwrap();
    assert_eq!(count_of(&parsed.tree, parsed.document, NodeType::Comment), 2);
}

#[test]
fn test_parse_large_document() {
    let mut html = String::from("<html><body>");
    for i in 0..1000 {
        html.push_str(&format!(r#"<div id="div-{i}" class="item"><p>Paragraph {i}</p></div>"#));
    }
    html.push_str("</body></html>");

    let parsed = parse(&html).unwrap();
    let tree = &parsed.tree;
    assert_eq!(tree.get_elements_by_class_name(parsed.document, "item").len(), 1000);
    let last = tree.get_element_by_id(parsed.document, "div-999").unwrap();
    assert_eq!(tree.text_content(last).as_deref(), Some("Paragraph 999"));
}

#[test]
fn test_parse_table() {
    let html = r#"
        <table>
            <thead>
                <tr><th>Header 1</th><th>Header 2</th></tr>
            </thead>
            <tbody>
                <tr><td>Cell 1</td><td>Cell 2</td></tr>
                <tr><td>Cell 3</td><td>Cell 4</td></tr>
            </tbody>
        </table>
    "#;

    let parsed = parse(html).unwrap();
    let tree = &parsed.tree;
    assert_eq!(tree.get_elements_by_tag_name(parsed.document, "th").len(), 2);
    assert_eq!(tree.get_elements_by_tag_name(parsed.document, "td").len(), 4);
    assert_eq!(tree.get_elements_by_tag_name(parsed.document, "tr").len(), 3);
}

#[test]
fn test_parse_forms() {
    let html = r#"
        <form action="/submit" method="post">
            <label for="name">Name:</label>
            <input type="text" id="name" name="name" required>
            <label for="email">Email:</label>
            <input type="email" id="email" name="email">
            <select name="country">
                <option value="us">USA</option>
                <option value="uk">UK</option>
            </select>
            <textarea name="message" rows="5"></textarea>
            <button type="submit">Submit</button>
        </form>
    "#;

    let parsed = parse(html).unwrap();
    let tree = &parsed.tree;
    let doc = parsed.document;
    let name = tree.get_element_by_id(doc, "name").unwrap();
    assert_eq!(tree.get_attribute(name, "required"), Some(""));
    assert_eq!(tree.get_elements_by_tag_name(doc, "option").len(), 2);

    let textarea = tree.get_elements_by_tag_name(doc, "textarea")[0];
    assert!(!tree.has_child_nodes(textarea));
    let form = tree.document_element(doc).unwrap();
    assert_eq!(tree.local_name(form), Some("form"));
}

#[test]
fn test_second_top_level_element_is_rejected() {
    let err = parse("<header></header><main></main>").unwrap_err();
    assert!(matches!(err, ParseError::Dom(ref e) if e.name() == "HierarchyRequestError"));
}

#[test]
fn test_parsed_nodes_belong_to_document() {
    let parsed = parse("<!DOCTYPE html><html><body><p id=x>t</p></body></html>").unwrap();
    let tree = &parsed.tree;
    let doc = parsed.document;
    assert!(tree.doctype(doc).is_some());
    assert!(tree.descendants(doc).all(|n| tree.node_document(n) == doc));

    let p = tree.get_element_by_id(doc, "x").unwrap();
    let attr = tree.get_attribute_node(p, "id").unwrap();
    assert_eq!(tree.node_document(attr), doc);
    assert_eq!(tree.tag_name(p).as_deref(), Some("P"));
}
