//! Element resolution
//!
//! The resolver maps `(localName, namespace, is)` to the behavior an element
//! gets for its whole life. It is consulted exactly once per element, at
//! creation; the result is stored on the element.

use std::fmt;

use crate::custom_elements::is_valid_custom_element_name;
use crate::namespace::{HTML_NAMESPACE, MATHML_NAMESPACE, SVG_NAMESPACE};

/// Concrete behavior of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementBehavior {
    /// Known HTML element
    Html(HtmlElementKind),
    /// HTML namespace, name not recognized (`HTMLUnknownElement`)
    Unknown,
    /// HTML namespace, valid custom element name
    Custom,
    Svg,
    MathMl,
    /// Any other namespace, or none
    Generic,
}

/// Content model class of a known HTML element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlElementKind {
    Normal,
    /// No end tag, no content
    Void,
    /// `script`, `style`
    RawText,
    /// `textarea`, `title`
    EscapableRawText,
    Template,
}

/// Maps names to element behavior
pub trait ElementResolver: fmt::Debug {
    fn resolve(&self, local_name: &str, namespace: Option<&str>, is: Option<&str>)
    -> ElementBehavior;
}

/// Built-in HTML element catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCatalog;

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "menuitem",
    "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT: &[&str] = &["script", "style"];

const ESCAPABLE_RAW_TEXT: &[&str] = &["textarea", "title"];

/// Obsolete names that resolve to `HTMLUnknownElement`
const UNKNOWN: &[&str] = &[
    "applet", "bgsound", "blink", "isindex", "multicol", "nextid", "spacer",
];

// Sorted for binary search
const NORMAL: &[&str] = &[
    "a", "abbr", "acronym", "address", "article", "aside", "audio", "b", "basefont", "bdi",
    "bdo", "big", "blockquote", "body", "button", "canvas", "caption", "center", "cite", "code",
    "colgroup", "content", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "dir",
    "div", "dl", "dt", "em", "fieldset", "figcaption", "figure", "font", "footer", "form",
    "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "html",
    "i", "iframe", "ins", "kbd", "label", "legend", "li", "listing", "main", "map", "mark",
    "marquee", "menu", "meter", "nav", "nobr", "noembed", "noframes", "noscript", "object", "ol",
    "optgroup", "option", "output", "p", "picture", "plaintext", "portal", "pre", "progress", "q",
    "rb", "rp", "rt", "rtc", "ruby", "s", "samp", "section", "select", "shadow", "slot", "small",
    "span", "strike", "strong", "sub", "summary", "sup", "table", "tbody", "td", "tfoot", "th",
    "thead", "time", "tr", "tt", "u", "ul", "var", "video", "xmp",
];

impl HtmlCatalog {
    /// Content model class of a known HTML element name
    pub fn kind(local_name: &str) -> Option<HtmlElementKind> {
        if VOID.contains(&local_name) {
            Some(HtmlElementKind::Void)
        } else if RAW_TEXT.contains(&local_name) {
            Some(HtmlElementKind::RawText)
        } else if ESCAPABLE_RAW_TEXT.contains(&local_name) {
            Some(HtmlElementKind::EscapableRawText)
        } else if local_name == "template" {
            Some(HtmlElementKind::Template)
        } else if NORMAL.binary_search(&local_name).is_ok() {
            Some(HtmlElementKind::Normal)
        } else {
            None
        }
    }

    pub fn is_void(local_name: &str) -> bool {
        VOID.contains(&local_name)
    }
}

impl ElementResolver for HtmlCatalog {
    fn resolve(
        &self,
        local_name: &str,
        namespace: Option<&str>,
        _is: Option<&str>,
    ) -> ElementBehavior {
        match namespace {
            Some(HTML_NAMESPACE) => {
                if UNKNOWN.contains(&local_name) {
                    return ElementBehavior::Unknown;
                }
                match Self::kind(local_name) {
                    Some(kind) => ElementBehavior::Html(kind),
                    None if is_valid_custom_element_name(local_name) => ElementBehavior::Custom,
                    None => ElementBehavior::Unknown,
                }
            }
            Some(SVG_NAMESPACE) => ElementBehavior::Svg,
            Some(MATHML_NAMESPACE) => ElementBehavior::MathMl,
            _ => ElementBehavior::Generic,
        }
    }
}
