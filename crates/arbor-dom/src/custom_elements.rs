//! Custom Elements
//!
//! Custom element registry owned by the tree context. Constructors live
//! outside the engine; a definition refers to one by an opaque id.

use std::collections::HashMap;

use crate::elements::{ElementBehavior, ElementResolver};
use crate::namespace::HTML_NAMESPACE;
use crate::{DomError, DomResult, DomTree};

/// Custom elements registry
#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, CustomElementDefinition>,
    when_defined: HashMap<String, Vec<u32>>, // callback IDs
}

/// Custom element definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomElementDefinition {
    pub name: String,
    /// `name` for autonomous elements, the extended element otherwise
    pub local_name: String,
    pub constructor_id: u32,
}

impl CustomElementDefinition {
    /// Customized built-in elements extend an existing element
    pub fn is_customized_built_in(&self) -> bool {
        self.name != self.local_name
    }
}

/// Custom element options
#[derive(Debug, Clone, Default)]
pub struct CustomElementOptions {
    pub extends: Option<String>,
}

/// Custom element state of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CustomElementState {
    #[default]
    Uncustomized,
    /// Could be custom, no definition yet
    Undefined,
    Custom,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element
    ///
    /// Returns the `when_defined` callbacks waiting on `name`, which the
    /// host should now resolve.
    pub fn define(
        &mut self,
        name: &str,
        constructor_id: u32,
        options: CustomElementOptions,
        resolver: &dyn ElementResolver,
    ) -> DomResult<Vec<u32>> {
        if !is_valid_custom_element_name(name) {
            return Err(DomError::Syntax(format!("{name:?} is not a valid custom element name")));
        }

        if self.definitions.contains_key(name) {
            return Err(DomError::NotSupported(format!(
                "a custom element is already registered with the name {name:?}"
            )));
        }
        if self.definitions.values().any(|d| d.constructor_id == constructor_id) {
            return Err(DomError::NotSupported(
                "a custom element is already registered with the same constructor".into(),
            ));
        }

        let mut local_name = name.to_string();
        if let Some(extends) = options.extends {
            if is_valid_custom_element_name(&extends) {
                return Err(DomError::NotSupported("cannot extend a custom element".into()));
            }
            let behavior = resolver.resolve(&extends, Some(HTML_NAMESPACE), None);
            if matches!(behavior, ElementBehavior::Unknown) {
                return Err(DomError::NotSupported(format!(
                    "cannot extend the unknown element {extends:?}"
                )));
            }
            local_name = extends;
        }

        tracing::debug!("Defined custom element {} as <{}>", name, local_name);
        self.definitions.insert(
            name.to_string(),
            CustomElementDefinition { name: name.to_string(), local_name, constructor_id },
        );

        Ok(self.when_defined.remove(name).unwrap_or_default())
    }

    /// Get element definition
    pub fn get(&self, name: &str) -> Option<&CustomElementDefinition> {
        self.definitions.get(name)
    }

    /// Check if element is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Register a `whenDefined` callback
    ///
    /// Returns false when the callback was not queued: either `name` is
    /// already defined and the host can resolve it immediately, or the name
    /// is invalid.
    pub fn when_defined(&mut self, name: &str, callback_id: u32) -> bool {
        if self.is_defined(name) || !is_valid_custom_element_name(name) {
            return false;
        }

        self.when_defined.entry(name.to_string()).or_default().push(callback_id);
        true
    }

    /// Look up a custom element definition
    ///
    /// Only HTML-namespace elements can be custom.
    pub fn look_up(
        &self,
        namespace: Option<&str>,
        local_name: &str,
        is: Option<&str>,
    ) -> Option<&CustomElementDefinition> {
        if namespace != Some(HTML_NAMESPACE) {
            return None;
        }

        if let Some(definition) = self.definitions.get(local_name) {
            if definition.local_name == local_name {
                return Some(definition);
            }
        }

        is.and_then(|is| self.definitions.get(is))
            .filter(|definition| definition.local_name == local_name)
    }
}

impl DomTree {
    /// `customElements.define(name, constructor, options)`
    pub fn define_custom_element(
        &mut self,
        name: &str,
        constructor_id: u32,
        options: CustomElementOptions,
    ) -> DomResult<Vec<u32>> {
        let (registry, resolver) = self.registry_and_resolver();
        registry.define(name, constructor_id, options, resolver)
    }
}

const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

fn is_pcen_char(c: char) -> bool {
    matches!(c,
        '-' | '.' | '0'..='9' | '_' | 'a'..='z'
        | '\u{B7}'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{203F}'..='\u{2040}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// Valid custom element name: a lowercase ASCII letter, then potential
/// custom element name characters including at least one hyphen, and not
/// one of the reserved SVG/MathML names
pub fn is_valid_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
        return false;
    }
    if !name.contains('-') || !chars.all(is_pcen_char) {
        return false;
    }

    !RESERVED_NAMES.contains(&name)
}
