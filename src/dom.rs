//! In-memory document: an element arena plus the document's stylesheets.
//!
//! Implements the host traits of [`crate::cssom`] so extraction can run
//! without a browser. Elements are addressed by [`NodeId`] indices.

use crate::cssom::{CssRule, MatchOutcome, MatchTarget, SheetAccess, StyleSheet, StyleSheetList};
use crate::selector::{self, ElementAdapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct ElementData {
    local_name: String,
    attributes: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A stylesheet attached to a [`Document`]
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub href: Option<String>,
    pub rules: Vec<CssRule>,
    /// Rules are hidden from script, as for a cross-origin `<link>`
    pub cross_origin: bool,
}

impl Sheet {
    /// An inline `<style>` sheet
    pub fn inline(rules: Vec<CssRule>) -> Self {
        Self { href: None, rules, cross_origin: false }
    }

    pub fn external(href: impl Into<String>, rules: Vec<CssRule>) -> Self {
        Self { href: Some(href.into()), rules, cross_origin: false }
    }

    pub fn cross_origin(href: impl Into<String>, rules: Vec<CssRule>) -> Self {
        Self { href: Some(href.into()), rules, cross_origin: true }
    }
}

impl StyleSheet for Sheet {
    fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    fn css_rules(&self) -> SheetAccess<'_> {
        if self.cross_origin {
            SheetAccess::CrossOrigin
        } else {
            SheetAccess::Readable(&self.rules)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<ElementData>,
    sheets: Vec<Sheet>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding only the `html` root element
    pub fn new() -> Self {
        Self {
            elements: vec![ElementData {
                local_name: "html".to_string(),
                attributes: Vec::new(),
                text: String::new(),
                parent: None,
                children: Vec::new(),
            }],
            sheets: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, local_name: &str) -> NodeId {
        let id = NodeId(self.elements.len());
        self.elements.push(ElementData {
            local_name: local_name.to_ascii_lowercase(),
            attributes: Vec::new(),
            text: String::new(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.elements[parent.0].children.push(id);
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        let attributes = &mut self.elements[node.0].attributes;
        match attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name, value.to_string())),
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.elements[node.0].text = text.to_string();
    }

    pub fn add_style_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn element(&self, node: NodeId) -> ElementRef<'_> {
        ElementRef { document: self, node }
    }

    fn sibling(&self, node: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.elements[node.0].parent?;
        let siblings = &self.elements[parent.0].children;
        let index = siblings.iter().position(|&child| child == node)?;
        let target = index.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }
}

impl ElementAdapter for Document {
    type Handle = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.elements[element.0].parent
    }

    fn previous_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        self.sibling(element, -1)
    }

    fn next_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        self.sibling(element, 1)
    }

    fn local_name(&self, element: NodeId) -> &str {
        &self.elements[element.0].local_name
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.elements[element.0]
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    fn is_empty(&self, element: NodeId) -> bool {
        let data = &self.elements[element.0];
        data.children.is_empty() && data.text.is_empty()
    }
}

impl StyleSheetList for Document {
    fn style_sheets(&self) -> Vec<&dyn StyleSheet> {
        self.sheets.iter().map(|sheet| sheet as &dyn StyleSheet).collect()
    }
}

/// Borrowed handle to one element, usable as an extraction target
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    document: &'a Document,
    node: NodeId,
}

impl ElementRef<'_> {
    pub fn id(&self) -> NodeId {
        self.node
    }

    /// `Element.matches` semantics: selector lists allowed, bad syntax is an error
    pub fn matches(&self, selectors: &str) -> Result<bool, selector::SelectorError> {
        let list = selector::parse_selector_list(selectors)?;
        Ok(selector::matches_selector_list(self.document, self.node, &list))
    }
}

impl MatchTarget for ElementRef<'_> {
    fn match_selector(&self, selector: &str) -> MatchOutcome {
        match self.matches(selector) {
            Ok(matched) => MatchOutcome::from(matched),
            Err(e) => MatchOutcome::Invalid(e.to_string()),
        }
    }
}
