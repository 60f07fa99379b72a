//! Host style object model seen by the extraction engine
//!
//! The engine never parses CSS text itself: it walks whatever stylesheets the
//! host has already parsed. Hosts implement [`StyleSheetList`], [`StyleSheet`]
//! and [`MatchTarget`]; the concrete rule types below are shared.

use std::fmt;

/// One property declaration inside a style rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

/// Ordered declaration block.
///
/// Setting a property that already exists replaces it in place, so the
/// serialization order stays the order in which properties first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationBlock {
    declarations: Vec<Declaration>,
}

impl DeclarationBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: &str, important: bool) {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        match self.declarations.iter_mut().find(|d| d.name == name) {
            Some(existing) => {
                existing.value = value;
                existing.important = important;
            }
            None => self.declarations.push(Declaration { name, value, important }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Declaration> {
        let index = self.declarations.iter().position(|d| d.name.eq_ignore_ascii_case(name))?;
        Some(self.declarations.remove(index))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }
}

/// A selector plus its declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector_text: String,
    pub style: DeclarationBlock,
}

impl StyleRule {
    pub fn new(selector_text: impl Into<String>) -> Self {
        Self {
            selector_text: selector_text.into(),
            style: DeclarationBlock::new(),
        }
    }

    /// Builder-style `set` of a normal-priority declaration
    pub fn declare(mut self, name: &str, value: &str) -> Self {
        self.style.set(name, value, false);
        self
    }

    /// Builder-style `set` of an `!important` declaration
    pub fn declare_important(mut self, name: &str, value: &str) -> Self {
        self.style.set(name, value, true);
        self
    }
}

/// Rule kinds. Only style rules take part in extraction; at-rules and grouping
/// rules (`@media`, `@supports`, ...) are carried as [`CssRule::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssRule {
    Style(StyleRule),
    Other { name: String },
}

impl CssRule {
    pub fn as_style(&self) -> Option<&StyleRule> {
        match self {
            CssRule::Style(rule) => Some(rule),
            CssRule::Other { .. } => None,
        }
    }
}

impl From<StyleRule> for CssRule {
    fn from(rule: StyleRule) -> Self {
        CssRule::Style(rule)
    }
}

/// Result of asking a sheet for its rule list
#[derive(Debug, Clone, Copy)]
pub enum SheetAccess<'a> {
    Readable(&'a [CssRule]),
    /// The host refused to expose the rules (cross-origin protection)
    CrossOrigin,
}

/// Result of testing one selector against an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    NotMatched,
    /// The host selector engine rejected the selector
    Invalid(String),
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched)
    }
}

impl From<bool> for MatchOutcome {
    fn from(matched: bool) -> Self {
        if matched { MatchOutcome::Matched } else { MatchOutcome::NotMatched }
    }
}

pub trait StyleSheet {
    /// Source URL, or `None` for an inline `<style>` sheet
    fn href(&self) -> Option<&str>;

    fn css_rules(&self) -> SheetAccess<'_>;
}

/// A document's stylesheets, in document order
pub trait StyleSheetList {
    fn style_sheets(&self) -> Vec<&dyn StyleSheet>;
}

/// An element that can be tested against a single (non-list) selector
pub trait MatchTarget {
    fn match_selector(&self, selector: &str) -> MatchOutcome;
}

impl fmt::Display for StyleRule {
    /// `selector {\n  prop: value[ !important];\n}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selector_text)?;
        for declaration in self.style.iter() {
            let priority = if declaration.important { " !important" } else { "" };
            writeln!(f, "  {}: {}{};", declaration.name, declaration.value, priority)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_existing_property_keeps_position() {
        let mut block = DeclarationBlock::new();
        block.set("color", "red", false);
        block.set("margin", "0", false);
        block.set("COLOR", "blue", true);

        let names: Vec<_> = block.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["color", "margin"]);
        assert_eq!(block.get("color").unwrap().value, "blue");
        assert!(block.get("color").unwrap().important);
    }

    #[test]
    fn test_remove_declaration() {
        let mut block = DeclarationBlock::new();
        block.set("color", "red", false);
        assert!(block.remove("Color").is_some());
        assert!(block.is_empty());
        assert!(block.remove("color").is_none());
    }

    #[test]
    fn test_style_rule_display() {
        let rule = StyleRule::new(".btn, .link")
            .declare("color", "red")
            .declare_important("padding", "4px 8px");
        assert_eq!(
            rule.to_string(),
            ".btn, .link {\n  color: red;\n  padding: 4px 8px !important;\n}"
        );
    }

    #[test]
    fn test_only_style_rules_expose_style() {
        let other = CssRule::Other { name: "media".to_string() };
        assert!(other.as_style().is_none());
        let style: CssRule = StyleRule::new("a").into();
        assert!(style.as_style().is_some());
    }
}
