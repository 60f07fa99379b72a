//! Selector parsing and matching for the in-memory document.
//!
//! Supported syntax:
//! - type, universal, class, id selectors
//! - attribute selectors with `=`, `~=`, `|=`, `^=`, `$=`, `*=` and the `i` flag
//! - structural pseudo-classes (`:root`, `:empty`, `:first-child`, `:last-child`,
//!   `:only-child`, `:first-of-type`, `:last-of-type`, `:only-of-type`), `:not()`,
//!   link and form-state pseudo-classes
//! - descendant, child, adjacent and general sibling combinators
//!
//! Anything else is a [`SelectorError`], mirroring a host selector engine that
//! throws on unsupported syntax.

mod matcher;
mod parser;

pub use matcher::{matches_complex, matches_compound, matches_selector_list};
pub use parser::{parse_complex_selector, parse_selector_list};

use thiserror::Error;

/// DOM access needed for matching. Implement this for your element tree.
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent element, `None` for the root
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    fn next_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name in ASCII lowercase
    fn local_name(&self, element: Self::Handle) -> &str;

    fn element_id(&self, element: Self::Handle) -> Option<&str> {
        self.attr(element, "id")
    }

    fn has_class(&self, element: Self::Handle, class: &str) -> bool {
        self.attr(element, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Attribute value; `name` is ASCII lowercase
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// True when the element has no children and no text
    fn is_empty(&self, element: Self::Handle) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    #[error("expected identifier at offset {0}")]
    ExpectedIdent(usize),
    #[error("unsupported pseudo-class ':{0}'")]
    UnknownPseudoClass(String),
    #[error("pseudo-elements cannot match elements")]
    PseudoElement,
    #[error("invalid An+B expression '{0}'")]
    InvalidNth(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrOperator {
    /// `[a=v]`
    Equals,
    /// `[a~=v]` whitespace-separated word
    Includes,
    /// `[a|=v]` exact or followed by `-`
    DashMatch,
    /// `[a^=v]`
    Prefix,
    /// `[a$=v]`
    Suffix,
    /// `[a*=v]`
    Substring,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    /// `None` for a bare presence test (`[name]`)
    pub operator: Option<(AttrOperator, String)>,
    pub case_insensitive: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoClass {
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    /// `:link` / `:any-link`: `a` or `area` with an `href`
    Link,
    Checked,
    Disabled,
    Enabled,
    /// User-action and history states (`:hover`, `:focus`, `:visited`, ...).
    /// A static document is never in these states.
    Dynamic(String),
    /// Legacy single-colon pseudo-elements (`:before`); accepted, never match
    LegacyPseudoElement(String),
    /// `:nth-child(An+B)` and friends
    Nth { kind: NthKind, a: i32, b: i32 },
    Not(Vec<ComplexSelector>),
    /// `:is()` and `:where()`; they differ only in specificity
    Is(Vec<ComplexSelector>),
}

/// Which siblings an `:nth-*` pseudo-class counts, and from which end
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NthKind {
    Child,
    LastChild,
    OfType,
    LastOfType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    /// Lowercased tag name
    Type(String),
    Class(String),
    Id(String),
    Attribute(AttrSelector),
    PseudoClass(PseudoClass),
}

/// Simple selectors with no combinator between them
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// `compounds[i]` and `compounds[i + 1]` are joined by `combinators[i]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

/// Split selector text on top-level commas.
///
/// Commas inside `()`, `[]`, quoted strings or after a backslash do not split.
/// Parts are trimmed and empty parts dropped.
pub fn split_selector_list(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (offset, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' | '\'' if quote == Some(c) => quote = None,
            _ if quote.is_some() => {}
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts.into_iter().map(str::trim).filter(|part| !part.is_empty()).collect()
}
