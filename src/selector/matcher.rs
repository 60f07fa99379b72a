//! Right-to-left selector matching with backtracking over combinators

use super::{
    AttrOperator, AttrSelector, Combinator, ComplexSelector, CompoundSelector, ElementAdapter,
    NthKind, PseudoClass, SelectorList, SimpleSelector,
};

/// True if any selector of the list matches
pub fn matches_selector_list<A: ElementAdapter>(adapter: &A, element: A::Handle, list: &SelectorList) -> bool {
    list.selectors
        .iter()
        .any(|selector| matches_complex(adapter, element, selector))
}

pub fn matches_complex<A: ElementAdapter>(adapter: &A, element: A::Handle, selector: &ComplexSelector) -> bool {
    match selector.compounds.len() {
        0 => false,
        len => matches_from(adapter, element, selector, len - 1),
    }
}

/// Match `compounds[index]` against `element`, then walk leftwards. Every
/// candidate relative is tried, so `a b > c` finds the right `b` even when a
/// nearer ancestor also matches `b`.
fn matches_from<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    selector: &ComplexSelector,
    index: usize,
) -> bool {
    if !matches_compound(adapter, element, &selector.compounds[index]) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let next = index - 1;
    match selector.combinators[next] {
        Combinator::Child => adapter
            .parent(element)
            .is_some_and(|parent| matches_from(adapter, parent, selector, next)),
        Combinator::AdjacentSibling => adapter
            .previous_sibling_element(element)
            .is_some_and(|sibling| matches_from(adapter, sibling, selector, next)),
        Combinator::Descendant => {
            let mut current = adapter.parent(element);
            while let Some(ancestor) = current {
                if matches_from(adapter, ancestor, selector, next) {
                    return true;
                }
                current = adapter.parent(ancestor);
            }
            false
        }
        Combinator::GeneralSibling => {
            let mut current = adapter.previous_sibling_element(element);
            while let Some(sibling) = current {
                if matches_from(adapter, sibling, selector, next) {
                    return true;
                }
                current = adapter.previous_sibling_element(sibling);
            }
            false
        }
    }
}

pub fn matches_compound<A: ElementAdapter>(adapter: &A, element: A::Handle, compound: &CompoundSelector) -> bool {
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(adapter, element, simple))
}

fn matches_simple<A: ElementAdapter>(adapter: &A, element: A::Handle, simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(name) => adapter.local_name(element).eq_ignore_ascii_case(name),
        SimpleSelector::Class(class) => adapter.has_class(element, class),
        SimpleSelector::Id(id) => adapter.element_id(element) == Some(id.as_str()),
        SimpleSelector::Attribute(attr) => matches_attribute(adapter, element, attr),
        SimpleSelector::PseudoClass(pseudo) => matches_pseudo_class(adapter, element, pseudo),
    }
}

fn matches_attribute<A: ElementAdapter>(adapter: &A, element: A::Handle, attr: &AttrSelector) -> bool {
    let Some(actual) = adapter.attr(element, &attr.name) else {
        return false;
    };
    let Some((operator, expected)) = &attr.operator else {
        return true;
    };

    let (actual, expected) = if attr.case_insensitive {
        (actual.to_lowercase(), expected.to_lowercase())
    } else {
        (actual.to_string(), expected.clone())
    };

    match operator {
        AttrOperator::Equals => actual == expected,
        AttrOperator::Includes => {
            !expected.is_empty()
                && !expected.contains(char::is_whitespace)
                && actual.split_whitespace().any(|word| word == expected)
        }
        AttrOperator::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttrOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttrOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttrOperator::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}

fn matches_pseudo_class<A: ElementAdapter>(adapter: &A, element: A::Handle, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::Root => adapter.parent(element).is_none(),
        PseudoClass::Empty => adapter.is_empty(element),
        PseudoClass::FirstChild => adapter.previous_sibling_element(element).is_none(),
        PseudoClass::LastChild => adapter.next_sibling_element(element).is_none(),
        PseudoClass::OnlyChild => {
            adapter.previous_sibling_element(element).is_none() && adapter.next_sibling_element(element).is_none()
        }
        PseudoClass::FirstOfType => !has_sibling_of_type(adapter, element, A::previous_sibling_element),
        PseudoClass::LastOfType => !has_sibling_of_type(adapter, element, A::next_sibling_element),
        PseudoClass::OnlyOfType => {
            !has_sibling_of_type(adapter, element, A::previous_sibling_element)
                && !has_sibling_of_type(adapter, element, A::next_sibling_element)
        }
        PseudoClass::Link => {
            matches!(adapter.local_name(element), "a" | "area") && adapter.attr(element, "href").is_some()
        }
        PseudoClass::Checked => adapter.attr(element, "checked").is_some(),
        PseudoClass::Disabled => adapter.attr(element, "disabled").is_some(),
        PseudoClass::Enabled => {
            is_form_control(adapter.local_name(element)) && adapter.attr(element, "disabled").is_none()
        }
        PseudoClass::Dynamic(_) | PseudoClass::LegacyPseudoElement(_) => false,
        PseudoClass::Nth { kind, a, b } => {
            let position = match kind {
                NthKind::Child => sibling_position(adapter, element, A::previous_sibling_element, false),
                NthKind::LastChild => sibling_position(adapter, element, A::next_sibling_element, false),
                NthKind::OfType => sibling_position(adapter, element, A::previous_sibling_element, true),
                NthKind::LastOfType => sibling_position(adapter, element, A::next_sibling_element, true),
            };
            nth_matches(*a, *b, position)
        }
        PseudoClass::Not(arguments) => !arguments
            .iter()
            .any(|selector| matches_complex(adapter, element, selector)),
        PseudoClass::Is(arguments) => arguments
            .iter()
            .any(|selector| matches_complex(adapter, element, selector)),
    }
}

/// 1-based position among the siblings reached by `step`, optionally
/// counting only siblings with the same local name
fn sibling_position<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    step: fn(&A, A::Handle) -> Option<A::Handle>,
    same_type: bool,
) -> i32 {
    let name = adapter.local_name(element);
    let mut position = 1;
    let mut current = step(adapter, element);
    while let Some(sibling) = current {
        if !same_type || adapter.local_name(sibling) == name {
            position += 1;
        }
        current = step(adapter, sibling);
    }
    position
}

/// True if `position = a*n + b` for some integer `n >= 0`
fn nth_matches(a: i32, b: i32, position: i32) -> bool {
    if a == 0 {
        return position == b;
    }
    let diff = position - b;
    diff % a == 0 && diff / a >= 0
}

fn has_sibling_of_type<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    step: fn(&A, A::Handle) -> Option<A::Handle>,
) -> bool {
    let name = adapter.local_name(element);
    let mut current = step(adapter, element);
    while let Some(sibling) = current {
        if adapter.local_name(sibling) == name {
            return true;
        }
        current = step(adapter, sibling);
    }
    false
}

fn is_form_control(name: &str) -> bool {
    matches!(name, "button" | "input" | "select" | "textarea" | "option" | "optgroup" | "fieldset")
}
