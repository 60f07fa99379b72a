//! Matched-rule extraction
//!
//! Walks the document's readable stylesheets, keeps the style rules whose
//! selector matches the target element and serializes them back to CSS text.

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::clipboard::{self, Clipboard};
use crate::config::FilterConfig;
use crate::constants::extract::{NO_MATCH_SENTINEL, PSEUDO_ELEMENT_MARKER};
use crate::cssom::{MatchOutcome, MatchTarget, SheetAccess, StyleRule, StyleSheetList};
use crate::selector::split_selector_list;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("extract(element): element is required")]
    MissingTarget,
}

/// Test one selector alternative. Pseudo-elements never match an element,
/// and selectors the host rejects count as "no match".
pub fn safe_matches<T: MatchTarget + ?Sized>(target: &T, selector: &str) -> bool {
    if selector.contains(PSEUDO_ELEMENT_MARKER) {
        return false;
    }
    match target.match_selector(selector) {
        MatchOutcome::Matched => true,
        MatchOutcome::NotMatched => false,
        MatchOutcome::Invalid(reason) => {
            debug!(selector = %selector, reason = %reason, "Skipping selector rejected by host");
            false
        }
    }
}

/// True if any top-level alternative of the rule's selector matches
pub fn rule_matches<T: MatchTarget + ?Sized>(rule: &StyleRule, target: &T) -> bool {
    split_selector_list(&rule.selector_text)
        .into_iter()
        .any(|part| safe_matches(target, part))
}

/// Collect the style rules applying to `target`, in stylesheet order then
/// rule order, stopping once `filter.max_rules` rules were collected.
pub fn matched_rules<'d, D, T>(document: &'d D, target: &T, filter: &FilterConfig) -> Vec<&'d StyleRule>
where
    D: StyleSheetList + ?Sized,
    T: MatchTarget + ?Sized,
{
    let mut matched = Vec::new();

    'sheets: for sheet in document.style_sheets() {
        let rules = match sheet.css_rules() {
            SheetAccess::Readable(rules) => rules,
            SheetAccess::CrossOrigin => {
                trace!(href = ?sheet.href(), "Skipping cross-origin stylesheet");
                continue;
            }
        };
        if !filter.admits(sheet.href()) {
            trace!(href = ?sheet.href(), "Stylesheet filtered out");
            continue;
        }

        for rule in rules {
            if matched.len() >= filter.max_rules {
                debug!(max_rules = filter.max_rules, "Rule cap reached, stopping extraction");
                break 'sheets;
            }
            let Some(style_rule) = rule.as_style() else {
                continue;
            };
            if !style_rule.style.is_empty() && rule_matches(style_rule, target) {
                matched.push(style_rule);
            }
        }
    }

    matched
}

/// Serialize the matching rules, or the no-match sentinel
pub fn extract<D, T>(document: &D, target: Option<&T>, filter: &FilterConfig) -> Result<String, ExtractError>
where
    D: StyleSheetList + ?Sized,
    T: MatchTarget + ?Sized,
{
    let target = target.ok_or(ExtractError::MissingTarget)?;
    let rules = matched_rules(document, target, filter);
    info!(matched = rules.len(), "Extracted matching style rules");

    if rules.is_empty() {
        return Ok(NO_MATCH_SENTINEL.to_string());
    }
    Ok(rules
        .iter()
        .map(|rule| rule.to_string())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// [`extract`], then copy the result. A failed copy does not change the output.
pub fn extract_and_copy<D, T>(
    document: &D,
    target: Option<&T>,
    filter: &FilterConfig,
    clipboard: &mut dyn Clipboard,
) -> Result<String, ExtractError>
where
    D: StyleSheetList + ?Sized,
    T: MatchTarget + ?Sized,
{
    let text = extract(document, target, filter)?;
    clipboard::copy_best_effort(clipboard, &text);
    Ok(text)
}
