//! Stylesheet filter used by rule extraction

use regex::Regex;

use crate::constants::extract;

/// Which stylesheets an extraction reads, and how many rules it may emit.
///
/// Patterns are matched against a sheet's `href`. Inline sheets (no `href`)
/// are governed by `include_inline` only.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub include: Vec<Regex>,
    pub exclude: Vec<Regex>,
    pub include_inline: bool,
    pub max_rules: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include: vec![default_include()],
            exclude: Vec::new(),
            include_inline: true,
            max_rules: extract::DEFAULT_MAX_RULES,
        }
    }
}

fn default_include() -> Regex {
    Regex::new(extract::DEFAULT_INCLUDE).expect("default include pattern must compile")
}

impl FilterConfig {
    /// Replace the include list. An empty list admits every external sheet.
    pub fn with_include<I, S>(mut self, patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include = compile(patterns)?;
        Ok(self)
    }

    pub fn with_exclude<I, S>(mut self, patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude = compile(patterns)?;
        Ok(self)
    }

    pub fn with_include_inline(mut self, include_inline: bool) -> Self {
        self.include_inline = include_inline;
        self
    }

    pub fn with_max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = max_rules;
        self
    }

    /// Whether a sheet with the given source reference should be read
    pub fn admits(&self, href: Option<&str>) -> bool {
        match href {
            None => self.include_inline,
            Some(href) => {
                if self.exclude.iter().any(|re| re.is_match(href)) {
                    return false;
                }
                self.include.is_empty() || self.include.iter().any(|re| re.is_match(href))
            }
        }
    }
}

fn compile<I, S>(patterns: I) -> Result<Vec<Regex>, regex::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns.into_iter().map(|p| Regex::new(p.as_ref())).collect()
}
