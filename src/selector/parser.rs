//! Strict selector parser. Anything outside the supported subset is an error.

use super::{
    AttrOperator, AttrSelector, Combinator, ComplexSelector, CompoundSelector, NthKind,
    PseudoClass, SelectorError, SelectorList, SimpleSelector,
};

type ParseResult<T> = Result<T, SelectorError>;

/// Parse a comma-separated selector list
pub fn parse_selector_list(input: &str) -> ParseResult<SelectorList> {
    let mut parser = SelectorParser::new(input);
    let mut list = SelectorList::default();
    loop {
        list.selectors.push(parser.parse_complex(false)?);
        match parser.peek() {
            Some(',') => parser.bump(),
            None => return Ok(list),
            Some(found) => return Err(parser.unexpected(found)),
        }
    }
}

/// Parse exactly one complex selector (no top-level commas)
pub fn parse_complex_selector(input: &str) -> ParseResult<ComplexSelector> {
    let mut parser = SelectorParser::new(input);
    let selector = parser.parse_complex(false)?;
    match parser.peek() {
        None => Ok(selector),
        Some(found) => Err(parser.unexpected(found)),
    }
}

struct SelectorParser {
    chars: Vec<char>,
    index: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.index + ahead).copied()
    }

    fn bump(&mut self) {
        self.index += 1;
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected { found, offset: self.index }
    }

    fn expect(&mut self, wanted: char) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(self.unexpected(found)),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    /// Skip whitespace, reporting whether any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.index;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.index > start
    }

    /// Compound selectors joined by combinators. Stops before `,` and, when
    /// `nested`, before `)`.
    fn parse_complex(&mut self, nested: bool) -> ParseResult<ComplexSelector> {
        self.skip_whitespace();
        if self.peek().is_none() || self.peek() == Some(',') {
            return Err(SelectorError::Empty);
        }

        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let saw_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some(')') if nested => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::AdjacentSibling,
                Some('~') => Combinator::GeneralSibling,
                Some(_) if saw_whitespace => Combinator::Descendant,
                Some(found) => return Err(self.unexpected(found)),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> ParseResult<CompoundSelector> {
        let mut simples = Vec::new();

        match self.peek() {
            Some('*') => {
                self.bump();
                simples.push(SimpleSelector::Universal);
            }
            _ if self.at_ident_start() => {
                let name = self.consume_ident()?;
                simples.push(SimpleSelector::Type(name.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    simples.push(SimpleSelector::Class(self.consume_ident()?));
                }
                Some('#') => {
                    self.bump();
                    simples.push(SimpleSelector::Id(self.consume_name()?));
                }
                Some('[') => {
                    self.bump();
                    simples.push(SimpleSelector::Attribute(self.consume_attribute()?));
                }
                Some(':') => {
                    self.bump();
                    simples.push(SimpleSelector::PseudoClass(self.consume_pseudo_class()?));
                }
                _ => break,
            }
        }

        if simples.is_empty() {
            return Err(match self.peek() {
                Some(found) => self.unexpected(found),
                None => SelectorError::UnexpectedEnd,
            });
        }
        Ok(CompoundSelector { simples })
    }

    fn consume_attribute(&mut self) -> ParseResult<AttrSelector> {
        self.skip_whitespace();
        let name = self.consume_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let operator = match (self.peek(), self.peek_at(1)) {
            (Some(']'), _) => None,
            (Some('='), _) => Some((AttrOperator::Equals, 1)),
            (Some('~'), Some('=')) => Some((AttrOperator::Includes, 2)),
            (Some('|'), Some('=')) => Some((AttrOperator::DashMatch, 2)),
            (Some('^'), Some('=')) => Some((AttrOperator::Prefix, 2)),
            (Some('$'), Some('=')) => Some((AttrOperator::Suffix, 2)),
            (Some('*'), Some('=')) => Some((AttrOperator::Substring, 2)),
            (Some(found), _) => return Err(self.unexpected(found)),
            (None, _) => return Err(SelectorError::UnexpectedEnd),
        };

        let Some((operator, width)) = operator else {
            self.bump();
            return Ok(AttrSelector { name, operator: None, case_insensitive: false });
        };
        self.index += width;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.consume_string(quote)?,
            _ => self.consume_ident()?,
        };
        self.skip_whitespace();

        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.bump();
                true
            }
            Some('s' | 'S') => {
                self.bump();
                false
            }
            _ => false,
        };
        self.skip_whitespace();
        self.expect(']')?;

        Ok(AttrSelector {
            name,
            operator: Some((operator, value)),
            case_insensitive,
        })
    }

    fn consume_pseudo_class(&mut self) -> ParseResult<PseudoClass> {
        if self.peek() == Some(':') {
            return Err(SelectorError::PseudoElement);
        }
        let name = self.consume_ident()?.to_ascii_lowercase();

        if self.peek() == Some('(') {
            self.bump();
            return match name.as_str() {
                "not" => Ok(PseudoClass::Not(self.parse_nested_list()?)),
                "is" | "where" | "matches" => Ok(PseudoClass::Is(self.parse_nested_list()?)),
                "nth-child" => self.parse_nth(NthKind::Child),
                "nth-last-child" => self.parse_nth(NthKind::LastChild),
                "nth-of-type" => self.parse_nth(NthKind::OfType),
                "nth-last-of-type" => self.parse_nth(NthKind::LastOfType),
                _ => Err(SelectorError::UnknownPseudoClass(format!("{name}()"))),
            };
        }

        let pseudo = match name.as_str() {
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            "link" | "any-link" => PseudoClass::Link,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "hover" | "active" | "focus" | "focus-within" | "focus-visible" | "visited"
            | "target" => PseudoClass::Dynamic(name),
            "before" | "after" | "first-line" | "first-letter" => PseudoClass::LegacyPseudoElement(name),
            _ => return Err(SelectorError::UnknownPseudoClass(name)),
        };
        Ok(pseudo)
    }

    /// Comma-separated complex selectors up to and including the closing `)`
    fn parse_nested_list(&mut self) -> ParseResult<Vec<ComplexSelector>> {
        let mut selectors = Vec::new();
        loop {
            selectors.push(self.parse_complex(true)?);
            match self.peek() {
                Some(',') => self.bump(),
                Some(')') => {
                    self.bump();
                    return Ok(selectors);
                }
                Some(found) => return Err(self.unexpected(found)),
                None => return Err(SelectorError::UnexpectedEnd),
            }
        }
    }

    fn parse_nth(&mut self, kind: NthKind) -> ParseResult<PseudoClass> {
        let start = self.index;
        while self.peek().is_some_and(|c| c != ')') {
            self.bump();
        }
        let argument: String = self.chars[start..self.index].iter().collect();
        self.expect(')')?;
        let (a, b) = parse_an_plus_b(&argument).ok_or_else(|| SelectorError::InvalidNth(argument.trim().to_string()))?;
        Ok(PseudoClass::Nth { kind, a, b })
    }

    fn at_ident_start(&self) -> bool {
        match self.peek() {
            Some(c) if is_name_start(c) || c == '\\' => true,
            Some('-') => match self.peek_at(1) {
                Some(next) => is_name_start(next) || next == '-' || next == '\\',
                None => false,
            },
            _ => false,
        }
    }

    fn consume_ident(&mut self) -> ParseResult<String> {
        if !self.at_ident_start() {
            return Err(SelectorError::ExpectedIdent(self.index));
        }
        self.consume_name()
    }

    /// Name characters; unlike an identifier, may start with a digit (ids)
    fn consume_name(&mut self) -> ParseResult<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                out.push(self.consume_escape()?);
            } else if is_name_char(c) {
                self.bump();
                out.push(c);
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(SelectorError::ExpectedIdent(self.index));
        }
        Ok(out)
    }

    /// Body of an escape, backslash already consumed
    fn consume_escape(&mut self) -> ParseResult<char> {
        let Some(first) = self.peek() else {
            return Err(SelectorError::UnexpectedEnd);
        };
        if !first.is_ascii_hexdigit() {
            self.bump();
            return Ok(first);
        }

        let mut code = 0u32;
        let mut digits = 0;
        while digits < 6 {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    code = code * 16 + digit;
                    digits += 1;
                    self.bump();
                }
                None => break,
            }
        }
        if self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        Ok(char::from_u32(code).filter(|&c| c != '\0').unwrap_or('\u{FFFD}'))
    }

    fn consume_string(&mut self, quote: char) -> ParseResult<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(SelectorError::UnexpectedEnd),
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(out);
                }
                Some('\\') => {
                    self.bump();
                    out.push(self.consume_escape()?);
                }
                Some(c) => {
                    self.bump();
                    out.push(c);
                }
            }
        }
    }
}

/// `odd`, `even`, `B`, `An`, `An+B` (`A` may be empty, `+` or `-`)
fn parse_an_plus_b(text: &str) -> Option<(i32, i32)> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.as_str() {
        "odd" => return Some((2, 1)),
        "even" => return Some((2, 0)),
        "" => return None,
        _ => {}
    }

    let Some((a, b)) = compact.split_once('n') else {
        return compact.parse().ok().map(|b| (0, b));
    };
    let a = match a {
        "" | "+" => 1,
        "-" => -1,
        digits => digits.parse().ok()?,
    };
    let b = match b {
        "" => 0,
        signed if signed.starts_with(['+', '-']) && signed.len() > 1 => signed.parse().ok()?,
        _ => return None,
    };
    Some((a, b))
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}
