//! Selector text to [`SelectorList`].
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)

use thiserror::Error;

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector,
};

/// Why a selector could not be parsed. Positions are byte offsets into the
/// selector text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A compound selector was expected but none was found (empty input,
    /// empty group such as `a,,b`, or a combinator with nothing after it).
    #[error("expected a selector at {position} in `{input}`")]
    ExpectedSelector {
        /// The selector text.
        input: String,
        /// Where a selector should have started.
        position: usize,
    },

    /// A character that cannot appear at this point.
    #[error("unexpected `{found}` at {position} in `{input}`")]
    UnexpectedCharacter {
        /// The selector text.
        input: String,
        /// Offset of the character.
        position: usize,
        /// The character itself.
        found: char,
    },

    /// `.`, `#`, `:` or `[` not followed by a name.
    #[error("expected a name at {position} in `{input}`")]
    ExpectedName {
        /// The selector text.
        input: String,
        /// Where the name should have started.
        position: usize,
    },

    /// An attribute selector, quoted value or pseudo-class argument list
    /// that runs off the end of the input.
    #[error("unterminated `{opener}` opened at {position} in `{input}`")]
    Unterminated {
        /// The selector text.
        input: String,
        /// Offset of the opening character.
        position: usize,
        /// The opening character.
        opener: char,
    },
}

/// Parse a comma-separated selector list.
///
/// # Errors
///
/// Returns a [`SelectorError`] describing the first syntax problem.
///
/// # Example
/// ```ignore
/// let list = parse_selector_list("ul.nav > li, #footer a[href^=http]")?;
/// assert_eq!(list.selectors.len(), 2);
/// ```
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorError> {
    let mut parser = SelectorParser { input, pos: 0 };
    let mut selectors = vec![parser.parse_complex()?];
    while parser.eat(',') {
        selectors.push(parser.parse_complex()?);
    }
    match parser.peek() {
        None => Ok(SelectorList { selectors }),
        Some(found) => Err(parser.unexpected(found)),
    }
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Attribute names also admit framework punctuation (`@click.prevent`, `:class`).
const fn is_attribute_name_char(c: char) -> bool {
    is_ident_char(c) || matches!(c, '@' | ':' | '.')
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace, returning whether any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            let _ = self.bump();
        }
        &self.input[start..self.pos]
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::UnexpectedCharacter {
            input: self.input.to_string(),
            position: self.pos,
            found,
        }
    }

    fn name(&mut self, accept: impl Fn(char) -> bool) -> Result<String, SelectorError> {
        let position = self.pos;
        let name = self.take_while(accept);
        if name.is_empty() {
            return Err(SelectorError::ExpectedName {
                input: self.input.to_string(),
                position,
            });
        }
        Ok(name.to_string())
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Compounds are collected left to right, then the chain is reversed so
    /// matching can walk outward from the subject.
    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let _ = self.skip_whitespace();
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(found) => return Err(self.unexpected(found)),
            };
            if combinator != Combinator::Descendant {
                let _ = self.bump();
                let _ = self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        // For "A > B C": compounds [A, B, C], combinators [Child, Descendant].
        // The chain becomes [(Descendant, B), (Child, A)].
        let Some(subject) = compounds.pop() else {
            return Err(SelectorError::ExpectedSelector {
                input: self.input.to_string(),
                position: self.pos,
            });
        };
        let combinators = compounds
            .into_iter()
            .zip(combinators)
            .rev()
            .map(|(compound, combinator)| (combinator, compound))
            .collect();

        Ok(ComplexSelector {
            subject,
            combinators,
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// A type or universal selector may only come first.
    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let start = self.pos;
        let mut simple_selectors = Vec::new();

        while let Some(c) = self.peek() {
            let simple = match c {
                '*' if simple_selectors.is_empty() => {
                    let _ = self.bump();
                    SimpleSelector::Universal
                }
                '.' => {
                    let _ = self.bump();
                    SimpleSelector::Class(self.name(is_ident_char)?)
                }
                '#' => {
                    let _ = self.bump();
                    SimpleSelector::Id(self.name(is_ident_char)?)
                }
                '[' => SimpleSelector::Attribute(self.parse_attribute()?),
                ':' => self.parse_pseudo()?,
                c if simple_selectors.is_empty() && (is_ident_start_char(c) || c == '-') => {
                    SimpleSelector::Type(self.name(is_ident_char)?.to_ascii_lowercase())
                }
                c if c.is_ascii_whitespace() || matches!(c, ',' | '>' | '+' | '~') => break,
                found => return Err(self.unexpected(found)),
            };
            simple_selectors.push(simple);
        }

        if simple_selectors.is_empty() {
            return Err(SelectorError::ExpectedSelector {
                input: self.input.to_string(),
                position: start,
            });
        }
        Ok(CompoundSelector { simple_selectors })
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        let open = self.pos;
        let _ = self.bump();
        let _ = self.skip_whitespace();
        let name = self.name(is_attribute_name_char)?;
        let _ = self.skip_whitespace();

        let operator = match self.peek() {
            Some(']') => {
                let _ = self.bump();
                return Ok(AttributeSelector::Exists(name));
            }
            Some('=') => '=',
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                let _ = self.bump();
                if self.peek() != Some('=') {
                    return Err(self.unexpected_or_unterminated('[', open));
                }
                op
            }
            _ => return Err(self.unexpected_or_unterminated('[', open)),
        };
        let _ = self.bump();

        let value = self.parse_attribute_value()?;
        let _ = self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.unexpected_or_unterminated('[', open));
        }

        Ok(match operator {
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            '*' => AttributeSelector::SubstringMatch(name, value),
            _ => AttributeSelector::Equals(name, value),
        })
    }

    /// A quoted or unquoted value. `[attr=]` yields an empty value.
    fn parse_attribute_value(&mut self) -> Result<String, SelectorError> {
        let _ = self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let open = self.pos;
                let _ = self.bump();
                let value = self.take_while(|c| c != quote).to_string();
                if !self.eat(quote) {
                    return Err(self.unterminated(quote, open));
                }
                Ok(value)
            }
            _ => Ok(self
                .take_while(|c| c != ']' && !c.is_ascii_whitespace())
                .to_string()),
        }
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Kept verbatim, including a balanced argument list.
    fn parse_pseudo(&mut self) -> Result<SimpleSelector, SelectorError> {
        let start = self.pos;
        let _ = self.bump();
        let _ = self.eat(':');
        let _ = self.name(is_ident_char)?;

        if self.peek() == Some('(') {
            let open = self.pos;
            let mut depth = 0u32;
            loop {
                match self.bump() {
                    Some('(') => depth += 1,
                    Some(')') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    Some(_) => {}
                    None => return Err(self.unterminated('(', open)),
                }
            }
        }

        Ok(SimpleSelector::NeverMatch(
            self.input[start..self.pos].to_string(),
        ))
    }

    fn unterminated(&self, opener: char, position: usize) -> SelectorError {
        SelectorError::Unterminated {
            input: self.input.to_string(),
            position,
            opener,
        }
    }

    fn unexpected_or_unterminated(&self, opener: char, position: usize) -> SelectorError {
        match self.peek() {
            Some(found) => self.unexpected(found),
            None => self.unterminated(opener, position),
        }
    }
}
