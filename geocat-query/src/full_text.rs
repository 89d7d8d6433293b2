// SPDX-License-Identifier: MIT OR Apache-2.0

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::collation::tokenize;

/// Parsed full-text expression.
///
/// Terms are stored normalized and with English plural endings folded, they match every token
/// starting with them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Term(String),
    Not(Box<Expression>),
    And(Vec<Expression>),
    Or(Vec<Expression>),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("full-text expression is empty")]
    Empty,

    #[error("unexpected '{0}' at position {1}")]
    UnexpectedToken(char, usize),

    #[error("unexpected end of full-text expression")]
    UnexpectedEnd,

    #[error("unbalanced parentheses at position {0}")]
    UnbalancedParentheses(usize),

    #[error("term '{0}' contains no searchable characters")]
    EmptyTerm(String),
}

impl Expression {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let tokens = lex(input)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut parser = Parser {
            tokens: tokens.into_iter().peekable(),
        };
        let expression = parser.or()?;

        match parser.tokens.next() {
            None => Ok(expression),
            Some((Token::Close, position)) => Err(ParseError::UnbalancedParentheses(position)),
            Some((token, position)) => Err(ParseError::UnexpectedToken(token.symbol(), position)),
        }
    }

    /// Returns `true` if the tokens satisfy the expression.
    pub fn matches(&self, tokens: &[String]) -> bool {
        match self {
            Expression::Term(term) => tokens.iter().any(|token| token.starts_with(term.as_str())),
            Expression::Not(inner) => !inner.matches(tokens),
            Expression::And(items) => items.iter().all(|item| item.matches(tokens)),
            Expression::Or(items) => items.iter().any(|item| item.matches(tokens)),
        }
    }

    /// Number of tokens hit by non-negated terms, `None` if the expression doesn't match.
    pub fn relevance(&self, tokens: &[String]) -> Option<usize> {
        self.matches(tokens).then(|| self.hits(tokens))
    }

    fn hits(&self, tokens: &[String]) -> usize {
        match self {
            Expression::Term(term) => tokens
                .iter()
                .filter(|token| token.starts_with(term.as_str()))
                .count(),
            Expression::Not(_) => 0,
            Expression::And(items) | Expression::Or(items) => {
                items.iter().map(|item| item.hits(tokens)).sum()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Term(String),
    And,
    Or,
    Not,
    Open,
    Close,
}

impl Token {
    fn symbol(&self) -> char {
        match self {
            Token::Term(term) => term.chars().next().unwrap_or(' '),
            Token::And => '&',
            Token::Or => '|',
            Token::Not => '!',
            Token::Open => '(',
            Token::Close => ')',
        }
    }
}

fn is_operator(c: char) -> bool {
    matches!(c, '&' | '|' | '!' | '(' | ')')
}

fn lex(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<CharIndices> = input.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '&' => Token::And,
            '|' => Token::Or,
            '!' => Token::Not,
            '(' => Token::Open,
            ')' => Token::Close,
            _ => {
                let mut end = position + c.len_utf8();
                while let Some((next_position, next)) = chars.peek().copied() {
                    if next.is_whitespace() || is_operator(next) {
                        break;
                    }
                    end = next_position + next.len_utf8();
                    chars.next();
                }

                let raw = &input[position..end];
                let words = tokenize(raw);
                if words.is_empty() {
                    return Err(ParseError::EmptyTerm(raw.to_string()));
                }

                // Terms like "map-1" are split into words which all have to match.
                let grouped = words.len() > 1;
                if grouped {
                    tokens.push((Token::Open, position));
                }
                for (index, word) in words.iter().enumerate() {
                    if index > 0 {
                        tokens.push((Token::And, position));
                    }
                    tokens.push((Token::Term(fold_plural(word)), position));
                }
                if grouped {
                    tokens.push((Token::Close, position));
                }
                continue;
            }
        };

        tokens.push((token, position));
    }

    Ok(tokens)
}

/// Light English plural folding: "cities" → "city", "boxes" → "box", "games" → "game".
fn fold_plural(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies")
        && !stem.is_empty()
    {
        return format!("{stem}y");
    }

    if let Some(stem) = word.strip_suffix("es")
        && ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|ending| stem.ends_with(ending))
    {
        return stem.to_string();
    }

    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Recursive descent parser, `&` binds tighter than `|`, `!` tighter than both.
struct Parser {
    tokens: Peekable<std::vec::IntoIter<(Token, usize)>>,
}

impl Parser {
    fn or(&mut self) -> Result<Expression, ParseError> {
        let mut items = vec![self.and()?];

        while let Some((Token::Or, _)) = self.tokens.peek() {
            self.tokens.next();
            items.push(self.and()?);
        }

        Ok(flatten(items, Expression::Or))
    }

    fn and(&mut self) -> Result<Expression, ParseError> {
        let mut items = vec![self.unary()?];

        loop {
            match self.tokens.peek() {
                Some((Token::And, _)) => {
                    self.tokens.next();
                    items.push(self.unary()?);
                }
                // Juxtaposition.
                Some((Token::Term(_) | Token::Not | Token::Open, _)) => {
                    items.push(self.unary()?);
                }
                _ => break,
            }
        }

        Ok(flatten(items, Expression::And))
    }

    fn unary(&mut self) -> Result<Expression, ParseError> {
        match self.tokens.next() {
            Some((Token::Not, _)) => Ok(Expression::Not(Box::new(self.unary()?))),
            Some((Token::Term(term), _)) => Ok(Expression::Term(term)),
            Some((Token::Open, position)) => {
                let inner = self.or()?;
                match self.tokens.next() {
                    Some((Token::Close, _)) => Ok(inner),
                    None => Err(ParseError::UnbalancedParentheses(position)),
                    Some((token, position)) => {
                        Err(ParseError::UnexpectedToken(token.symbol(), position))
                    }
                }
            }
            Some((Token::Close, position)) => Err(ParseError::UnbalancedParentheses(position)),
            Some((token, position)) => Err(ParseError::UnexpectedToken(token.symbol(), position)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

fn flatten(mut items: Vec<Expression>, combine: fn(Vec<Expression>) -> Expression) -> Expression {
    if items.len() == 1 {
        items.remove(0)
    } else {
        combine(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::collation::tokenize;

    use super::{Expression, ParseError, fold_plural};

    fn term(value: &str) -> Expression {
        Expression::Term(value.to_string())
    }

    #[test]
    fn precedence() {
        assert_eq!(
            Expression::parse("a | b & c").unwrap(),
            Expression::Or(vec![term("a"), Expression::And(vec![term("b"), term("c")])])
        );
        assert_eq!(
            Expression::parse("(a | b) & !c").unwrap(),
            Expression::And(vec![
                Expression::Or(vec![term("a"), term("b")]),
                Expression::Not(Box::new(term("c"))),
            ])
        );
    }

    #[test]
    fn implicit_and() {
        assert_eq!(
            Expression::parse("kun ody").unwrap(),
            Expression::parse("kun & ody").unwrap()
        );
        assert_eq!(
            Expression::parse("Kůň-úpěl").unwrap(),
            Expression::And(vec![term("kun"), term("upel")])
        );
    }

    #[test]
    fn normalize_terms() {
        assert_eq!(Expression::parse("ŽLUŤOUČKÝ").unwrap(), term("zlutoucky"));
        assert_eq!(Expression::parse("games").unwrap(), term("game"));
    }

    #[test]
    fn invalid_expressions() {
        assert_eq!(Expression::parse(""), Err(ParseError::Empty));
        assert_eq!(Expression::parse("   "), Err(ParseError::Empty));
        assert_eq!(Expression::parse("a |"), Err(ParseError::UnexpectedEnd));
        assert_eq!(Expression::parse("& a"), Err(ParseError::UnexpectedToken('&', 0)));
        assert_eq!(Expression::parse("a | | b"), Err(ParseError::UnexpectedToken('|', 4)));
        assert_eq!(
            Expression::parse("(a | b"),
            Err(ParseError::UnbalancedParentheses(0))
        );
        assert_eq!(
            Expression::parse("a | b)"),
            Err(ParseError::UnbalancedParentheses(5))
        );
        assert_eq!(Expression::parse("()"), Err(ParseError::UnbalancedParentheses(1)));
        assert_eq!(
            Expression::parse("a & --"),
            Err(ParseError::EmptyTerm("--".into()))
        );
    }

    #[test]
    fn prefix_matching() {
        let tokens = tokenize("Příliš žluťoučký Kůň úpěl ďábelské ódy");

        assert!(Expression::parse("kun").unwrap().matches(&tokens));
        assert!(Expression::parse("zlut").unwrap().matches(&tokens));
        assert!(Expression::parse("kun & ody").unwrap().matches(&tokens));
        assert!(!Expression::parse("upet").unwrap().matches(&tokens));
        assert!(!Expression::parse("kun & !ody").unwrap().matches(&tokens));
        assert!(Expression::parse("dva | kun").unwrap().matches(&tokens));
    }

    #[test]
    fn relevance_counts_hits() {
        let tokens = tokenize("Ďůlek kun Karel");

        assert_eq!(
            Expression::parse("karel | kun").unwrap().relevance(&tokens),
            Some(2)
        );
        assert_eq!(Expression::parse("k").unwrap().relevance(&tokens), Some(2));
        assert_eq!(Expression::parse("!dva").unwrap().relevance(&tokens), Some(0));
        assert_eq!(Expression::parse("dva").unwrap().relevance(&tokens), None);
    }

    #[test]
    fn plural_folding() {
        assert_eq!(fold_plural("games"), "game");
        assert_eq!(fold_plural("boxes"), "box");
        assert_eq!(fold_plural("cities"), "city");
        assert_eq!(fold_plural("class"), "class");
        assert_eq!(fold_plural("kus"), "kus");
        assert_eq!(fold_plural("jedna"), "jedna");
    }
}
