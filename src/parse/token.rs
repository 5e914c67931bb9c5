use logos::{Lexer, Logos};
use strum::{AsRefStr, Display};
use thiserror::Error;

/// Required by logos. The word pattern accepts any byte the skip pattern
/// does not, so no input currently produces one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub enum LexerError {
    #[default]
    #[error("unknown token")]
    UnknownToken,
}

/// The operators that select a line's execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Operator {
    #[strum(serialize = "&&")]
    Concurrent,
    #[strum(serialize = "##")]
    Sequential,
    #[strum(serialize = ">")]
    Redirect,
    #[strum(serialize = "|")]
    Pipe,
}

/// A whitespace-delimited token.
///
/// Operators are only recognized when they make up the whole token, so
/// `a&&b` or `>out` lex as plain words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos)]
#[logos(skip r"[ \t\r\n\f]+", error = LexerError)]
pub enum Token<'a> {
    #[token("&&")]
    Concurrent,
    #[token("##")]
    Sequential,
    #[token(">")]
    Redirect,
    #[token("|")]
    Pipe,

    #[regex(r"[^ \t\r\n\f]+", word_callback)]
    Word(&'a str),
}

fn word_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> &'a str {
    lex.slice()
}

impl<'a> Token<'a> {
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Self::Concurrent => Some(Operator::Concurrent),
            Self::Sequential => Some(Operator::Sequential),
            Self::Redirect => Some(Operator::Redirect),
            Self::Pipe => Some(Operator::Pipe),
            Self::Word(_) => None,
        }
    }

    /// The literal text of the token, used when an operator that did not
    /// select the mode ends up as a plain argument.
    pub fn text(&self) -> &'a str {
        match self {
            Self::Word(word) => word,
            Self::Concurrent => "&&",
            Self::Sequential => "##",
            Self::Redirect => ">",
            Self::Pipe => "|",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lex(s: &str) -> Vec<Token<'_>> {
        Token::lexer(s).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn operators_only_match_whole_tokens() {
        assert_eq!(
            lex("a&&b && >out > x|y |"),
            vec![
                Token::Word("a&&b"),
                Token::Concurrent,
                Token::Word(">out"),
                Token::Redirect,
                Token::Word("x|y"),
                Token::Pipe,
            ]
        );
    }

    #[test]
    fn skips_mixed_whitespace() {
        assert_eq!(
            lex("  ls\t-la \r\n"),
            vec![Token::Word("ls"), Token::Word("-la")]
        );
    }

    #[test]
    fn text_matches_operator_display() {
        for token in [
            Token::Concurrent,
            Token::Sequential,
            Token::Redirect,
            Token::Pipe,
        ] {
            let op = token.operator().unwrap();
            assert_eq!(token.text(), op.to_string());
            assert_eq!(token.text(), op.as_ref());
        }
    }

    #[test]
    fn any_non_whitespace_lexes_as_a_word() {
        let line = "\u{1} \u{7f}x \u{fffd}\u{fffd} ü\u{0} &&& #";

        assert!(Token::lexer(line).all(|token| token.is_ok()));
        assert_eq!(Token::lexer(line).count(), 6);
    }
}
