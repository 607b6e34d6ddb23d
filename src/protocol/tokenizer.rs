//! Whitespace tokenizer for protocol lines.
//!
//! [`split`] cuts a line into at most `max_parts` whitespace-delimited parts.
//! Part 0 is the first token (the verb of a protocol line) and the last part
//! carries the unsplit remainder of the text, so `split("msg alice hi there", 2)`
//! yields `["msg", "alice hi there"]`.

use crate::error::ParseError;

/// The ordered parts of one tokenized piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    source: &'a str,
    parts: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// The first token. Always present, since empty input is rejected by [`split`].
    pub fn verb(&self) -> &'a str {
        self.parts[0]
    }

    /// The part at `index`, or [`ParseError::MissingPart`] when the text
    /// had fewer parts.
    pub fn part(&self, index: usize) -> Result<&'a str, ParseError> {
        self.parts
            .get(index)
            .copied()
            .ok_or_else(|| ParseError::MissingPart {
                index,
                context: self.source.to_string(),
            })
    }

    /// Everything after the verb, or [`ParseError::MissingPart`] if the text
    /// was a bare verb.
    pub fn rest(&self) -> Result<&'a str, ParseError> {
        self.part(1)
    }

    pub fn parts(&self) -> &[&'a str] {
        &self.parts
    }
}

/// Split `text` into at most `max_parts` parts. A `max_parts` of 0 means no limit.
///
/// Leading and trailing whitespace is ignored; whitespace inside the final
/// remainder part is preserved.
pub fn split(text: &str, max_parts: usize) -> Result<Tokens<'_>, ParseError> {
    let mut parts = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        if max_parts != 0 && parts.len() + 1 == max_parts {
            parts.push(rest);
            break;
        }
        match rest.split_once(char::is_whitespace) {
            Some((head, tail)) => {
                parts.push(head);
                rest = tail.trim_start();
            }
            None => {
                parts.push(rest);
                break;
            }
        }
    }

    if parts.is_empty() {
        return Err(ParseError::EmptyLine);
    }
    Ok(Tokens {
        source: text.trim(),
        parts,
    })
}

/// Split a space-separated list into owned tokens.
pub fn split_all(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_and_remainder() {
        let tokens = split("loginerr bad   credentials", 2).unwrap();
        assert_eq!(tokens.verb(), "loginerr");
        assert_eq!(tokens.rest(), Ok("bad   credentials"));
        assert_eq!(tokens.parts().len(), 2);
    }

    #[test]
    fn bare_verb_has_no_rest() {
        let tokens = split("loginok", 2).unwrap();
        assert_eq!(tokens.verb(), "loginok");
        assert_eq!(
            tokens.rest(),
            Err(ParseError::MissingPart {
                index: 1,
                context: "loginok".into()
            })
        );
    }

    #[test]
    fn leading_whitespace_is_not_a_part() {
        let tokens = split("  users alice bob\r\n", 2).unwrap();
        assert_eq!(tokens.parts(), &["users", "alice bob"]);
    }

    #[test]
    fn unlimited_split() {
        let tokens = split("a b\tc  d", 0).unwrap();
        assert_eq!(tokens.parts(), &["a", "b", "c", "d"]);
    }

    #[test]
    fn limit_of_one_keeps_whole_text() {
        let tokens = split("msg hello world", 1).unwrap();
        assert_eq!(tokens.parts(), &["msg hello world"]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(split("", 2), Err(ParseError::EmptyLine));
        assert_eq!(split(" \t ", 2), Err(ParseError::EmptyLine));
    }

    #[test]
    fn split_all_drops_extra_whitespace() {
        assert_eq!(split_all(" alice  bob\tcarol "), vec!["alice", "bob", "carol"]);
        assert!(split_all("").is_empty());
    }
}
