//! Splits an input line into a keyword and its argument tokens.
//!
//! Tokenizing follows POSIX shell-word rules (`'`/`"` quoting, `\` escapes,
//! `#` comments) through the `shell-words` crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("no closing quotation")]
    UnterminatedQuote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub keyword: String,
    pub tokens: Vec<String>,
    /// The line after the keyword and one separator, quoting and spacing intact
    pub remainder: String,
}

/// Parses one line of input.
///
/// Returns `Ok(None)` for a line with nothing to run: empty, whitespace only,
/// or only a comment.
pub fn parse_line(line: &str) -> Result<Option<ParsedLine>, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut words = shell_words::split(line)
        .map_err(|_| LineError::UnterminatedQuote)?
        .into_iter();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };

    Ok(Some(ParsedLine {
        keyword,
        tokens: words.collect(),
        remainder: split_first_word(line).1.to_string(),
    }))
}

/// Splits at the first unquoted whitespace character, dropping that character.
fn split_first_word(line: &str) -> (&str, &str) {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                }
            }
            Some(_) => match c {
                '\\' => escaped = true,
                '"' => quote = None,
                _ => {}
            },
            None => match c {
                '\\' => escaped = true,
                '\'' | '"' => quote = Some(c),
                c if c.is_whitespace() => return (&line[..i], &line[i + c.len_utf8()..]),
                _ => {}
            },
        }
    }
    (line, "")
}
