//! Shell-word tokenizer for partially typed command lines
//!
//! This tokenizer follows POSIX shell word-splitting rules closely enough to
//! recover the words a shell would hand to a program, but it is designed to be
//! used while the user is still typing:
//!
//! - **Never fails** - an unterminated quote or a trailing backslash ends the
//!   scan and the word in progress becomes the last token
//! - **No comments** - `#` is an ordinary character
//! - **Quotes** - single quotes are fully literal, double quotes only treat
//!   `\"` and `\\` as escapes, a backslash outside quotes escapes any character

/// Lexer state
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// Between words
    Blank,
    /// Inside an unquoted word
    Word,
    /// Inside a quoted section
    Quoted(char),
    /// Just read a backslash; holds the state to return to
    Escaped(Resume),
}

/// Where an escape sequence resumes
#[derive(Debug, Clone, Copy, PartialEq)]
enum Resume {
    Word,
    DoubleQuoted,
}

/// Result of a full scan
#[derive(Debug, Default)]
struct Scan {
    /// Completed words
    tokens: Vec<String>,
    /// Word in progress when the input ended inside a quote or after a backslash
    unterminated: Option<String>,
}

/// Character-level lexer over one command line
struct Lexer {
    input: Vec<char>,
    pos: usize,
    state: State,
    token: String,
    quoted: bool,
}

impl Lexer {
    /// Create a new lexer from input string
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            state: State::Blank,
            token: String::new(),
            quoted: false,
        }
    }

    /// Scan the whole input
    fn scan(mut self) -> Scan {
        let mut scan = Scan::default();

        while self.pos < self.input.len() {
            let ch = self.input[self.pos];
            self.pos += 1;
            if let Some(word) = self.step(ch) {
                scan.tokens.push(word);
            }
        }

        match self.state {
            State::Blank => {}
            State::Word => scan.tokens.push(self.token),
            State::Quoted(_) | State::Escaped(_) => scan.unterminated = Some(self.token),
        }

        scan
    }

    /// Feed one character, returning a word when it completes one
    fn step(&mut self, ch: char) -> Option<String> {
        match self.state {
            State::Blank => {
                if is_blank(ch) {
                    return None;
                }
                self.quoted = false;
                match ch {
                    '\\' => self.state = State::Escaped(Resume::Word),
                    '\'' | '"' => {
                        self.quoted = true;
                        self.state = State::Quoted(ch);
                    }
                    _ => {
                        self.token.push(ch);
                        self.state = State::Word;
                    }
                }
                None
            }
            State::Word => {
                match ch {
                    c if is_blank(c) => {
                        self.state = State::Blank;
                        return self.take_word();
                    }
                    '\\' => self.state = State::Escaped(Resume::Word),
                    '\'' | '"' => {
                        self.quoted = true;
                        self.state = State::Quoted(ch);
                    }
                    _ => self.token.push(ch),
                }
                None
            }
            State::Quoted(quote) => {
                if ch == quote {
                    self.state = State::Word;
                } else if quote == '"' && ch == '\\' {
                    self.state = State::Escaped(Resume::DoubleQuoted);
                } else {
                    self.token.push(ch);
                }
                None
            }
            State::Escaped(resume) => {
                // Inside double quotes only `\"` and `\\` are escapes
                if resume == Resume::DoubleQuoted && ch != '"' && ch != '\\' {
                    self.token.push('\\');
                }
                self.token.push(ch);
                self.state = match resume {
                    Resume::Word => State::Word,
                    Resume::DoubleQuoted => State::Quoted('"'),
                };
                None
            }
        }
    }

    /// Finish the current word
    fn take_word(&mut self) -> Option<String> {
        let word = std::mem::take(&mut self.token);
        if word.is_empty() && !self.quoted {
            None
        } else {
            Some(word)
        }
    }
}

/// Word separators recognized by the shell lexer
pub(crate) fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Split a command line into words, accepting unterminated input.
///
/// When the line ends inside a quote or right after a backslash, the partially
/// accumulated word is kept as the last token (unless it is empty).
///
/// ```
/// use shellcomp::tokenizer::split_args;
///
/// assert_eq!(split_args(r#"foo "bar"#), vec!["foo", "bar"]);
/// assert!(split_args("   ").is_empty());
/// ```
pub fn split_args(line: &str) -> Vec<String> {
    let scan = Lexer::new(line).scan();
    let mut tokens = scan.tokens;
    if let Some(partial) = scan.unterminated {
        tracing::trace!(partial = %partial, "salvaged unterminated word");
        if !partial.is_empty() {
            tokens.push(partial);
        }
    }
    tokens
}

/// Split a command line into words, rejecting unterminated input.
///
/// # Returns
/// * `Option<Vec<String>>` - The words, or `None` when a quote is left open or
///   the line ends with a lone backslash
pub fn split_strict(line: &str) -> Option<Vec<String>> {
    let scan = Lexer::new(line).scan();
    match scan.unterminated {
        Some(_) => None,
        None => Some(scan.tokens),
    }
}

/// Decode a list of shell-quoted words.
///
/// Each string is tokenized on its own and replaced by its first word, or by
/// the empty string when it holds none.
pub fn decode_args<I, S>(strings: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strings
        .into_iter()
        .map(|s| split_args(s.as_ref()).into_iter().next().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        assert!(split_args("").is_empty());
        assert!(split_args(" \t ").is_empty());
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(split_args("prog add --file x"), vec!["prog", "add", "--file", "x"]);
        assert_eq!(split_args("  a\tb\n c  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quotes() {
        assert_eq!(split_args("'a b' \"c d\""), vec!["a b", "c d"]);
        assert_eq!(split_args("pre'fix'\"ed\"post"), vec!["prefixedpost"]);
        assert_eq!(split_args("'' x"), vec!["", "x"]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(split_args(r"a\ b c"), vec!["a b", "c"]);
        assert_eq!(split_args(r#""a\"b""#), vec![r#"a"b"#]);
        assert_eq!(split_args(r#""a\nb""#), vec![r"a\nb"]);
        assert_eq!(split_args(r"'a\b'"), vec![r"a\b"]);
    }

    #[test]
    fn test_comment_char_is_literal() {
        assert_eq!(split_args("a #b"), vec!["a", "#b"]);
    }

    #[test]
    fn test_unterminated_quote_salvages_partial() {
        assert_eq!(split_args(r#"foo "bar"#), vec!["foo", "bar"]);
        assert_eq!(split_args("foo 'bar baz"), vec!["foo", "bar baz"]);
        assert_eq!(split_args(r#"foo "bar\"#), vec!["foo", "bar"]);
    }

    #[test]
    fn test_unterminated_empty_quote_dropped() {
        assert_eq!(split_args("foo \""), vec!["foo"]);
        assert_eq!(split_args("\""), Vec::<String>::new());
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(split_args(r"foo\"), vec!["foo"]);
        assert_eq!(split_strict(r"foo\"), None);
    }

    #[test]
    fn test_split_strict() {
        assert_eq!(
            split_strict("a 'b c'"),
            Some(vec!["a".to_string(), "b c".to_string()])
        );
        assert_eq!(split_strict("a 'b c"), None);
        assert_eq!(split_strict(""), Some(vec![]));
    }

    #[test]
    fn test_decode_args() {
        assert_eq!(
            decode_args(["'a b'", "", "c d", "\"e"]),
            vec!["a b", "", "c", "e"]
        );
    }

    proptest! {
        #[test]
        fn prop_balanced_matches_shell_split(s in r#"([a-z\- ]|\\[a-z]|'[a-z ]*'|"[a-z ]*")*"#) {
            let expected = shlex::split(&s);
            prop_assert!(expected.is_some());
            prop_assert_eq!(Some(split_args(&s)), expected.clone());
            prop_assert_eq!(split_strict(&s), expected);
        }

        #[test]
        fn prop_unterminated_quote_never_fails(
            words in "[a-z ]{0,12}",
            partial in "[a-z][a-z ]{0,8}",
            quote in prop::sample::select(vec!['\'', '"']),
        ) {
            let line = format!("{words} {quote}{partial}");
            let tokens = split_args(&line);
            prop_assert_eq!(tokens.last().map(String::as_str), Some(partial.as_str()));
            prop_assert_eq!(split_strict(&line), None);
        }
    }
}
