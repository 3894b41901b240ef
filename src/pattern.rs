//! Shell-style wildcard patterns for selecting simulation runs
//!
//! Run selection relies on glob patterns such as `run_*` or `sweep/v[0-9]*`.
//! Rather than depend on whatever the host platform thinks a glob means, the
//! matching rules are defined here explicitly:
//!
//! | Token     | Matches                                          |
//! | --------- | ------------------------------------------------ |
//! | `*`       | Any run of characters, including none            |
//! | `?`       | Exactly one character                            |
//! | `[abc]`   | One character from the set                       |
//! | `[a-z]`   | One character in the range                       |
//! | `[!a-z]`  | One character not in the set (`^` also accepted) |
//! | otherwise | The literal character                            |
//!
//! Patterns are applied one path component at a time, so `*` never crosses a
//! `/` separator. Matches are returned sorted for reproducible ordering.
//!
//! ```rust
//! # use eprem_plots::pattern::Pattern;
//! let pattern = Pattern::new("obs[0-9][0-9][0-9][0-9][0-9][0-9].json").unwrap();
//! assert!(pattern.matches("obs000012.json"));
//! assert!(!pattern.matches("obs12.json"));
//! ```

// standard library
use std::fs;
use std::path::{Path, PathBuf};

// external crates
use anyhow::{anyhow, Result};
use log::{trace, warn};

// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{anychar, char, none_of, one_of};
use nom::combinator::{all_consuming, map, opt, value, verify};
use nom::multi::{many0, many1};
use nom::sequence::{delimited, pair, preceded, separated_pair};
use nom::IResult;

/// A single element of a wildcard pattern
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// `*`
    AnyString,
    /// `?`
    AnyChar,
    /// `[...]` or `[!...]`
    Class {
        negated: bool,
        ranges: Vec<(char, char)>,
    },
    /// Anything else
    Literal(char),
}

impl Token {
    fn matches_char(&self, c: char) -> bool {
        match self {
            Token::AnyString | Token::AnyChar => true,
            Token::Literal(l) => *l == c,
            Token::Class { negated, ranges } => {
                let found = ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c));
                found != *negated
            }
        }
    }
}

/// A compiled wildcard pattern, split into path components
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// Start from the filesystem root rather than the base directory
    absolute: bool,
    /// Tokens for each `/` separated component
    components: Vec<Vec<Token>>,
}

impl Pattern {
    /// Compile a pattern, failing on malformed input such as an unclosed `[`
    pub fn new(pattern: &str) -> Result<Self> {
        let components = pattern
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| {
                all_consuming(tokens)(c)
                    .map(|(_, t)| t)
                    .map_err(|_| anyhow!("Malformed glob component \"{c}\" in \"{pattern}\""))
            })
            .collect::<Result<Vec<Vec<Token>>>>()?;

        Ok(Self {
            absolute: pattern.starts_with('/'),
            components,
        })
    }

    /// Check a single file name against a single-component pattern
    ///
    /// Multi-component patterns never match a bare name.
    pub fn matches(&self, name: &str) -> bool {
        match self.components.as_slice() {
            [tokens] => match_tokens(tokens, &name.chars().collect::<Vec<char>>()),
            _ => false,
        }
    }

    /// Collect every existing path under `base` matched by the pattern
    ///
    /// Components without wildcards are joined directly and kept only if they
    /// exist. Unreadable directories simply contribute no matches.
    pub fn glob(&self, base: &Path) -> Vec<PathBuf> {
        let mut current = match self.absolute {
            true => vec![PathBuf::from("/")],
            false => vec![base.to_path_buf()],
        };

        let n_components = self.components.len();
        for (i, tokens) in self.components.iter().enumerate() {
            let is_last = i + 1 == n_components;
            let mut next = Vec::new();

            for dir in &current {
                match literal_text(tokens) {
                    Some(name) => {
                        let candidate = dir.join(name);
                        if candidate.exists() && (is_last || candidate.is_dir()) {
                            next.push(candidate);
                        }
                    }
                    None => next.extend(matching_entries(dir, tokens, is_last)),
                }
            }

            current = next;
        }

        current.sort();
        trace!("Glob matched {} paths", current.len());
        current
    }
}

/// Glob `pattern` relative to `base`
///
/// Malformed patterns produce an empty list rather than an error, mirroring
/// how a shell treats a pattern that matches nothing.
pub fn glob<P: AsRef<Path>>(base: P, pattern: &str) -> Vec<PathBuf> {
    match Pattern::new(pattern) {
        Ok(p) => p.glob(base.as_ref()),
        Err(e) => {
            warn!("{e}");
            Vec::new()
        }
    }
}

/// Entries of `dir` whose file names match the tokens
fn matching_entries(dir: &Path, tokens: &[Token], is_last: bool) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_last || path.is_dir())
        .filter(|path| match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => match_tokens(tokens, &name.chars().collect::<Vec<char>>()),
            None => false,
        })
        .collect()
}

/// The component as a plain string if it contains no wildcards
fn literal_text(tokens: &[Token]) -> Option<String> {
    tokens
        .iter()
        .map(|t| match t {
            Token::Literal(c) => Some(*c),
            _ => None,
        })
        .collect()
}

/// Backtracking match of tokens against characters
fn match_tokens(tokens: &[Token], name: &[char]) -> bool {
    match tokens.split_first() {
        None => name.is_empty(),
        Some((Token::AnyString, rest)) => (0..=name.len()).any(|i| match_tokens(rest, &name[i..])),
        Some((token, rest)) => match name.split_first() {
            Some((c, tail)) => token.matches_char(*c) && match_tokens(rest, tail),
            None => false,
        },
    }
}

// ! Parser combinators

/// Sequence of tokens making up one path component
fn tokens(i: &str) -> IResult<&str, Vec<Token>> {
    many0(alt((
        value(Token::AnyString, char('*')),
        value(Token::AnyChar, char('?')),
        class,
        map(none_of("*?[]"), Token::Literal),
    )))(i)
}

/// Bracketed character class, e.g. `[!a-z_]`
fn class(i: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('['),
            pair(opt(one_of("!^")), many1(class_range)),
            char(']'),
        ),
        |(negated, ranges)| Token::Class {
            negated: negated.is_some(),
            ranges,
        },
    )(i)
}

/// Either `a-z` or a single character treated as `a-a`
fn class_range(i: &str) -> IResult<&str, (char, char)> {
    alt((
        verify(
            separated_pair(class_char, char('-'), class_char),
            |(lo, hi)| lo <= hi,
        ),
        map(class_char, |c| (c, c)),
    ))(i)
}

/// Any character allowed inside a class
fn class_char(i: &str) -> IResult<&str, char> {
    preceded(opt(char('\\')), verify(anychar, |c| *c != ']'))(i)
}
