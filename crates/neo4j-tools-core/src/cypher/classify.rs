use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Coarse classification of a Cypher statement by the clauses it contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Read,
    Write,
    /// Index and constraint management
    Schema,
}

const WRITE_KEYWORDS: [&str; 7] = ["CREATE", "MERGE", "DELETE", "SET", "REMOVE", "DROP", "FOREACH"];
const SCHEMA_OBJECTS: [&str; 2] = ["INDEX", "CONSTRAINT"];

impl StatementKind {
    /// Classify by keyword scan. String literals, quoted identifiers and
    /// comments are ignored so `{name: 'CREATE'}` stays a read.
    pub fn classify(statement: &str) -> Self {
        let words = keywords(statement);

        let is_schema = words.windows(2).any(|pair| {
            matches!(pair[0].as_str(), "CREATE" | "DROP")
                && SCHEMA_OBJECTS.contains(&pair[1].as_str())
        }) || words.windows(3).any(|w| {
            matches!(w[0].as_str(), "CREATE" | "DROP")
                && matches!(
                    w[1].as_str(),
                    "RANGE" | "TEXT" | "POINT" | "LOOKUP" | "FULLTEXT" | "VECTOR" | "BTREE"
                )
                && w[2] == "INDEX"
        });
        if is_schema {
            return Self::Schema;
        }

        let load_csv = words.windows(2).any(|pair| pair[0] == "LOAD" && pair[1] == "CSV");
        if load_csv || words.iter().any(|w| WRITE_KEYWORDS.contains(&w.as_str())) {
            Self::Write
        } else {
            Self::Read
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Schema => "schema",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bare word with the significant characters on either side of it
#[derive(Debug)]
struct Word {
    text: String,
    prev: Option<char>,
    next: Option<char>,
}

/// Words that can follow a variable reference but never start an expression
const AFTER_REFERENCE: [&str; 6] = ["AS", "ORDER", "SKIP", "LIMIT", "UNION", "RETURN"];

/// Upper-cased words that act as clause keywords.
///
/// Property keys, labels and relationship types (next to `.` or `:`) are not
/// keywords, and neither is a keyword-named variable used as a plain reference.
fn keywords(statement: &str) -> Vec<String> {
    let words = scan(statement);

    let variables: HashSet<&str> = words
        .iter()
        .filter(|w| !matches!(w.prev, Some('.' | ':')))
        .filter(|w| {
            matches!(w.next, Some('.' | ':'))
                || (w.prev == Some('(') && matches!(w.next, Some(')' | '{')))
        })
        .map(|w| w.text.as_str())
        .collect();

    words
        .iter()
        .enumerate()
        .filter(|(i, w)| {
            if matches!(w.prev, Some('.' | ':')) || matches!(w.next, Some('.' | ':')) {
                return false;
            }
            if !variables.contains(w.text.as_str()) {
                return true;
            }
            let starts_expression = w
                .next
                .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '(' | '$' | '`'));
            let followed_by_reference_word = words
                .get(i + 1)
                .is_some_and(|n| AFTER_REFERENCE.contains(&n.text.as_str()));
            starts_expression && !followed_by_reference_word
        })
        .map(|(_, w)| w.text.clone())
        .collect()
}

#[derive(Default)]
struct Scanner {
    words: Vec<Word>,
    current: String,
    start_prev: Option<char>,
    last: Option<char>,
    awaiting_next: bool,
}

impl Scanner {
    fn significant(&mut self, c: char) {
        if self.awaiting_next {
            if let Some(word) = self.words.last_mut() {
                word.next = Some(c);
            }
            self.awaiting_next = false;
        }
        self.last = Some(c);
    }

    fn word_char(&mut self, c: char) {
        if self.current.is_empty() {
            self.start_prev = self.last;
            self.significant(c);
        }
        self.current.push(c);
        self.last = Some(c);
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        // `$param` names are not keywords
        if !self.current.starts_with('$') {
            self.words.push(Word {
                text: self.current.to_ascii_uppercase(),
                prev: self.start_prev,
                next: None,
            });
            self.awaiting_next = true;
        }
        self.current.clear();
    }
}

/// Bare words outside literals and comments
fn scan(statement: &str) -> Vec<Word> {
    let mut scanner = Scanner::default();
    let mut chars = statement.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                scanner.flush();
                scanner.significant(c);
                let quote = c;
                while let Some(inner) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == quote {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                scanner.flush();
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                scanner.flush();
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            c if c.is_alphanumeric() || c == '_' || c == '$' => scanner.word_char(c),
            c if c.is_whitespace() => scanner.flush(),
            _ => {
                scanner.flush();
                scanner.significant(c);
            }
        }
    }
    scanner.flush();
    scanner.words
}
