//! Splitting of a raw browser command line into arguments.
//!
//! The input is usually copied from a diagnostics page, so the rules are a
//! small subset of POSIX shell word splitting:
//!
//! | Syntax | Behavior |
//! |--------|----------|
//! | `foo bar` | Unquoted, split on spaces, tabs and newlines |
//! | `foo\ bar` | Backslash makes the next character literal |
//! | `'foo bar'` | Single-quoted, literal (no escapes) |
//! | `"foo bar"` | Double-quoted, `\` escapes only `$`, `` ` ``, `"` and `\` |
//!
//! A backslash followed by a newline is a line continuation in both unquoted
//! and double-quoted text. Carriage returns are ignored everywhere.
//!
//! There is no variable expansion, globbing or command substitution. Input
//! that ends inside a quote or after a backslash is not an error: whatever
//! was accumulated becomes the final argument.
//!
//! # Examples
//!
//! ```ignore
//! use variations_lib::command_line::tokenize;
//!
//! let args = tokenize(r#"chrome --flag="a b" 'c d'"#);
//! assert_eq!(args, ["chrome", "--flag=a b", "c d"]);
//! ```

use std::{
  iter::FusedIterator,
  mem,
  str::Chars,
};

/// The scanning state of the [`Tokenizer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
  /// Outside of any quotes.
  #[default]
  Unquoted,
  /// Directly after a `\` outside of quotes.
  UnquotedBackslash,
  /// Inside `'...'`.
  SingleQuoted,
  /// Inside `"..."`.
  DoubleQuoted,
  /// Directly after a `\` inside `"..."`.
  DoubleQuotedBackslash,
}

/// A lazy iterator over the arguments of a command line.
///
/// Arguments are yielded as soon as the whitespace that ends them is seen.
/// Empty arguments are never yielded, so `''` or `""` on their own produce
/// nothing.
#[derive(Debug)]
pub struct Tokenizer<'a> {
  chars: Chars<'a>,
  state: State,
  /// The argument currently being accumulated.
  arg:   String,
}

impl<'a> Tokenizer<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      chars: input.chars(),
      state: State::Unquoted,
      arg:   String::new(),
    }
  }

  /// The state the scan is in after the characters consumed so far.
  pub fn state(&self) -> State {
    self.state
  }

  /// Whether every quote and escape opened so far has been closed.
  ///
  /// Only meaningful once the iterator is exhausted: `false` then means the
  /// final argument was cut off by the end of the input.
  pub fn is_terminated(&self) -> bool {
    self.state == State::Unquoted
  }

  fn flush(&mut self) -> Option<String> {
    if self.arg.is_empty() {
      None
    } else {
      Some(mem::take(&mut self.arg))
    }
  }

  /// Feeds a single character through the state machine. Returns a finished
  /// argument when the character ends one.
  fn step(&mut self, ch: char) -> Option<String> {
    match self.state {
      State::Unquoted => {
        match ch {
          ' ' | '\t' | '\n' => return self.flush(),
          '\\' => self.state = State::UnquotedBackslash,
          '\'' => self.state = State::SingleQuoted,
          '"' => self.state = State::DoubleQuoted,
          _ => self.arg.push(ch),
        }
      },
      State::UnquotedBackslash => {
        if ch != '\n' {
          self.arg.push(ch);
        }
        self.state = State::Unquoted;
      },
      State::SingleQuoted => {
        match ch {
          '\'' => self.state = State::Unquoted,
          _ => self.arg.push(ch),
        }
      },
      State::DoubleQuoted => {
        match ch {
          '\\' => self.state = State::DoubleQuotedBackslash,
          '"' => self.state = State::Unquoted,
          _ => self.arg.push(ch),
        }
      },
      State::DoubleQuotedBackslash => {
        match ch {
          '$' | '`' | '"' | '\\' => self.arg.push(ch),
          // Line continuation.
          '\n' => {},
          _ => {
            self.arg.push('\\');
            self.arg.push(ch);
          },
        }
        self.state = State::DoubleQuoted;
      },
    }
    None
  }
}

impl Iterator for Tokenizer<'_> {
  type Item = String;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(ch) = self.chars.next() {
      if ch == '\r' {
        continue;
      }
      if let Some(arg) = self.step(ch) {
        return Some(arg);
      }
    }

    if !self.is_terminated() {
      log::trace!("command line ended in state {:?}", self.state);
    }
    self.flush()
  }
}

impl FusedIterator for Tokenizer<'_> {}

/// Splits `input` into its arguments.
pub fn tokenize(input: &str) -> Vec<String> {
  Tokenizer::new(input).collect()
}
