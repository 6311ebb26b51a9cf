//! Splits raw template text into sentences: runs of literal text and the
//! inner text of command tags, each with its source position.

use log::trace;

use crate::error::SyntaxError;

/// A maximal run of either literal text or command-tag text.
///
/// `line` and `column` are 1-based and point at the first character of
/// `text`, with delimiters and line terminators of earlier sentences fully
/// consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub is_command: bool,
    pub line: usize,
    pub column: usize,
}

impl Sentence {
    pub fn new(text: impl Into<String>, is_command: bool, line: usize, column: usize) -> Self {
        Self {
            text: text.into(),
            is_command,
            line,
            column,
        }
    }
}

impl std::fmt::Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}:{}] {}", self.line, self.column, self.text)
    }
}

/// Single forward pass over a template, yielding sentences lazily.
///
/// The first error ends the sequence.
#[derive(Clone)]
pub struct SentenceScanner<'a> {
    input: &'a str,
    begin_tag: &'a str,
    end_tag: &'a str,
    cursor: usize,
    line: usize,
    column: usize,
    in_command: bool,
    command_line: usize,
    failed: bool,
}

impl<'a> SentenceScanner<'a> {
    pub fn new(input: &'a str, begin_tag: &'a str, end_tag: &'a str) -> Self {
        Self {
            input,
            begin_tag,
            end_tag,
            cursor: 0,
            line: 1,
            column: 1,
            in_command: false,
            command_line: 1,
            failed: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn advance(&mut self, n: usize) {
        for c in self.input[self.cursor..self.cursor + n].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.cursor += n;
    }

    fn fail(&mut self, error: SyntaxError) -> Option<Result<Sentence, SyntaxError>> {
        self.failed = true;
        Some(Err(error))
    }
}

impl Iterator for SentenceScanner<'_> {
    type Item = Result<Sentence, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let rest = self.remaining();
            if rest.is_empty() {
                if self.in_command {
                    let line = self.command_line;
                    return self.fail(SyntaxError::UnterminatedCommand { line });
                }
                return None;
            }

            if rest.starts_with(self.begin_tag) {
                if self.in_command {
                    let line = self.line;
                    return self.fail(SyntaxError::UnexpectedBeginTag { line });
                }
                self.in_command = true;
                self.command_line = self.line;
                self.advance(self.begin_tag.len());
                continue;
            }

            if rest.starts_with(self.end_tag) {
                if !self.in_command {
                    let line = self.line;
                    return self.fail(SyntaxError::UnexpectedEndTag { line });
                }
                self.in_command = false;
                self.advance(self.end_tag.len());
                continue;
            }

            // Sentence runs up to whichever tag comes first.
            let length = [rest.find(self.begin_tag), rest.find(self.end_tag)]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(rest.len());

            let sentence = Sentence::new(&rest[..length], self.in_command, self.line, self.column);
            self.advance(length);
            trace!("Scanned sentence {sentence}");
            return Some(Ok(sentence));
        }
    }
}

/// Scans `text` into sentences using the given delimiters.
pub fn scan<'a>(text: &'a str, begin_tag: &'a str, end_tag: &'a str) -> SentenceScanner<'a> {
    SentenceScanner::new(text, begin_tag, end_tag)
}
