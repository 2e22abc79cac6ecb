//! Quote structure checks for CSV input
//!
//! The csv reader tolerates stray quotes, and an unterminated quoted field
//! silently swallows the rest of the file. `QuoteCheck` wraps the source and
//! rejects those inputs while the bytes stream through:
//! - a `"` inside a field that did not start with one
//! - anything but `"`, `,` or a line break right after a closing quote
//! - end of input inside a quoted field

use std::io::{self, Read};
use thiserror::Error;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteError {
    #[error("line {line}: bare \" in non-quoted field")]
    BareQuote { line: u64 },

    #[error("line {line}: extraneous \" in quoted field")]
    TrailingAfterQuote { line: u64 },

    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// A `"` was seen inside a quoted field: either an escape or the close
    QuoteInQuoted,
}

/// `Read` adapter that fails with `InvalidData` carrying a `QuoteError`
pub struct QuoteCheck<R> {
    inner: R,
    state: State,
    line: u64,
    quote_line: u64,
    bom_matched: usize,
    in_prefix: bool,
}

impl<R: Read> QuoteCheck<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: State::FieldStart,
            line: 1,
            quote_line: 1,
            bom_matched: 0,
            in_prefix: true,
        }
    }

    fn step(&mut self, byte: u8) -> Result<(), QuoteError> {
        // A leading BOM is not part of the first field
        if self.in_prefix {
            if byte == UTF8_BOM[self.bom_matched] {
                self.bom_matched += 1;
                self.in_prefix = self.bom_matched < UTF8_BOM.len();
                return Ok(());
            }
            self.in_prefix = false;
            if self.bom_matched > 0 {
                self.state = State::Unquoted;
            }
        }

        let line = self.line;
        let next = match self.state {
            State::FieldStart => match byte {
                b'"' => {
                    self.quote_line = line;
                    State::Quoted
                }
                b',' | b'\n' | b'\r' => State::FieldStart,
                _ => State::Unquoted,
            },
            State::Unquoted => match byte {
                b'"' => return Err(QuoteError::BareQuote { line }),
                b',' | b'\n' | b'\r' => State::FieldStart,
                _ => State::Unquoted,
            },
            State::Quoted => {
                if byte == b'"' {
                    State::QuoteInQuoted
                } else {
                    State::Quoted
                }
            }
            State::QuoteInQuoted => match byte {
                b'"' => State::Quoted,
                b',' | b'\n' | b'\r' => State::FieldStart,
                _ => return Err(QuoteError::TrailingAfterQuote { line }),
            },
        };

        if byte == b'\n' {
            self.line += 1;
        }
        self.state = next;
        Ok(())
    }

    fn finish(&self) -> Result<(), QuoteError> {
        if self.state == State::Quoted {
            return Err(QuoteError::UnterminatedQuote {
                line: self.quote_line,
            });
        }
        Ok(())
    }
}

impl<R: Read> Read for QuoteCheck<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        let checked = if n == 0 {
            self.finish()
        } else {
            buf[..n].iter().try_for_each(|&b| self.step(b))
        };
        checked.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(n)
    }
}
