#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A reader for the DIMACS CNF format.
//!
//! The format: comment lines begin with `c`, a header line reads
//! `p cnf <num_vars> <num_clauses>`, and each clause line is a
//! space-separated list of nonzero integers terminated by `0`. A line
//! starting with `%` ends the data (competition files append a trailer).
//!
//! The core never sees the textual form; this module is the host-side
//! boundary that turns a file into a [`Cnf`]. A clause line consisting of
//! a bare `0` is an explicitly empty clause and marks the formula
//! unsatisfiable. The header's variable count widens the formula's
//! variable range when it exceeds the largest literal seen.

use crate::sat::clause::Clause;
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Failure while reading DIMACS input.
#[derive(Debug, Error)]
pub enum DimacsError {
    /// The underlying reader failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A token that should have been an integer literal was not.
    #[error("line {line}: invalid literal {token:?}")]
    InvalidLiteral {
        /// 1-based line number of the offending token.
        line: usize,
        /// The token as read.
        token: String,
    },

    /// A malformed `p cnf` header line.
    #[error("line {line}: malformed header")]
    InvalidHeader {
        /// 1-based line number of the header.
        line: usize,
    },
}

/// Parses DIMACS data from any buffered reader.
///
/// # Errors
///
/// Returns [`DimacsError`] on I/O failure, a malformed header, or a
/// non-integer clause token.
pub fn parse_dimacs<R: BufRead, L: Literal, S: LiteralStorage<L>>(
    reader: R,
) -> Result<Cnf<L, S>, DimacsError> {
    let mut cnf = Cnf::new(Vec::<Vec<i32>>::new());

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace().peekable();

        match tokens.peek() {
            None | Some(&"c") => {}
            Some(&"%") => break,
            Some(&"p") => {
                let declared = tokens
                    .nth(2)
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or(DimacsError::InvalidHeader { line: line_no })?;
                cnf.declare_vars(declared);
            }
            Some(_) => {
                let mut literals = Vec::new();
                for token in tokens {
                    let value =
                        token
                            .parse::<i32>()
                            .map_err(|_| DimacsError::InvalidLiteral {
                                line: line_no,
                                token: token.to_string(),
                            })?;
                    if value == 0 {
                        break;
                    }
                    literals.push(value);
                }
                cnf.add_clause(Clause::from(literals));
            }
        }
    }

    Ok(cnf)
}

/// Parses DIMACS data held in a string.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_dimacs_text<L: Literal, S: LiteralStorage<L>>(
    text: &str,
) -> Result<Cnf<L, S>, DimacsError> {
    parse_dimacs(io::Cursor::new(text))
}

/// Opens and parses a DIMACS CNF file.
///
/// # Errors
///
/// See [`parse_dimacs`]; opening the file can also fail.
pub fn parse_file<L: Literal, S: LiteralStorage<L>>(
    path: impl AsRef<Path>,
) -> Result<Cnf<L, S>, DimacsError> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}
