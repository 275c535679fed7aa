//! Reader for access traces.
//!
//! Each line holds a hexadecimal virtual address (the `0x` prefix is
//! optional) followed by `0` for a read or `1` for a write:
//!
//! ```text
//! 0 0
//! 20 1
//! 40 0
//! ```
//!
//! Blank lines are skipped. The first line that doesn't fit this shape ends
//! the trace, anything after it is ignored.

use std::io::{self, BufRead};

use log::warn;
use vm::mmu::Operation;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Access {
    pub address: u32,
    pub op: Operation,
}

pub struct TraceReader<R: BufRead> {
    source: R,
    line: Vec<u8>,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(source: R) -> Self {
        TraceReader {
            source,
            line: Vec::new(),
            line_number: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = io::Result<Access>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.line.clear();

            match self.source.read_until(b'\n', &mut self.line) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_number += 1;

                    let parsed = std::str::from_utf8(&self.line).map(|line| {
                        if line.trim().is_empty() {
                            None
                        } else {
                            Some(parse_line(line))
                        }
                    });

                    match parsed {
                        Ok(None) => continue,
                        Ok(Some(Some(access))) => return Some(Ok(access)),
                        _ => {
                            warn!(
                                "trace: stopping at malformed line {}: {:?}",
                                self.line_number,
                                String::from_utf8_lossy(&self.line).trim_end()
                            );
                            self.done = true;
                        }
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        None
    }
}

pub fn parse_line(line: &str) -> Option<Access> {
    let mut tokens = line.split_whitespace();

    let address = parse_address(tokens.next()?)?;
    let op = match tokens.next()?.parse::<i64>().ok()? {
        0 => Operation::Read,
        1 => Operation::Write,
        _ => return None,
    };

    Some(Access { address, op })
}

/// Parses a hex token into a 32 bit address. Leading zeros don't count
/// towards the width.
pub fn parse_address(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if digits.is_empty() {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    if digits.len() > 8 {
        return None;
    }

    let mut bytes = [0u8; 4];
    hex::decode_to_slice(format!("{:0>8}", digits), &mut bytes).ok()?;

    Some(u32::from_be_bytes(bytes))
}
