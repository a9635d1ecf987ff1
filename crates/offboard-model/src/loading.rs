// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Reading device pools from text.
//!
//! The format is a whitespace-separated token stream:
//!
//! ```text
//! N V            # number of devices, needed volume
//! r_0 c_0        # rating and capacity of device 0
//! ...
//! r_{N-1} c_{N-1}
//! ```
//!
//! Everything after a `#` up to the end of the line is ignored.

use crate::{
    index::DeviceIndex,
    instance::{Instance, InstanceBuilder, InstanceError},
};
use num_traits::{PrimInt, Unsigned};
use offboard_core::num::saturating::SaturatingAddVal;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Upper bound on the devices preallocated from an untrusted header count.
const MAX_PREALLOCATED_DEVICES: usize = 1 << 16;

#[derive(Debug)]
pub enum LoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before all announced devices were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The pool read from the input is not a valid instance.
    Instance(InstanceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "u64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while reading device pool"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Instance(e) => write!(f, "Invalid instance: {}", e),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::UnexpectedEof => None,
            Self::Parse(e) => Some(e),
            Self::Instance(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for LoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<InstanceError> for LoaderError {
    fn from(e: InstanceError) -> Self {
        Self::Instance(e)
    }
}

/// Reads an [`Instance`] from the text format described in the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLoader<T> {
    _marker: std::marker::PhantomData<T>,
}

impl<T> Default for InstanceLoader<T> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> InstanceLoader<T>
where
    T: PrimInt + Unsigned + SaturatingAddVal,
{
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Instance<T>, LoaderError> {
        let mut sc = Scanner::new(rdr);

        let count: usize = sc.next_parsed()?;
        let needed_volume = {
            let token = sc.next_token()?;
            if is_negative_integer(&token) {
                return Err(InstanceError::NonPositiveVolume.into());
            }
            parse_unsigned::<T>(&token)?
        };

        let mut builder =
            InstanceBuilder::with_capacity(needed_volume, count.min(MAX_PREALLOCATED_DEVICES));
        for i in 0..count {
            let rating: f64 = sc.next_parsed()?;
            let token = sc.next_token()?;
            if is_negative_integer(&token) {
                return Err(InstanceError::NegativeCapacity {
                    index: DeviceIndex::new(i),
                }
                .into());
            }
            builder.add_device(rating, parse_unsigned::<T>(&token)?);
        }

        Ok(builder.build()?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Instance<T>, LoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Instance<T>, LoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Instance<T>, LoaderError> {
        self.from_reader(s.as_bytes())
    }
}

fn is_negative_integer(token: &str) -> bool {
    token
        .strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_unsigned<T>(token: &str) -> Result<T, ParseTokenError>
where
    T: PrimInt + Unsigned,
{
    T::from_str_radix(token, 10).map_err(|_| ParseTokenError {
        token: token.to_owned(),
        type_name: std::any::type_name::<T>(),
    })
}

struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, LoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Returns the next token, skipping whitespace and `#` comments.
    fn next_token(&mut self) -> Result<String, LoaderError> {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(LoaderError::UnexpectedEof);
            }

            let rest = &self.buf[self.pos..];
            let rest = match rest.find('#') {
                Some(comment) => &rest[..comment],
                None => rest,
            };

            let skipped = rest.len() - rest.trim_start().len();
            let candidate = &rest[skipped..];
            let token_len = candidate
                .find(char::is_whitespace)
                .unwrap_or(candidate.len());

            // Only whitespace or a comment left on this line.
            if token_len == 0 {
                self.pos = self.buf.len();
                continue;
            }

            let token = candidate[..token_len].to_owned();
            self.pos += skipped + token_len;
            return Ok(token);
        }
    }

    fn next_parsed<V>(&mut self) -> Result<V, LoaderError>
    where
        V: std::str::FromStr,
    {
        let token = self.next_token()?;
        token.parse::<V>().map_err(|_| {
            LoaderError::Parse(ParseTokenError {
                token,
                type_name: std::any::type_name::<V>(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_POOL: &str = r#"
        3 10        # three devices, keep 10
        0.1 5       # device 0
        0.5 5
        0.9 5       # device 2
    "#;

    #[test]
    fn test_loads_devices_in_order() {
        let instance: Instance<u64> = InstanceLoader::new()
            .from_str(SMALL_POOL)
            .expect("Failed to load");

        assert_eq!(instance.num_devices(), 3);
        assert_eq!(instance.needed_volume(), 10);
        assert_eq!(instance.device(DeviceIndex::new(1)).rating(), 0.5);
        assert_eq!(instance.device(DeviceIndex::new(2)).capacity(), 5);
    }

    #[test]
    fn test_tokens_may_share_and_split_lines() {
        let instance: Instance<u32> = InstanceLoader::new()
            .from_str("2\n7 0.25\n3 0.75 4#trailing")
            .unwrap();
        assert_eq!(instance.total_capacity(), 7);
        assert_eq!(instance.device(DeviceIndex::new(0)).rating(), 0.25);
    }

    #[test]
    fn test_negative_capacity_is_rejected() {
        let res = InstanceLoader::<u64>::new().from_str("2 10  0.1 5  0.2 -3");
        match res {
            Err(LoaderError::Instance(InstanceError::NegativeCapacity { index })) => {
                assert_eq!(index.get(), 1);
            }
            other => panic!("Expected NegativeCapacity, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_volume_is_rejected() {
        for data in ["1 0  0.1 5", "1 -4  0.1 5"] {
            let res = InstanceLoader::<u64>::new().from_str(data);
            assert!(
                matches!(
                    res,
                    Err(LoaderError::Instance(InstanceError::NonPositiveVolume))
                ),
                "input {:?} should be rejected",
                data
            );
        }
    }

    #[test]
    fn test_unexpected_eof() {
        let res = InstanceLoader::<u64>::new().from_str("3 10  0.1 5");
        assert!(matches!(res, Err(LoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_oversized_count_reports_eof() {
        let res = InstanceLoader::<u64>::new().from_str("99999999999999999 10\n0.1 5\n");
        assert!(matches!(res, Err(LoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_parse_error_structure() {
        let res = InstanceLoader::<u64>::new().from_str("1 10 0.5 lots");
        match res {
            Err(LoaderError::Parse(e)) => {
                assert_eq!(e.token, "lots");
                assert!(e.type_name.contains("u64"));
            }
            other => panic!("Expected Parse error with context, got {:?}", other),
        }
    }
}
