// SPDX-License-Identifier: Apache-2.0

//! One-shot synchronization: decide whether an arbitrary starting offset
//! lands inside a string literal, then advance to a safe landing byte.
//!
//! The four-valued classifier is the reference implementation's `V` enum
//! (`original_source/jsua/parser.py`), re-expressed with `invert`/`reify`
//! methods per spec.md's Design Notes, which insist `AntiUnknown` carries
//! real information and must not collapse into a boolean-plus-flag.

use crate::error::{ErrorKind, ParseError};
use crate::input_window::{EndOfWindow, InputWindow};

const STRING_YES: [u8; 2] = [b'\\', b'\''];
const STRING_INVERT: u8 = b'"';
const WHITESPACE: [u8; 4] = [0x09, 0x0A, 0x0D, 0x20];

fn is_string_no(b: u8) -> bool {
    b < 0x20
}

fn is_whitespace(b: u8) -> bool {
    WHITESPACE.contains(&b)
}

fn is_safe_landing(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b'[' | b']' | b'{' | b'}' | b',' | b':' | b'"')
}

/// `Unknown` means no evidence has been seen yet; `AntiUnknown` means a `"`
/// flipped the sense in which the next byte of evidence will be read.
/// Collapsing these two into `Unknown` plus a boolean would lose exactly
/// the information `AntiUnknown` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classification {
    True,
    False,
    Unknown,
    AntiUnknown,
}

impl Classification {
    fn invert(self) -> Self {
        match self {
            Classification::True => Classification::False,
            Classification::False => Classification::True,
            Classification::Unknown => Classification::AntiUnknown,
            Classification::AntiUnknown => Classification::Unknown,
        }
    }

    /// Combines an unknown/anti-unknown state with a direct observation.
    fn reify(self, observed_true: bool) -> Self {
        match self {
            Classification::Unknown => {
                if observed_true {
                    Classification::True
                } else {
                    Classification::False
                }
            }
            Classification::AntiUnknown => {
                if observed_true {
                    Classification::False
                } else {
                    Classification::True
                }
            }
            settled => settled,
        }
    }

    fn is_settled(self) -> bool {
        matches!(self, Classification::True | Classification::False)
    }

    fn as_bool(self) -> bool {
        matches!(self, Classification::True)
    }
}

/// Classifies whether the current position is inside a string literal, by
/// reading ahead under a mark and rewinding afterwards so the bytes can be
/// re-examined by the real skip/advance pass.
fn classify_in_string(window: &mut InputWindow) -> bool {
    let mut result = Classification::Unknown;
    let mut c: Option<u8> = None;
    let mut p: Option<u8> = None;

    window.mark();
    while !result.is_settled() {
        if let Some(prev) = c {
            if !is_whitespace(prev) {
                p = Some(prev);
            }
        }
        match window.read() {
            Ok(byte) => {
                c = Some(byte);
                if STRING_YES.contains(&byte) {
                    result = result.reify(true);
                } else if is_string_no(byte) {
                    result = result.reify(false);
                } else if byte == STRING_INVERT {
                    result = result.invert();
                } else if p == Some(b',') && matches!(byte, b':' | b']' | b'}' | b',') {
                    result = result.reify(true);
                }
            }
            Err(EndOfWindow) => {
                result = result.reify(false);
                break;
            }
        }
    }
    window.rewind();
    result.as_bool()
}

/// Skips a string without decoding it, for the case where synchronization
/// lands inside one and we don't know where it started.
fn skip_string(window: &mut InputWindow, pos_base: usize) -> Result<(), ParseError> {
    let mut escaping = false;
    loop {
        match window.read() {
            Ok(b'"') if !escaping => return Ok(()),
            Ok(b'\\') if !escaping => escaping = true,
            Ok(_) => escaping = false,
            Err(EndOfWindow) => {
                let context = window.consumed_slice();
                return Err(ParseError::new(
                    ErrorKind::UnterminatedString,
                    context,
                    pos_base + context.len().saturating_sub(1),
                ));
            }
        }
    }
}

/// Runs the one-time synchronization preamble. Leaves the window positioned
/// at a safe landing byte (not inside a string, not mid-escape).
pub fn synchronize(window: &mut InputWindow, pos_base: usize) -> Result<(), ParseError> {
    if classify_in_string(window) {
        skip_string(window, pos_base)
    } else {
        loop {
            match window.peek() {
                Ok(byte) if is_safe_landing(byte) => return Ok(()),
                Ok(_) => {
                    window.read().ok();
                }
                Err(EndOfWindow) => return Ok(()),
            }
        }
    }
}
