// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy and the bounded context sample carried with a failure.

/// Size of the context window captured around a failing byte.
pub const SAMPLE_CAP: usize = 32;

/// The four terminal error kinds the parser can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// EOF or a control byte inside a string literal, or an incomplete `\u` escape.
    UnterminatedString,
    /// EOF while a number's grammar had not yet reached a valid terminal state.
    UnterminatedNumber,
    /// EOF or a mismatch inside `true`/`false`/`null`.
    UnterminatedLiteral,
    /// Any byte the tokenizer could not dispatch; also mismatched brackets,
    /// colon in an array, or a non-string object key.
    UnexpectedChar,
}

impl ErrorKind {
    /// Stable ASCII identifier, suitable for C-style `error_to_string`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnterminatedString => "JSUA_ERR_UNTERMINATED_STRING",
            ErrorKind::UnterminatedNumber => "JSUA_ERR_UNTERMINATED_NUMBER",
            ErrorKind::UnterminatedLiteral => "JSUA_ERR_UNTERMINATED_LITERAL",
            ErrorKind::UnexpectedChar => "JSUA_ERR_UNEXPECTED_CHAR",
        }
    }
}

/// A terminal parse failure, with a bounded window of context bytes around
/// the failing position.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    sample: [u8; SAMPLE_CAP],
    sample_len: u8,
    /// Index of the failing byte inside `sample`, signed so a caller can
    /// tell a failure at the very start of the window from one further in.
    pub error_offset: isize,
}

impl ParseError {
    /// Builds an error record, clipping `context` to the last `SAMPLE_CAP`
    /// bytes before the failing byte so `error_offset` always lands inside
    /// the captured window when possible.
    pub(crate) fn new(kind: ErrorKind, context: &[u8], fail_pos_in_context: usize) -> Self {
        let start = fail_pos_in_context.saturating_sub(SAMPLE_CAP - 1);
        let end = context.len().min(start + SAMPLE_CAP);
        let slice = &context[start..end];
        let mut sample = [0u8; SAMPLE_CAP];
        sample[..slice.len()].copy_from_slice(slice);
        ParseError {
            kind,
            sample,
            sample_len: slice.len() as u8,
            error_offset: (fail_pos_in_context - start) as isize,
        }
    }

    /// The captured context bytes, up to `SAMPLE_CAP` long.
    pub fn sample(&self) -> &[u8] {
        &self.sample[..self.sample_len as usize]
    }
}

impl core::fmt::Debug for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParseError")
            .field("kind", &self.kind)
            .field("sample", &String::from_utf8_lossy(self.sample()))
            .field("error_offset", &self.error_offset)
            .finish()
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} near {:?} (offset {})",
            self.kind.as_str(),
            String::from_utf8_lossy(self.sample()),
            self.error_offset
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn captures_a_short_sample_verbatim() {
        let err = ParseError::new(ErrorKind::UnexpectedChar, b"abc", 1);
        assert_eq!(err.sample(), b"abc");
        assert_eq!(err.error_offset, 1);
    }

    #[test]
    fn clips_long_context_to_sample_cap() {
        let context: Vec<u8> = (0..64u8).collect();
        let err = ParseError::new(ErrorKind::UnexpectedChar, &context, 50);
        assert_eq!(err.sample().len(), SAMPLE_CAP);
        assert_eq!(err.sample()[err.error_offset as usize], 50);
    }

    #[test]
    fn error_to_string_is_stable() {
        assert_eq!(ErrorKind::UnterminatedString.as_str(), "JSUA_ERR_UNTERMINATED_STRING");
    }
}
