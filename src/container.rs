// SPDX-License-Identifier: Apache-2.0

//! Three-valued container frame stack.
//!
//! Grounded on the teacher's bitstack depth tracker
//! (`tokenizer::bitstack::BitStack`), which only ever encodes a *known*
//! object/array bit per frame. This parser can start mid-document, so the
//! bottom frame may genuinely be undecidable until evidence arrives — that
//! is modeled as a first-class `ContainerKind::Unknown` variant rather than
//! a boolean with a side flag, per the reference's `JSONStack`
//! (`original_source/jsua/parser.py`).

/// The kind of container a stack frame represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Array,
    /// We have not yet seen evidence of what this frame is. Only the
    /// bottom (root) frame can carry this value.
    Unknown,
}

/// A structural mismatch: the byte that didn't fit and where it was.
#[derive(Debug, Clone, Copy)]
pub struct Mismatch {
    pub byte: u8,
    pub pos: usize,
}

/// Tracks nested containers. The stack is never empty: it starts with a
/// single `Unknown` frame representing "outside any known container", which
/// can resolve to `Object`/`Array` in place but is never removed.
#[derive(Debug)]
pub struct ContainerStack {
    frames: Vec<ContainerKind>,
    /// Counts commas seen while the bottom frame is still `Unknown`; two
    /// commas at that level imply an array (`a, b, c`) without ever seeing
    /// the opening bracket.
    comma_run: u8,
}

impl ContainerStack {
    pub fn new() -> Self {
        ContainerStack {
            frames: vec![ContainerKind::Unknown],
            comma_run: 0,
        }
    }

    /// The current top-of-stack container kind.
    pub fn peek(&self) -> ContainerKind {
        *self.frames.last().expect("container stack is never empty")
    }

    /// Pushes a newly confirmed container (we just consumed `{` or `[`).
    pub fn push(&mut self, kind: ContainerKind) {
        debug_assert!(kind != ContainerKind::Unknown);
        self.frames.push(kind);
        self.comma_run = 0;
    }

    /// Closes a container (`}` or `]`, `expected` says which). If the stack
    /// has more than the root frame, the top must match or this is a fatal
    /// mismatch. If only the root frame remains, a close against it is
    /// absorbed: mid-stream synchronization may have landed us inside a
    /// container whose opening bracket we never saw, so an extra close is
    /// plausible rather than an error, and the root frame persists either
    /// way (it is never actually removed).
    pub fn pop(&mut self, expected: ContainerKind, byte: u8, pos: usize) -> Result<(), Mismatch> {
        debug_assert!(expected != ContainerKind::Unknown);
        if self.frames.len() > 1 {
            let top = *self.frames.last().unwrap();
            if top == expected {
                self.frames.pop();
                self.comma_run = 0;
                Ok(())
            } else {
                Err(Mismatch { byte, pos })
            }
        } else {
            let root = self.frames[0];
            if root == expected || root == ContainerKind::Unknown {
                self.comma_run = 0;
                Ok(())
            } else {
                Err(Mismatch { byte, pos })
            }
        }
    }

    /// Resolves the top frame to `kind` (used by `:`, which always implies
    /// an object). A confirmed frame that disagrees is a fatal mismatch
    /// (colon inside an array).
    pub fn set(&mut self, kind: ContainerKind, byte: u8, pos: usize) -> Result<(), Mismatch> {
        debug_assert!(kind != ContainerKind::Unknown);
        let top = self.frames.last_mut().unwrap();
        match *top {
            ContainerKind::Unknown => {
                *top = kind;
                Ok(())
            }
            k if k == kind => Ok(()),
            _ => Err(Mismatch { byte, pos }),
        }
    }

    /// Records a comma. While the top frame is unresolved, two commas in a
    /// row (with nothing but values and whitespace between, never a close)
    /// resolve it to `Array`.
    pub fn note_comma(&mut self) {
        if self.frames.len() == 1 && self.frames[0] == ContainerKind::Unknown {
            self.comma_run += 1;
            if self.comma_run >= 2 {
                self.frames[0] = ContainerKind::Array;
                self.comma_run = 0;
            }
        }
    }
}

impl Default for ContainerStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn starts_with_a_single_unknown_frame() {
        let stack = ContainerStack::new();
        assert_eq!(stack.peek(), ContainerKind::Unknown);
    }

    #[test]
    fn push_then_matching_pop_returns_to_root() {
        let mut stack = ContainerStack::new();
        stack.push(ContainerKind::Object);
        assert_eq!(stack.peek(), ContainerKind::Object);
        stack.pop(ContainerKind::Object, b'}', 1).unwrap();
        assert_eq!(stack.peek(), ContainerKind::Unknown);
    }

    #[test]
    fn mismatched_close_on_a_confirmed_frame_is_fatal() {
        let mut stack = ContainerStack::new();
        stack.push(ContainerKind::Array);
        assert!(stack.pop(ContainerKind::Object, b'}', 1).is_err());
    }

    #[test]
    fn close_against_bare_root_is_absorbed() {
        let mut stack = ContainerStack::new();
        stack.pop(ContainerKind::Object, b'}', 0).unwrap();
        assert_eq!(stack.peek(), ContainerKind::Unknown);
    }

    #[test]
    fn colon_resolves_unknown_root_to_object() {
        let mut stack = ContainerStack::new();
        stack.set(ContainerKind::Object, b':', 0).unwrap();
        assert_eq!(stack.peek(), ContainerKind::Object);
    }

    #[test]
    fn colon_in_a_confirmed_array_is_fatal() {
        let mut stack = ContainerStack::new();
        stack.push(ContainerKind::Array);
        assert!(stack.set(ContainerKind::Object, b':', 0).is_err());
    }

    #[test]
    fn two_commas_at_root_resolve_to_array() {
        let mut stack = ContainerStack::new();
        stack.note_comma();
        assert_eq!(stack.peek(), ContainerKind::Unknown);
        stack.note_comma();
        assert_eq!(stack.peek(), ContainerKind::Array);
    }

    #[test]
    fn a_close_between_two_commas_resets_the_run() {
        let mut stack = ContainerStack::new();
        stack.note_comma();
        stack.pop(ContainerKind::Object, b'}', 0).unwrap();
        stack.note_comma();
        assert_eq!(stack.peek(), ContainerKind::Unknown);
    }
}
