// SPDX-License-Identifier: Apache-2.0

//! The event record handed to the caller's callback on every `feed`.

use crate::container::ContainerKind;

/// What kind of token an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ObjStart,
    ObjEnd,
    ArrStart,
    ArrEnd,
    Colon,
    Comma,
    ValStr,
    ValNum,
    ValBool,
    ValNull,
}

/// One parse event. `data` borrows from the slice passed to the `feed` call
/// that produced it and must not be retained past the callback's return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event<'a> {
    pub kind: EventKind,
    /// `false` only when this event's bytes are split across `feed` calls
    /// and more of the same token will follow.
    pub completed: bool,
    /// Raw (unescaped) bytes for strings and numbers; empty for structural
    /// and keyword events.
    pub data: &'a [u8],
    /// Top-of-stack container kind after this event's effect on the stack.
    pub container_state: ContainerKind,
}

impl<'a> Event<'a> {
    pub(crate) fn new(
        kind: EventKind,
        completed: bool,
        data: &'a [u8],
        container_state: ContainerKind,
    ) -> Self {
        Event {
            kind,
            completed,
            data,
            container_state,
        }
    }
}
