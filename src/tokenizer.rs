// SPDX-License-Identifier: Apache-2.0

//! The byte-dispatch state machine, generalized from the teacher's
//! `tokenizer::tokenizer::Tokenizer` (`match (&self.state, byte)` over an
//! `Idle`/`String`/`Number`/`Token`/`Object`/`Array` state enum) to:
//! resolve containers through a three-valued [`ContainerStack`] instead of a
//! bit-per-level depth stack, run the one-shot [`sync`] preamble before the
//! first byte, and hand the caller borrowed slices spanning chunk boundaries
//! instead of only Begin/End markers.

use std::collections::VecDeque;

use log::trace;

use crate::container::{ContainerKind, ContainerStack};
use crate::error::{ErrorKind, ParseError};
use crate::event::{Event, EventKind};
use crate::input_window::{EndOfWindow, InputWindow};
use crate::sync;

/// What the tokenizer is waiting for at the structural (non-token) level.
/// `ValueOrRoot` additionally stands in for the teacher's `Idle`: landing
/// mid-document via synchronization means the root frame's kind may still
/// be unresolved, so the root position has to tolerate a bare `,`, `:`,
/// `}` or `]` that a strictly-nested parser would never see first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    ValueOrRoot,
    ObjKey,
    ObjColon,
    ObjValue,
    ObjNext,
    ArrValue,
    ArrNext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    True,
    False,
    Null,
}

impl Keyword {
    fn rest(self) -> &'static [u8] {
        match self {
            Keyword::True => b"rue",
            Keyword::False => b"alse",
            Keyword::Null => b"ull",
        }
    }

    fn event_kind(self) -> EventKind {
        match self {
            Keyword::True | Keyword::False => EventKind::ValBool,
            Keyword::Null => EventKind::ValNull,
        }
    }
}

/// Sub-state of a string literal's content, between the quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrSub {
    Normal,
    Escaping,
    /// Counts hex digits consumed so far of a `\uXXXX` escape.
    Unicode(u8),
}

/// Sub-state of a number literal. `Integer`, `Fraction` and `ExponentDigits`
/// are the valid terminal states at end of stream; the rest mean a digit (or
/// sign) is still owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumSub {
    Sign,
    Integer,
    Decimal,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

impl NumSub {
    fn is_terminal(self) -> bool {
        matches!(self, NumSub::Integer | NumSub::Fraction | NumSub::ExponentDigits)
    }
}

#[derive(Debug, Clone, Copy)]
enum TokenState {
    Str { key: bool, sub: StrSub },
    Num { sub: NumSub },
    Kw { which: Keyword, matched: u8 },
}

#[derive(Debug, Clone, Copy)]
enum State {
    Struct(Expect),
    Token(TokenState),
}

/// Whether the last value to fully close was a string, for the "key must be
/// a string" check at `:` (spec.md permits `None`, i.e. no value seen yet,
/// as well).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrevKind {
    None,
    Str,
    Other,
}

/// A streaming, event-driven JSON tokenizer that can begin parsing at an
/// arbitrary byte offset in a larger document.
///
/// `Parser` carries all state across `feed` calls: the container stack, the
/// in-progress token (if any), and whether the one-shot synchronization
/// preamble has run yet. Once `feed` returns an error the parser is
/// poisoned and every subsequent call returns the same error.
pub struct Parser {
    state: State,
    container: ContainerStack,
    previous: PrevKind,
    synchronized: bool,
    first_feed: bool,
    token_start: usize,
    poisoned: Option<ParseError>,
    /// Trailing window of consumed bytes, for error samples that span a
    /// `feed` boundary (notably an unterminated token at true EOF, where the
    /// final call carries zero new bytes of its own).
    recent: VecDeque<u8>,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            state: State::Struct(Expect::ValueOrRoot),
            container: ContainerStack::new(),
            previous: PrevKind::None,
            synchronized: false,
            first_feed: true,
            token_start: 0,
            poisoned: None,
            recent: VecDeque::with_capacity(crate::error::SAMPLE_CAP),
        }
    }

    /// The last error reported by `feed`, if the parser is poisoned.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.poisoned.as_ref()
    }

    fn remember(&mut self, byte: u8) {
        if self.recent.len() == crate::error::SAMPLE_CAP {
            self.recent.pop_front();
        }
        self.recent.push_back(byte);
    }

    fn fail(&self, kind: ErrorKind) -> ParseError {
        let sample: Vec<u8> = self.recent.iter().copied().collect();
        let pos = sample.len().saturating_sub(1);
        ParseError::new(kind, &sample, pos)
    }

    /// Feeds the next chunk of input. `data` must directly continue the
    /// bytes given to the previous call (or be the very first chunk). An
    /// empty slice signals end-of-stream: it completes any token that can
    /// unambiguously end there, or fails if one cannot.
    pub fn feed<'a>(
        &mut self,
        data: &'a [u8],
        mut on_event: impl FnMut(Event<'a>),
    ) -> Result<(), ParseError> {
        if let Some(err) = self.poisoned {
            return Err(err);
        }
        let result = self.feed_inner(data, &mut on_event);
        if let Err(err) = result {
            self.poisoned = Some(err);
        }
        result
    }

    fn feed_inner<'a>(
        &mut self,
        data: &'a [u8],
        on_event: &mut dyn FnMut(Event<'a>),
    ) -> Result<(), ParseError> {
        if data.is_empty() {
            return self.finish(on_event);
        }

        let mut window = InputWindow::new(data, self.first_feed);
        self.first_feed = false;

        if !self.synchronized {
            self.synchronized = true;
            sync::synchronize(&mut window, 0)?;
        }

        if matches!(self.state, State::Token(_)) {
            self.token_start = 0;
        }

        loop {
            match self.state {
                State::Token(token) => {
                    let byte = match window.read() {
                        Ok(b) => b,
                        Err(EndOfWindow) => break,
                    };
                    self.remember(byte);
                    let pos = window.position() - 1;
                    self.step_token(token, byte, pos, &mut window, data, on_event)?;
                }
                State::Struct(expect) => {
                    let byte = loop {
                        match window.peek() {
                            Ok(b) if sync_is_whitespace(b) => {
                                window.read().ok();
                                self.remember(b);
                            }
                            Ok(b) => break b,
                            Err(EndOfWindow) => return Ok(()),
                        }
                    };
                    window.read().ok();
                    self.remember(byte);
                    let pos = window.position() - 1;
                    self.dispatch_struct(expect, byte, pos, on_event)?;
                }
            }
        }

        if let State::Token(TokenState::Str { .. } | TokenState::Num { .. }) = self.state {
            let tail = &data[self.token_start..];
            if !tail.is_empty() {
                let kind = match self.state {
                    State::Token(TokenState::Str { .. }) => EventKind::ValStr,
                    State::Token(TokenState::Num { .. }) => EventKind::ValNum,
                    _ => unreachable!(),
                };
                trace!("suspending {:?} mid-token, {} bytes buffered", kind, tail.len());
                on_event(Event::new(kind, false, tail, self.container.peek()));
            }
        }

        Ok(())
    }

    /// Finalizes a zero-byte "end of stream" feed call.
    fn finish<'a>(&mut self, on_event: &mut dyn FnMut(Event<'a>)) -> Result<(), ParseError> {
        match self.state {
            State::Token(TokenState::Str { .. }) => Err(self.fail(ErrorKind::UnterminatedString)),
            State::Token(TokenState::Kw { .. }) => Err(self.fail(ErrorKind::UnterminatedLiteral)),
            State::Token(TokenState::Num { sub }) => {
                if sub.is_terminal() {
                    on_event(Event::new(EventKind::ValNum, true, &[], self.container.peek()));
                    self.previous = PrevKind::Other;
                    self.state = State::Struct(self.after_value());
                    Ok(())
                } else {
                    Err(self.fail(ErrorKind::UnterminatedNumber))
                }
            }
            State::Struct(_) => Ok(()),
        }
    }

    fn after_value(&self) -> Expect {
        match self.container.peek() {
            ContainerKind::Object => Expect::ObjNext,
            ContainerKind::Array => Expect::ArrNext,
            ContainerKind::Unknown => Expect::ValueOrRoot,
        }
    }

    /// Handles one byte while a value, a structural token or a separator is
    /// expected (i.e. we are not already inside a string/number/keyword).
    fn dispatch_struct<'a>(
        &mut self,
        expect: Expect,
        byte: u8,
        pos: usize,
        on_event: &mut dyn FnMut(Event<'a>),
    ) -> Result<(), ParseError> {
        match (expect, byte) {
            (Expect::ObjKey, b'}') | (Expect::ArrValue, b']') => self.close(byte, pos, on_event),
            (Expect::ValueOrRoot, b'}') => self.close(byte, pos, on_event),
            (Expect::ValueOrRoot, b']') => self.close(byte, pos, on_event),
            (Expect::ObjNext, b'}') => self.close(byte, pos, on_event),
            (Expect::ArrNext, b']') => self.close(byte, pos, on_event),

            (Expect::ObjNext | Expect::ValueOrRoot, b',') => {
                self.container.note_comma();
                on_event(Event::new(EventKind::Comma, true, &[], self.container.peek()));
                self.state = State::Struct(if expect == Expect::ObjNext {
                    Expect::ObjKey
                } else {
                    Expect::ValueOrRoot
                });
                Ok(())
            }
            (Expect::ArrNext, b',') => {
                self.container.note_comma();
                on_event(Event::new(EventKind::Comma, true, &[], self.container.peek()));
                self.state = State::Struct(Expect::ArrValue);
                Ok(())
            }

            (Expect::ObjColon | Expect::ValueOrRoot, b':') => {
                if self.previous != PrevKind::None && self.previous != PrevKind::Str {
                    return Err(self.fail(ErrorKind::UnexpectedChar));
                }
                self.container
                    .set(ContainerKind::Object, byte, pos)
                    .map_err(|_| self.fail(ErrorKind::UnexpectedChar))?;
                on_event(Event::new(EventKind::Colon, true, &[], self.container.peek()));
                self.state = State::Struct(Expect::ObjValue);
                Ok(())
            }

            (Expect::ObjKey, b'"') => self.start_string(true, pos),
            (Expect::ValueOrRoot | Expect::ObjValue | Expect::ArrValue, _) => {
                self.start_value(byte, pos, on_event)
            }

            _ => Err(self.fail(ErrorKind::UnexpectedChar)),
        }
    }

    fn close<'a>(
        &mut self,
        byte: u8,
        pos: usize,
        on_event: &mut dyn FnMut(Event<'a>),
    ) -> Result<(), ParseError> {
        let (wanted, kind) = match byte {
            b'}' => (ContainerKind::Object, EventKind::ObjEnd),
            b']' => (ContainerKind::Array, EventKind::ArrEnd),
            _ => unreachable!(),
        };
        self.container
            .pop(wanted, byte, pos)
            .map_err(|_| self.fail(ErrorKind::UnexpectedChar))?;
        on_event(Event::new(kind, true, &[], self.container.peek()));
        self.previous = PrevKind::Other;
        self.state = State::Struct(self.after_value());
        Ok(())
    }

    /// Begins a value: a container opener, a string, a number, or a keyword.
    fn start_value<'a>(
        &mut self,
        byte: u8,
        pos: usize,
        on_event: &mut dyn FnMut(Event<'a>),
    ) -> Result<(), ParseError> {
        match byte {
            b'{' => {
                self.container.push(ContainerKind::Object);
                on_event(Event::new(EventKind::ObjStart, true, &[], self.container.peek()));
                self.state = State::Struct(Expect::ObjKey);
                Ok(())
            }
            b'[' => {
                self.container.push(ContainerKind::Array);
                on_event(Event::new(EventKind::ArrStart, true, &[], self.container.peek()));
                self.state = State::Struct(Expect::ArrValue);
                Ok(())
            }
            b'"' => self.start_string(false, pos),
            b'-' | b'0'..=b'9' => {
                self.token_start = pos;
                let sub = if byte == b'-' { NumSub::Sign } else { NumSub::Integer };
                self.state = State::Token(TokenState::Num { sub });
                Ok(())
            }
            b't' => {
                self.state = State::Token(TokenState::Kw { which: Keyword::True, matched: 0 });
                Ok(())
            }
            b'f' => {
                self.state = State::Token(TokenState::Kw { which: Keyword::False, matched: 0 });
                Ok(())
            }
            b'n' => {
                self.state = State::Token(TokenState::Kw { which: Keyword::Null, matched: 0 });
                Ok(())
            }
            _ => Err(self.fail(ErrorKind::UnexpectedChar)),
        }
    }

    fn start_string(&mut self, key: bool, pos: usize) -> Result<(), ParseError> {
        self.token_start = pos + 1;
        self.state = State::Token(TokenState::Str { key, sub: StrSub::Normal });
        Ok(())
    }

    /// Handles one byte while inside a string, number or keyword token.
    fn step_token<'a>(
        &mut self,
        token: TokenState,
        byte: u8,
        pos: usize,
        window: &mut InputWindow,
        data: &'a [u8],
        on_event: &mut dyn FnMut(Event<'a>),
    ) -> Result<(), ParseError> {
        match token {
            TokenState::Str { key, sub } => self.step_string(key, sub, byte, pos, data, on_event),
            TokenState::Num { sub } => self.step_number(sub, byte, pos, window, data, on_event),
            TokenState::Kw { which, matched } => self.step_keyword(which, matched, on_event, byte),
        }
    }

    fn step_string<'a>(
        &mut self,
        key: bool,
        sub: StrSub,
        byte: u8,
        pos: usize,
        data: &'a [u8],
        on_event: &mut dyn FnMut(Event<'a>),
    ) -> Result<(), ParseError> {
        match sub {
            StrSub::Normal => {
                if byte == b'"' {
                    let content = &data[self.token_start..pos];
                    on_event(Event::new(EventKind::ValStr, true, content, self.container.peek()));
                    self.previous = PrevKind::Str;
                    self.state = State::Struct(if key { Expect::ObjColon } else { self.after_value() });
                    Ok(())
                } else if byte == b'\\' {
                    self.state = State::Token(TokenState::Str { key, sub: StrSub::Escaping });
                    Ok(())
                } else if byte < 0x20 {
                    Err(self.fail(ErrorKind::UnterminatedString))
                } else {
                    Ok(())
                }
            }
            StrSub::Escaping => match byte {
                b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                    self.state = State::Token(TokenState::Str { key, sub: StrSub::Normal });
                    Ok(())
                }
                b'u' => {
                    self.state = State::Token(TokenState::Str { key, sub: StrSub::Unicode(0) });
                    Ok(())
                }
                _ => Err(self.fail(ErrorKind::UnexpectedChar)),
            },
            StrSub::Unicode(count) => {
                if byte.is_ascii_hexdigit() {
                    let next = count + 1;
                    self.state = State::Token(TokenState::Str {
                        key,
                        sub: if next == 4 { StrSub::Normal } else { StrSub::Unicode(next) },
                    });
                    Ok(())
                } else {
                    Err(self.fail(ErrorKind::UnterminatedString))
                }
            }
        }
    }

    fn step_number<'a>(
        &mut self,
        sub: NumSub,
        byte: u8,
        pos: usize,
        window: &mut InputWindow,
        data: &'a [u8],
        on_event: &mut dyn FnMut(Event<'a>),
    ) -> Result<(), ParseError> {
        let next = match (sub, byte) {
            (NumSub::Sign, b'0'..=b'9') => Some(NumSub::Integer),
            (NumSub::Integer, b'0'..=b'9') => Some(NumSub::Integer),
            (NumSub::Integer, b'.') => Some(NumSub::Decimal),
            (NumSub::Integer, b'e' | b'E') => Some(NumSub::Exponent),
            (NumSub::Decimal, b'0'..=b'9') => Some(NumSub::Fraction),
            (NumSub::Fraction, b'0'..=b'9') => Some(NumSub::Fraction),
            (NumSub::Fraction, b'e' | b'E') => Some(NumSub::Exponent),
            (NumSub::Exponent, b'0'..=b'9') => Some(NumSub::ExponentDigits),
            (NumSub::Exponent, b'+' | b'-') => Some(NumSub::ExponentSign),
            (NumSub::ExponentSign, b'0'..=b'9') => Some(NumSub::ExponentDigits),
            (NumSub::ExponentDigits, b'0'..=b'9') => Some(NumSub::ExponentDigits),
            _ => None,
        };

        match next {
            Some(sub) => {
                self.state = State::Token(TokenState::Num { sub });
                Ok(())
            }
            None if sub.is_terminal() => {
                window.put_back(byte);
                let content = &data[self.token_start..pos];
                on_event(Event::new(EventKind::ValNum, true, content, self.container.peek()));
                self.previous = PrevKind::Other;
                self.state = State::Struct(self.after_value());
                Ok(())
            }
            None => Err(self.fail(ErrorKind::UnexpectedChar)),
        }
    }

    fn step_keyword<'a>(
        &mut self,
        which: Keyword,
        matched: u8,
        on_event: &mut dyn FnMut(Event<'a>),
        byte: u8,
    ) -> Result<(), ParseError> {
        let rest = which.rest();
        if byte != rest[matched as usize] {
            return Err(self.fail(ErrorKind::UnexpectedChar));
        }
        let matched = matched + 1;
        if matched as usize == rest.len() {
            on_event(Event::new(which.event_kind(), true, &[], self.container.peek()));
            self.previous = PrevKind::Other;
            self.state = State::Struct(self.after_value());
        } else {
            self.state = State::Token(TokenState::Kw { which, matched });
        }
        Ok(())
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn sync_is_whitespace(b: u8) -> bool {
    matches!(b, 0x09 | 0x0A | 0x0D | 0x20)
}
