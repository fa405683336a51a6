// SPDX-License-Identifier: Apache-2.0

//! A streaming, event-driven JSON tokenizer that can begin parsing at an
//! arbitrary byte offset inside a larger document.
//!
//! Feed it chunks of bytes through [`Parser::feed`]; it reports structural,
//! string, number and literal events through a callback as they complete,
//! including events that span a chunk boundary (`Event::completed == false`
//! until the final piece of a token arrives). The first call to `feed` runs
//! a one-shot heuristic that resynchronizes to a safe starting point if the
//! given bytes don't begin at the top of a document.

mod container;
mod error;
mod event;
mod input_window;
mod sync;
mod tokenizer;

pub use container::ContainerKind;
pub use error::{ErrorKind, ParseError};
pub use event::{Event, EventKind};
pub use tokenizer::Parser;
