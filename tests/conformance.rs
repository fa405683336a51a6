// SPDX-License-Identifier: Apache-2.0

//! Named scenarios from spec.md's "Concrete scenarios" list, plus a few of
//! the reference implementation's mismatch/fakeout cases
//! (`original_source/tests/test_parser.py`).

use jsua::{ContainerKind, ErrorKind, Event, EventKind, Parser};

fn run(data: &[u8]) -> (Vec<(EventKind, ContainerKind, Vec<u8>)>, Option<ErrorKind>) {
    let mut parser = Parser::new();
    let mut events = Vec::new();
    let record = |e: Event| events.push((e.kind, e.container_state, e.data.to_vec()));
    let mut record = record;
    let err = match parser.feed(data, &mut record) {
        Ok(()) => parser.feed(&[], &mut record).err(),
        Err(e) => Some(e),
    };
    (events, err.map(|e| e.kind))
}

#[test]
fn scenario_1_surrogate_pair_escape_passes_through_raw() {
    let (events, err) = run(br#"{"hello": "𝄞"}"#);
    assert_eq!(err, None);
    let kinds: Vec<EventKind> = events.iter().map(|e| e.0).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::ObjStart,
            EventKind::ValStr,
            EventKind::Colon,
            EventKind::ValStr,
            EventKind::ObjEnd,
        ]
    );
    assert_eq!(events[1].2, b"hello");
    assert_eq!(events[3].2, b"\\uD834\\uDD1E");
}

#[test]
fn scenario_2_array_closed_with_brace_is_fatal() {
    let (events, err) = run(b"[}");
    assert_eq!(events[0].0, EventKind::ArrStart);
    assert_eq!(err, Some(ErrorKind::UnexpectedChar));
}

#[test]
fn scenario_3_object_closed_with_bracket_is_fatal() {
    let (events, err) = run(b"{]");
    assert_eq!(events[0].0, EventKind::ObjStart);
    assert_eq!(err, Some(ErrorKind::UnexpectedChar));
}

#[test]
fn scenario_4_two_commas_at_root_resolve_to_array() {
    let (events, err) = run(b"9,8,");
    assert_eq!(err, None);
    assert_eq!(
        events.iter().map(|e| e.0).collect::<Vec<_>>(),
        vec![EventKind::ValNum, EventKind::Comma, EventKind::ValNum, EventKind::Comma]
    );
    assert_eq!(events[3].1, ContainerKind::Array);
}

#[test]
fn scenario_5_comma_close_comma_does_not_imply_array() {
    let (events, err) = run(b",8},");
    assert_eq!(err, None);
    assert_eq!(
        events.iter().map(|e| e.0).collect::<Vec<_>>(),
        vec![EventKind::Comma, EventKind::ValNum, EventKind::ObjEnd, EventKind::Comma]
    );
    assert!(events.iter().all(|e| e.1 == ContainerKind::Unknown));
}

#[test]
fn scenario_6_trailing_e_without_eof_flush_is_unterminated_number() {
    let (events, err) = run(b",8e");
    assert_eq!(events[0].0, EventKind::Comma);
    assert_eq!(err, Some(ErrorKind::UnterminatedNumber));
}

#[test]
fn scenario_6_exponent_followed_by_comma_is_fatal() {
    let (events, err) = run(b",8e,");
    assert_eq!(events[0].0, EventKind::Comma);
    assert_eq!(err, Some(ErrorKind::UnexpectedChar));
}

#[test]
fn scenario_6_bad_unicode_escape_is_unterminated_string() {
    let (_, err) = run(b"\"\\uG");
    assert_eq!(err, Some(ErrorKind::UnterminatedString));
}

#[test]
fn colon_requires_a_preceding_string() {
    // `original_source/tests/test_parser.py::test_invalid_key`: a bare
    // number can't be an object key.
    let (_, err) = run(b"{0:\"\"}");
    assert_eq!(err, Some(ErrorKind::UnexpectedChar));
}

#[test]
fn unterminated_array_at_eof_is_quiescent() {
    let (_, err) = run(b"[");
    assert_eq!(err, None);
    let mut parser = Parser::new();
    parser.feed(b"[", |_| {}).unwrap();
    // no further bytes, no close: at true EOF this is simply quiescent, since
    // this parser never requires the top-level stream to be a single closed
    // document (see DESIGN.md).
    parser.feed(&[], |_| {}).unwrap();
}

#[test]
fn empty_object_and_array_round_trip() {
    let (events, err) = run(b"{}");
    assert_eq!(err, None);
    assert_eq!(events.iter().map(|e| e.0).collect::<Vec<_>>(), vec![EventKind::ObjStart, EventKind::ObjEnd]);

    let (events, err) = run(b"[]");
    assert_eq!(err, None);
    assert_eq!(events.iter().map(|e| e.0).collect::<Vec<_>>(), vec![EventKind::ArrStart, EventKind::ArrEnd]);
}

#[test]
fn nested_containers_report_correct_container_state() {
    let (events, err) = run(br#"{"a":[1,2]}"#);
    assert_eq!(err, None);
    let state_of = |kind: EventKind| events.iter().find(|e| e.0 == kind).unwrap().1;
    assert_eq!(state_of(EventKind::ArrStart), ContainerKind::Array);
    assert_eq!(state_of(EventKind::ObjStart), ContainerKind::Object);
}
