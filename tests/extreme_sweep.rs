// SPDX-License-Identifier: Apache-2.0

//! Reproduces `original_source/tests/test_extreme.py::TestExtreme`: feed the
//! same 17-key object starting at every byte offset in turn. However many
//! events make it out, the count must never increase as the starting offset
//! advances and the usable prefix of the document shrinks, and the parser
//! must never panic.

use jsua::Parser;

const DOCUMENT: &[u8] = br#"{
    "k1": true,
    "k2": false,
    "k3": null,
    "k4": -4.45e+7,
    "k5": [],
    "k6": [true],
    "k7": [false],
    "k8": [null],
    "k9": [-4.45e+7],
    "kA": [[],[]],
    "kB": {},
    "kC": {"j1": true},
    "kD": {"j1": false},
    "kE": {"j1": null},
    "kF": {"j1": -4.45e+7},
    "kG": {"j1": []},
    "kH": {"j1": {}}
}"#;

#[test]
fn event_count_is_monotonic_non_increasing_as_offset_advances() {
    let mut previous = usize::MAX;
    for start in 0..DOCUMENT.len() {
        let mut parser = Parser::new();
        let mut count = 0usize;
        let _ = parser.feed(&DOCUMENT[start..], |_| count += 1);
        let _ = parser.feed(&[], |_| count += 1);
        assert!(
            count <= previous,
            "offset {start}: event count {count} exceeds previous offset's {previous}"
        );
        previous = count;
    }
}
