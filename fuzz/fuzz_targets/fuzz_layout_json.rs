#![no_main]

use libfuzzer_sys::fuzz_target;
use pip_core::Layout;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // Decoding must never panic, and anything accepted must be valid.
    let Ok(layout) = Layout::from_json(text) else {
        return;
    };
    let revalidated = Layout::new(
        layout.top(),
        layout.leading(),
        layout.bottom(),
        layout.trailing(),
        layout.collapse_edge(),
    );
    assert_eq!(revalidated.ok(), Some(layout), "decoded layout failed validation");

    let encoded = layout.to_json().expect("valid layout encodes");
    assert_eq!(Layout::from_json(&encoded).ok(), Some(layout));
});
