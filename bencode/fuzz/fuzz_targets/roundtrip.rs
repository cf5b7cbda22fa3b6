#![no_main]

use bencode::{Value, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = decode::parse::<Value>(data) else {
        return;
    };

    // Canonical output decodes to the same value, strictly, and is stable
    let encoded = encode::encode(&value);
    let decoded = decode::parse_with::<Value>(&encoded, decode::Options::strict())
        .expect("canonical encoding must decode strictly");
    assert_eq!(decoded, value);
    assert_eq!(encode::encode(&decoded), encoded);
});
