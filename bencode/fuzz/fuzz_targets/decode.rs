#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok((value, len)) = bencode::decode::parse_prefix::<bencode::Value>(data) {
        assert!(len <= data.len());
        _ = format!("{value:?}");
    }
});
