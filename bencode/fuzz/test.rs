#![cfg(test)]

use std::path::Path;

fn replay(dir: &str, f: impl Fn(&[u8])) {
    let dir = match std::fs::read_dir(Path::new("./corpus").join(dir)) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!(
                "Failed to open dir: {e}, curr dir: {}",
                std::env::current_dir().unwrap().to_string_lossy()
            );
            return;
        }
    };

    for entry in dir.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Ok(buffer) = std::fs::read(&path) {
            f(&buffer);
        }
    }
}

#[test]
fn test_decode() {
    replay("decode", |data| {
        _ = format!(
            "{:?}",
            bencode::decode::parse_prefix::<bencode::Value>(data)
        );
    });
}

#[test]
fn test_roundtrip() {
    replay("roundtrip", |data| {
        if let Ok(value) = bencode::decode::parse::<bencode::Value>(data) {
            let encoded = bencode::encode::encode(&value);
            assert_eq!(bencode::decode::parse::<bencode::Value>(&encoded).unwrap(), value);
        }
    });
}
