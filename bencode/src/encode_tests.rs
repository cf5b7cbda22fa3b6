use super::decode::parse;
use super::encode::*;
use super::{Dict, Value};
use alloc::{collections::BTreeMap, string::String, vec, vec::Vec};
use hex_literal::hex;

#[test]
fn integers() {
    assert_eq!(*encode_integer(0), *b"i0e");
    assert_eq!(*encode_integer(3), *b"i3e");
    assert_eq!(*encode_integer(-3), *b"i-3e");
    assert_eq!(*encode_integer(1234), *b"i1234e");
    assert_eq!(*encode_integer(10), *b"i10e");
    assert_eq!(*encode_integer(-100), *b"i-100e");
    assert_eq!(*encode_integer(i64::MAX), *b"i9223372036854775807e");
    assert_eq!(*encode_integer(i64::MIN), *b"i-9223372036854775808e");

    assert_eq!(*emit(&7u16), *b"i7e");
    assert_eq!(*emit(&-7i8), *b"i-7e");
    assert_eq!(*emit(&u32::MAX), *b"i4294967295e");
}

#[test]
fn byte_strings() {
    assert_eq!(*encode_bytes(b""), *b"0:");
    assert_eq!(*encode_bytes(b"spam"), *b"4:spam");
    assert_eq!(*encode_bytes(&hex!("00ff")), hex!("323a00ff"));
    assert_eq!(*emit("spam"), *b"4:spam");
    assert_eq!(*emit(&String::from("eggs")), *b"4:eggs");
    assert_eq!(*emit(&hex!("deadbeef")), hex!("343adeadbeef"));
    assert_eq!(*emit(&b"spam".to_vec()), *b"4:spam");

    let long = vec![b'x'; 1000];
    let encoded = encode_bytes(&long);
    assert!(encoded.starts_with(b"1000:"));
    assert_eq!(encoded.len(), 1005);
}

#[test]
fn lists() {
    assert_eq!(*encode_list(&[]), *b"le");
    assert_eq!(
        *encode_list(&[Value::from("spam"), Value::Integer(3)]),
        *b"l4:spami3ee"
    );
    assert_eq!(
        *encode(&Value::List(vec![
            Value::List(vec![]),
            Value::List(vec![Value::Integer(-1)]),
        ])),
        *b"lleli-1eee"
    );
    assert_eq!(*emit(&[1i32, 2, 3][..]), *b"li1ei2ei3ee");
}

#[test]
fn dicts() {
    assert_eq!(*encode_dict(&Dict::new()), *b"de");

    let dict: Dict = [
        (b"spam".to_vec(), Value::from("eggs")),
        (b"cow".to_vec(), Value::from("moo")),
    ]
    .into_iter()
    .collect();
    assert_eq!(*encode_dict(&dict), *b"d3:cow3:moo4:spam4:eggse");
}

#[test]
fn canonical_key_order() {
    // Keys sort by raw byte value, so a prefix sorts before its extensions
    let mut dict = Dict::new();
    dict.insert(hex!("ff").to_vec(), Value::Integer(4));
    dict.insert(b"ab".to_vec(), Value::Integer(3));
    dict.insert(b"a".to_vec(), Value::Integer(2));
    dict.insert(b"B".to_vec(), Value::Integer(1));
    let mut expected = b"d1:Bi1e1:ai2e2:abi3e1:".to_vec();
    expected.extend_from_slice(&hex!("ff"));
    expected.extend_from_slice(b"i4ee");
    assert_eq!(encode_dict(&dict), expected);

    // Construction order does not matter
    let mut reversed = Dict::new();
    for (k, v) in dict.iter().rev() {
        reversed.insert(k.clone(), v.clone());
    }
    assert_eq!(encode_dict(&reversed), encode_dict(&dict));
}

#[test]
fn map_types() {
    let mut m = BTreeMap::new();
    m.insert("zebra", 1i64);
    m.insert("apple", 2i64);
    assert_eq!(*emit(&m), *b"d5:applei2e5:zebrai1ee");
}

#[cfg(feature = "std")]
#[test]
fn hash_map() {
    let mut h = std::collections::HashMap::new();
    for (i, k) in ["d", "c", "b", "a", "e"].into_iter().enumerate() {
        h.insert(String::from(k), i as i64);
    }
    assert_eq!(*emit(&h), *b"d1:ai3e1:bi2e1:ci1e1:di0e1:ei4ee");
}

#[test]
fn builders() {
    let data = emit_dict(|d| {
        d.emit("name", "alice");
        d.emit_list("list", |l| {
            l.emit(&1i64);
            l.emit("two");
            l.emit_dict(|d| d.emit("x", &0i64));
        });
        d.emit("age", &30i64);
        assert_eq!(d.len(), 3);
    });
    assert_eq!(
        *data,
        *b"d3:agei30e4:listli1e3:twod1:xi0eee4:name5:alicee"
    );

    // Repeated keys keep the last value
    let data = emit_dict(|d| {
        d.emit("k", &1i64);
        d.emit("k", &2i64);
    });
    assert_eq!(*data, *b"d1:ki2ee");

    let data = emit_list(|l| {
        l.emit_list(|_| {});
        l.emit_dict(|_| {});
    });
    assert_eq!(*data, *b"lledee");

    let mut e = Encoder::new();
    e.emit_integer(1);
    e.emit_raw_slice(b"le");
    assert_eq!(e.offset(), 5);
    assert_eq!(*e.build(), *b"i1ele");
}

#[test]
fn round_trip() {
    let values = [
        Value::Integer(0),
        Value::Integer(i64::MIN),
        Value::Bytes(Vec::new()),
        Value::Bytes(hex!("00010203fffefd3a65").to_vec()),
        Value::List(vec![]),
        Value::Dict(Dict::new()),
        Value::from_iter([
            (
                "info",
                Value::from_iter([
                    ("length", Value::Integer(1 << 40)),
                    ("name", Value::from("file.iso")),
                    (
                        "pieces",
                        Value::from(&hex!("0102030405060708090a0b0c0d0e0f1011121314")),
                    ),
                ]),
            ),
            (
                "announce-list",
                Value::from_iter([
                    Value::from_iter([Value::from("udp://tracker.example:80")]),
                    Value::List(vec![]),
                ]),
            ),
            ("", Value::Integer(-1)),
        ]),
    ];

    for value in values {
        let encoded = encode(&value);
        let decoded = parse::<Value>(&encoded).unwrap();
        assert_eq!(decoded, value);
        // Canonical output is stable
        assert_eq!(encode(&decoded), encoded);
    }
}

#[test]
fn canonical_reencode() {
    // Decoding then encoding puts unsorted input into canonical form
    let value = parse::<Value>(b"d4:spam4:eggs3:cow3:mooe").unwrap();
    assert_eq!(*encode(&value), *b"d3:cow3:moo4:spam4:eggse");

    // Lengths lose their leading zeros
    let value = parse::<Value>(b"l02:abe").unwrap();
    assert_eq!(*encode(&value), *b"l2:abe");
}
