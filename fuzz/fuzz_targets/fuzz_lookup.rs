#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

#[derive(Arbitrary, Debug)]
struct Input {
    rows: Vec<(String, String)>,
    query: String,
}

fuzz_target!(|input: Input| {
    let mut source = String::from("id,value\n");
    for (id, value) in &input.rows {
        source.push_str(&format!("\"{}\",\"{}\"\n", id.replace('"', "\"\""), value.replace('"', "\"\"")));
    }

    let Ok(index) = getitems::index::build_index_from_reader(Cursor::new(source)) else {
        return;
    };

    let ids = getitems::server::parse_ids(&input.query);
    let response = getitems::server::lookup(&index, &ids);
    if response.is_ok() {
        // Successful bodies are always a well-formed JSON array
        let value: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(ids.len()));
    }
});
