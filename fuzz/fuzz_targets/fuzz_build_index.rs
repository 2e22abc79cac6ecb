#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce an index or an error, never a panic
    if let Ok(index) = getitems::index::build_index_from_reader(data) {
        for id in index.ids() {
            let record = index.get(id).unwrap();
            assert!(serde_json::from_slice::<serde_json::Value>(record.as_bytes()).is_ok());
        }
    }
});
