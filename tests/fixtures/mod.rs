//! Shared helpers for integration tests

use std::io::Write;
use tempfile::NamedTempFile;

/// Source used by most scenarios: `#` first, `id` second, non-ASCII values
pub const HASH_FIRST_CSV: &str = "#,id,uid
1,872,S-1-5-21-3686381713-1037878038-1682765610-1877
2,фыва,S-1-5-21-3686381713-1037878038-1682765610-2544
3,7079,абвгдеёж
";

/// Same rows with `id` as the first column
pub const ID_FIRST_CSV: &str = "id,fffid,uid
1,872,S-1-5-21-3686381713-1037878038-1682765610-1877
2,фыва,S-1-5-21-3686381713-1037878038-1682765610-2544
3,7079,абвгдеёж
";

/// Write `text` to a temp file that lives as long as the returned handle
pub fn write_csv(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(text.as_bytes()).expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}
