use crate::index::error::{BuildError, Result};
use crate::index::quotes::QuoteCheck;
use crate::index::types::{Index, Record, Schema};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, info_span};

/// Build the index from a CSV file on disk.
///
/// The file handle is dropped before this returns, on success or failure.
pub fn build_index(path: &Path) -> Result<Index> {
    let _span = info_span!("build_index", path = %path.display()).entered();
    let file = File::open(path).map_err(BuildError::SourceRead)?;
    build_index_from_reader(file)
}

/// Build the index from any CSV byte source.
///
/// The first record is the header. Rows are rendered to JSON as they are
/// read, so the whole build is a single pass over the input.
pub fn build_index_from_reader<R: Read>(source: R) -> Result<Index> {
    let started = Instant::now();

    // Row width is checked below, not by the reader
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(QuoteCheck::new(source));

    let mut row = StringRecord::new();
    if !reader.read_record(&mut row)? {
        return Err(BuildError::MissingHeader);
    }

    let schema = Schema::from_header(row.iter())?;
    debug!(columns = ?schema.columns(), "header accepted");

    let mut index = Index::with_schema(schema);
    let mut row_number = 0usize;

    while reader.read_record(&mut row)? {
        if row.is_empty() {
            continue;
        }
        row_number += 1;

        let want = index.schema().len();
        if row.len() != want {
            return Err(BuildError::RowShape {
                row: row_number,
                line: row.position().map_or(0, |p| p.line()),
                got: row.len(),
                want,
            });
        }

        let id = &row[index.schema().id_position()];
        let rendered = Record::new(index.schema(), row.iter())
            .render()
            .map_err(|source| BuildError::Render {
                row: row_number,
                source,
            })?;

        index.insert(id, rendered)?;
    }

    info!(
        records = index.len(),
        columns = index.schema().len(),
        bytes = index.rendered_bytes(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "index ready"
    );

    Ok(index)
}
