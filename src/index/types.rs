use crate::index::error::{BuildError, Result};
use ahash::{AHashMap, AHashSet};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Name of the column whose values key the index
pub const ID_COLUMN: &str = "id";

/// Ordered column names taken from the header record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
    id_position: usize,
}

impl Schema {
    /// Validate header cells and build a schema from them.
    ///
    /// Names must be unique and one of them must be exactly `id`.
    pub fn from_header<'a, I>(cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut columns = Vec::new();
        let mut seen = AHashSet::new();

        for cell in cells {
            if !seen.insert(cell) {
                return Err(BuildError::DuplicateColumn(cell.to_string()));
            }
            columns.push(cell.to_string());
        }

        let id_position = columns
            .iter()
            .position(|c| c == ID_COLUMN)
            .ok_or(BuildError::MissingIdColumn)?;

        Ok(Self {
            columns,
            id_position,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the `id` column within each row
    pub fn id_position(&self) -> usize {
        self.id_position
    }
}

/// One data row as (column, value) pairs in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> Record<'a> {
    /// Pair each value with its column. Callers check the row width first.
    pub fn new<I>(schema: &'a Schema, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields = schema
            .columns
            .iter()
            .map(String::as_str)
            .zip(values)
            .collect();
        Self { fields }
    }

    /// Encode the record as a JSON object
    pub fn render(&self) -> serde_json::Result<RenderedRecord> {
        let bytes = serde_json::to_vec(self)?;
        Ok(RenderedRecord(bytes.into_boxed_slice()))
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// A record already encoded as its JSON object bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRecord(Box<[u8]>);

impl RenderedRecord {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

/// Immutable id -> rendered record mapping plus the schema it was built with
#[derive(Debug)]
pub struct Index {
    schema: Schema,
    records: AHashMap<String, RenderedRecord>,
    rendered_bytes: usize,
}

impl Index {
    pub(crate) fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            records: AHashMap::new(),
            rendered_bytes: 0,
        }
    }

    /// Insert a record under a new id. Fails if the id is already present.
    pub(crate) fn insert(&mut self, id: &str, record: RenderedRecord) -> Result<()> {
        if self.records.contains_key(id) {
            return Err(BuildError::DuplicateId(id.to_string()));
        }
        self.rendered_bytes += record.len();
        self.records.insert(id.to_string(), record);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn get(&self, id: &str) -> Option<&RenderedRecord> {
        self.records.get(id)
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total size of all rendered records in bytes
    pub fn rendered_bytes(&self) -> usize {
        self.rendered_bytes
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(cells: &[&str]) -> Schema {
        Schema::from_header(cells.iter().copied()).unwrap()
    }

    #[test]
    fn test_schema_keeps_header_order() {
        let s = schema(&["#", "id", "uid"]);
        assert_eq!(s.columns(), &["#", "id", "uid"]);
        assert_eq!(s.id_position(), 1);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_schema_rejects_duplicate_column() {
        let err = Schema::from_header(["id", "name", "name"]).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateColumn(ref c) if c == "name"));
    }

    #[test]
    fn test_schema_requires_exact_id_column() {
        let err = Schema::from_header(["ID", "Id", "uid"]).unwrap_err();
        assert!(matches!(err, BuildError::MissingIdColumn));
    }

    #[test]
    fn test_record_renders_in_schema_order() {
        let s = schema(&["zeta", "id", "alpha"]);
        let record = Record::new(&s, ["z", "7", "a"]);
        let rendered = record.render().unwrap();
        assert_eq!(rendered.as_bytes(), br#"{"zeta":"z","id":"7","alpha":"a"}"#);
    }

    #[test]
    fn test_record_escapes_values() {
        let s = schema(&["id", "note"]);
        let record = Record::new(&s, ["1", "say \"hi\",\nbye"]);
        let rendered = record.render().unwrap();
        assert_eq!(
            std::str::from_utf8(rendered.as_bytes()).unwrap(),
            r#"{"id":"1","note":"say \"hi\",\nbye"}"#
        );
    }

    #[test]
    fn test_index_rejects_duplicate_id() {
        let s = schema(&["id"]);
        let mut index = Index::with_schema(s.clone());
        let first = Record::new(&s, ["1"]).render().unwrap();
        index.insert("1", first.clone()).unwrap();

        let err = index.insert("1", first).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateId(ref id) if id == "1"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.rendered_bytes(), br#"{"id":"1"}"#.len());
    }
}
