//! Lookup semantics and response bodies
//!
//! A lookup resolves an ordered list of ids against the index:
//! - no ids: `200` with `[]`
//! - all found: `200` with the rendered records joined by `,` inside `[` `]`,
//!   in request order, repeats included
//! - any miss: `404` with the fixed text `id is absent in data`

use crate::index::Index;
use thiserror::Error;

/// Query parameter carrying the requested ids
pub const ID_PARAM: &str = "id";

/// Body returned when a requested id is not indexed
pub const ID_ABSENT_BODY: &[u8] = b"id is absent in data";

/// Body returned for a request without ids
pub const EMPTY_LIST_BODY: &[u8] = b"[]";

/// Message inside the JSON body of a 500 response
pub const INTERNAL_ERROR_MESSAGE: &str = "There was an internal server error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("id {0} is absent in data")]
    IdentifierNotFound(String),
}

/// Outcome status of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    Ok,
    NotFound,
}

impl LookupStatus {
    /// HTTP status code for this outcome
    pub fn code(self) -> u16 {
        match self {
            LookupStatus::Ok => 200,
            LookupStatus::NotFound => 404,
        }
    }
}

/// Status and body produced by `lookup`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub status: LookupStatus,
    pub body: Vec<u8>,
}

impl LookupResponse {
    fn ok(body: Vec<u8>) -> Self {
        Self {
            status: LookupStatus::Ok,
            body,
        }
    }

    fn not_found() -> Self {
        Self {
            status: LookupStatus::NotFound,
            body: ID_ABSENT_BODY.to_vec(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == LookupStatus::Ok
    }
}

/// Concatenate rendered records for `ids` into a JSON array.
///
/// Stops at the first unknown id; nothing assembled so far is returned.
pub fn assemble<I, S>(index: &Index, ids: I) -> Result<Vec<u8>, LookupError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ids = ids.into_iter().peekable();
    if ids.peek().is_none() {
        return Ok(EMPTY_LIST_BODY.to_vec());
    }

    let mut body = vec![b'['];
    for (i, id) in ids.enumerate() {
        let id = id.as_ref();
        let record = index
            .get(id)
            .ok_or_else(|| LookupError::IdentifierNotFound(id.to_string()))?;
        if i > 0 {
            body.push(b',');
        }
        body.extend_from_slice(record.as_bytes());
    }

    body.push(b']');
    Ok(body)
}

/// Resolve `ids` against the index and produce the response to send.
pub fn lookup<I, S>(index: &Index, ids: I) -> LookupResponse
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match assemble(index, ids) {
        Ok(body) => LookupResponse::ok(body),
        Err(LookupError::IdentifierNotFound(id)) => {
            tracing::debug!(%id, "lookup miss");
            LookupResponse::not_found()
        }
    }
}

/// Extract every `id` value from a URL query string, in order.
///
/// Values are decoded with `application/x-www-form-urlencoded` rules.
pub fn parse_ids(query: &str) -> Vec<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .collect()
}
