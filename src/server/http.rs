//! HTTP binding for lookups

use crate::index::Index;
use crate::server::protocol::{
    lookup, parse_ids, LookupResponse, LookupStatus, INTERNAL_ERROR_MESSAGE,
};
use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, Level};

/// Path of the lookup endpoint
pub const GET_ITEMS_PATH: &str = "/get-items";

/// Build the application router serving lookups against `index`
pub fn router(index: Arc<Index>) -> Router {
    let routes = Router::new()
        .route(GET_ITEMS_PATH, get(get_items))
        // Strict-slash routers answer this with a 301 to `/get-items`; we serve it directly
        .route("/get-items/", get(get_items));

    with_middleware(routes).with_state(index)
}

/// Wrap routes with panic recovery and request logging.
///
/// Request logging sits outside panic recovery so recovered 500s are logged too.
pub(crate) fn with_middleware<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes.layer(CatchPanicLayer::custom(handle_panic)).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

async fn get_items(State(index): State<Arc<Index>>, RawQuery(query): RawQuery) -> LookupResponse {
    let ids = parse_ids(query.as_deref().unwrap_or_default());
    lookup(&index, &ids)
}

impl IntoResponse for LookupResponse {
    fn into_response(self) -> Response {
        let (status, content_type) = match self.status {
            LookupStatus::Ok => (StatusCode::OK, "application/json"),
            LookupStatus::NotFound => (StatusCode::NOT_FOUND, "text/plain; charset=utf-8"),
        };
        (status, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index_from_reader;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use std::io::Cursor;
    use tower::ServiceExt;

    fn app() -> Router {
        let index = build_index_from_reader(Cursor::new("#,id,uid\n1,872,S-1\n2,фыва,S-2\n")).unwrap();
        router(Arc::new(index))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn boom() -> &'static str {
        panic!("try to recover me")
    }

    #[tokio::test]
    async fn test_get_items_found() {
        let (status, content_type, body) = send(app(), Method::GET, "/get-items?id=872&id=872").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(
            body,
            r##"[{"#":"1","id":"872","uid":"S-1"},{"#":"1","id":"872","uid":"S-1"}]"##
        );
    }

    #[tokio::test]
    async fn test_get_items_without_ids() {
        let (status, _, body) = send(app(), Method::GET, "/get-items").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_get_items_trailing_slash() {
        let (status, _, body) = send(app(), Method::GET, "/get-items/?id=872").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r##"[{"#":"1","id":"872","uid":"S-1"}]"##);
    }

    #[tokio::test]
    async fn test_get_items_missing() {
        let (status, content_type, body) = send(app(), Method::GET, "/get-items?id=872&id=8720").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(body, "id is absent in data");
    }

    #[tokio::test]
    async fn test_get_items_rejects_post() {
        let (status, _, _) = send(app(), Method::POST, "/get-items?id=872").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_panic_is_recovered() {
        let app = with_middleware(Router::new().route("/boom", get(boom)));
        let (status, content_type, body) = send(app, Method::GET, "/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, r#"{"error":"There was an internal server error"}"#);

        let app = with_middleware(Router::new().route("/ok", get(|| async { "fine" })));
        let (status, _, body) = send(app, Method::GET, "/ok").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "fine");
    }
}
