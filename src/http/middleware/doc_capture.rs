//! Documentation capture middleware.
//! Records successful exchanges as documentation examples.
//!
//! The response is returned as soon as the handler produces it; its body
//! is copied on the way out and the call is queued when the body ends.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::doc::extract::{capture_request, declared_length, read_response_headers};
use crate::doc::tee::RecordingBody;
use crate::doc::Recorder;
use crate::observability::metrics;

pub async fn doc_capture_middleware(
    State(recorder): State<Recorder>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // 1. Disabled: pure pass-through.
    if !recorder.is_on() {
        return next.run(req).await;
    }

    // 2. Icons are never documented.
    let is_icon = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().contains(".ico"))
        .unwrap_or(false);
    if is_icon {
        metrics::record_call_discarded("icon");
        return next.run(req).await;
    }

    // 3. Request side, body handed back intact.
    let (mut call, req) = capture_request(req, recorder.config().max_capture_bytes).await;

    let response = next.run(req).await;
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(
            method = %call.method_type,
            path = %call.current_path,
            status = %status,
            "Not documenting unsuccessful call"
        );
        metrics::record_call_discarded("status");
        return response;
    }

    // 4. Response side. Bodies declaring more than the cap are passed on
    //    untouched; everything else streams through the tee.
    let limit = recorder.config().max_capture_bytes;
    if let Some(len) = declared_length(response.headers()).filter(|len| *len > limit) {
        tracing::debug!(
            path = %call.current_path,
            content_length = len,
            limit,
            "Response body too large to document"
        );
        metrics::record_call_discarded("too_large");
        return response;
    }

    call.response_code = status.as_u16();
    call.response_header = read_response_headers(response.headers());

    // 5. Recorded by the tee once the client has the whole body.
    let (parts, body) = response.into_parts();
    let body = RecordingBody::new(body, call, recorder, limit);
    Response::from_parts(parts, Body::new(body))
}

impl Recorder {
    /// Wrap every route of `router` with [`doc_capture_middleware`].
    pub fn attach<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(middleware::from_fn_with_state(
            self.clone(),
            doc_capture_middleware,
        ))
    }
}
