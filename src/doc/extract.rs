//! Request/response extraction into [`Call`] fields.
//!
//! # Responsibilities
//! - Flatten header maps, dropping transport headers on the request side
//! - Decode URL query parameters (first value per key)
//! - Capture the request body as text or decoded form fields,
//!   depending on the Content-Type
//!
//! # Design Decisions
//! - Buffer-and-replace: the drained body is re-attached to the request so
//!   the downstream handler reads exactly the bytes the client sent. Reads
//!   stop at the capture limit and the consumed prefix is replayed in front
//!   of the unread rest
//! - Chunked transfer coding is already removed by the server, so the
//!   captured body is the decoded payload
//! - Malformed input never fails the request; the offending part is skipped

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, Uri};
use futures_util::{stream, StreamExt};
use hyper::body::Body as HttpBody;
use std::convert::Infallible;
use std::pin::Pin;

use crate::doc::error::{DocError, DocResult};
use crate::doc::model::{Call, FieldMap};

/// In-memory cap for each multipart text field (32 MB).
pub const MAX_IN_MEMORY_MULTIPART_SIZE: u64 = 32_000_000;

/// Headers that vary per client and carry no documentation value.
pub const COMMON_HEADERS: [&str; 8] = [
    "Accept",
    "Accept-Encoding",
    "Accept-Language",
    "Cache-Control",
    "Connection",
    "Cookie",
    "Origin",
    "User-Agent",
];

/// Framing headers that describe the connection, not the API.
const TRANSPORT_HEADERS: [&str; 4] = ["Host", "Content-Length", "Transfer-Encoding", "Trailer"];

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const JSON_OR_FORM: &str = "application/json, application/x-www-form-urlencoded";
const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";

/// How a request body is captured, decided by its Content-Type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// `key=value` pairs joined by `&`, stored in `PostForm`.
    Form,
    /// Raw JSON text, stored in `RequestBody`.
    Json,
    /// Multipart fields, stored in `PostForm`.
    Multipart,
    /// Anything else, stored verbatim in `RequestBody`.
    Raw,
}

impl BodyKind {
    pub fn classify(content_type: &str) -> Self {
        match content_type.trim() {
            FORM_URLENCODED | JSON_OR_FORM => BodyKind::Form,
            JSON => BodyKind::Json,
            ct if ct.contains(MULTIPART) => BodyKind::Multipart,
            _ => BodyKind::Raw,
        }
    }
}

/// Returns true for headers stripped from recorded requests at merge time.
pub fn is_common_header(name: &str) -> bool {
    COMMON_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

fn is_excluded_request_header(name: &str) -> bool {
    is_common_header(name) || TRANSPORT_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// `content-type` → `Content-Type`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn flatten_headers(headers: &HeaderMap, separator: &str, keep: impl Fn(&str) -> bool) -> FieldMap {
    let mut out = FieldMap::new();
    for name in headers.keys() {
        if !keep(name.as_str()) {
            continue;
        }
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(separator);
        out.insert(canonical_header_name(name.as_str()), joined);
    }
    out
}

/// Request headers minus common and transport headers.
pub fn read_request_headers(headers: &HeaderMap) -> FieldMap {
    flatten_headers(headers, ", ", |name| !is_excluded_request_header(name))
}

/// Every response header, repeated values joined by a space.
pub fn read_response_headers(headers: &HeaderMap) -> FieldMap {
    flatten_headers(headers, " ", |_| true)
}

/// Query parameters, first value per key.
pub fn read_query_params(uri: &Uri) -> FieldMap {
    let mut params = FieldMap::new();
    let Some(query) = uri.query() else {
        return params;
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Decode `a=1&b=2` without percent-decoding. Pairs lacking `=` are skipped.
pub fn read_post_form(body: &str) -> FieldMap {
    let mut form = FieldMap::new();
    for pair in body.split('&') {
        match pair.split_once('=') {
            Some((key, value)) => {
                form.insert(key.to_string(), value.to_string());
            }
            None if pair.is_empty() => {}
            None => tracing::debug!(pair = %pair, "Skipping form pair without '='"),
        }
    }
    form
}

/// Decode the non-file fields of a multipart body, keeping the first value
/// of each field.
///
/// The in-memory cap applies to each text field; file parts are skipped
/// unread, so a large upload still yields its text fields.
pub async fn read_multipart_form(content_type: &str, body: Bytes) -> DocResult<FieldMap> {
    let boundary = multer::parse_boundary(content_type)?;
    let chunks = stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(chunks, boundary);

    let mut form = FieldMap::new();
    while let Some(mut field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if form.contains_key(&name) {
            continue;
        }
        let mut value = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if (value.len() + chunk.len()) as u64 > MAX_IN_MEMORY_MULTIPART_SIZE {
                return Err(DocError::FieldTooLarge {
                    name,
                    limit: MAX_IN_MEMORY_MULTIPART_SIZE,
                });
            }
            value.extend_from_slice(&chunk);
        }
        form.insert(name, String::from_utf8_lossy(&value).into_owned());
    }
    Ok(form)
}

/// `Content-Length` as sent, if present and numeric.
pub fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Outcome of draining a request body under a size cap. The non-complete
/// variants carry a body that replays exactly what the client sent.
enum BodyRead {
    Complete(Bytes),
    TooLarge(Body),
    Failed(Body),
}

async fn read_body_limited(mut body: Body, limit: usize) -> BodyRead {
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut read = 0usize;
    loop {
        let next = std::future::poll_fn(|cx| Pin::new(&mut body).poll_frame(cx)).await;
        match next {
            None => {
                let mut buf = Vec::with_capacity(read);
                chunks.iter().for_each(|c| buf.extend_from_slice(c));
                return BodyRead::Complete(Bytes::from(buf));
            }
            Some(Ok(frame)) => {
                let Ok(data) = frame.into_data() else {
                    continue;
                };
                read += data.len();
                chunks.push(data);
                if read > limit {
                    let replay = stream::iter(chunks.into_iter().map(Ok::<_, axum::Error>))
                        .chain(body.into_data_stream());
                    return BodyRead::TooLarge(Body::from_stream(replay));
                }
            }
            Some(Err(e)) => {
                let replay = stream::iter(chunks.into_iter().map(Ok).chain(std::iter::once(Err(e))));
                return BodyRead::Failed(Body::from_stream(replay));
            }
        }
    }
}

/// Build the request side of a [`Call`] and hand back an equivalent request.
///
/// The returned request carries the same body bytes. Bodies larger than
/// `max_capture_bytes`, declared or actual, are not captured; a body that
/// fails mid-read is replayed up to the failure, then fails the same way.
pub async fn capture_request(req: Request<Body>, max_capture_bytes: usize) -> (Call, Request<Body>) {
    let mut call = Call {
        current_path: req.uri().path().to_string(),
        method_type: req.method().to_string(),
        request_header: read_request_headers(req.headers()),
        request_url_params: read_query_params(req.uri()),
        ..Call::default()
    };

    let Some(content_type) = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    else {
        return (call, req);
    };

    if let Some(len) = declared_length(req.headers()).filter(|len| *len > max_capture_bytes) {
        tracing::debug!(
            path = %call.current_path,
            content_length = len,
            limit = max_capture_bytes,
            "Request body too large to capture"
        );
        return (call, req);
    }

    let (parts, body) = req.into_parts();
    let bytes = match read_body_limited(body, max_capture_bytes).await {
        BodyRead::Complete(bytes) => bytes,
        BodyRead::TooLarge(body) => {
            tracing::debug!(
                path = %call.current_path,
                limit = max_capture_bytes,
                "Request body too large to capture"
            );
            return (call, Request::from_parts(parts, body));
        }
        BodyRead::Failed(body) => {
            tracing::warn!(path = %call.current_path, "Failed to read request body");
            return (call, Request::from_parts(parts, body));
        }
    };

    match BodyKind::classify(&content_type) {
        BodyKind::Form => {
            call.post_form = read_post_form(&String::from_utf8_lossy(&bytes));
        }
        BodyKind::Json | BodyKind::Raw => {
            call.request_body = String::from_utf8_lossy(&bytes).into_owned();
        }
        BodyKind::Multipart => {
            call.request_header
                .insert("Content-Type".to_string(), MULTIPART.to_string());
            match read_multipart_form(&content_type, bytes.clone()).await {
                Ok(form) => call.post_form = form,
                Err(e) => {
                    tracing::warn!(path = %call.current_path, error = %e, "Failed to decode multipart body")
                }
            }
        }
    }

    (call, Request::from_parts(parts, Body::from(bytes)))
}
