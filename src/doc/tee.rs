//! Response body tee.
//!
//! # Responsibilities
//! - Forward every frame of a response body to the client as it arrives
//! - Keep a bounded copy of the data frames
//! - Hand the finished [`Call`] to the [`Recorder`] once the body has ended
//!
//! # Design Decisions
//! - Frames, size hint and end-of-stream pass through untouched, so framing
//!   on the wire is the same as without recording
//! - The copy is abandoned as soon as it would exceed the capture limit;
//!   a body that never ends is never documented
//! - Completion is detected from either the final `None` frame or
//!   `is_end_stream`, since the server stops polling a body of known length
//!   once its last byte is written

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use hyper::body::{Body as HttpBody, Frame, SizeHint};

use crate::doc::model::Call;
use crate::doc::recorder::Recorder;
use crate::observability::metrics;

struct Capture {
    call: Call,
    recorder: Recorder,
    buf: Vec<u8>,
    limit: usize,
}

/// A response body that records its exchange once fully sent.
pub struct RecordingBody {
    inner: Body,
    capture: Option<Capture>,
}

impl RecordingBody {
    /// Wrap `inner`. `call` must already carry the request side, status and
    /// response headers; only `ResponseBody` is filled in here.
    pub fn new(inner: Body, call: Call, recorder: Recorder, limit: usize) -> Self {
        let mut body = Self {
            inner,
            capture: Some(Capture {
                call,
                recorder,
                buf: Vec::new(),
                limit,
            }),
        };
        // An empty body may never be polled at all.
        if body.inner.is_end_stream() {
            body.finish();
        }
        body
    }

    fn observe(&mut self, data: &Bytes) {
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        if capture.buf.len() + data.len() > capture.limit {
            tracing::debug!(
                path = %capture.call.current_path,
                limit = capture.limit,
                "Response body too large to document"
            );
            metrics::record_call_discarded("too_large");
            self.capture = None;
            return;
        }
        capture.buf.extend_from_slice(data);
    }

    fn finish(&mut self) {
        let Some(mut capture) = self.capture.take() else {
            return;
        };
        capture.call.response_body = String::from_utf8_lossy(&capture.buf).into_owned();
        capture.recorder.record(capture.call);
    }

    fn abandon(&mut self, reason: &'static str) {
        if let Some(capture) = self.capture.take() {
            tracing::debug!(
                path = %capture.call.current_path,
                reason,
                "Response body not completed, not documenting"
            );
            metrics::record_call_discarded(reason);
        }
    }
}

impl HttpBody for RecordingBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.observe(data);
                }
                if this.inner.is_end_stream() {
                    this.finish();
                }
            }
            Poll::Ready(Some(Err(_))) => this.abandon("body_error"),
            Poll::Ready(None) => this.finish(),
            Poll::Pending => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for RecordingBody {
    fn drop(&mut self) {
        self.abandon("incomplete");
    }
}
