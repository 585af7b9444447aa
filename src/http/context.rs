//! Per-request execution context.
//!
//! # Responsibilities
//! - Carry the parsed request (method, path, headers, buffered body)
//! - Carry route parameters bound by the matcher
//! - Collect the response exactly one pipeline step writes
//!
//! # Design Decisions
//! - Exclusively owned by one pipeline execution; never shared across requests
//! - The body is fully buffered before the pipeline runs; decoding it is
//!   deferred to whichever handler first needs it, so a malformed body is a
//!   client error at that handler rather than a router crash
//! - Response headers accumulate separately so middleware (CORS) can attach
//!   headers before any step decides the status

use std::collections::HashMap;
use std::convert::Infallible;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::Response;
use futures_util::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// Response payload written by a pipeline step.
enum ResponseBody {
    Full(Bytes),
    Stream(BoxStream<'static, Result<Bytes, Infallible>>),
}

struct ResponseParts {
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: ResponseBody,
}

/// The live request/response pair for one pipeline execution.
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    pub params: HashMap<String, String>,
    response_headers: HeaderMap,
    response: Option<ResponseParts>,
}

impl RequestContext {
    pub fn new(method: Method, path: String, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path,
            headers,
            body,
            params: HashMap::new(),
            response_headers: HeaderMap::new(),
            response: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A route parameter bound by the matcher, verbatim from the path.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Decode the buffered body as JSON. An empty or absent body decodes as
    /// an empty object; a malformed one is a client error.
    pub fn json_body<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let bytes: &[u8] = if self.body.is_empty() {
            b"{}"
        } else {
            self.body.as_ref()
        };
        serde_json::from_slice(bytes)
            .map_err(|err| ApiError::BadRequest(format!("Invalid request body: {err}")))
    }

    /// Attach a header to whatever response is eventually written.
    pub fn insert_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.insert(name, value);
    }

    /// Write a JSON response. Overwrites any previously written response.
    pub fn json<T: Serialize>(&mut self, status: StatusCode, value: &T) -> ApiResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.response = Some(ResponseParts {
            status,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: ResponseBody::Full(Bytes::from(bytes)),
        });
        Ok(())
    }

    /// Write an empty response (used by the CORS preflight short-circuit).
    pub fn no_content(&mut self, status: StatusCode) {
        self.response = Some(ResponseParts {
            status,
            content_type: None,
            body: ResponseBody::Full(Bytes::new()),
        });
    }

    /// Write a streaming response (used by the event-subscription handler).
    pub fn stream(
        &mut self,
        content_type: HeaderValue,
        stream: BoxStream<'static, Result<Bytes, Infallible>>,
    ) {
        self.response = Some(ResponseParts {
            status: StatusCode::OK,
            content_type: Some(content_type),
            body: ResponseBody::Stream(stream),
        });
    }

    /// Whether some step has already written a response.
    pub fn response_sent(&self) -> bool {
        self.response.is_some()
    }

    /// Status of the written response, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().map(|r| r.status)
    }

    /// Consume the context and build the final HTTP response.
    ///
    /// A pipeline that completed without writing anything is a handler defect;
    /// the client still gets a well-formed JSON error rather than a dropped
    /// connection.
    pub fn into_response(self) -> Response {
        let parts = self.response.unwrap_or_else(|| ResponseParts {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: ResponseBody::Full(Bytes::from_static(b"{\"error\":\"Empty response\"}")),
        });

        let body = match parts.body {
            ResponseBody::Full(bytes) => Body::from(bytes),
            ResponseBody::Stream(stream) => Body::from_stream(stream),
        };

        let mut response = Response::new(body);
        *response.status_mut() = parts.status;
        let headers = response.headers_mut();
        headers.extend(self.response_headers);
        if let Some(content_type) = parts.content_type {
            headers.insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        code: String,
    }

    fn ctx(body: &str) -> RequestContext {
        RequestContext::new(
            Method::POST,
            "/api/test".to_string(),
            HeaderMap::new(),
            Bytes::from(body.to_string()),
        )
    }

    #[test]
    fn empty_body_decodes_as_empty_object() {
        let value: serde_json::Value = ctx("").json_body().unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn malformed_body_is_a_client_error() {
        let err = ctx("{not json").json_body::<Payload>().unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("Invalid request body")),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn json_response_sets_content_type() {
        let mut ctx = ctx("");
        ctx.json(StatusCode::OK, &serde_json::json!({"ok": true}))
            .unwrap();
        assert!(ctx.response_sent());
        assert_eq!(ctx.status(), Some(StatusCode::OK));

        let response = ctx.into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn missing_response_becomes_a_json_500() {
        let response = ctx("").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
