//! JSON request helper for the backend API.
//!
//! Every request goes to [`API_BASE`] + endpoint with a default JSON
//! content type. Non-2xx responses fail with [`ApiError::Status`] without
//! reading the body; transport failures propagate as
//! [`ApiError::Transport`]. No retries, timeouts or caching.

#![allow(async_fn_in_trait)]

use js_sys::Reflect;
use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::config::{API_BASE, CONTENT_TYPE_HEADER, DEFAULT_CONTENT_TYPE};
use crate::core::error::ApiError;
use crate::utils::dom;

// =============================================================================
// Request Options
// =============================================================================

/// Caller-supplied request options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// HTTP method, `GET` by default.
    pub method: String,
    /// Raw request body.
    pub body: Option<String>,
    /// Extra headers; a name matching a default header replaces it.
    pub headers: Vec<(String, String)>,
    /// Remaining fetch settings, passed through untouched.
    pub init: FetchInit,
}

/// Fetch settings beyond method, body and headers.
///
/// Values are handed to the browser as-is; the browser rejects unknown
/// enumeration values when the request is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchInit {
    pub credentials: Option<String>,
    pub mode: Option<String>,
    pub cache: Option<String>,
    pub redirect: Option<String>,
    pub referrer: Option<String>,
    pub referrer_policy: Option<String>,
    pub integrity: Option<String>,
    pub keepalive: Option<bool>,
}

impl FetchInit {
    /// String settings that are present, as `(RequestInit key, value)` pairs.
    pub fn string_entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("credentials", &self.credentials),
            ("mode", &self.mode),
            ("cache", &self.cache),
            ("redirect", &self.redirect),
            ("referrer", &self.referrer),
            ("referrerPolicy", &self.referrer_policy),
            ("integrity", &self.integrity),
        ]
        .into_iter()
        .filter_map(|(key, value)| Some((key, value.as_deref()?)))
        .collect()
    }

    fn apply(&self, opts: &RequestInit) -> Result<(), JsValue> {
        for (key, value) in self.string_entries() {
            Reflect::set(opts, &JsValue::from_str(key), &JsValue::from_str(value))?;
        }
        if let Some(keepalive) = self.keepalive {
            Reflect::set(
                opts,
                &JsValue::from_str("keepalive"),
                &JsValue::from_bool(keepalive),
            )?;
        }
        Ok(())
    }
}

/// Methods the Fetch API upper-cases; any other method is sent as written.
const NORMALIZED_METHODS: [&str; 6] = ["DELETE", "GET", "HEAD", "OPTIONS", "POST", "PUT"];

/// Normalize `method` the way `fetch` does.
pub fn normalize_method(method: &str) -> String {
    NORMALIZED_METHODS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(method))
        .map_or_else(|| method.to_string(), |known| known.to_string())
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::with_method("GET")
    }

    pub fn delete() -> Self {
        Self::with_method("DELETE")
    }

    /// `POST` with `payload` serialized as JSON.
    pub fn post_json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ApiError> {
        Self::with_method("POST").json_body(payload)
    }

    /// `PUT` with `payload` serialized as JSON.
    pub fn put_json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ApiError> {
        Self::with_method("PUT").json_body(payload)
    }

    pub fn with_method(method: &str) -> Self {
        Self {
            method: normalize_method(method),
            body: None,
            headers: Vec::new(),
            init: FetchInit::default(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn json_body<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::RequestBuild(e.to_string()))?;
        Ok(self.with_body(body))
    }
}

/// Merge caller headers over `defaults`.
///
/// Header names compare case-insensitively. A caller header replaces the
/// default of the same name in place; the rest are appended in caller order.
pub fn merge_headers(
    defaults: &[(&str, &str)],
    caller: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    for (name, value) in caller {
        match merged
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }

    merged
}

/// Fully resolved request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub init: FetchInit,
}

// =============================================================================
// Transport
// =============================================================================

/// Response returned by a [`Transport`]; the body is read lazily.
pub trait TransportResponse {
    fn status(&self) -> u16;

    /// Consume the response and read its body as text.
    async fn text(self) -> Result<String, ApiError>;
}

/// Something that can carry an [`ApiRequest`] to the server.
pub trait Transport {
    type Response: TransportResponse;

    async fn send(&self, request: &ApiRequest) -> Result<Self::Response, ApiError>;
}

/// Transport over the browser Fetch API.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

/// Wrapper around a `web_sys::Response`.
#[derive(Debug)]
pub struct FetchResponse(Response);

impl TransportResponse for FetchResponse {
    fn status(&self) -> u16 {
        self.0.status()
    }

    async fn text(self) -> Result<String, ApiError> {
        let promise = self
            .0
            .text()
            .map_err(|e| ApiError::ResponseRead(dom::js_error_message(&e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| ApiError::ResponseRead(dom::js_error_message(&e)))?;
        text.as_string()
            .ok_or_else(|| ApiError::ResponseRead("body is not text".to_string()))
    }
}

impl Transport for FetchTransport {
    type Response = FetchResponse;

    async fn send(&self, request: &ApiRequest) -> Result<FetchResponse, ApiError> {
        let window = dom::window().ok_or(ApiError::NoWindow)?;
        let build_err = |e: JsValue| ApiError::RequestBuild(dom::js_error_message(&e));

        let headers = Headers::new().map_err(build_err)?;
        for (name, value) in &request.headers {
            headers.set(name, value).map_err(build_err)?;
        }

        let opts = RequestInit::new();
        opts.set_method(&request.method);
        opts.set_headers(&headers);
        if let Some(body) = &request.body {
            opts.set_body(&JsValue::from_str(body));
        }
        request.init.apply(&opts).map_err(build_err)?;

        let req = Request::new_with_str_and_init(&request.url, &opts).map_err(build_err)?;

        let result = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(|e| ApiError::Transport(dom::js_error_message(&e)))?;
        let response: Response = result
            .dyn_into()
            .map_err(|_| ApiError::Transport("fetch did not yield a Response".to_string()))?;

        Ok(FetchResponse(response))
    }
}

// =============================================================================
// Client
// =============================================================================

/// API client bound to a base path and a transport.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base: String,
    transport: T,
}

impl ApiClient<FetchTransport> {
    /// Client for [`API_BASE`] over the Fetch API.
    pub fn browser() -> Self {
        Self::new(API_BASE, FetchTransport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base: impl Into<String>, transport: T) -> Self {
        Self {
            base: base.into(),
            transport,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve `endpoint` and `options` into the request actually sent.
    pub fn build_request(&self, endpoint: &str, options: &RequestOptions) -> ApiRequest {
        ApiRequest {
            url: format!("{}{}", self.base, endpoint),
            method: options.method.clone(),
            headers: merge_headers(
                &[(CONTENT_TYPE_HEADER, DEFAULT_CONTENT_TYPE)],
                &options.headers,
            ),
            body: options.body.clone(),
            init: options.init.clone(),
        }
    }

    /// Send a request and decode the JSON response body into `R`.
    pub async fn request<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let request = self.build_request(endpoint, &options);
        log::debug!("{} {}", request.method, request.url);

        let response = self.transport.send(&request).await?;
        let status = response.status();
        if !(200..300).contains(&status) {
            log::debug!("{} {} -> {status}", request.method, request.url);
            return Err(ApiError::Status(status));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `GET` shorthand.
    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.request(endpoint, RequestOptions::get()).await
    }

    /// `POST` a JSON payload.
    pub async fn post<B, R>(&self, endpoint: &str, payload: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::post_json(payload)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;

    struct CannedResponse {
        status: u16,
        body: String,
        body_read: std::rc::Rc<Cell<bool>>,
    }

    impl TransportResponse for CannedResponse {
        fn status(&self) -> u16 {
            self.status
        }

        async fn text(self) -> Result<String, ApiError> {
            self.body_read.set(true);
            Ok(self.body)
        }
    }

    /// Replies with a fixed status/body, or a transport failure, and records
    /// what was sent.
    struct CannedTransport {
        reply: Result<(u16, String), ApiError>,
        sent: RefCell<Vec<ApiRequest>>,
        body_read: std::rc::Rc<Cell<bool>>,
    }

    impl CannedTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok((status, body.to_string())),
                sent: RefCell::new(Vec::new()),
                body_read: Default::default(),
            }
        }

        fn failing(err: ApiError) -> Self {
            Self {
                reply: Err(err),
                sent: RefCell::new(Vec::new()),
                body_read: Default::default(),
            }
        }
    }

    impl Transport for CannedTransport {
        type Response = CannedResponse;

        async fn send(&self, request: &ApiRequest) -> Result<CannedResponse, ApiError> {
            self.sent.borrow_mut().push(request.clone());
            let (status, body) = self.reply.clone()?;
            Ok(CannedResponse {
                status,
                body,
                body_read: self.body_read.clone(),
            })
        }
    }

    fn client(transport: CannedTransport) -> ApiClient<CannedTransport> {
        ApiClient::new(API_BASE, transport)
    }

    #[tokio::test]
    async fn test_success_parses_json() {
        let api = client(CannedTransport::replying(200, r#"{"a":1}"#));
        let value: Value = api.get("/health").await.unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_not_found_carries_status_without_reading_body() {
        let api = client(CannedTransport::replying(404, "<html>not found</html>"));
        let err = api.get::<Value>("/missing").await.unwrap_err();
        assert_eq!(err, ApiError::Status(404));
        assert!(!api.transport.body_read.get());
    }

    #[tokio::test]
    async fn test_server_error_carries_status() {
        let api = client(CannedTransport::replying(500, r#"{"error":"boom"}"#));
        let err = api.get::<Value>("/recommend").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let api = client(CannedTransport::failing(ApiError::Transport(
            "Failed to fetch".into(),
        )));
        let err = api.get::<Value>("/health").await.unwrap_err();
        assert_eq!(err, ApiError::Transport("Failed to fetch".into()));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let api = client(CannedTransport::replying(200, "not json"));
        let err = api.get::<Value>("/health").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_typed_response() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Health {
            status: String,
        }

        let api = client(CannedTransport::replying(200, r#"{"status":"ok"}"#));
        let health: Health = api.get("/health").await.unwrap();
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_post_sends_json_body_to_prefixed_url() {
        let api = client(CannedTransport::replying(201, "[]"));
        let _: Value = api
            .post("/riasec/calculate", &json!({"answers": [1, 2]}))
            .await
            .unwrap();

        let sent = api.transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "/api/v1/riasec/calculate");
        assert_eq!(sent[0].method, "POST");
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"answers":[1,2]}"#));
        assert_eq!(
            sent[0].headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn test_merge_keeps_default_and_appends_caller_headers() {
        let merged = merge_headers(
            &[("Content-Type", "application/json")],
            &[("X-Session".to_string(), "abc".to_string())],
        );
        assert_eq!(
            merged,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-Session".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_caller_overrides_default_case_insensitively() {
        let merged = merge_headers(
            &[("Content-Type", "application/json")],
            &[("content-type".to_string(), "text/plain".to_string())],
        );
        assert_eq!(
            merged,
            vec![("content-type".to_string(), "text/plain".to_string())]
        );
    }

    #[test]
    fn test_build_request_defaults_to_get() {
        let api = client(CannedTransport::replying(200, "{}"));
        let request = api.build_request("/subjects", &RequestOptions::default());
        assert_eq!(request.method, "GET");
        assert_eq!(request.url, "/api/v1/subjects");
        assert_eq!(request.body, None);
    }

    #[test]
    fn test_standard_methods_are_normalized() {
        assert_eq!(RequestOptions::with_method("delete").method, "DELETE");
        assert_eq!(RequestOptions::with_method("post").method, "POST");
        assert_eq!(normalize_method("Options"), "OPTIONS");
    }

    #[test]
    fn test_other_methods_pass_through() {
        assert_eq!(RequestOptions::with_method("patch").method, "patch");
        assert_eq!(normalize_method("PROPFIND"), "PROPFIND");
    }

    #[test]
    fn test_fetch_settings_reach_the_request() {
        let mut options = RequestOptions::get();
        options.init = FetchInit {
            credentials: Some("include".into()),
            cache: Some("no-store".into()),
            referrer_policy: Some("no-referrer".into()),
            keepalive: Some(true),
            ..FetchInit::default()
        };

        let api = client(CannedTransport::replying(200, "{}"));
        let request = api.build_request("/subjects", &options);
        assert_eq!(request.init, options.init);
        assert_eq!(
            request.init.string_entries(),
            vec![
                ("credentials", "include"),
                ("cache", "no-store"),
                ("referrerPolicy", "no-referrer"),
            ]
        );
    }

    #[test]
    fn test_no_fetch_settings_by_default() {
        assert!(RequestOptions::get().init.string_entries().is_empty());
    }
}
