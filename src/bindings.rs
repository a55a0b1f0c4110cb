//! JavaScript surface used by the page scripts.
//!
//! Pages construct one [`SpkUi`] and call into it; the start hook only sets up
//! panics, logging and the navigation highlighter.

use std::collections::BTreeMap;

use js_sys::Promise;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::components::nav;
use crate::components::toast::{DomToastHost, Notifier};
use crate::config::LOG_LEVEL;
use crate::core::api::{ApiClient, FetchInit, FetchTransport, RequestOptions};
use crate::core::error::StoreError;
use crate::core::store::{LocalStorage, Store};
use crate::utils::format;
use crate::utils::timer::TimeoutScheduler;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(LOG_LEVEL).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    nav::install();
}

/// `fetch`-style options as page scripts pass them.
///
/// `signal` is not carried over: requests cannot be aborted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsRequestOptions {
    method: Option<String>,
    body: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    credentials: Option<String>,
    mode: Option<String>,
    cache: Option<String>,
    redirect: Option<String>,
    referrer: Option<String>,
    referrer_policy: Option<String>,
    integrity: Option<String>,
    keepalive: Option<bool>,
}

impl From<JsRequestOptions> for RequestOptions {
    fn from(js: JsRequestOptions) -> Self {
        let mut options = RequestOptions::with_method(js.method.as_deref().unwrap_or("GET"));
        options.body = js.body;
        options.headers = js.headers.into_iter().collect();
        options.init = FetchInit {
            credentials: js.credentials,
            mode: js.mode,
            cache: js.cache,
            redirect: js.redirect,
            referrer: js.referrer,
            referrer_policy: js.referrer_policy,
            integrity: js.integrity,
            keepalive: js.keepalive,
        };
        options
    }
}

/// Decode page-script options; `undefined` and `null` mean defaults.
fn decode_options(options: JsValue) -> Result<RequestOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(RequestOptions::default());
    }
    let options: JsRequestOptions = serde_wasm_bindgen::from_value(options)?;
    Ok(options.into())
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// Shared page helpers: API client, local store and toast notifier.
#[wasm_bindgen]
pub struct SpkUi {
    api: ApiClient<FetchTransport>,
    store: Result<Store<LocalStorage>, StoreError>,
    notifier: Option<Notifier<DomToastHost, TimeoutScheduler>>,
}

#[wasm_bindgen]
impl SpkUi {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SpkUi {
        let notifier = Notifier::browser();
        if notifier.is_none() {
            log::warn!("no document; toasts disabled");
        }
        SpkUi {
            api: ApiClient::browser(),
            store: Store::local(),
            notifier,
        }
    }

    /// Request `endpoint` under the API root and resolve with the parsed JSON.
    ///
    /// Rejects with `Error("HTTP <status>")` on non-2xx responses. Every
    /// failure, including options that cannot be decoded, is a rejection.
    #[wasm_bindgen(js_name = apiFetch)]
    pub fn api_fetch(&self, endpoint: String, options: JsValue) -> Promise {
        let api = self.api.clone();
        future_to_promise(async move {
            let options = decode_options(options)?;
            let value: serde_json::Value =
                api.request(&endpoint, options).await.map_err(js_error)?;
            to_js(&value)
        })
    }

    /// Stored JSON value under `key`, or `null`.
    #[wasm_bindgen(js_name = storeGet)]
    pub fn store_get(&self, key: &str) -> JsValue {
        self.store
            .as_ref()
            .ok()
            .and_then(|store| store.get::<serde_json::Value>(key))
            .and_then(|value| to_js(&value).ok())
            .unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = storeSet)]
    pub fn store_set(&self, key: &str, value: JsValue) -> Result<(), JsValue> {
        let store = self.store.as_ref().map_err(js_error)?;
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value)?;
        store.set(key, &value).map_err(js_error)
    }

    #[wasm_bindgen(js_name = storeRemove)]
    pub fn store_remove(&self, key: &str) -> Result<(), JsValue> {
        let store = self.store.as_ref().map_err(js_error)?;
        store.remove(key).map_err(js_error)
    }

    /// Show a toast. Unknown types render as `info`; duration defaults to 3500ms.
    #[wasm_bindgen(js_name = showToast)]
    pub fn show_toast(&self, message: &str, kind: Option<String>, duration_ms: Option<u32>) {
        match &self.notifier {
            Some(notifier) => {
                notifier.notify_named(message, kind.as_deref().unwrap_or("info"), duration_ms);
            }
            None => log::warn!("toast dropped: {message}"),
        }
    }
}

impl Default for SpkUi {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_name = formatScore)]
pub fn format_score(value: f64) -> String {
    format::format_score(value)
}

#[wasm_bindgen(js_name = rankBadge)]
pub fn rank_badge(rank: u32) -> String {
    format::rank_badge(rank)
}
