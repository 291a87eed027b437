//! Thin wrappers over the browser APIs the panel needs.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

fn js_error(error: JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "no browser window".to_string())
}

// ===== TIME =====

pub fn now() -> DateTime<Utc> {
    from_js_millis(js_sys::Date::now())
}

/// Offset of the browser's local time zone right now.
pub fn local_offset() -> FixedOffset {
    from_js_timezone_offset(js_sys::Date::new_0().get_timezone_offset())
}

fn from_js_millis(millis: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis as i64).unwrap_or_default()
}

/// `Date.getTimezoneOffset` counts minutes west of UTC.
fn from_js_timezone_offset(minutes: f64) -> FixedOffset {
    FixedOffset::west_opt((minutes * 60.0) as i32).unwrap_or_else(|| Utc.fix())
}

pub fn window_width() -> f64 {
    web_sys::window()
        .and_then(|window| window.inner_width().ok())
        .and_then(|width| width.as_f64())
        .unwrap_or_default()
}

// ===== LOCAL STORAGE =====

fn local_storage() -> Result<web_sys::Storage, String> {
    window()?
        .local_storage()
        .map_err(js_error)?
        .ok_or_else(|| "local storage is unavailable".to_string())
}

pub fn load_text(key: &str) -> Option<String> {
    match local_storage().and_then(|storage| storage.get_item(key).map_err(js_error)) {
        Ok(text) => text,
        Err(error) => {
            zoon::eprintln!("Failed to read '{key}' from local storage: {error}");
            None
        }
    }
}

pub fn store_text(key: &str, text: &str) -> Result<(), String> {
    local_storage()?.set_item(key, text).map_err(js_error)
}

// ===== NETWORK =====

pub async fn fetch_text(url: &str) -> Result<String, String> {
    let response = JsFuture::from(window()?.fetch_with_str(url))
        .await
        .map_err(js_error)?
        .dyn_into::<web_sys::Response>()
        .map_err(js_error)?;
    if !response.ok() {
        return Err(format!("GET {url} answered {}", response.status()));
    }
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string().ok_or_else(|| format!("GET {url} returned a non-text body"))
}

// ===== FILES & CLIPBOARD =====

/// Hands `text` to the browser as a file download.
pub fn download_text(file_name: &str, text: &str) -> Result<(), String> {
    let parts = js_sys::Array::of1(&JsValue::from_str(text));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/plain");
    let blob =
        web_sys::Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let document = window()?.document().ok_or_else(|| "no document".to_string())?;
    let anchor = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(js_error)?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url).map_err(js_error)
}

pub async fn write_clipboard(text: &str) -> Result<(), String> {
    let clipboard = window()?.navigator().clipboard();
    JsFuture::from(clipboard.write_text(text))
        .await
        .map(|_| ())
        .map_err(js_error)
}
