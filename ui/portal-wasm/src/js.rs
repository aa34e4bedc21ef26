//! Untyped access to objects the host page injects (`window.solana`,
//! `window.portalRuntime`). Everything goes through `Reflect` so a missing
//! or oddly shaped object degrades to an error instead of a trap.

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom;

/// `window[name]`, or `None` when it is absent, `undefined` or `null`.
pub fn window_property(name: &str) -> Option<JsValue> {
    let window: JsValue = dom::window().into();
    let value = Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

pub fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

pub fn get_bool(target: &JsValue, key: &str) -> bool {
    get(target, key).map(|v| v.is_truthy()).unwrap_or(false)
}

/// Call `target[name](...args)` and treat the result as a promise. Methods
/// that answer synchronously are wrapped with `Promise.resolve`.
pub fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<Promise, JsValue> {
    let method = get(target, name)?;
    let method: Function = method
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{name} is not a function")))?;

    let array = Array::new();
    for arg in args {
        array.push(arg);
    }

    let returned = method.apply(target, &array)?;
    Ok(match returned.dyn_into::<Promise>() {
        Ok(promise) => promise,
        Err(value) => Promise::resolve(&value),
    })
}

/// Best-effort human readable text for a thrown value.
pub fn error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(text) = get(value, "message").ok().and_then(|m| m.as_string()) {
        return text;
    }
    format!("{value:?}")
}

/// The value itself if it is a string, otherwise whatever its `toString()`
/// returns. Public keys arrive as objects with a base58 `toString`.
pub fn to_display_string(value: &JsValue) -> Option<String> {
    if let Some(text) = value.as_string() {
        return Some(text);
    }
    if value.is_undefined() || value.is_null() {
        return None;
    }
    let to_string: Function = get(value, "toString").ok()?.dyn_into().ok()?;
    to_string.call0(value).ok()?.as_string()
}
