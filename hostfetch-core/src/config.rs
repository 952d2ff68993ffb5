//! Request configuration and merge rules.
//!
//! A [`RequestConfig`] exists in three tiers at call time: the built-in
//! defaults, the client instance configuration and the per-call overrides.
//! [`merge_two`] folds two tiers together. It is right-biased: a field set on
//! the right operand replaces the left one wholesale. Headers are the
//! exception and are merged key by key.
//!
//! # Example
//!
//! ```
//! use hostfetch_core::{RequestConfig, merge_two};
//! use std::time::Duration;
//!
//! let instance = RequestConfig::new()
//!     .base_url("https://api.example.com")
//!     .timeout(Duration::from_secs(5))
//!     .header("x-a", "1")
//!     .header("x-b", "2");
//! let call = RequestConfig::new().header("x-b", "3").header("x-c", "4");
//!
//! let merged = merge_two(&instance, &call);
//! assert_eq!(merged.headers["x-a"], "1");
//! assert_eq!(merged.headers["x-b"], "3");
//! assert_eq!(merged.headers["x-c"], "4");
//! assert_eq!(merged.timeout, Some(Duration::from_secs(5)));
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tier of request configuration.
///
/// Every field is optional: `None` (or an empty map) means "not set at this
/// tier" and leaves the value of a lower tier in place during a merge.
///
/// Fields other than the typed ones travel in [`options`](Self::options) and
/// are handed to the transport untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestConfig {
    /// Prefix joined with the endpoint of every call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// HTTP method. Verb methods on the client always set this.
    #[serde(with = "serde_method", skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
    /// Time allowed for the network call. Zero disables the timer.
    #[serde(with = "serde_timeout_ms", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    /// Request headers, merged per key across tiers.
    #[serde(with = "serde_headers", skip_serializing_if = "HeaderMap::is_empty")]
    pub headers: HeaderMap,
    /// Raw request body, sent as-is. (De)serialized as a UTF-8 string.
    #[serde(with = "serde_body", skip_serializing_if = "Option::is_none")]
    pub body: Option<Bytes>,
    /// Pass-through options for the transport, replaced per key.
    #[serde(flatten)]
    pub options: BTreeMap<String, Value>,
}

impl RequestConfig {
    /// Create an empty configuration tier.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in default tier every client starts from.
    pub fn defaults() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            headers,
            ..Self::default()
        }
    }

    /// Parse a configuration tier from a JSON document.
    ///
    /// `timeout` is read as milliseconds and `headers` as a string map. Any
    /// unknown key lands in [`options`](Self::options).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the timeout. `Duration::ZERO` disables the timer.
    ///
    /// The timer runs on tokio, so a client call that applies a timeout must
    /// be driven by a tokio runtime.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value is invalid.
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        K::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        V::Error: std::fmt::Debug,
    {
        let name = name.try_into().expect("invalid header name");
        let value = value.try_into().expect("invalid header value");
        self.headers.insert(name, value);
        self
    }

    /// Try to add a header.
    ///
    /// Returns `None` if the header name or value is invalid.
    pub fn try_header<K, V>(mut self, name: K, value: V) -> Option<Self>
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        let name = name.try_into().ok()?;
        let value = value.try_into().ok()?;
        self.headers.insert(name, value);
        Some(self)
    }

    /// Replace all headers of this tier.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Get a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Set the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a pass-through option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Merge `overrides` on top of `self`. See [`merge_two`].
    pub fn merged_with(&self, overrides: &RequestConfig) -> RequestConfig {
        merge_two(self, overrides)
    }
}

/// Merge two configuration tiers, `overrides` taking precedence.
///
/// Neither input is modified. Headers are a key union: every value of a key
/// present in `overrides` replaces all values of that key in `base`. Options
/// are a key union with whole-value replacement, so nested JSON objects are
/// never merged. Remaining fields take the `overrides` value when it is set.
pub fn merge_two(base: &RequestConfig, overrides: &RequestConfig) -> RequestConfig {
    RequestConfig {
        base_url: overrides.base_url.clone().or_else(|| base.base_url.clone()),
        method: overrides.method.clone().or_else(|| base.method.clone()),
        timeout: overrides.timeout.or(base.timeout),
        headers: merge_headers(&base.headers, &overrides.headers),
        body: overrides.body.clone().or_else(|| base.body.clone()),
        options: merge_options(&base.options, &overrides.options),
    }
}

fn merge_headers(base: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = base.clone();
    for name in overrides.keys() {
        merged.remove(name);
        for value in overrides.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

fn merge_options(
    base: &BTreeMap<String, Value>,
    overrides: &BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

mod serde_method {
    use http::Method;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(method: &Option<Method>, s: S) -> Result<S::Ok, S::Error> {
        match method {
            Some(method) => s.serialize_some(method.as_str()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Method>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| Method::from_bytes(raw.to_ascii_uppercase().as_bytes()).map_err(D::Error::custom))
            .transpose()
    }
}

mod serde_timeout_ms {
    use std::time::Duration;

    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(timeout: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match timeout {
            Some(timeout) => {
                let millis = u64::try_from(timeout.as_millis()).map_err(S::Error::custom)?;
                s.serialize_some(&millis)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

mod serde_body {
    use bytes::Bytes;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &Option<Bytes>, s: S) -> Result<S::Ok, S::Error> {
        match body {
            Some(body) => s.serialize_some(std::str::from_utf8(body).map_err(S::Error::custom)?),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Bytes>, D::Error> {
        Ok(Option::<String>::deserialize(d)?.map(Bytes::from))
    }
}

mod serde_headers {
    use std::collections::BTreeMap;

    use http::{HeaderMap, HeaderName, HeaderValue};
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(headers: &HeaderMap, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(headers.keys_len()))?;
        for name in headers.keys() {
            let joined = headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect::<Vec<_>>()
                .join(", ");
            map.serialize_entry(name.as_str(), &joined)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<HeaderMap, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(d)?;
        let mut headers = HeaderMap::with_capacity(raw.len());
        for (name, value) in raw {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(D::Error::custom)?;
            let value = HeaderValue::from_str(&value).map_err(D::Error::custom)?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_merge_is_right_biased_per_key() {
        let instance = RequestConfig::new().header("a", "1").header("b", "2");
        let call = RequestConfig::new().header("b", "3").header("c", "4");

        let merged = merge_two(&instance, &call);

        assert_eq!(merged.headers.len(), 3);
        assert_eq!(merged.headers["a"], "1");
        assert_eq!(merged.headers["b"], "3");
        assert_eq!(merged.headers["c"], "4");
    }

    #[test]
    fn test_header_merge_replaces_every_value_of_a_key() {
        let mut instance = RequestConfig::new();
        instance.headers.append("accept", "text/html".parse().unwrap());
        instance.headers.append("accept", "text/plain".parse().unwrap());
        let call = RequestConfig::new().header("accept", "application/json");

        let merged = merge_two(&instance, &call);

        let values: Vec<_> = merged.headers.get_all("accept").iter().collect();
        assert_eq!(values, vec!["application/json"]);
    }

    #[test]
    fn test_non_header_fields_override() {
        let instance = RequestConfig::new()
            .base_url("http://instance")
            .timeout(Duration::from_millis(100));
        let call = RequestConfig::new().timeout(Duration::from_millis(20));

        let merged = merge_two(&instance, &call);

        assert_eq!(merged.timeout, Some(Duration::from_millis(20)));
        assert_eq!(merged.base_url.as_deref(), Some("http://instance"));
    }

    #[test]
    fn test_options_are_replaced_wholesale() {
        let instance = RequestConfig::new()
            .option("cache", json!({ "mode": "no-store", "ttl": 5 }))
            .option("redirect", "follow");
        let call = RequestConfig::new().option("cache", json!({ "mode": "reload" }));

        let merged = merge_two(&instance, &call);

        assert_eq!(merged.options["cache"], json!({ "mode": "reload" }));
        assert_eq!(merged.options["redirect"], json!("follow"));
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let instance = RequestConfig::defaults()
            .base_url("http://instance")
            .header("x-a", "1")
            .option("credentials", "include");
        let call = RequestConfig::new()
            .method(Method::POST)
            .header("x-a", "2")
            .body("payload");
        let instance_before = instance.clone();
        let call_before = call.clone();

        let first = merge_two(&instance, &call);
        let second = merge_two(&instance, &call);

        assert_eq!(first, second);
        assert_eq!(instance, instance_before);
        assert_eq!(call, call_before);
    }

    #[test]
    fn test_merged_with_matches_merge_two() {
        let a = RequestConfig::new().header("x-a", "1");
        let b = RequestConfig::new().header("x-b", "2");
        assert_eq!(a.merged_with(&b), merge_two(&a, &b));
    }

    #[test]
    fn test_defaults_set_json_content_type() {
        let defaults = RequestConfig::defaults();
        assert_eq!(defaults.headers[CONTENT_TYPE], "application/json");
        assert!(defaults.timeout.is_none());
        assert!(defaults.base_url.is_none());
    }

    #[test]
    fn test_try_header_invalid() {
        assert!(RequestConfig::new().try_header("invalid\0name", "value").is_none());
        assert!(RequestConfig::new().try_header("x-ok", "value").is_some());
    }

    #[test]
    fn test_from_json() {
        let config = RequestConfig::from_json(
            r#"{
                "baseUrl": "https://api.example.com",
                "method": "post",
                "timeout": 250,
                "headers": { "Authorization": "Bearer abc" },
                "credentials": "include"
            }"#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.method, Some(Method::POST));
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.headers["authorization"], "Bearer abc");
        assert_eq!(config.options["credentials"], json!("include"));
    }

    #[test]
    fn test_from_json_body() {
        let config = RequestConfig::from_json(r#"{ "body": "{\"id\":1}" }"#).unwrap();

        assert_eq!(config.body, Some(Bytes::from(r#"{"id":1}"#)));
        assert!(!config.options.contains_key("body"));
    }

    #[test]
    fn test_body_serializes_as_text() {
        let config = RequestConfig::new().body("payload");
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({ "body": "payload" }));
        assert!(serde_json::to_value(RequestConfig::new().body(vec![0xffu8, 0xfe])).is_err());
    }

    #[test]
    fn test_timeout_too_large_to_serialize() {
        let config = RequestConfig::new().timeout(Duration::MAX);
        assert!(serde_json::to_value(&config).is_err());
    }

    #[test]
    fn test_from_json_rejects_bad_header() {
        let result = RequestConfig::from_json(r#"{ "headers": { "bad header": "x" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let config = RequestConfig::new()
            .timeout(Duration::from_millis(50))
            .header("x-a", "1");
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({ "timeout": 50, "headers": { "x-a": "1" } }));
    }
}
