//! Parameter encoding strategies
//!
//! Encodes a request parameter map into a byte payload plus a matching
//! `Content-Type`. Encoding is pure and deterministic: keys are sorted
//! before joining so the same map always yields the same bytes.

use std::collections::HashMap;

use percent_encoding::{percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use crate::error::{NetError, Result};

/// Characters percent-encoded in query components. Everything a URL query
/// disallows: controls, space, and the usual bracket/quote/caret family.
/// `&`, `=` and `?` stay literal here and are escaped in a second pass on
/// values only, so separators inside values can never be reinterpreted as
/// delimiters.
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A scalar-or-string parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Raw bytes. Valid in query/form payloads (percent-encoded), rejected
    /// by JSON encoding since it has no JSON representation.
    Binary(Vec<u8>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        ParamValue::Binary(value)
    }
}

/// Parameter map accepted by the encoder and the request builder.
pub type Parameters = HashMap<String, ParamValue>;

/// Parameter encoding strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterEncoding {
    /// Percent-encoded `key=value` pairs for a URL query component
    QueryString,
    /// `application/x-www-form-urlencoded` body payload (`%20` becomes `+`)
    FormUrlEncoded,
    /// JSON object body payload
    Json,
}

impl ParameterEncoding {
    /// Encode a parameter map into a byte payload.
    ///
    /// Empty maps yield an empty payload for the query/form modes and `{}`
    /// for JSON. JSON encoding fails with `DecodingFailed` when a value has
    /// no JSON representation (binary, non-finite floats); the failure
    /// surfaces before any network call is attempted.
    pub fn encode(&self, parameters: &Parameters) -> Result<Vec<u8>> {
        match self {
            ParameterEncoding::QueryString => {
                Ok(encode_pairs(parameters, false).into_bytes())
            }
            ParameterEncoding::FormUrlEncoded => {
                Ok(encode_pairs(parameters, true).into_bytes())
            }
            ParameterEncoding::Json => encode_json(parameters),
        }
    }

    /// The `Content-Type` matching this encoding's payload
    pub fn content_type(&self) -> &'static str {
        match self {
            ParameterEncoding::QueryString | ParameterEncoding::FormUrlEncoded => {
                "application/x-www-form-urlencoded"
            }
            ParameterEncoding::Json => "application/json",
        }
    }
}

fn percent_component(bytes: &[u8]) -> String {
    percent_encode(bytes, QUERY_ENCODE_SET).to_string()
}

fn encode_pairs(parameters: &Parameters, form: bool) -> String {
    let mut keys: Vec<&String> = parameters.keys().collect();
    keys.sort();

    keys.into_iter()
        .map(|key| {
            let encoded_key = percent_component(key.as_bytes());
            let mut encoded_value = match &parameters[key] {
                ParamValue::Str(s) => percent_component(s.as_bytes()),
                ParamValue::Int(i) => percent_component(i.to_string().as_bytes()),
                ParamValue::Float(f) => percent_component(f.to_string().as_bytes()),
                ParamValue::Bool(b) => percent_component(b.to_string().as_bytes()),
                ParamValue::Binary(bytes) => percent_component(bytes),
            };
            if form {
                encoded_value = encoded_value.replace("%20", "+");
            }
            let encoded_value = encoded_value
                .replace('&', "%26")
                .replace('=', "%3D")
                .replace('?', "%3F");
            format!("{}={}", encoded_key, encoded_value)
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_json(parameters: &Parameters) -> Result<Vec<u8>> {
    // serde_json::Map is keyed by a BTreeMap, so the output is sorted and
    // deterministic without an explicit sort pass.
    let mut map = serde_json::Map::new();
    for (key, value) in parameters {
        let json_value = match value {
            ParamValue::Str(s) => Value::String(s.clone()),
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| not_json_representable(key))?,
            ParamValue::Binary(_) => return Err(not_json_representable(key)),
        };
        map.insert(key.clone(), json_value);
    }
    serde_json::to_vec(&Value::Object(map)).map_err(|e| NetError::DecodingFailed(e.to_string()))
}

fn not_json_representable(key: &str) -> NetError {
    NetError::DecodingFailed(format!(
        "parameter '{}' has no JSON representation",
        key
    ))
}
