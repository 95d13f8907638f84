//! Recorded documentation data: calls grouped by endpoint.
//!
//! The JSON layout uses PascalCase field names so files written by earlier
//! recorders keep loading. Maps are ordered so that saving the same spec
//! twice produces identical bytes.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Ordered string map used for headers, params and form fields.
pub type FieldMap = BTreeMap<String, String>;

/// One observed HTTP exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Call {
    /// Globally unique, assigned when the call is merged.
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub current_path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub method_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub post_form: FieldMap,
    #[serde(deserialize_with = "null_as_default")]
    pub request_header: FieldMap,
    /// Never filled by this recorder; kept so older files survive a reload.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "FieldMap::is_empty")]
    pub common_request_headers: FieldMap,
    #[serde(deserialize_with = "null_as_default")]
    pub response_header: FieldMap,
    #[serde(deserialize_with = "null_as_default")]
    pub request_url_params: FieldMap,
    #[serde(deserialize_with = "null_as_default")]
    pub request_body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub response_body: String,
    pub response_code: u16,
}

impl Call {
    /// Two calls are equivalent when request body, status and response body
    /// all match. Headers and params are ignored.
    pub fn is_equivalent(&self, other: &Call) -> bool {
        self.request_body == other.request_body
            && self.response_code == other.response_code
            && self.response_body == other.response_body
    }
}

/// All distinct calls observed for one (verb, path) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Api {
    #[serde(deserialize_with = "null_as_default")]
    pub http_verb: String,
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    /// Discovery order.
    #[serde(deserialize_with = "null_as_default")]
    pub calls: Vec<Call>,
}

impl Api {
    pub fn new(http_verb: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_verb: http_verb.into(),
            path: path.into(),
            calls: Vec::new(),
        }
    }

    pub fn matches(&self, verb: &str, path: &str) -> bool {
        self.http_verb == verb && self.path == path
    }
}

/// Root aggregate persisted to `<doc_path>.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Spec {
    #[serde(deserialize_with = "null_as_default")]
    pub api_specs: Vec<Api>,
}

impl Spec {
    /// Highest call id present, if any call is stored.
    pub fn max_call_id(&self) -> Option<u64> {
        self.api_specs
            .iter()
            .flat_map(|api| api.calls.iter())
            .map(|call| call.id)
            .max()
    }

    pub fn call_count(&self) -> usize {
        self.api_specs.iter().map(|api| api.calls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.api_specs.is_empty()
    }
}

/// Older producers wrote `null` for unset maps, lists and strings.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_pascal_case() {
        let mut call = Call {
            id: 3,
            current_path: "/login".into(),
            method_type: "POST".into(),
            response_code: 200,
            ..Call::default()
        };
        call.request_header
            .insert("Content-Type".into(), "application/json".into());
        let spec = Spec {
            api_specs: vec![Api {
                http_verb: "POST".into(),
                path: "/login".into(),
                calls: vec![call],
            }],
        };

        let value = serde_json::to_value(&spec).unwrap();
        let api = &value["ApiSpecs"][0];
        assert_eq!(api["HttpVerb"], "POST");
        assert_eq!(api["Path"], "/login");
        let call = &api["Calls"][0];
        assert_eq!(call["Id"], 3);
        assert_eq!(call["CurrentPath"], "/login");
        assert_eq!(call["MethodType"], "POST");
        assert_eq!(call["RequestHeader"]["Content-Type"], "application/json");
        assert_eq!(call["ResponseCode"], 200);
        assert!(call["PostForm"].is_object());
        assert!(call["RequestUrlParams"].is_object());
    }

    #[test]
    fn test_nulls_decode_as_empty() {
        let json = r#"{"ApiSpecs":[{"HttpVerb":"GET","Path":"/ping","Calls":[
            {"Id":0,"CurrentPath":"/ping","MethodType":"GET","PostForm":null,
             "RequestHeader":{"X-Token":" abc"},"CommonRequestHeaders":null,
             "ResponseHeader":null,"RequestUrlParams":{},"RequestBody":"",
             "ResponseBody":"pong","ResponseCode":200}]}]}"#;

        let spec: Spec = serde_json::from_str(json).unwrap();
        let call = &spec.api_specs[0].calls[0];
        assert!(call.post_form.is_empty());
        assert!(call.response_header.is_empty());
        assert_eq!(call.response_body, "pong");

        let spec: Spec = serde_json::from_str(r#"{"ApiSpecs":null}"#).unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_equivalence_ignores_headers() {
        let a = Call {
            request_body: "{}".into(),
            response_body: "ok".into(),
            response_code: 200,
            ..Call::default()
        };
        let mut b = a.clone();
        b.id = 9;
        b.request_header.insert("X-Trace".into(), "1".into());
        assert!(a.is_equivalent(&b));

        b.response_code = 201;
        assert!(!a.is_equivalent(&b));
    }

    #[test]
    fn test_max_call_id() {
        let mut spec = Spec::default();
        assert_eq!(spec.max_call_id(), None);

        let mut api = Api::new("GET", "/a");
        api.calls.push(Call { id: 4, ..Call::default() });
        api.calls.push(Call { id: 11, ..Call::default() });
        spec.api_specs.push(api);
        spec.api_specs.push(Api::new("GET", "/b"));

        assert_eq!(spec.max_call_id(), Some(11));
        assert_eq!(spec.call_count(), 2);
    }

    #[test]
    fn test_legacy_common_headers_survive_reload() {
        let json = r#"{"ApiSpecs":[{"HttpVerb":"GET","Path":"/ping","Calls":[
            {"Id":1,"CurrentPath":"/ping","MethodType":"GET",
             "CommonRequestHeaders":{"Accept":"*/*"},"ResponseCode":200}]}]}"#;

        let spec: Spec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.api_specs[0].calls[0].common_request_headers["Accept"], "*/*");

        let saved = serde_json::to_value(&spec).unwrap();
        assert_eq!(saved["ApiSpecs"][0]["Calls"][0]["CommonRequestHeaders"]["Accept"], "*/*");
        let reloaded: Spec = serde_json::from_value(saved).unwrap();
        assert_eq!(reloaded, spec);

        let fresh = serde_json::to_value(Call::default()).unwrap();
        assert!(fresh.get("CommonRequestHeaders").is_none());
    }
}
