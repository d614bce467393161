//! Fastly API objects and request inputs.
//!
//! Versioned resources are created and updated with form-encoded bodies, so
//! every optional input field is skipped when unset: update commands only
//! send the fields the user actually passed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// ============ Services and versions ============

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub number: u32,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub locked: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub staging: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub deployed: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Active version number, if any.
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDetails {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub active_version: Option<Version>,
    #[serde(default)]
    pub versions: Vec<Version>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateVersionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Form body for creating or updating a service.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Response of the purge endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeResult {
    pub status: String,
    #[serde(default)]
    pub id: Option<String>,
}

// ============ Versioned resources ============

/// Resources that live under `/service/{id}/version/{n}/{KIND}`.
pub trait VersionedResource: serde::de::DeserializeOwned {
    const KIND: &'static str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acl {
    pub id: String,
    pub name: String,
    pub service_id: String,
    pub version: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl VersionedResource for Acl {
    const KIND: &'static str = "acl";
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AclInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backend {
    pub name: String,
    pub service_id: String,
    pub version: u32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub override_host: Option<String>,
    #[serde(default)]
    pub connect_timeout: Option<u32>,
    #[serde(default)]
    pub first_byte_timeout: Option<u32>,
    #[serde(default)]
    pub between_bytes_timeout: Option<u32>,
    #[serde(default)]
    pub max_conn: Option<u32>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub use_ssl: bool,
    #[serde(default)]
    pub ssl_cert_hostname: Option<String>,
    #[serde(default)]
    pub ssl_sni_hostname: Option<String>,
    #[serde(default)]
    pub healthcheck: Option<String>,
    #[serde(default)]
    pub shield: Option<String>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub auto_loadbalance: bool,
    #[serde(default)]
    pub request_condition: Option<String>,
}

impl VersionedResource for Backend {
    const KIND: &'static str = "backend";
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BackendInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_byte_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub between_bytes_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_conn: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "compat_bool"
    )]
    pub use_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_cert_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_sni_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shield: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "compat_bool"
    )]
    pub auto_loadbalance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_condition: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub service_id: String,
    pub version: u32,
    #[serde(default)]
    pub comment: Option<String>,
}

impl VersionedResource for Domain {
    const KIND: &'static str = "domain";
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub service_id: String,
    pub version: u32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub http_version: Option<String>,
    #[serde(default)]
    pub timeout: Option<u32>,
    #[serde(default)]
    pub check_interval: Option<u32>,
    #[serde(default)]
    pub expected_response: Option<u32>,
    #[serde(default)]
    pub window: Option<u32>,
    #[serde(default)]
    pub threshold: Option<u32>,
    #[serde(default)]
    pub initial: Option<u32>,
}

impl VersionedResource for HealthCheck {
    const KIND: &'static str = "healthcheck";
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthCheckInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_response: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    pub id: String,
    pub name: String,
    pub service_id: String,
    pub version: u32,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub write_only: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl VersionedResource for Dictionary {
    const KIND: &'static str = "dictionary";
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DictionaryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "compat_bool"
    )]
    pub write_only: Option<bool>,
}

// ============ Version-less entries ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclEntry {
    pub id: String,
    pub acl_id: String,
    pub service_id: String,
    pub ip: String,
    #[serde(default)]
    pub subnet: Option<u8>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub negated: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AclEntryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<u8>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "compat_bool"
    )]
    pub negated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryItem {
    pub dictionary_id: String,
    pub service_id: String,
    pub item_key: String,
    pub item_value: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DictionaryItemInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_key: Option<String>,
    pub item_value: String,
}

// ============ KV stores ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvStore {
    #[serde(alias = "store_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CursorMeta {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// One page of a cursor-paginated `/resources` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: CursorMeta,
}

// ============ Error body ============

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
}

// ============ Serde helpers ============

/// The API encodes some booleans as `true`, `1` or `"1"` depending on the
/// endpoint.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        Value::String(s) => matches!(s.as_str(), "1" | "true" | "t"),
        _ => false,
    })
}

/// Form bodies expect `1`/`0` rather than `true`/`false`.
fn compat_bool<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(true) => serializer.serialize_str("1"),
        Some(false) => serializer.serialize_str("0"),
        None => serializer.serialize_none(),
    }
}
