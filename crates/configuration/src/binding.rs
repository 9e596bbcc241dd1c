//! Resolution of the `hana` service binding from the hosting environment.
//!
//! Sources are tried in order: the Cloud Foundry style `VCAP_SERVICES`
//! document, a Kubernetes service-binding directory under
//! `SERVICE_BINDING_ROOT`, and finally the `[hana]` section of the layered
//! settings.

use crate::error::ConfigError;
use crate::settings::HanaBinding;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The label (or tag) identifying the binding this service consumes.
pub const BINDING_LABEL: &str = "hana";

pub const VCAP_SERVICES_ENV: &str = "VCAP_SERVICES";
pub const SERVICE_BINDING_ROOT_ENV: &str = "SERVICE_BINDING_ROOT";

#[derive(Debug, Deserialize)]
struct VcapService {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    credentials: Value,
}

impl VcapService {
    fn is_hana(&self) -> bool {
        self.label.as_deref() == Some(BINDING_LABEL) || self.tags.iter().any(|t| t == BINDING_LABEL)
    }
}

/// Picks the first service labelled or tagged `hana` out of a `VCAP_SERVICES` document.
pub fn from_vcap_services(raw: &str) -> Result<HanaBinding, ConfigError> {
    let services: HashMap<String, Vec<VcapService>> = serde_json::from_str(raw)
        .map_err(|e| ConfigError::BindingError(format!("VCAP_SERVICES is not valid JSON: {}", e)))?;

    let service = services
        .into_values()
        .flatten()
        .find(VcapService::is_hana)
        .ok_or(ConfigError::MissingBinding)?;

    tracing::debug!(name = ?service.name, "Using hana binding from VCAP_SERVICES.");
    let mut credentials = service.credentials;
    if let Value::Object(map) = &mut credentials {
        prefer_user_key(map);
    }
    serde_json::from_value(credentials)
        .map_err(|e| ConfigError::BindingError(format!("invalid hana credentials: {}", e)))
}

/// Bindings may publish both `user` and `username`; `user` takes precedence.
fn prefer_user_key(credentials: &mut Map<String, Value>) {
    if credentials.contains_key("user") {
        credentials.remove("username");
    }
}

/// Reads a binding directory that holds one file per credential key.
pub fn from_binding_dir(dir: &Path) -> Result<HanaBinding, ConfigError> {
    let mut credentials = Map::new();
    for key in ["host", "port", "schema", "user", "username", "password", "database", "encrypt"] {
        let path = dir.join(key);
        if !path.is_file() {
            continue;
        }
        let content = fs::read_to_string(&path)
            .map_err(|source| ConfigError::BindingFileError { path: path.clone(), source })?;
        let content = content.trim().to_string();
        let value = if key == "encrypt" {
            Value::Bool(content.eq_ignore_ascii_case("true"))
        } else {
            Value::String(content)
        };
        credentials.insert(key.to_string(), value);
    }

    prefer_user_key(&mut credentials);

    serde_json::from_value(Value::Object(credentials)).map_err(|e| {
        ConfigError::BindingError(format!("invalid binding directory {}: {}", dir.display(), e))
    })
}

/// Resolves the binding from the first available source.
pub fn resolve(
    vcap_services: Option<String>,
    binding_root: Option<PathBuf>,
    fallback: Option<HanaBinding>,
) -> Result<HanaBinding, ConfigError> {
    if let Some(raw) = vcap_services {
        return from_vcap_services(&raw);
    }

    if let Some(root) = binding_root {
        let dir = root.join(BINDING_LABEL);
        if dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "Using hana binding from service binding directory.");
            return from_binding_dir(&dir);
        }
    }

    fallback.ok_or(ConfigError::MissingBinding)
}
