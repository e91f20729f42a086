//! Deployment manifest parsing, validation, and hashing.
//!
//! The manifest (`strata.toml`) selects a stack variant and supplies
//! its parameters. It is validated against an embedded JSON Schema
//! before parsing, and content-hashed over a canonicalized
//! representation of the TOML so the hash is stable across formatting.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use strata_topology::{
    delivery_stack, service_stack, DeliveryParams, RollbackPolicy, ServiceStackParams, SpecHash,
    Stack,
};

use crate::error::CliError;

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "strata.toml";

const MANIFEST_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "object",
  "additionalProperties": false,
  "required": ["schema_version", "stack"],
  "properties": {
    "schema_version": { "const": "v1" },
    "stack": {
      "type": "object",
      "additionalProperties": false,
      "required": ["name", "variant"],
      "properties": {
        "name": { "type": "string", "pattern": "^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$" },
        "variant": { "enum": ["service", "delivery"] }
      }
    },
    "target": {
      "type": "object",
      "additionalProperties": false,
      "required": ["account", "region"],
      "properties": {
        "account": { "type": "string", "minLength": 1 },
        "region": { "type": "string", "minLength": 1 }
      }
    },
    "service": {
      "type": "object",
      "additionalProperties": false,
      "properties": {
        "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
        "memory_mib": { "type": "integer", "minimum": 1 },
        "cpu_units": { "type": "integer", "minimum": 1 },
        "desired_count": { "type": "integer", "minimum": 0 },
        "internet_facing": { "type": "boolean" },
        "elastic_capacity": { "type": "boolean" }
      }
    },
    "delivery": {
      "type": "object",
      "additionalProperties": false,
      "required": ["connection", "owner", "repository", "branch", "build_repository"],
      "properties": {
        "connection": { "type": "string", "minLength": 1 },
        "owner": { "type": "string", "minLength": 1 },
        "repository": { "type": "string", "minLength": 1 },
        "branch": { "type": "string", "minLength": 1 },
        "build_repository": { "type": "string", "minLength": 1 }
      }
    }
  },
  "if": {
    "properties": { "stack": { "properties": { "variant": { "const": "delivery" } } } }
  },
  "then": { "required": ["delivery"] }
}"##;

/// A deployment manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub schema_version: String,
    pub stack: StackSection,
    #[serde(default)]
    pub target: Option<TargetSection>,
    #[serde(default)]
    pub service: Option<ServiceSection>,
    #[serde(default)]
    pub delivery: Option<DeliverySection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StackSection {
    pub name: String,
    pub variant: Variant,
}

/// Which built-in topology the manifest selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Service,
    Delivery,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Service => f.write_str("service"),
            Variant::Delivery => f.write_str("delivery"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetSection {
    pub account: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSection {
    pub port: Option<u16>,
    pub memory_mib: Option<u32>,
    pub cpu_units: Option<u32>,
    pub desired_count: Option<u32>,
    pub internet_facing: Option<bool>,
    pub elastic_capacity: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliverySection {
    pub connection: String,
    pub owner: String,
    pub repository: String,
    pub branch: String,
    pub build_repository: String,
}

impl Manifest {
    /// Service parameters, defaults overridden by the `[service]` section.
    pub fn service_params(&self) -> ServiceStackParams {
        let mut params = ServiceStackParams {
            name: self.stack.name.clone(),
            ..ServiceStackParams::default()
        };

        if let Some(service) = &self.service {
            if let Some(port) = service.port {
                params.port = port;
            }
            if let Some(memory_mib) = service.memory_mib {
                params.memory_mib = memory_mib;
            }
            if let Some(cpu_units) = service.cpu_units {
                params.cpu_units = cpu_units;
            }
            if let Some(desired_count) = service.desired_count {
                params.desired_count = desired_count;
            }
            if let Some(internet_facing) = service.internet_facing {
                params.internet_facing = internet_facing;
            }
            if let Some(elastic_capacity) = service.elastic_capacity {
                params.elastic_capacity = elastic_capacity;
            }
        }

        params
    }

    /// Delivery parameters; requires the `[delivery]` section.
    pub fn delivery_params(&self) -> Result<DeliveryParams> {
        let Some(delivery) = &self.delivery else {
            anyhow::bail!("manifest variant is 'delivery' but has no [delivery] section");
        };

        Ok(DeliveryParams {
            connection: delivery.connection.clone(),
            owner: delivery.owner.clone(),
            repository: delivery.repository.clone(),
            branch: delivery.branch.clone(),
            build_repository: delivery.build_repository.clone(),
            rollback: RollbackPolicy::default(),
        })
    }

    /// Builds the selected stack variant.
    pub fn build_stack(&self) -> Result<Stack> {
        let params = self.service_params();
        let stack = match self.stack.variant {
            Variant::Service => service_stack(&params).map_err(CliError::Topology)?,
            Variant::Delivery => {
                let delivery = self.delivery_params()?;
                delivery_stack(&params, &delivery).map_err(CliError::Topology)?
            }
        };
        Ok(stack)
    }
}

/// One schema violation in a manifest.
#[derive(Debug, Clone)]
pub struct ManifestValidationError {
    pub instance_path: String,
    pub schema_path: String,
    pub message: String,
}

/// Validates manifest TOML against the embedded schema.
pub fn validate_manifest_toml_str(contents: &str) -> Result<Vec<ManifestValidationError>> {
    let instance = manifest_json_from_toml_str(contents)?;

    let schema: serde_json::Value =
        serde_json::from_str(MANIFEST_SCHEMA).context("embedded manifest schema is invalid JSON")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("embedded manifest schema failed to compile: {e}"))?;

    Ok(validator
        .iter_errors(&instance)
        .map(|err| ManifestValidationError {
            instance_path: err.instance_path.to_string(),
            schema_path: err.schema_path.to_string(),
            message: err.to_string(),
        })
        .collect())
}

/// Content hash over a canonicalized representation of the TOML.
pub fn manifest_hash_from_toml_str(contents: &str) -> Result<SpecHash> {
    let json = manifest_json_from_toml_str(contents)?;
    SpecHash::of(&json).context("failed to hash manifest")
}

/// Parses manifest TOML into a JSON value with sorted object keys.
fn manifest_json_from_toml_str(contents: &str) -> Result<serde_json::Value> {
    let value: toml::Value = toml::from_str(contents).context("invalid manifest TOML")?;
    if !value.is_table() {
        anyhow::bail!("manifest must be a TOML table (key/value pairs at top-level)");
    }
    serde_json::to_value(&value).context("failed to canonicalize manifest")
}

/// Reads, validates, hashes, and parses a manifest file.
///
/// Schema violations are listed on stdout before the command bails, so
/// one run surfaces every error.
pub fn load_validated(path: &Path) -> Result<(Manifest, SpecHash)> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;

    let errors = validate_manifest_toml_str(&contents)?;
    if !errors.is_empty() {
        print_manifest_errors(&errors);
        return Err(CliError::ManifestInvalid {
            count: errors.len(),
        }
        .into());
    }

    let manifest: Manifest = toml::from_str(&contents)
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;
    let hash = manifest_hash_from_toml_str(&contents)?;

    Ok((manifest, hash))
}

/// Prints schema violations, one per line.
pub fn print_manifest_errors(errors: &[ManifestValidationError]) {
    for err in errors {
        println!(
            "invalid at {} (schema {}): {}",
            err.instance_path, err.schema_path, err.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE_MANIFEST: &str = r#"
schema_version = "v1"

[stack]
name = "web"
variant = "service"

[target]
account = "123456789012"
region = "eu-west-1"

[service]
port = 3000
"#;

    const DELIVERY_MANIFEST: &str = r#"
schema_version = "v1"

[stack]
name = "web"
variant = "delivery"

[delivery]
connection = "conn-4f2a"
owner = "acme"
repository = "web"
branch = "main"
build_repository = "acme-web-images"
"#;

    #[test]
    fn service_manifest_validates_and_parses() {
        assert!(validate_manifest_toml_str(SERVICE_MANIFEST)
            .unwrap()
            .is_empty());

        let manifest: Manifest = toml::from_str(SERVICE_MANIFEST).unwrap();
        assert_eq!(manifest.stack.variant, Variant::Service);

        let params = manifest.service_params();
        assert_eq!(params.name, "web");
        assert_eq!(params.port, 3000);
        assert_eq!(params.memory_mib, 1024);
    }

    #[test]
    fn delivery_manifest_builds_a_nine_resource_stack() {
        assert!(validate_manifest_toml_str(DELIVERY_MANIFEST)
            .unwrap()
            .is_empty());

        let manifest: Manifest = toml::from_str(DELIVERY_MANIFEST).unwrap();
        let stack = manifest.build_stack().unwrap();
        stack.validate().unwrap();
        assert_eq!(stack.resources().len(), 9);
    }

    #[test]
    fn delivery_variant_without_delivery_section_is_rejected() {
        let contents = r#"
schema_version = "v1"

[stack]
name = "web"
variant = "delivery"
"#;
        let errors = validate_manifest_toml_str(contents).unwrap();
        assert!(!errors.is_empty());
    }

    #[test]
    fn unknown_top_level_keys_are_rejected() {
        let contents = r#"
schema_version = "v1"
unknown = true

[stack]
name = "web"
variant = "service"
"#;
        let errors = validate_manifest_toml_str(contents).unwrap();
        assert!(!errors.is_empty());
    }

    #[test]
    fn manifest_hash_is_deterministic_across_formatting() {
        let a = r#"
schema_version = "v1"

[stack]
name = "web"
variant = "service"

[target]
account = "123456789012"
region = "eu-west-1"
"#;

        let b = r#"
schema_version="v1"
[target]
region="eu-west-1"
account="123456789012"
[stack]
variant="service"
name="web"
"#;

        let ha = manifest_hash_from_toml_str(a).unwrap();
        let hb = manifest_hash_from_toml_str(b).unwrap();
        assert_eq!(ha, hb);
        assert!(ha.as_str().starts_with("sha256:"));
    }
}
