//! Build-specification rendering for pipeline build actions.
//!
//! The external build service receives an ordered command script in
//! three phases: registry login, image build and tag, then push and
//! manifest emission. The manifest is the single declared artifact
//! file, `imagedefinitions.json`, mapping the task-definition name to
//! the pushed image URI.

use serde::{Deserialize, Serialize};
use strata_topology::BuildAction;

use crate::target::TargetConfig;

/// Name of the emitted image manifest file.
pub const IMAGE_MANIFEST_FILE: &str = "imagedefinitions.json";

/// One entry of the image manifest.
///
/// Field names follow the external deploy service's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDefinition {
    pub name: String,

    #[serde(rename = "imageUri")]
    pub image_uri: String,
}

/// An ordered command script for the external build service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    /// Registry login.
    pub pre_build: Vec<String>,

    /// Image build and tag.
    pub build: Vec<String>,

    /// Image push and manifest emission.
    pub post_build: Vec<String>,

    /// Files the build declares as its output artifact.
    pub artifact_files: Vec<String>,

    /// The manifest written by the post-build phase.
    pub image_manifest: Vec<ImageDefinition>,
}

/// Renders the build spec for one build action against a target.
pub fn render_build_spec(build: &BuildAction, target: &TargetConfig) -> BuildSpec {
    let repository = build.build_repository.as_str();
    let image_uri = format!("{}:latest", target.image_uri(repository));

    let image_manifest = vec![ImageDefinition {
        name: build.task_definition.name().to_string(),
        image_uri: image_uri.clone(),
    }];

    // Manifest serialization cannot fail: two plain string fields.
    let manifest_json =
        serde_json::to_string(&image_manifest).unwrap_or_else(|_| "[]".to_string());

    BuildSpec {
        pre_build: vec![format!(
            "aws ecr get-login-password --region {} | docker login --username AWS --password-stdin {}",
            target.region,
            target.registry_host()
        )],
        build: vec![
            format!("docker build -t {} .", repository),
            format!("docker tag {}:latest {}", repository, image_uri),
        ],
        post_build: vec![
            format!("docker push {}", image_uri),
            format!("printf '%s' '{}' > {}", manifest_json, IMAGE_MANIFEST_FILE),
        ],
        artifact_files: vec![IMAGE_MANIFEST_FILE.to_string()],
        image_manifest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_refs::{ArtifactRef, TaskDefinitionRef};

    fn build_action() -> BuildAction {
        BuildAction {
            name: "image-build".to_string(),
            input: ArtifactRef::new("source").unwrap(),
            output: ArtifactRef::new("build").unwrap(),
            build_repository: "acme-web-images".to_string(),
            task_definition: TaskDefinitionRef::new("web").unwrap(),
        }
    }

    fn target() -> TargetConfig {
        TargetConfig::new("123456789012", "eu-west-1").unwrap()
    }

    #[test]
    fn manifest_is_the_sole_artifact_file() {
        let spec = render_build_spec(&build_action(), &target());
        assert_eq!(spec.artifact_files, vec![IMAGE_MANIFEST_FILE.to_string()]);
    }

    #[test]
    fn manifest_maps_task_definition_to_image_uri() {
        let spec = render_build_spec(&build_action(), &target());
        assert_eq!(spec.image_manifest.len(), 1);
        assert_eq!(spec.image_manifest[0].name, "web");
        assert_eq!(
            spec.image_manifest[0].image_uri,
            "123456789012.dkr.ecr.eu-west-1.amazonaws.com/acme-web-images:latest"
        );
    }

    #[test]
    fn manifest_entry_uses_wire_field_names() {
        let spec = render_build_spec(&build_action(), &target());
        let json = serde_json::to_value(&spec.image_manifest).unwrap();
        assert!(json[0].get("imageUri").is_some());
        assert!(json[0].get("image_uri").is_none());
    }

    #[test]
    fn phases_run_login_build_push_in_order() {
        let spec = render_build_spec(&build_action(), &target());
        assert!(spec.pre_build[0].contains("docker login"));
        assert!(spec.build[0].starts_with("docker build"));
        assert!(spec.post_build[0].starts_with("docker push"));
        assert!(spec.post_build[1].ends_with(IMAGE_MANIFEST_FILE));
    }
}
