use async_trait::async_trait;
use depbot_ghapi_interface::types::GhFileContent;
use depbot_models::{Branch, BranchPurpose, DependencyType, Repository};
use serde_json::{Map, Value};
use shaku::{Component, Interface};
use tracing::{debug, info};

use crate::{
    semver_range::VersionRange, use_cases::lifecycle::messages, CoreContext, DomainError, Result,
};

/// Push a branch pinning a dependency back to its last known-good version.
///
/// The returned branch is not linked to an issue yet.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait CreatePinBranchInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
    ) -> Result<Option<Branch>>;
}

#[derive(Component)]
#[shaku(interface = CreatePinBranchInterface)]
pub(crate) struct CreatePinBranch;

#[async_trait]
impl CreatePinBranchInterface for CreatePinBranch {
    #[tracing::instrument(
        skip_all,
        fields(
            repository_id = repository.id,
            dependency = %branch.dependency
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        repository: &Repository,
        branch: &Branch,
    ) -> Result<Option<Branch>> {
        if branch.monorepo_group.is_some() {
            debug!(message = "Monorepo branches are not pinned");
            return Ok(None);
        }

        let target = match known_good_version(branch)? {
            Some(target) => target,
            None => {
                debug!(message = "No known-good version to pin");
                return Ok(None);
            }
        };

        let repository_path = repository.path()?;
        let (owner, name) = (repository_path.owner(), repository_path.name());
        let installation_id = repository.installation_id;
        let head = format!(
            "{}pin/{}-{}",
            ctx.config.branch_prefix,
            branch.issue_key(),
            target
        );

        let base_sha = ctx
            .api_service
            .git_refs_get_sha(installation_id, owner, name, &branch.base)
            .await?;

        match ctx
            .api_service
            .git_refs_create(installation_id, owner, name, &head, &base_sha)
            .await
        {
            Ok(()) => (),
            Err(e) if e.is_already_resolved() => {
                debug!(head = %head, message = "Pin reference already exists");
            }
            Err(e) => return Err(e.into()),
        }

        let file = ctx
            .api_service
            .contents_get(installation_id, owner, name, &branch.path, &branch.base)
            .await?;
        let content =
            pin_manifest_version(&file.content, branch.dependency_type, &branch.dependency, &target)
                .map_err(|source| DomainError::InvalidManifest {
                    path: branch.path.clone(),
                    source,
                })?;

        let sha = ctx
            .api_service
            .contents_update(
                installation_id,
                owner,
                name,
                &head,
                &GhFileContent { content, ..file },
                &messages::pin_commit_message(branch, &target),
            )
            .await?;

        info!(
            head = %head,
            version = %target,
            message = "Pin branch pushed"
        );

        Ok(Some(Branch {
            repository_id: repository.id,
            account_id: repository.account_id,
            installation_id,
            dependency: branch.dependency.clone(),
            dependency_type: branch.dependency_type,
            version: target,
            old_version: Some(branch.version.clone()),
            path: branch.path.clone(),
            base: branch.base.clone(),
            head,
            purpose: BranchPurpose::Pin,
            group_name: branch.group_name.clone(),
            sha,
            ..Default::default()
        }))
    }
}

fn known_good_version(branch: &Branch) -> Result<Option<String>> {
    if let Some(resolved) = &branch.old_version_resolved {
        return Ok(Some(resolved.clone()));
    }

    match &branch.old_version {
        Some(range) => Ok(VersionRange::parse(range)?
            .min_version()
            .map(|v| v.to_string())),
        None => Ok(None),
    }
}

/// Set one dependency to an exact version, keeping key order.
fn pin_manifest_version(
    raw: &str,
    dependency_type: DependencyType,
    dependency: &str,
    version: &str,
) -> serde_json::Result<String> {
    use serde::de::Error;

    let mut manifest: Value = serde_json::from_str(raw)?;
    let root = manifest
        .as_object_mut()
        .ok_or_else(|| serde_json::Error::custom("manifest is not an object"))?;
    let bucket = root
        .entry(dependency_type.to_str())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| serde_json::Error::custom(format!("{} is not an object", dependency_type)))?;
    bucket.insert(dependency.to_string(), Value::String(version.to_string()));

    let mut output = serde_json::to_string_pretty(&manifest)?;
    output.push('\n');
    Ok(output)
}
