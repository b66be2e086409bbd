//! Stack Synthesis - Single Entry Point
//!
//! Every generated name goes through `naming::sanitize`. Descriptors are
//! assembled here and handed off as a template; nothing is provisioned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, StackConfig};
use crate::context::{contains_placeholder, DeploymentContext};
use crate::hashing::compute_template_hash;
use crate::naming::{sanitize, SanitizedName};
use crate::resources::{
    Bucket, Cluster, LogGroup, LogicalId, Output, Parameter, PublicAccessBlock, Ref, Resource,
    SecurityGroup, Table, TrafficRule, BUCKET_ID, CLUSTER_ID, LOG_GROUP_ID, SECURITY_GROUP_ID,
    TABLE_ID, VPC_ID_PARAMETER,
};
use crate::ENGINE_VERSION;

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";
pub const MAX_STACK_NAME_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Config requires engine >= {0}, current is {1}")]
    EngineVersionMismatch(String, String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid stack name {0:?}: {1}")]
    InvalidStackName(String, &'static str),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Stack-level properties: name, description, tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackProps {
    pub stack_name: String,
    pub description: String,
    pub tags: BTreeMap<String, String>,
    pub deployed_at: DateTime<Utc>,
}

impl StackProps {
    /// Unique name from the last six digits of `now` in epoch millis.
    pub fn generate(config: &StackConfig, now: DateTime<Utc>) -> Self {
        let suffix = now.timestamp_millis().rem_euclid(1_000_000);
        let stack_name = format!("{}-{:06}", config.stack_prefix, suffix);
        Self::named(config, stack_name, now)
    }

    pub fn named(config: &StackConfig, stack_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let stack_name = stack_name.into();

        let mut tags = BTreeMap::new();
        tags.insert("Project".to_string(), config.project.clone());
        tags.insert("Environment".to_string(), config.environment.clone());
        tags.insert("DeployedAt".to_string(), now.to_rfc3339());
        tags.insert("StackId".to_string(), stack_name.clone());

        Self {
            description: format!(
                "Infrastructure stack for AWS Academy Labs - Deployed {}",
                now.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            stack_name,
            tags,
            deployed_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackTemplate {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    pub description: String,
    pub parameters: BTreeMap<String, Parameter>,
    pub resources: BTreeMap<LogicalId, Resource>,
    pub outputs: BTreeMap<String, Output>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedStack {
    pub stack_name: String,
    pub description: String,
    pub tags: BTreeMap<String, String>,
    pub bucket_name: SanitizedName,
    pub engine_version: String,
    pub template: StackTemplate,
    pub template_hash: String,
}

pub struct StackSynthesizer {
    config: StackConfig,
}

impl StackSynthesizer {
    pub fn new(config: StackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Bucket name from account, region and stack name.
    pub fn bucket_name(&self, props: &StackProps, ctx: &DeploymentContext) -> SanitizedName {
        let candidate = format!(
            "{}-{}-{}-{}",
            self.config.bucket_prefix, ctx.account, ctx.region, props.stack_name
        );
        if contains_placeholder(&candidate) {
            // Placeholder text is sanitized like any other text.
            warn!(%candidate, "bucket name candidate contains unresolved placeholder text");
        }
        let name = sanitize(&candidate);
        debug!(%candidate, %name, "sanitized bucket name");
        name
    }

    pub fn synthesize(
        &self,
        props: &StackProps,
        ctx: &DeploymentContext,
    ) -> Result<SynthesizedStack, SynthError> {
        self.check_engine_version()?;
        validate_stack_name(&props.stack_name)?;

        let bucket_name = self.bucket_name(props, ctx);
        let template = self.build_template(props, ctx, &bucket_name);
        let template_hash = compute_template_hash(&template)?;

        info!(
            stack = %props.stack_name,
            bucket = %bucket_name,
            resources = template.resources.len(),
            resolved = ctx.is_resolved(),
            "synthesized stack"
        );

        Ok(SynthesizedStack {
            stack_name: props.stack_name.clone(),
            description: props.description.clone(),
            tags: props.tags.clone(),
            bucket_name,
            engine_version: ENGINE_VERSION.to_string(),
            template,
            template_hash,
        })
    }

    fn build_template(
        &self,
        props: &StackProps,
        ctx: &DeploymentContext,
        bucket_name: &SanitizedName,
    ) -> StackTemplate {
        let config = &self.config;

        let mut parameters = BTreeMap::new();
        parameters.insert(VPC_ID_PARAMETER.to_string(), Parameter {
            kind: "String".to_string(),
            description: "VPC ID where resources will be created (use default VPC id)".to_string(),
            default: ctx.vpc_id.clone(),
        });

        let mut resources = BTreeMap::new();
        resources.insert(LOG_GROUP_ID.to_string(), Resource::LogGroup(LogGroup {
            log_group_name: config.log_group_name.clone(),
            retention_in_days: config.log_retention_days,
        }));
        resources.insert(SECURITY_GROUP_ID.to_string(), Resource::SecurityGroup(SecurityGroup {
            group_description: config.security_group_description.clone(),
            group_name: config.security_group_name.clone(),
            vpc_id: Ref::to(VPC_ID_PARAMETER),
            security_group_ingress: config.ingress_ports.iter()
                .map(|port| TrafficRule::tcp_from_anywhere(*port))
                .collect(),
            security_group_egress: vec![TrafficRule::all_traffic_anywhere()],
        }));
        resources.insert(BUCKET_ID.to_string(), Resource::Bucket(Bucket {
            bucket_name: bucket_name.to_string(),
            public_access_block_configuration: PublicAccessBlock::block_all(),
        }));
        resources.insert(TABLE_ID.to_string(), Resource::Table(Table::on_demand(&config.table_name, "id")));
        resources.insert(CLUSTER_ID.to_string(), Resource::Cluster(Cluster {
            cluster_name: config.cluster_name.clone(),
        }));

        let mut outputs = BTreeMap::new();
        outputs.insert("BucketName".to_string(), Output::reference(BUCKET_ID));
        outputs.insert("TableName".to_string(), Output::reference(TABLE_ID));
        outputs.insert("ClusterName".to_string(), Output::reference(CLUSTER_ID));
        outputs.insert("LogGroupName".to_string(), Output::reference(LOG_GROUP_ID));
        outputs.insert("SecurityGroupId".to_string(), Output::reference(SECURITY_GROUP_ID));
        outputs.insert("LabRoleArn".to_string(), Output::literal(ctx.role_arn(&config.role_name)));

        StackTemplate {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: props.description.clone(),
            parameters,
            resources,
            outputs,
        }
    }

    fn check_engine_version(&self) -> Result<(), SynthError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| SynthError::InvalidVersion(ENGINE_VERSION.to_string()))?;
        let min_ver = semver::Version::parse(&self.config.engine_min_version)
            .map_err(|_| SynthError::InvalidVersion(self.config.engine_min_version.clone()))?;

        if engine_ver < min_ver {
            return Err(SynthError::EngineVersionMismatch(
                self.config.engine_min_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for StackSynthesizer {
    fn default() -> Self {
        Self::new(StackConfig::default())
    }
}

/// Stack names: a letter, then letters, digits or hyphens; at most 128 chars.
pub fn validate_stack_name(name: &str) -> Result<(), SynthError> {
    let invalid = |reason: &'static str| -> Result<(), SynthError> {
        Err(SynthError::InvalidStackName(name.to_string(), reason))
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return invalid("must not be empty"),
        Some(c) if !c.is_ascii_alphabetic() => return invalid("must start with a letter"),
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return invalid("may only contain letters, digits and hyphens");
    }
    if name.len() > MAX_STACK_NAME_LEN {
        return invalid("must be at most 128 characters");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_718_000_123_456).unwrap()
    }

    #[test]
    fn test_generated_stack_name_uses_millis_suffix() {
        let props = StackProps::generate(&StackConfig::default(), fixed_now());
        assert_eq!(props.stack_name, "CDK-Stack-123456");
        assert_eq!(props.tags["StackId"], "CDK-Stack-123456");
        assert_eq!(props.tags["Project"], "CDK-Demo");
        assert_eq!(props.tags["Environment"], "AcademyLabs");
    }

    #[test]
    fn test_generated_suffix_is_zero_padded() {
        let now = Utc.timestamp_millis_opt(1_718_000_000_042).unwrap();
        let props = StackProps::generate(&StackConfig::default(), now);
        assert_eq!(props.stack_name, "CDK-Stack-000042");
    }

    #[test]
    fn test_stack_name_rules() {
        assert!(validate_stack_name("CDK-Stack-123456").is_ok());
        assert!(validate_stack_name("").is_err());
        assert!(validate_stack_name("1stack").is_err());
        assert!(validate_stack_name("my_stack").is_err());
        assert!(validate_stack_name(&"s".repeat(129)).is_err());
    }

    #[test]
    fn test_bucket_name_from_context() {
        let synth = StackSynthesizer::default();
        let props = StackProps::named(synth.config(), "CDK-Stack-123456", fixed_now());
        let ctx = DeploymentContext::explicit("123456789012", "us-east-1");
        assert_eq!(
            synth.bucket_name(&props, &ctx).as_str(),
            "appbucket-123456789012-us-east-1-cdk-stack-123456"
        );
    }

    #[test]
    fn test_engine_version_gate() {
        let config = StackConfig {
            engine_min_version: "99.0.0".to_string(),
            ..StackConfig::default()
        };
        let synth = StackSynthesizer::new(config);
        let props = StackProps::named(synth.config(), "Stack", fixed_now());
        let err = synth.synthesize(&props, &DeploymentContext::unresolved()).unwrap_err();
        assert!(matches!(err, SynthError::EngineVersionMismatch(..)));

        let config = StackConfig {
            engine_min_version: "latest".to_string(),
            ..StackConfig::default()
        };
        let synth = StackSynthesizer::new(config);
        let err = synth.synthesize(&props, &DeploymentContext::unresolved()).unwrap_err();
        assert!(matches!(err, SynthError::InvalidVersion(_)));
    }
}
