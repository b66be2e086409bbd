//! Deployment Context
//!
//! Account, region and VPC are passed in explicitly. Nothing here reads
//! the process environment.

use serde::{Deserialize, Serialize};

pub const ACCOUNT_PLACEHOLDER: &str = "${AWS::AccountId}";
pub const REGION_PLACEHOLDER: &str = "${AWS::Region}";

/// Where the account and region values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSource {
    /// Concrete values supplied by the caller
    Explicit,
    /// Pseudo-parameter text, resolved by the provisioning engine at deploy time
    Unresolved,
}

impl Default for ContextSource {
    fn default() -> Self {
        Self::Unresolved
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentContext {
    pub account: String,
    pub region: String,
    /// Default for the `VpcId` template parameter
    #[serde(default)]
    pub vpc_id: Option<String>,
    pub source: ContextSource,
}

impl Default for DeploymentContext {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl DeploymentContext {
    pub fn explicit(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
            vpc_id: None,
            source: ContextSource::Explicit,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            account: ACCOUNT_PLACEHOLDER.to_string(),
            region: REGION_PLACEHOLDER.to_string(),
            vpc_id: None,
            source: ContextSource::Unresolved,
        }
    }

    /// Missing values fall back to their placeholders.
    pub fn from_parts(account: Option<String>, region: Option<String>) -> Self {
        match (account, region) {
            (Some(account), Some(region)) => Self::explicit(account, region),
            (account, region) => Self {
                account: account.unwrap_or_else(|| ACCOUNT_PLACEHOLDER.to_string()),
                region: region.unwrap_or_else(|| REGION_PLACEHOLDER.to_string()),
                vpc_id: None,
                source: ContextSource::Unresolved,
            },
        }
    }

    pub fn with_vpc_id(mut self, vpc_id: impl Into<String>) -> Self {
        self.vpc_id = Some(vpc_id.into());
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.source == ContextSource::Explicit
    }

    pub fn role_arn(&self, role_name: &str) -> String {
        format!("arn:aws:iam::{}:role/{}", self.account, role_name)
    }
}

/// True if `text` carries deployment-time placeholder markers.
pub fn contains_placeholder(text: &str) -> bool {
    text.contains("${") || text.contains("Token[")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_context() {
        let ctx = DeploymentContext::explicit("123456789012", "us-east-1");
        assert!(ctx.is_resolved());
        assert_eq!(ctx.role_arn("LabRole"), "arn:aws:iam::123456789012:role/LabRole");
    }

    #[test]
    fn test_partial_parts_stay_unresolved() {
        let ctx = DeploymentContext::from_parts(Some("123456789012".into()), None);
        assert_eq!(ctx.source, ContextSource::Unresolved);
        assert_eq!(ctx.region, REGION_PLACEHOLDER);
        assert!(contains_placeholder(&ctx.region));
        assert!(!contains_placeholder(&ctx.account));
    }

    #[test]
    fn test_token_marker_detected() {
        assert!(contains_placeholder("appbucket-${Token[AWS.AccountId.4]}"));
        assert!(contains_placeholder("Token[TOKEN.12]"));
        assert!(!contains_placeholder("appbucket-123-us-east-1"));
    }
}
