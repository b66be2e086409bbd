//! Resource Descriptors - Plain Data for the Provisioning Engine
//!
//! Serialized in CloudFormation shape: `{"Type": ..., "Properties": {...}}`.

use serde::{Deserialize, Serialize};

pub type LogicalId = String;

pub const LOG_GROUP_ID: &str = "AppLogGroup";
pub const SECURITY_GROUP_ID: &str = "AppSecurityGroup";
pub const BUCKET_ID: &str = "AppBucket";
pub const TABLE_ID: &str = "AppTable";
pub const CLUSTER_ID: &str = "AppCluster";
pub const VPC_ID_PARAMETER: &str = "VpcId";

pub const ANYWHERE_V4: &str = "0.0.0.0/0";

/// Reference to another logical id or parameter in the same template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    #[serde(rename = "Ref")]
    pub target: LogicalId,
}

impl Ref {
    pub fn to(target: impl Into<LogicalId>) -> Self {
        Self { target: target.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum Resource {
    #[serde(rename = "AWS::Logs::LogGroup")]
    LogGroup(LogGroup),
    #[serde(rename = "AWS::EC2::SecurityGroup")]
    SecurityGroup(SecurityGroup),
    #[serde(rename = "AWS::S3::Bucket")]
    Bucket(Bucket),
    #[serde(rename = "AWS::DynamoDB::Table")]
    Table(Table),
    #[serde(rename = "AWS::ECS::Cluster")]
    Cluster(Cluster),
}

impl Resource {
    pub fn type_name(&self) -> &'static str {
        match self {
            Resource::LogGroup(_) => "AWS::Logs::LogGroup",
            Resource::SecurityGroup(_) => "AWS::EC2::SecurityGroup",
            Resource::Bucket(_) => "AWS::S3::Bucket",
            Resource::Table(_) => "AWS::DynamoDB::Table",
            Resource::Cluster(_) => "AWS::ECS::Cluster",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogGroup {
    pub log_group_name: String,
    pub retention_in_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroup {
    pub group_description: String,
    pub group_name: String,
    pub vpc_id: Ref,
    pub security_group_ingress: Vec<TrafficRule>,
    pub security_group_egress: Vec<TrafficRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrafficRule {
    /// `tcp`, `udp`, or `-1` for every protocol
    pub ip_protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<u16>,
    pub cidr_ip: String,
}

impl TrafficRule {
    pub fn tcp_from_anywhere(port: u16) -> Self {
        Self {
            ip_protocol: "tcp".to_string(),
            from_port: Some(port),
            to_port: Some(port),
            cidr_ip: ANYWHERE_V4.to_string(),
        }
    }

    pub fn all_traffic_anywhere() -> Self {
        Self {
            ip_protocol: "-1".to_string(),
            from_port: None,
            to_port: None,
            cidr_ip: ANYWHERE_V4.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    pub bucket_name: String,
    pub public_access_block_configuration: PublicAccessBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicAccessBlock {
    pub block_public_acls: bool,
    pub block_public_policy: bool,
    pub ignore_public_acls: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    pub fn block_all() -> Self {
        Self {
            block_public_acls: true,
            block_public_policy: true,
            ignore_public_acls: true,
            restrict_public_buckets: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    pub table_name: String,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    pub billing_mode: BillingMode,
}

impl Table {
    /// Pay-per-request table keyed by a single string hash attribute.
    pub fn on_demand(table_name: impl Into<String>, hash_key: &str) -> Self {
        Self {
            table_name: table_name.into(),
            attribute_definitions: vec![AttributeDefinition {
                attribute_name: hash_key.to_string(),
                attribute_type: AttributeType::S,
            }],
            key_schema: vec![KeySchemaElement {
                attribute_name: hash_key.to_string(),
                key_type: KeyType::Hash,
            }],
            billing_mode: BillingMode::PayPerRequest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: AttributeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    S,
    N,
    B,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    Hash,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingMode {
    PayPerRequest,
    Provisioned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cluster {
    pub cluster_name: String,
}

/// Template parameter supplied at deploy time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub kind: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    Ref(Ref),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: OutputValue,
}

impl Output {
    pub fn reference(target: impl Into<LogicalId>) -> Self {
        Self { value: OutputValue::Ref(Ref::to(target)) }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self { value: OutputValue::Literal(value.into()) }
    }
}
