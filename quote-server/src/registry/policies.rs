//! Approval Policy Store

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::ApprovalPolicy;

#[async_trait]
pub trait PolicyProvider: Send + Sync {
    async fn policy(&self, org_id: &str) -> anyhow::Result<Option<ApprovalPolicy>>;
}

/// In-memory policy store
#[derive(Debug, Default)]
pub struct InMemoryPolicies {
    policies: DashMap<String, ApprovalPolicy>,
}

impl InMemoryPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_policy(&self, policy: ApprovalPolicy) {
        self.policies.insert(policy.org_id.clone(), policy);
    }
}

#[async_trait]
impl PolicyProvider for InMemoryPolicies {
    async fn policy(&self, org_id: &str) -> anyhow::Result<Option<ApprovalPolicy>> {
        Ok(self.policies.get(org_id).map(|p| p.clone()))
    }
}
