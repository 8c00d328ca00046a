//! Loyalty Ledger
//!
//! Point balance lookup and redemption commit. The resolver only
//! previews against this ledger; `commit_redemption` runs once at
//! proposal finalization.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{LoyaltyAccount, LoyaltyProgram};

#[async_trait]
pub trait LoyaltyLedger: Send + Sync {
    async fn program(&self, org_id: &str) -> anyhow::Result<Option<LoyaltyProgram>>;

    async fn account(
        &self,
        org_id: &str,
        client_id: &str,
    ) -> anyhow::Result<Option<LoyaltyAccount>>;

    /// Deduct redeemed points from the customer's balance
    async fn commit_redemption(
        &self,
        org_id: &str,
        client_id: &str,
        points: i64,
    ) -> anyhow::Result<()>;
}

/// In-memory loyalty store
#[derive(Debug, Default)]
pub struct InMemoryLoyalty {
    programs: DashMap<String, LoyaltyProgram>,
    accounts: DashMap<(String, String), LoyaltyAccount>,
}

impl InMemoryLoyalty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_program(&self, program: LoyaltyProgram) {
        self.programs.insert(program.org_id.clone(), program);
    }

    pub fn set_account(&self, account: LoyaltyAccount) {
        self.accounts.insert(
            (account.org_id.clone(), account.client_id.clone()),
            account,
        );
    }
}

#[async_trait]
impl LoyaltyLedger for InMemoryLoyalty {
    async fn program(&self, org_id: &str) -> anyhow::Result<Option<LoyaltyProgram>> {
        Ok(self.programs.get(org_id).map(|p| p.clone()))
    }

    async fn account(
        &self,
        org_id: &str,
        client_id: &str,
    ) -> anyhow::Result<Option<LoyaltyAccount>> {
        Ok(self
            .accounts
            .get(&(org_id.to_string(), client_id.to_string()))
            .map(|a| a.clone()))
    }

    async fn commit_redemption(
        &self,
        org_id: &str,
        client_id: &str,
        points: i64,
    ) -> anyhow::Result<()> {
        let mut account = self
            .accounts
            .get_mut(&(org_id.to_string(), client_id.to_string()))
            .ok_or_else(|| anyhow::anyhow!("loyalty account not found for {client_id}"))?;
        if account.points_balance < points {
            anyhow::bail!(
                "insufficient points: balance {} < redeem {}",
                account.points_balance,
                points
            );
        }
        account.points_balance -= points;
        Ok(())
    }
}
