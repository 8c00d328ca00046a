//! Promo Code Registry
//!
//! Lookup contract consumed by the promo-code resolver, plus an
//! in-memory implementation. Codes are keyed case-insensitively.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::PromoCode;

/// Read/commit contract for promotional codes
#[async_trait]
pub trait PromoCodeRegistry: Send + Sync {
    /// Lookup a code within an organization (case-insensitive)
    async fn find(&self, org_id: &str, code: &str) -> anyhow::Result<Option<PromoCode>>;

    /// How many times this customer has used the code, keyed by the
    /// client id or, for customers not yet on file, their email
    async fn customer_use_count(
        &self,
        org_id: &str,
        code: &str,
        customer_key: &str,
    ) -> anyhow::Result<u32>;

    /// Increment usage counters; invoked only at proposal finalization
    async fn record_use(
        &self,
        org_id: &str,
        code: &str,
        customer_key: Option<&str>,
    ) -> anyhow::Result<()>;
}

fn key(org_id: &str, code: &str) -> (String, String) {
    (org_id.to_string(), code.trim().to_uppercase())
}

/// In-memory promo code store
#[derive(Debug, Default)]
pub struct InMemoryPromoCodes {
    codes: DashMap<(String, String), PromoCode>,
    customer_uses: DashMap<(String, String, String), u32>,
}

impl InMemoryPromoCodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a code definition
    pub fn insert(&self, code: PromoCode) {
        self.codes.insert(key(&code.org_id, &code.code), code);
    }

    pub fn list(&self, org_id: &str) -> Vec<PromoCode> {
        self.codes
            .iter()
            .filter(|entry| entry.key().0 == org_id)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl PromoCodeRegistry for InMemoryPromoCodes {
    async fn find(&self, org_id: &str, code: &str) -> anyhow::Result<Option<PromoCode>> {
        Ok(self.codes.get(&key(org_id, code)).map(|c| c.clone()))
    }

    async fn customer_use_count(
        &self,
        org_id: &str,
        code: &str,
        customer_key: &str,
    ) -> anyhow::Result<u32> {
        let (org, code) = key(org_id, code);
        Ok(self
            .customer_uses
            .get(&(org, code, customer_key.to_string()))
            .map(|c| *c)
            .unwrap_or(0))
    }

    async fn record_use(
        &self,
        org_id: &str,
        code: &str,
        customer_key: Option<&str>,
    ) -> anyhow::Result<()> {
        let k = key(org_id, code);
        if let Some(mut entry) = self.codes.get_mut(&k) {
            entry.use_count += 1;
        }
        if let Some(client) = customer_key {
            let mut count = self
                .customer_uses
                .entry((k.0, k.1, client.to_string()))
                .or_insert(0);
            *count += 1;
        }
        Ok(())
    }
}
