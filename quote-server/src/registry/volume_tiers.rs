//! Volume Tier Configuration

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::VolumeTierTable;

#[async_trait]
pub trait VolumeTierProvider: Send + Sync {
    async fn table(&self, org_id: &str) -> anyhow::Result<Option<VolumeTierTable>>;
}

/// In-memory volume tier store
#[derive(Debug, Default)]
pub struct InMemoryVolumeTiers {
    tables: DashMap<String, VolumeTierTable>,
}

impl InMemoryVolumeTiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table, keeping thresholds sorted ascending
    pub fn set_table(&self, mut table: VolumeTierTable) {
        table.tiers.sort_by(|a, b| {
            a.threshold
                .partial_cmp(&b.threshold)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.tables.insert(table.org_id.clone(), table);
    }
}

#[async_trait]
impl VolumeTierProvider for InMemoryVolumeTiers {
    async fn table(&self, org_id: &str) -> anyhow::Result<Option<VolumeTierTable>> {
        Ok(self.tables.get(org_id).map(|t| t.clone()))
    }
}
