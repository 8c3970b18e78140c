use super::WhmClient;
use crate::error::Result;
use crate::fields;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Serialize)]
pub struct DomainSummary {
    pub domain: String,
    pub document_root: String,
    pub user: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainList {
    pub domains: Vec<DomainSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BandwidthEntry {
    pub account: String,
    pub domain: String,
    pub bytes_used: u64,
    pub limit: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct BandwidthReport {
    pub bandwidth: Vec<BandwidthEntry>,
    pub total: usize,
}

impl WhmClient {
    pub async fn list_domains(&self) -> Result<DomainList> {
        let data = self.api.get("listdomains", &[]).await?;

        let domains: Vec<DomainSummary> = data
            .get("domain")
            .into_iter()
            .flat_map(fields::records)
            .map(|d| DomainSummary {
                domain: fields::text(d, "domain"),
                document_root: fields::text(d, "docroot"),
                user: fields::text(d, "user"),
                status: fields::text_or(d, "status", "active"),
            })
            .collect();

        Ok(DomainList {
            total: domains.len(),
            domains,
        })
    }

    /// Server-wide when `account` is empty, otherwise filtered to that user.
    pub async fn get_bandwidth(&self, account: &str) -> Result<BandwidthReport> {
        let mut query = Vec::new();
        if !account.is_empty() {
            query.push(("searchtype", "user".to_string()));
            query.push(("search", account.to_string()));
        }
        let data = self.api.get("showbw", &query).await?;

        let bandwidth: Vec<BandwidthEntry> = data
            .get("bandwidth")
            .into_iter()
            .flat_map(fields::records)
            .map(|entry| BandwidthEntry {
                account: fields::text(entry, "acct"),
                domain: fields::text(entry, "domain"),
                bytes_used: fields::uint(entry, "totalbytes"),
                limit: fields::raw(entry, "limit", json!("unlimited")),
            })
            .collect();

        Ok(BandwidthReport {
            total: bandwidth.len(),
            bandwidth,
        })
    }
}
