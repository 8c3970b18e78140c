use super::WhmClient;
use crate::error::Result;
use crate::fields;
use log::info;
use serde::Serialize;
use serde_json::Value;

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub user: String,
    pub domain: String,
    pub email: String,
    pub plan: String,
    pub suspended: bool,
    pub disk_used: String,
    pub disk_limit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountList {
    pub accounts: Vec<AccountSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskUsage {
    pub account: String,
    pub disk_usage_bytes: u64,
    pub disk_usage_mb: f64,
    pub disk_limit_bytes: u64,
    pub disk_limit_mb: f64,
    pub percent_used: f64,
    pub status: &'static str,
}

impl DiskUsage {
    /// A zero limit means the account has no quota.
    fn new(account: &str, usage: u64, limit: u64) -> Self {
        let percent_used = if limit > 0 {
            fields::round2(usage as f64 / limit as f64 * 100.0)
        } else {
            0.0
        };
        let status = if percent_used < 80.0 {
            "ok"
        } else if percent_used < 90.0 {
            "warning"
        } else {
            "critical"
        };
        Self {
            account: account.to_string(),
            disk_usage_bytes: usage,
            disk_usage_mb: fields::round2(usage as f64 / MIB),
            disk_limit_bytes: limit,
            disk_limit_mb: fields::round2(limit as f64 / MIB),
            percent_used,
            status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountAction {
    pub account: String,
    pub action: &'static str,
    pub result: Value,
}

/// The first entry of a `result` list, or the whole payload when there is none.
fn first_result(data: Value) -> Value {
    match data.get("result").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items[0].clone(),
        _ => data,
    }
}

impl WhmClient {
    pub async fn list_accounts(&self) -> Result<AccountList> {
        let data = self
            .api
            .get("listaccts", &[("api.version", "1".to_string())])
            .await?;

        let accounts: Vec<AccountSummary> = data
            .get("acct")
            .into_iter()
            .flat_map(fields::records)
            .map(|acct| AccountSummary {
                user: fields::text(acct, "user"),
                domain: fields::text(acct, "domain"),
                email: fields::text(acct, "email"),
                plan: fields::text(acct, "plan"),
                suspended: fields::flag(acct, "suspended"),
                disk_used: fields::text_or(acct, "diskused", "0M"),
                disk_limit: fields::text_or(acct, "disklimit", "unlimited"),
            })
            .collect();

        Ok(AccountList {
            total: accounts.len(),
            accounts,
        })
    }

    pub async fn get_disk_usage(&self, account: &str) -> Result<DiskUsage> {
        let data = self
            .api
            .get("getdiskusage", &[("user", account.to_string())])
            .await?;

        let entry = data
            .get("result")
            .and_then(|r| r.get(0))
            .unwrap_or(&fields::NULL);

        Ok(DiskUsage::new(
            account,
            fields::uint(entry, "diskquota"),
            fields::uint_or(entry, "disklimit", 1),
        ))
    }

    pub async fn suspend_account(&self, account: &str, reason: &str) -> Result<AccountAction> {
        let mut query = vec![("user", account.to_string())];
        if !reason.is_empty() {
            query.push(("reason", reason.to_string()));
        }
        let data = self.api.get("suspendacct", &query).await?;
        info!("Suspended account {}", account);

        Ok(AccountAction {
            account: account.to_string(),
            action: "suspended",
            result: first_result(data),
        })
    }

    pub async fn unsuspend_account(&self, account: &str) -> Result<AccountAction> {
        let data = self
            .api
            .get("unsuspendacct", &[("user", account.to_string())])
            .await?;
        info!("Unsuspended account {}", account);

        Ok(AccountAction {
            account: account.to_string(),
            action: "unsuspended",
            result: first_result(data),
        })
    }
}
