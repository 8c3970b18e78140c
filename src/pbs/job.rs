use super::PbsClient;
use crate::error::Result;
use crate::fields;
use log::info;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct SyncJob {
    pub id: String,
    pub store: String,
    pub remote: String,
    pub remote_store: String,
    pub schedule: String,
    pub comment: String,
    pub remove_vanished: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncJobList {
    pub sync_jobs: Vec<SyncJob>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyJob {
    pub id: String,
    pub store: String,
    pub schedule: String,
    pub comment: String,
    pub ignore_verified: bool,
    /// Days, as reported; absent reads as an empty string.
    pub outdated_after: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyJobList {
    pub verify_jobs: Vec<VerifyJob>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReceipt {
    pub job_id: String,
    pub action: &'static str,
    pub task_id: Value,
}

impl PbsClient {
    pub async fn list_sync_jobs(&self) -> Result<SyncJobList> {
        let data = self.api.get("admin/sync", &[]).await?;

        let sync_jobs: Vec<SyncJob> = fields::records(&data)
            .map(|job| SyncJob {
                id: fields::text(job, "id"),
                store: fields::text(job, "store"),
                remote: fields::text(job, "remote"),
                remote_store: fields::text(job, "remote-store"),
                schedule: fields::text(job, "schedule"),
                comment: fields::text(job, "comment"),
                remove_vanished: fields::flag(job, "remove-vanished"),
            })
            .collect();

        Ok(SyncJobList {
            total: sync_jobs.len(),
            sync_jobs,
        })
    }

    pub async fn list_verify_jobs(&self) -> Result<VerifyJobList> {
        let data = self.api.get("admin/verify", &[]).await?;

        let verify_jobs: Vec<VerifyJob> = fields::records(&data)
            .map(|job| VerifyJob {
                id: fields::text(job, "id"),
                store: fields::text(job, "store"),
                schedule: fields::text(job, "schedule"),
                comment: fields::text(job, "comment"),
                ignore_verified: fields::flag(job, "ignore-verified"),
                outdated_after: fields::raw(job, "outdated-after", json!("")),
            })
            .collect();

        Ok(VerifyJobList {
            total: verify_jobs.len(),
            verify_jobs,
        })
    }

    async fn run_job(&self, kind: &str, job_id: &str) -> Result<JobReceipt> {
        let task_id = self
            .api
            .post(&format!("admin/{}/{}/run", kind, job_id), None)
            .await?;
        info!("Triggered {} job {}", kind, job_id);

        Ok(JobReceipt {
            job_id: job_id.to_string(),
            action: "run",
            task_id,
        })
    }

    pub async fn run_sync_job(&self, job_id: &str) -> Result<JobReceipt> {
        self.run_job("sync", job_id).await
    }

    pub async fn run_verify_job(&self, job_id: &str) -> Result<JobReceipt> {
        self.run_job("verify", job_id).await
    }
}
