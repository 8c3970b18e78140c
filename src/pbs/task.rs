use super::PbsClient;
use crate::error::Result;
use crate::fields;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub upid: String,
    pub worker_type: String,
    pub worker_id: String,
    pub status: String,
    pub user: String,
    pub starttime: i64,
    pub endtime: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskList {
    pub tasks: Vec<TaskSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub upid: String,
    pub status: String,
    pub exitstatus: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub starttime: i64,
    pub endtime: i64,
}

impl PbsClient {
    pub async fn list_tasks(&self, limit: i64) -> Result<TaskList> {
        let data = self
            .api
            .get("nodes/localhost/tasks", &[("limit", limit.to_string())])
            .await?;

        let tasks: Vec<TaskSummary> = fields::records(&data)
            .map(|t| TaskSummary {
                upid: fields::text(t, "upid"),
                worker_type: fields::text(t, "worker_type"),
                worker_id: fields::text(t, "worker_id"),
                status: fields::text(t, "status"),
                user: fields::text(t, "user"),
                starttime: fields::int(t, "starttime"),
                endtime: fields::int(t, "endtime"),
            })
            .collect();

        Ok(TaskList {
            total: tasks.len(),
            tasks,
        })
    }

    pub async fn get_task_status(&self, upid: &str) -> Result<TaskStatus> {
        let data = self
            .api
            .get(&format!("nodes/localhost/tasks/{}/status", upid), &[])
            .await?;

        Ok(TaskStatus {
            upid: upid.to_string(),
            status: fields::text_or(&data, "status", "unknown"),
            exitstatus: fields::text(&data, "exitstatus"),
            task_type: fields::text(&data, "type"),
            starttime: fields::int(&data, "starttime"),
            endtime: fields::int(&data, "endtime"),
        })
    }
}
