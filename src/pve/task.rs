use super::PveClient;
use crate::error::Result;
use crate::fields;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub upid: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub status: String,
    pub user: String,
    pub starttime: i64,
    pub endtime: i64,
    pub node: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskList {
    pub node: String,
    pub tasks: Vec<TaskSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub node: String,
    pub upid: String,
    pub status: String,
    pub exitstatus: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub starttime: i64,
    pub endtime: i64,
}

impl PveClient {
    pub async fn list_tasks(&self, node: &str, limit: i64) -> Result<TaskList> {
        let data = self
            .api
            .get(
                &format!("nodes/{}/tasks", node),
                &[("limit", limit.to_string())],
            )
            .await?;

        let tasks: Vec<TaskSummary> = fields::records(&data)
            .map(|t| TaskSummary {
                upid: fields::text(t, "upid"),
                task_type: fields::text(t, "type"),
                status: fields::text(t, "status"),
                user: fields::text(t, "user"),
                starttime: fields::int(t, "starttime"),
                endtime: fields::int(t, "endtime"),
                node: fields::text(t, "node"),
            })
            .collect();

        Ok(TaskList {
            node: node.to_string(),
            total: tasks.len(),
            tasks,
        })
    }

    pub async fn get_task_status(&self, node: &str, upid: &str) -> Result<TaskStatus> {
        let path = format!("nodes/{}/tasks/{}/status", node, upid);
        let data = self.api.get(&path, &[]).await?;

        Ok(TaskStatus {
            node: node.to_string(),
            upid: upid.to_string(),
            status: fields::text_or(&data, "status", "unknown"),
            exitstatus: fields::text(&data, "exitstatus"),
            task_type: fields::text(&data, "type"),
            starttime: fields::int(&data, "starttime"),
            endtime: fields::int(&data, "endtime"),
        })
    }
}
