use super::{PbsClient, PruneOptions};
use crate::command::{self, Args, CommandSpec, Param};
use crate::error::Result;
use serde_json::Value;

const DATASTORE: &[Param] = &[Param::Required("datastore")];
const JOB: &[Param] = &[Param::Required("job_id")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PbsOp {
    NodeStatus,
    ListDatastores,
    DatastoreStatus,
    ListSnapshots,
    ListBackupGroups,
    ListSyncJobs,
    RunSyncJob,
    ListVerifyJobs,
    RunVerifyJob,
    GarbageCollect,
    Prune,
    ListTasks,
    TaskStatus,
}

pub const COMMANDS: &[CommandSpec<PbsOp>] = &[
    CommandSpec {
        names: &["get_node_status", "node_status"],
        op: PbsOp::NodeStatus,
        params: &[],
    },
    CommandSpec {
        names: &["list_datastores", "datastores"],
        op: PbsOp::ListDatastores,
        params: &[],
    },
    CommandSpec {
        names: &["get_datastore_status", "datastore_status"],
        op: PbsOp::DatastoreStatus,
        params: DATASTORE,
    },
    CommandSpec {
        names: &["list_snapshots", "snapshots"],
        op: PbsOp::ListSnapshots,
        params: &[
            Param::Required("datastore"),
            Param::Optional("backup_type", ""),
            Param::Optional("backup_id", ""),
        ],
    },
    CommandSpec {
        names: &["list_backup_groups", "backup_groups"],
        op: PbsOp::ListBackupGroups,
        params: DATASTORE,
    },
    CommandSpec {
        names: &["list_sync_jobs", "sync_jobs"],
        op: PbsOp::ListSyncJobs,
        params: &[],
    },
    CommandSpec {
        names: &["run_sync_job"],
        op: PbsOp::RunSyncJob,
        params: JOB,
    },
    CommandSpec {
        names: &["list_verify_jobs", "verify_jobs"],
        op: PbsOp::ListVerifyJobs,
        params: &[],
    },
    CommandSpec {
        names: &["run_verify_job"],
        op: PbsOp::RunVerifyJob,
        params: JOB,
    },
    CommandSpec {
        names: &["run_gc", "gc"],
        op: PbsOp::GarbageCollect,
        params: DATASTORE,
    },
    CommandSpec {
        names: &["run_prune", "prune"],
        op: PbsOp::Prune,
        params: &[
            Param::Required("datastore"),
            Param::Required("backup_type"),
            Param::Required("backup_id"),
            Param::Optional("keep_last", "0"),
            Param::Optional("keep_daily", "0"),
            Param::Optional("keep_weekly", "0"),
            Param::Optional("keep_monthly", "0"),
            Param::Optional("keep_yearly", "0"),
        ],
    },
    CommandSpec {
        names: &["list_tasks", "tasks"],
        op: PbsOp::ListTasks,
        params: &[Param::Optional("limit", "20")],
    },
    CommandSpec {
        names: &["get_task_status", "task_status"],
        op: PbsOp::TaskStatus,
        params: &[Param::Required("upid")],
    },
];

impl PbsClient {
    pub async fn execute_command(&self, command: &str, args: &Value) -> Result<Value> {
        let (name, spec) = command::resolve(COMMANDS, command)?;
        let args = Args::new(&name, args);
        args.check(spec.params)?;

        match spec.op {
            PbsOp::NodeStatus => command::to_json(self.get_node_status().await?),
            PbsOp::ListDatastores => command::to_json(self.list_datastores().await?),
            PbsOp::DatastoreStatus => {
                let datastore = args.text("datastore")?;
                command::to_json(self.get_datastore_status(&datastore).await?)
            }
            PbsOp::ListSnapshots => {
                let datastore = args.text("datastore")?;
                let backup_type = args.text_or("backup_type", "")?;
                let backup_id = args.text_or("backup_id", "")?;
                command::to_json(
                    self.list_snapshots(&datastore, &backup_type, &backup_id)
                        .await?,
                )
            }
            PbsOp::ListBackupGroups => {
                let datastore = args.text("datastore")?;
                command::to_json(self.list_backup_groups(&datastore).await?)
            }
            PbsOp::ListSyncJobs => command::to_json(self.list_sync_jobs().await?),
            PbsOp::RunSyncJob => {
                let job_id = args.text("job_id")?;
                command::to_json(self.run_sync_job(&job_id).await?)
            }
            PbsOp::ListVerifyJobs => command::to_json(self.list_verify_jobs().await?),
            PbsOp::RunVerifyJob => {
                let job_id = args.text("job_id")?;
                command::to_json(self.run_verify_job(&job_id).await?)
            }
            PbsOp::GarbageCollect => {
                let datastore = args.text("datastore")?;
                command::to_json(self.run_garbage_collection(&datastore).await?)
            }
            PbsOp::Prune => {
                let datastore = args.text("datastore")?;
                let backup_type = args.text("backup_type")?;
                let backup_id = args.text("backup_id")?;
                let keep = PruneOptions {
                    keep_last: args.integer_or("keep_last", 0)?,
                    keep_daily: args.integer_or("keep_daily", 0)?,
                    keep_weekly: args.integer_or("keep_weekly", 0)?,
                    keep_monthly: args.integer_or("keep_monthly", 0)?,
                    keep_yearly: args.integer_or("keep_yearly", 0)?,
                };
                command::to_json(
                    self.run_prune(&datastore, &backup_type, &backup_id, keep)
                        .await?,
                )
            }
            PbsOp::ListTasks => {
                let limit = args.integer_or("limit", 20)?;
                command::to_json(self.list_tasks(limit).await?)
            }
            PbsOp::TaskStatus => {
                let upid = args.text("upid")?;
                command::to_json(self.get_task_status(&upid).await?)
            }
        }
    }
}
