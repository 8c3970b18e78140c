#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::pbs::PbsClient;
    use crate::pve::PveClient;
    use crate::settings::{BackupSettings, ProxmoxSettings, WhmSettings};
    use crate::whm::WhmClient;
    use serde_json::json;
    use wiremock::matchers::{any, body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pve_client(server: &MockServer) -> PveClient {
        let addr = server.address();
        PveClient::new(&ProxmoxSettings {
            host: format!("http://{}", addr.ip()),
            port: addr.port(),
            user: "root@pam".into(),
            token_name: "ci".into(),
            token_value: "secret".into(),
            ..Default::default()
        })
        .unwrap()
    }

    fn pbs_client(server: &MockServer) -> PbsClient {
        let addr = server.address();
        PbsClient::new(&BackupSettings {
            host: format!("http://{}", addr.ip()),
            port: addr.port(),
            user: "backup@pbs".into(),
            token_name: "ci".into(),
            token_value: "secret".into(),
            ..Default::default()
        })
        .unwrap()
    }

    fn whm_client(server: &MockServer) -> WhmClient {
        let addr = server.address();
        WhmClient::new(&WhmSettings {
            host: format!("http://{}", addr.ip()),
            port: addr.port(),
            api_token: "TOKEN".into(),
            ..Default::default()
        })
        .unwrap()
    }

    fn ok(body: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(body)
    }

    #[tokio::test]
    async fn test_list_vms_reshapes_and_drops_junk() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve1/qemu"))
            .and(header("authorization", "PVEAPIToken=root@pam!ci=secret"))
            .respond_with(ok(json!({
                "data": [
                    { "vmid": 100, "name": "web", "status": "running", "cpu": 0.256,
                      "mem": 512, "maxmem": 1024, "uptime": 60 },
                    "garbage",
                    { "vmid": 101 }
                ]
            })))
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let res = client
            .execute_command("list_vms", &json!({ "node": "pve1" }))
            .await
            .unwrap();

        assert_eq!(res["node"], "pve1");
        assert_eq!(res["total"], 2);
        assert_eq!(res["vms"][0]["cpu_usage"], 25.6);
        assert_eq!(res["vms"][0]["memory_total"], 1024);
        assert_eq!(res["vms"][1]["name"], "");
        assert_eq!(res["vms"][1]["status"], "unknown");
        assert_eq!(res["vms"][1]["disk_total"], 0);
    }

    #[tokio::test]
    async fn test_non_list_payload_yields_empty_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve1/lxc"))
            .respond_with(ok(json!({ "data": { "unexpected": true } })))
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let res = client.list_containers("pve1").await.unwrap();
        assert_eq!(res.total, 0);
        assert!(res.containers.is_empty());
    }

    #[tokio::test]
    async fn test_alias_and_case_dispatch_identically() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve1/qemu"))
            .respond_with(ok(json!({ "data": [{ "vmid": 100 }] })))
            .expect(2)
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let args = json!({ "node": "pve1" });
        let a = client.execute_command("LIST_VMS", &args).await.unwrap();
        let b = client.execute_command("  vms ", &args).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_start_vm_coerces_vmid() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api2/json/nodes/pve1/qemu/100/status/start"))
            .respond_with(ok(json!({ "data": "UPID:pve1:0001:qmstart:100:root@pam:" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let res = client
            .execute_command("start_vm", &json!({ "node": "pve1", "vmid": "100" }))
            .await
            .unwrap();

        assert_eq!(res["vmid"], 100);
        assert_eq!(res["action"], "start");
        assert_eq!(res["task_id"], "UPID:pve1:0001:qmstart:100:root@pam:");
    }

    #[tokio::test]
    async fn test_invalid_vmid_never_reaches_network() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ok(json!({ "data": null })))
            .expect(0)
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let err = client
            .execute_command("start_vm", &json!({ "node": "pve1", "vmid": "abc" }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { field: "vmid", .. }));

        let err = client
            .execute_command("stop_container", &json!({ "node": "pve1" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "stop_container requires a 'vmid' argument");

        let err = client
            .execute_command("vms", &json!({ "node": "" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "vms requires a 'node' argument");
    }

    #[tokio::test]
    async fn test_list_tasks_default_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve1/tasks"))
            .and(query_param("limit", "20"))
            .respond_with(ok(json!({
                "data": [{ "upid": "UPID:a", "type": "vzdump", "status": "OK", "starttime": 1700000000 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let res = client
            .execute_command("tasks", &json!({ "node": "pve1" }))
            .await
            .unwrap();
        assert_eq!(res["total"], 1);
        assert_eq!(res["tasks"][0]["type"], "vzdump");
        assert_eq!(res["tasks"][0]["endtime"], 0);
    }

    #[tokio::test]
    async fn test_cluster_resources_type_filter() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/cluster/resources"))
            .and(query_param("type", "vm"))
            .respond_with(ok(json!({
                "data": [{ "id": "qemu/100", "type": "qemu", "node": "pve1", "maxcpu": 4 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let res = client
            .execute_command("cluster_resources", &json!({ "type": "vm" }))
            .await
            .unwrap();
        assert_eq!(res["resources"][0]["id"], "qemu/100");
        assert_eq!(res["resources"][0]["maxcpu"], 4);
    }

    #[tokio::test]
    async fn test_node_status_percentages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve1/status"))
            .respond_with(ok(json!({
                "data": {
                    "uptime": 3600,
                    "cpu": 0.05,
                    "cpuinfo": { "model": "EPYC", "cores": 8, "sockets": 1 },
                    "loadavg": ["0.10", "0.20", "0.30"],
                    "memory": { "total": 0, "used": 5, "free": 0 },
                    "rootfs": { "total": 400, "used": 100, "avail": 300 },
                    "pveversion": "pve-manager/8.1.4"
                }
            })))
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let res = client
            .execute_command("node_status", &json!({ "node": "pve1" }))
            .await
            .unwrap();
        assert_eq!(res["cpu"]["usage_percent"], 5.0);
        assert_eq!(res["cpu"]["load_average"], json!(["0.10", "0.20", "0.30"]));
        assert_eq!(res["memory"]["percent_used"], 500.0);
        assert_eq!(res["disk"]["percent_used"], 25.0);
        assert_eq!(res["ksm"]["shared"], 0);
        assert_eq!(res["pve_version"], "pve-manager/8.1.4");
    }

    #[tokio::test]
    async fn test_unknown_command_lists_sorted_names() {
        let server = MockServer::start().await;
        let client = pve_client(&server);

        let err = client
            .execute_command("frobnicate", &json!({}))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with(
            "Unknown command 'frobnicate'. Valid: cluster, cluster_resources, container_status, containers, get_cluster_status"
        ));
        assert!(msg.ends_with("task_status, tasks, vm_status, vms"));
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/nodes"))
            .respond_with(ResponseTemplate::new(401).set_body_string("authentication failure"))
            .mount(&server)
            .await;

        let client = pve_client(&server);
        let err = client.execute_command("nodes", &json!({})).await.unwrap_err();
        assert!(matches!(err, Error::Status { .. }));
        assert_eq!(
            err.to_string(),
            "Proxmox API failed: 401 Unauthorized - authentication failure"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = PveClient::new(&ProxmoxSettings {
            host: "http://127.0.0.1".into(),
            port,
            ..Default::default()
        })
        .unwrap();

        let err = client.list_nodes().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Cannot reach Proxmox host: 127.0.0.1");
    }

    #[tokio::test]
    async fn test_pbs_datastore_status_joins_usage() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/admin/datastore/main"))
            .and(header("authorization", "PBSAPIToken=backup@pbs!ci:secret"))
            .respond_with(ok(json!({
                "data": { "path": "/mnt/datastore/main", "gc-schedule": "daily" }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api2/json/status/datastore-usage"))
            .respond_with(ok(json!({
                "data": [
                    { "store": "other", "total": 10, "used": 9, "avail": 1 },
                    { "store": "main", "total": 1000, "used": 250, "avail": 750 }
                ]
            })))
            .mount(&server)
            .await;

        let client = pbs_client(&server);
        let res = client
            .execute_command("datastore_status", &json!({ "datastore": "main" }))
            .await
            .unwrap();
        assert_eq!(res["path"], "/mnt/datastore/main");
        assert_eq!(res["used_bytes"], 250);
        assert_eq!(res["percent_used"], 25.0);
        assert_eq!(res["gc_schedule"], "daily");
        assert_eq!(res["prune_schedule"], "");
    }

    #[tokio::test]
    async fn test_pbs_datastore_status_without_usage_entry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/admin/datastore/cold"))
            .respond_with(ok(json!({ "data": [] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api2/json/status/datastore-usage"))
            .respond_with(ok(json!({ "data": [{ "store": "main", "total": 10 }] })))
            .mount(&server)
            .await;

        let client = pbs_client(&server);
        let res = client.get_datastore_status("cold").await.unwrap();
        assert_eq!(res.total_bytes, 0);
        assert_eq!(res.available_bytes, 0);
        assert_eq!(res.percent_used, 0.0);
        assert_eq!(res.path, "");
    }

    #[tokio::test]
    async fn test_pbs_prune_omits_zero_tiers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api2/json/admin/datastore/main/prune"))
            .and(body_json(json!({
                "backup-type": "vm",
                "backup-id": "100",
                "keep-daily": 7
            })))
            .respond_with(ok(json!({ "data": [{ "backup-time": 1700000000, "keep": true }] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = pbs_client(&server);
        let res = client
            .execute_command(
                "prune",
                &json!({
                    "datastore": "main",
                    "backup_type": "vm",
                    "backup_id": 100,
                    "keep_last": 0,
                    "keep_daily": "7"
                }),
            )
            .await
            .unwrap();
        assert_eq!(res["action"], "prune");
        assert_eq!(res["result"][0]["keep"], true);
    }

    #[tokio::test]
    async fn test_pbs_snapshot_filters_and_jobs() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/admin/datastore/main/snapshots"))
            .and(query_param("backup-type", "ct"))
            .respond_with(ok(json!({
                "data": [{ "backup-type": "ct", "backup-id": "200", "size": 42, "protected": true }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api2/json/admin/sync/s-offsite/run"))
            .respond_with(ok(json!({ "data": "UPID:pbs:sync" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = pbs_client(&server);
        let snaps = client
            .execute_command("snapshots", &json!({ "datastore": "main", "backup_type": "ct" }))
            .await
            .unwrap();
        assert_eq!(snaps["total"], 1);
        assert_eq!(snaps["snapshots"][0]["protected"], true);
        assert_eq!(snaps["snapshots"][0]["verification"], json!({}));

        let run = client
            .execute_command("run_sync_job", &json!({ "job_id": "s-offsite" }))
            .await
            .unwrap();
        assert_eq!(run, json!({ "job_id": "s-offsite", "action": "run", "task_id": "UPID:pbs:sync" }));
    }

    #[tokio::test]
    async fn test_whm_rejects_unlisted_service() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ok(json!({ "status": 1 })))
            .expect(0)
            .mount(&server)
            .await;

        let client = whm_client(&server);
        let err = client
            .execute_command("restart_service", &json!({ "service": "telnet" }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceNotAllowed { .. }));
        assert!(err.is_validation());

        let err = client
            .execute_command("disk", &json!({ "account": "   " }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "disk requires a non-empty 'account' string");
    }

    #[tokio::test]
    async fn test_whm_restart_allowed_service() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json-api/restartservice"))
            .and(query_param("service", "httpd"))
            .and(header("authorization", "whm root:TOKEN"))
            .respond_with(ok(json!({ "metadata": { "result": 1 } })))
            .expect(1)
            .mount(&server)
            .await;

        let client = whm_client(&server);
        let res = client
            .execute_command("restart", &json!({ "service": " httpd " }))
            .await
            .unwrap();
        assert_eq!(res["service"], "httpd");
        assert_eq!(res["action"], "restart");
    }

    #[tokio::test]
    async fn test_whm_status_zero_is_remote_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json-api/suspendacct"))
            .respond_with(ok(json!({
                "result": [{ "status": 0, "statusmsg": "User does not exist" }]
            })))
            .mount(&server)
            .await;

        let client = whm_client(&server);
        let err = client
            .execute_command("suspend", &json!({ "account": "ghost" }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { .. }));
        assert_eq!(err.to_string(), "WHM API Error: User does not exist");
    }

    #[tokio::test]
    async fn test_whm_bandwidth_for_account() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json-api/showbw"))
            .and(query_param("searchtype", "user"))
            .and(query_param("search", "alice"))
            .respond_with(ok(json!({
                "bandwidth": [{ "acct": "alice", "domain": "alice.example", "totalbytes": 2048 }, 7]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = whm_client(&server);
        let res = client
            .execute_command("bandwidth", &json!({ "account": "alice" }))
            .await
            .unwrap();
        assert_eq!(res["total"], 1);
        assert_eq!(res["bandwidth"][0]["bytes_used"], 2048);
        assert_eq!(res["bandwidth"][0]["limit"], "unlimited");
    }

    #[tokio::test]
    async fn test_whm_disk_usage_and_resources() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json-api/getdiskusage"))
            .and(query_param("user", "bob"))
            .respond_with(ok(json!({
                "result": [{ "diskquota": 943718400u64, "disklimit": 1048576000u64 }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json-api/loadavg"))
            .respond_with(ok(json!({ "avg": ["0.50", "0.40", "0.30"] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json-api/getdiskinfo"))
            .respond_with(ok(json!({
                "partition": [
                    { "mount": "/boot", "total": "1G" },
                    { "mount": "/", "total": "100G", "used": "40G", "available": "60G", "percentage": "40%" }
                ]
            })))
            .mount(&server)
            .await;

        let client = whm_client(&server);
        let disk = client
            .execute_command("get_disk_usage", &json!({ "account": "bob" }))
            .await
            .unwrap();
        assert_eq!(disk["percent_used"], 90.0);
        assert_eq!(disk["status"], "critical");
        assert_eq!(disk["disk_usage_mb"], 900.0);

        let res = client.execute_command("resources", &json!({})).await.unwrap();
        assert_eq!(res["cpu"]["load_1min"], 0.5);
        assert_eq!(res["cpu"]["status"], "ok");
        assert_eq!(res["disk"]["total"], "100G");
        assert_eq!(res["disk"]["percent_used"], "40%");
    }

    #[tokio::test]
    async fn test_whm_accounts_and_hostname_defaults() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json-api/listaccts"))
            .and(query_param("api.version", "1"))
            .respond_with(ok(json!({
                "acct": [{ "user": "carol", "domain": "carol.example", "suspended": 1 }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json-api/gethostname"))
            .respond_with(ok(json!({ "metadata": {} })))
            .mount(&server)
            .await;

        let client = whm_client(&server);
        let accounts = client.list_accounts().await.unwrap();
        assert_eq!(accounts.total, 1);
        assert!(accounts.accounts[0].suspended);
        assert_eq!(accounts.accounts[0].disk_used, "0M");
        assert_eq!(accounts.accounts[0].disk_limit, "unlimited");

        let host = client.get_hostname().await.unwrap();
        assert_eq!(host.hostname, "unknown");
    }
    #[tokio::test]
    async fn test_blank_identifiers_never_reach_network() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ok(json!({ "data": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let pve = pve_client(&server);
        let err = pve
            .execute_command("list_vms", &json!({ "node": "   " }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "list_vms requires a 'node' argument");

        let err = pve
            .execute_command("start_vm", &json!({ "node": "\t", "vmid": 100 }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingArgument { field: "node", .. }));

        let pbs = pbs_client(&server);
        let err = pbs
            .execute_command(
                "run_prune",
                &json!({ "datastore": " ", "backup_type": " ", "backup_id": "100" }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "run_prune requires a 'datastore' argument");

        for (command, args) in [
            ("gc", json!({ "datastore": "  " })),
            ("run_sync_job", json!({ "job_id": " " })),
            ("task_status", json!({ "upid": "" })),
        ] {
            let err = pbs.execute_command(command, &args).await.unwrap_err();
            assert!(err.is_validation(), "{command}: {err}");
        }
    }

    #[tokio::test]
    async fn test_tls_against_plain_http_is_tls_error() {
        let server = MockServer::start().await;
        let addr = server.address();

        let client = PveClient::new(&ProxmoxSettings {
            host: format!("https://{}", addr.ip()),
            port: addr.port(),
            ..Default::default()
        })
        .unwrap();

        let err = client.list_nodes().await.unwrap_err();
        assert!(matches!(err, Error::Tls(_)), "got {err:?}");
        assert!(err.to_string().starts_with("SSL Error: "));
        assert!(err.to_string().ends_with("Check verify_ssl setting."));
    }

    #[tokio::test]
    async fn test_whm_unreachable_host() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = WhmClient::new(&WhmSettings {
            host: "http://127.0.0.1".into(),
            port,
            ..Default::default()
        })
        .unwrap();

        let err = client.get_hostname().await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot reach WHM host: 127.0.0.1");
    }

    #[tokio::test]
    async fn test_pbs_verify_jobs_pass_through_outdated_after() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/admin/verify"))
            .respond_with(ok(json!({
                "data": [
                    { "id": "v-main", "store": "main", "outdated-after": 30, "ignore-verified": true },
                    { "id": "v-cold", "store": "cold" }
                ]
            })))
            .mount(&server)
            .await;

        let client = pbs_client(&server);
        let res = client.execute_command("verify_jobs", &json!({})).await.unwrap();
        assert_eq!(res["total"], 2);
        assert_eq!(res["verify_jobs"][0]["outdated_after"], 30);
        assert_eq!(res["verify_jobs"][0]["ignore_verified"], true);
        assert_eq!(res["verify_jobs"][1]["outdated_after"], "");
    }
}
