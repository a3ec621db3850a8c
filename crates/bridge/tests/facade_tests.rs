//! Facade fidelity: every method sends exactly one request with its fixed
//! command name and its arguments untouched.

use bridge::envelope::Args;
use bridge::types::{PreviewBody, ScanSummary};
use bridge::{
    CommandRequest, GatewayError, InvokeOptions, MaintenanceClient, ReplayEngine,
    ResponseEnvelope, TransportError,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn client(engine: ReplayEngine) -> (MaintenanceClient, Arc<ReplayEngine>) {
    let engine = Arc::new(engine);
    (MaintenanceClient::from_channel(engine.clone()), engine)
}

fn args(value: Value) -> Option<Args> {
    value.as_object().cloned()
}

fn single_request(engine: &ReplayEngine) -> CommandRequest {
    let requests = engine.requests();
    assert_eq!(requests.len(), 1, "expected one request, got {:?}", requests);
    requests.into_iter().next().unwrap()
}

fn ok_string() -> ResponseEnvelope {
    ResponseEnvelope::success("")
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_read_operations_send_bare_requests() {
    let summary = json!({ "totalSize": 4096, "fileCount": 3 });
    let engine = ReplayEngine::new()
        .with_reply("getCacheFiles", ResponseEnvelope::success(json!([])))
        .with_reply("getCacheSummary", ResponseEnvelope::success(summary.clone()))
        .with_reply("getTrashFiles", ResponseEnvelope::success(json!([])))
        .with_reply("getTrashSummary", ResponseEnvelope::success(summary.clone()))
        .with_reply("getSystemLogs", ResponseEnvelope::success(json!([])))
        .with_reply("getLogSummary", ResponseEnvelope::success(summary.clone()))
        .with_reply("getLargeFiles", ResponseEnvelope::success(json!([])))
        .with_reply("getLargeFilesSummary", ResponseEnvelope::success(summary))
        .with_reply("getSystemServices", ResponseEnvelope::success(json!([])))
        .with_reply("getAllServices", ResponseEnvelope::success(json!([])));
    let (api, engine) = client(engine);

    api.get_cache_files().await.unwrap();
    api.get_cache_summary().await.unwrap();
    api.get_trash_files().await.unwrap();
    api.get_trash_summary().await.unwrap();
    api.get_system_logs().await.unwrap();
    api.get_log_summary().await.unwrap();
    api.get_large_files().await.unwrap();
    let s = api.get_large_files_summary().await.unwrap();
    api.get_system_services().await.unwrap();
    api.get_all_services().await.unwrap();

    assert_eq!(
        s,
        ScanSummary {
            total_size: 4096,
            file_count: 3
        }
    );

    let sent: Vec<(String, Option<Args>)> = engine
        .requests()
        .into_iter()
        .map(|r| (r.name, r.args))
        .collect();
    let expected = [
        "getCacheFiles",
        "getCacheSummary",
        "getTrashFiles",
        "getTrashSummary",
        "getSystemLogs",
        "getLogSummary",
        "getLargeFiles",
        "getLargeFilesSummary",
        "getSystemServices",
        "getAllServices",
    ];
    assert_eq!(sent.len(), expected.len());
    for ((name, a), want) in sent.iter().zip(expected) {
        assert_eq!(name, want);
        assert!(a.is_none(), "{} should carry no args", name);
    }
}

#[tokio::test]
async fn test_entities_pass_through_unchanged() {
    let logs = json!([
        { "path": "/var/log/syslog", "size": 1200, "modified": "2024-05-01 08:00:00" },
        { "path": "/var/log/auth.log", "size": 300, "modified": "2024-05-01 09:00:00", "rotated": true }
    ]);
    let (api, _) = client(
        ReplayEngine::new().with_reply("getSystemLogs", ResponseEnvelope::success(logs.clone())),
    );
    let items = api.get_system_logs().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].path(), "/var/log/syslog");
    assert_eq!(serde_json::to_value(&items).unwrap(), logs);
}

#[tokio::test]
async fn test_log_listing_of_bare_names_resolves_unchanged() {
    let (api, engine) = client(
        ReplayEngine::new()
            .with_reply("getSystemLogs", ResponseEnvelope::success(json!(["a.log", "b.log"]))),
    );
    let logs = api.get_system_logs().await.unwrap();
    let names: Vec<&str> = logs.iter().map(|l| l.path()).collect();
    assert_eq!(names, vec!["a.log", "b.log"]);
    assert_eq!(serde_json::to_value(&logs).unwrap(), json!(["a.log", "b.log"]));
    assert_eq!(single_request(&engine).name, "getSystemLogs");
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_selected_clears_send_paths_verbatim() {
    let paths = vec!["/tmp/a".to_string(), "/tmp/b".to_string()];
    let cases: Vec<&str> = vec![
        "clearSelectedCacheFiles",
        "clearSelectedTrashFiles",
        "clearSelectedLogFiles",
        "clearSelectedLargeFiles",
    ];
    for name in cases {
        let (api, engine) = client(ReplayEngine::new().with_reply(name, ok_string()));
        let result = match name {
            "clearSelectedCacheFiles" => api.clear_selected_cache_files(paths.clone()).await,
            "clearSelectedTrashFiles" => api.clear_selected_trash_files(paths.clone()).await,
            "clearSelectedLogFiles" => api.clear_selected_log_files(paths.clone()).await,
            _ => api.clear_selected_large_files(paths.clone()).await,
        };
        result.unwrap();
        let req = single_request(&engine);
        assert_eq!(req.name, name);
        assert_eq!(req.args, args(json!({ "paths": ["/tmp/a", "/tmp/b"] })));
    }
}

#[tokio::test]
async fn test_selected_trash_request_matches_wire_shape() {
    let (api, engine) =
        client(ReplayEngine::new().with_reply("clearSelectedTrashFiles", ok_string()));
    api.clear_selected_trash_files(vec!["/tmp/a".into(), "/tmp/b".into()])
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(single_request(&engine)).unwrap(),
        json!({ "name": "clearSelectedTrashFiles", "args": { "paths": ["/tmp/a", "/tmp/b"] } })
    );
}

#[tokio::test]
async fn test_whole_set_clears() {
    for name in ["clearCache", "clearTrash", "clearAllLogs", "clearAllLargeFiles"] {
        let (api, engine) = client(ReplayEngine::new().with_reply(name, ResponseEnvelope::success("12")));
        let out = match name {
            "clearCache" => api.clear_cache().await,
            "clearTrash" => api.clear_trash().await,
            "clearAllLogs" => api.clear_all_logs().await,
            _ => api.clear_all_large_files().await,
        }
        .unwrap();
        assert_eq!(out, "12");
        let req = single_request(&engine);
        assert_eq!(req.name, name);
        assert!(req.args.is_none());
    }
}

#[tokio::test]
async fn test_service_operations() {
    let (api, engine) = client(
        ReplayEngine::new()
            .with_reply("stopService", ResponseEnvelope::success("cups"))
            .with_reply("enableService", ResponseEnvelope::success("cups"))
            .with_reply("startService", ResponseEnvelope::success("cups"))
            .with_reply(
                "stopSelectedServices",
                ResponseEnvelope::success(json!(["cups", "avahi-daemon"])),
            )
            .with_reply(
                "enableSelectedServices",
                ResponseEnvelope::success(json!(["cups", "avahi-daemon"])),
            ),
    );
    let services = vec!["cups".to_string(), "avahi-daemon".to_string()];

    assert_eq!(api.stop_service("cups").await.unwrap(), "cups");
    assert_eq!(api.enable_service("cups").await.unwrap(), "cups");
    assert_eq!(api.start_service("cups").await.unwrap(), "cups");
    assert_eq!(
        api.stop_selected_services(services.clone()).await.unwrap(),
        services
    );
    assert_eq!(
        api.enable_selected_services(services.clone()).await.unwrap(),
        services
    );

    let sent: Vec<CommandRequest> = engine.requests();
    let single = args(json!({ "service": "cups" }));
    let many = args(json!({ "services": ["cups", "avahi-daemon"] }));
    assert_eq!(sent[0], CommandRequest { name: "stopService".into(), args: single.clone() });
    assert_eq!(sent[1], CommandRequest { name: "enableService".into(), args: single.clone() });
    assert_eq!(sent[2], CommandRequest { name: "startService".into(), args: single });
    assert_eq!(sent[3], CommandRequest { name: "stopSelectedServices".into(), args: many.clone() });
    assert_eq!(sent[4], CommandRequest { name: "enableSelectedServices".into(), args: many });
    assert_eq!(sent.len(), 5);
}

#[tokio::test]
async fn test_file_operations() {
    let (api, engine) = client(
        ReplayEngine::new()
            .with_reply(
                "previewFile",
                ResponseEnvelope::success(json!({
                    "name": "app.log",
                    "path": "/var/log/app.log",
                    "type": "text",
                    "content": "started"
                })),
            )
            .with_reply("openFile", ResponseEnvelope::success("/var/log/app.log")),
    );

    let preview = api.preview_file("/var/log/app.log").await.unwrap();
    assert_eq!(
        preview.body,
        PreviewBody::Text {
            content: "started".into()
        }
    );
    api.open_file("/var/log/app.log", None).await.unwrap();
    api.open_file("/var/log/app.log", Some("code".into()))
        .await
        .unwrap();

    let sent = engine.requests();
    assert_eq!(sent[0].name, "previewFile");
    assert_eq!(sent[0].args, args(json!({ "path": "/var/log/app.log" })));
    assert_eq!(sent[1].name, "openFile");
    assert_eq!(
        sent[1].args,
        args(json!({ "path": "/var/log/app.log", "command": null }))
    );
    assert_eq!(
        sent[2].args,
        args(json!({ "path": "/var/log/app.log", "command": "code" }))
    );
}

// ---------------------------------------------------------------------------
// Failures through the facade
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_clear_cache_permission_denied() {
    let (api, _) = client(
        ReplayEngine::new().with_reply("clearCache", ResponseEnvelope::error("permission denied")),
    );
    let err = api.clear_cache().await.unwrap_err();
    assert!(matches!(err, GatewayError::Command { .. }));
    assert_eq!(err.to_string(), "permission denied");
}

#[tokio::test]
async fn test_stop_service_without_message() {
    let fixture = bridge::replay::load_fixture(
        "responses:\n  stopService:\n    status: error\n",
    )
    .unwrap();
    let (api, _) = client(ReplayEngine::from_fixture(fixture));
    let err = api.stop_service("cups").await.unwrap_err();
    assert_eq!(err.to_string(), "Operation failed: stopService");
}

#[tokio::test]
async fn test_connection_lost_regardless_of_suppression() {
    for options in [InvokeOptions::default(), InvokeOptions::quiet()] {
        let (api, engine) = client(
            ReplayEngine::new().with_transport_failure("getCacheSummary", "ConnectionLost"),
        );
        let api = api.with_options(options);
        let err = api.get_cache_summary().await.unwrap_err();
        match err {
            GatewayError::Transport(TransportError::Rejected(m)) => assert_eq!(m, "ConnectionLost"),
            other => panic!("expected transport failure, got {:?}", other),
        }
        assert_eq!(engine.requests().len(), 1);
    }
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let engine = ReplayEngine::new()
        .with_reply("getCacheSummary", ResponseEnvelope::success(json!({ "totalSize": 1, "fileCount": 1 })))
        .with_reply("clearCache", ResponseEnvelope::error("busy"));
    let (api, engine) = client(engine);

    let mut handles = Vec::new();
    for i in 0..16 {
        let api = api.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                api.get_cache_summary().await.map(|_| ())
            } else {
                api.clear_cache().await.map(|_| ())
            }
        }));
    }

    let mut ok = 0;
    let mut failed = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(()) => ok += 1,
            Err(_) => failed += 1,
        }
    }
    assert_eq!((ok, failed), (8, 8));
    assert_eq!(engine.requests().len(), 16);
}
