//! The HTTP surface: /ping, /metrics, /json and /.

use std::fs;

use envprobe::config::AppConfig;
use envprobe_sdk::EnvprobeClient;

mod common;

#[tokio::test]
async fn ping_answers_ok() {
    let server = common::start_server(AppConfig::default()).await;

    let body = EnvprobeClient::new(&server.url()).ping().await.unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let server = common::start_server(AppConfig::default()).await;

    let res = EnvprobeClient::new(&server.url()).get("/ping").await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let server = common::start_server(AppConfig::default()).await;

    let res = EnvprobeClient::new(&server.url()).get("/nope").await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_expose_probe_families_after_a_check() {
    let backend = common::start_mock_backend(200, "ok").await;
    let target = format!("http://{}/", backend);

    let mut config = AppConfig::default();
    config.probe.hosts = vec![target.clone()];
    let server = common::start_server(config).await;
    let client = EnvprobeClient::new(&server.url());

    client.net_check().await.unwrap();

    let res = client.get("/metrics").await.unwrap();
    let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = res.text().await.unwrap();
    let labels = format!(r#"addr="{}",code="200""#, target);
    assert!(body.contains(&format!("webapp_responseCodesFromHosts{{{}}} 1", labels)));
    for family in [
        "webapp_dnsLookup",
        "webapp_tcpConnection",
        "webapp_serverProcessing",
        "webapp_contentTransfer",
    ] {
        assert!(body.contains(&format!("# TYPE {} histogram", family)), "{family}");
        assert!(body.contains(&format!("{}_count{{{}}} 1", family, labels)), "{family}");
    }
}

#[tokio::test]
async fn json_includes_environment_and_secrets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("db_password"), "hunter2").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("token"), "abc").unwrap();

    let mut config = AppConfig::default();
    config.environment.secrets_dirs = vec![dir.path().to_path_buf()];
    let server = common::start_server(config).await;

    let env = EnvprobeClient::new(&server.url()).environment().await.unwrap();
    assert!(env.envs.contains_key("PATH"));

    let file = env.file.unwrap();
    assert_eq!(file["DB_PASSWORD"], "hunter2");
    assert_eq!(file["TOKEN"], "abc");
}

#[tokio::test]
async fn json_omits_file_without_secrets() {
    let server = common::start_server(AppConfig::default()).await;

    let res = EnvprobeClient::new(&server.url()).get("/json").await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.get("envs").is_some());
    assert!(body.get("file").is_none());
}

#[tokio::test]
async fn index_renders_html() {
    let server = common::start_server(AppConfig::default()).await;

    let res = EnvprobeClient::new(&server.url()).get("/").await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    assert!(res.text().await.unwrap().contains("Environment variables"));
}
