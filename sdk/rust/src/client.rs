use std::collections::BTreeMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// One probed host as reported by `/net-check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostStatus {
    pub addr: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetCheck {
    pub hosts: Option<Vec<HostStatus>>,
    pub error: String,
}

/// Payload of `/json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub envs: BTreeMap<String, String>,
    #[serde(default)]
    pub file: Option<BTreeMap<String, String>>,
}

pub struct EnvprobeClient {
    client: Client,
    base_url: String,
}

impl EnvprobeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn ping(&self) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        self.get_json("/ping").await
    }

    /// Trigger an on-demand sweep and return its summary.
    pub async fn net_check(&self) -> Result<NetCheck, Box<dyn std::error::Error>> {
        self.get_json("/net-check").await
    }

    pub async fn environment(&self) -> Result<Environment, Box<dyn std::error::Error>> {
        self.get_json("/json").await
    }

    /// Raw Prometheus exposition text.
    pub async fn metrics(&self) -> Result<String, Box<dyn std::error::Error>> {
        let resp = self.client
            .get(format!("{}/metrics", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("envprobe returned error status {}: {}", status, text).into());
        }
        Ok(text)
    }

    /// Plain GET against any path, for callers that want the raw response.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, Box<dyn std::error::Error>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let resp = self.get(path).await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(format!("envprobe returned error status {}: {}", status, text).into());
        }

        Ok(serde_json::from_str::<T>(&text)?)
    }
}
