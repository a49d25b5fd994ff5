//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。

use std::path::PathBuf;

use crate::storage::ObjectStorage;
use crate::teams::TeamStore;

/// リージョン未指定時の既定値
pub const DEFAULT_REGION: &str = "us-west-1";
/// 待ち受けアドレス未指定時の既定値
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// ストレージプロバイダの接続設定。起動後は変更しない。
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// S3互換エンドポイント（未指定ならAWS S3）
    pub endpoint: Option<String>,
}

/// Gatewayの起動設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub storage: StorageConfig,
    /// チーム一覧のJSONファイル
    pub teams_file: Option<PathBuf>,
    /// 待ち受けアドレス
    pub addr: String,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    ///
    /// - `S3_REGION`（既定: us-west-1）
    /// - `S3_ACCESS_KEY`, `S3_SECRET_KEY`（必須）
    /// - `S3_ENDPOINT`（任意）
    /// - `TEAMS_FILE`（任意）
    /// - `GATEWAY_ADDR`（既定: 0.0.0.0:3000）
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の変数解決関数から構築する。空文字列は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| anyhow::anyhow!("{name} が未設定です"))
        };

        Ok(Self {
            storage: StorageConfig {
                region: var("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                access_key_id: required("S3_ACCESS_KEY")?,
                secret_access_key: required("S3_SECRET_KEY")?,
                endpoint: var("S3_ENDPOINT"),
            },
            teams_file: var("TEAMS_FILE").map(PathBuf::from),
            addr: var("GATEWAY_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
        })
    }
}

/// Gatewayの共有状態。リクエスト間で変更されない。
pub struct GatewayState {
    /// ストレージプロバイダ（S3等、トレイトで抽象化）
    pub storage: Box<dyn ObjectStorage>,
    /// チームのメンバーシップ照会
    pub teams: Box<dyn TeamStore>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            GatewayConfig::from_lookup(lookup(&[("S3_ACCESS_KEY", "ak"), ("S3_SECRET_KEY", "sk")]))
                .unwrap();

        assert_eq!(config.storage.region, DEFAULT_REGION);
        assert_eq!(config.storage.access_key_id, "ak");
        assert_eq!(config.storage.secret_access_key, "sk");
        assert!(config.storage.endpoint.is_none());
        assert!(config.teams_file.is_none());
        assert_eq!(config.addr, DEFAULT_ADDR);
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("S3_REGION", "eu-central-1"),
            ("S3_ACCESS_KEY", "ak"),
            ("S3_SECRET_KEY", "sk"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("TEAMS_FILE", "/etc/stash/teams.json"),
            ("GATEWAY_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();

        assert_eq!(config.storage.region, "eu-central-1");
        assert_eq!(config.storage.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.teams_file, Some(PathBuf::from("/etc/stash/teams.json")));
        assert_eq!(config.addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_credentials() {
        assert!(GatewayConfig::from_lookup(lookup(&[("S3_ACCESS_KEY", "ak")])).is_err());
        assert!(GatewayConfig::from_lookup(lookup(&[
            ("S3_ACCESS_KEY", "ak"),
            ("S3_SECRET_KEY", "  "),
        ]))
        .is_err());
    }
}
