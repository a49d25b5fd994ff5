//! # Stash Gateway
//!
//! ユーザー・チームの名前空間に限定した署名付きアップロードURLの発行と、
//! 保存済みオブジェクトの一括削除を提供する。
//!
//! ## 役割
//! - prefix（名前空間）の認可: 呼び出し元のslugまたは所属チームのslugのみ許可
//! - S3への署名付きPUT URL発行（有効期限60秒）
//! - オブジェクトの一括削除
//!
//! ## API エンドポイント
//! - `POST /upload-url` — 署名付きURL発行
//! - `POST /delete-files` — 一括削除
//! - `GET /health` — 死活監視
//!
//! 呼び出し元のIDは上流の認証プロキシが `x-user-id` / `x-user-slug` ヘッダで付与する。

mod auth;
mod config;
mod endpoints;
mod error;
mod storage;
mod teams;
mod uploads;

use std::sync::Arc;

use config::{GatewayConfig, GatewayState};
use endpoints::{handle_delete_files, handle_health, handle_upload_url};
use storage::S3ObjectStorage;
use teams::InMemoryTeamStore;

/// Gatewayのルーターを構築する。
fn router(state: Arc<GatewayState>) -> axum::Router {
    axum::Router::new()
        .route("/upload-url", axum::routing::post(handle_upload_url))
        .route("/delete-files", axum::routing::post(handle_delete_files))
        .route("/health", axum::routing::get(handle_health))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;

    tracing::info!(
        region = %config.storage.region,
        endpoint = config.storage.endpoint.as_deref().unwrap_or("aws"),
        "ストレージプロバイダを設定"
    );
    let storage = S3ObjectStorage::new(&config.storage);

    let teams = match &config.teams_file {
        Some(path) => {
            let store = InMemoryTeamStore::from_json_file(path)?;
            tracing::info!(teams = store.team_count(), path = %path.display(), "チーム一覧を読み込みました");
            store
        }
        None => {
            tracing::warn!("TEAMS_FILEが未設定です。チームprefixは全て拒否されます");
            InMemoryTeamStore::default()
        }
    };

    let state = Arc::new(GatewayState {
        storage: Box::new(storage),
        teams: Box::new(teams),
    });

    let app = router(state);

    tracing::info!("Gatewayを {} で起動します", config.addr);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
