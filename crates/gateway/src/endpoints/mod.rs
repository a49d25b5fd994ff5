//! # Gatewayエンドポイント

pub mod upload_url;
pub mod delete_files;

pub use upload_url::handle_upload_url;
pub use delete_files::handle_delete_files;

/// GET /health — 死活監視。
pub async fn handle_health() -> &'static str {
    "ok"
}
