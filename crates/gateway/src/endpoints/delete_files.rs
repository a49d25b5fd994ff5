//! # POST /delete-files
//!
//! オブジェクトの一括削除。

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use stash_types::{DeleteFilesRequest, DeleteFilesResult};

use crate::auth::{check_prefix, Caller};
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::uploads::delete_files;

/// POST /delete-files — 一括削除。
///
/// 削除処理自体は認可を行わないため、ここで全キーの先頭セグメントを
/// 呼び出し元の名前空間と照合してから削除する。1つでも不一致なら何も削除しない。
pub async fn handle_delete_files(
    State(state): State<Arc<GatewayState>>,
    Caller(user): Caller,
    Json(body): Json<DeleteFilesRequest>,
) -> Result<Json<DeleteFilesResult>, GatewayError> {
    let prefixes: BTreeSet<&str> = body
        .files
        .iter()
        .map(|key| key.split('/').next().unwrap_or_default())
        .collect();

    for prefix in prefixes {
        check_prefix(prefix, &user, state.teams.as_ref()).await?;
    }

    let result = delete_files(state.storage.as_ref(), &body.bucket, &body.files).await?;

    tracing::info!(
        user_id = %user.id,
        bucket = %body.bucket,
        deleted = result.deleted.len(),
        failed = result.errors.len(),
        "一括削除を実行"
    );

    Ok(Json(result))
}
