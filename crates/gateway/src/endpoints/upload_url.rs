//! # POST /upload-url
//!
//! 呼び出し元の名前空間への署名付きアップロードURL発行。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use stash_types::{SignedUploadResult, UploadUrlRequest};

use crate::auth::Caller;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::uploads::{sign_request_for_upload, UploadRequest};

/// POST /upload-url — 署名付きURL発行。
///
/// prefixが呼び出し元のslugまたは所属チームのslugでなければ403。
pub async fn handle_upload_url(
    State(state): State<Arc<GatewayState>>,
    Caller(user): Caller,
    Json(body): Json<UploadUrlRequest>,
) -> Result<Json<SignedUploadResult>, GatewayError> {
    if body.file_name.is_empty() {
        return Err(GatewayError::BadRequest("fileNameが空です".to_string()));
    }
    if body.bucket.is_empty() {
        return Err(GatewayError::BadRequest("bucketが空です".to_string()));
    }

    let result = sign_request_for_upload(
        state.storage.as_ref(),
        state.teams.as_ref(),
        UploadRequest {
            file_name: &body.file_name,
            file_type: &body.file_type,
            prefix: &body.prefix,
            bucket: &body.bucket,
            user: &user,
            acl: &body.acl,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, path = %result.path, "署名付きURLを発行");

    Ok(Json(result))
}
