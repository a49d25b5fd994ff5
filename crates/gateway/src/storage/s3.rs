//! # S3 オブジェクトストレージ実装
//!
//! AWS S3 および S3互換API（MinIO等）に対する署名付きURL生成と一括削除。

use std::time::Duration;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use stash_types::{DeleteFailure, DeleteFilesResult, DeletedObject};

use super::{ObjectStorage, PresignPut};
use crate::config::StorageConfig;
use crate::error::GatewayError;

/// S3によるObjectStorage実装。
///
/// リージョンと認証情報は起動時に一度だけ確定し、以後は変更しない。
/// クライアントは呼び出しごとにこの設定から構築する。
pub struct S3ObjectStorage {
    config: aws_sdk_s3::Config,
}

impl S3ObjectStorage {
    pub fn new(storage: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            storage.access_key_id.clone(),
            storage.secret_access_key.clone(),
            None,
            None,
            "stash-gateway",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(storage.region.clone()))
            .credentials_provider(credentials);

        // S3互換エンドポイントはバケットをパスに含める
        if let Some(endpoint) = &storage.endpoint {
            builder = builder.endpoint_url(endpoint.clone()).force_path_style(true);
        }

        Self {
            config: builder.build(),
        }
    }

    fn client(&self) -> aws_sdk_s3::Client {
        aws_sdk_s3::Client::from_conf(self.config.clone())
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn presign_put(&self, params: PresignPut<'_>) -> Result<String, GatewayError> {
        let presigning =
            PresigningConfig::expires_in(Duration::from_secs(u64::from(params.expires_in_secs)))
                .map_err(|e| GatewayError::Signing(format!("有効期限の設定が不正: {e}")))?;

        // ACLはヘッダではなく署名対象のクエリとして付与する
        let acl_query = format!(
            "x-amz-acl={}",
            url::form_urlencoded::byte_serialize(params.acl.as_bytes()).collect::<String>()
        );

        let presigned = self
            .client()
            .put_object()
            .bucket(params.bucket)
            .key(params.key)
            .content_type(params.content_type)
            .customize()
            .mutate_request(move |req| {
                let separator = if req.uri().contains('?') { '&' } else { '?' };
                let uri = format!("{}{separator}{acl_query}", req.uri());
                if let Err(e) = req.set_uri(uri) {
                    tracing::warn!(error = %e, "ACLクエリの付与に失敗");
                }
            })
            .presigned(presigning)
            .await
            .map_err(|e| GatewayError::Signing(DisplayErrorContext(&e).to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn delete_objects(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<DeleteFilesResult, GatewayError> {
        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key.as_str()).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GatewayError::Deletion(format!("削除対象の構築に失敗: {e}")))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| GatewayError::Deletion(format!("削除リクエストの構築に失敗: {e}")))?;

        let output = self
            .client()
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| GatewayError::Deletion(DisplayErrorContext(&e).to_string()))?;

        Ok(DeleteFilesResult {
            deleted: output
                .deleted()
                .iter()
                .map(|d| DeletedObject {
                    key: d.key().unwrap_or_default().to_string(),
                    version_id: d.version_id().map(str::to_string),
                    delete_marker: d.delete_marker(),
                })
                .collect(),
            errors: output
                .errors()
                .iter()
                .map(|e| DeleteFailure {
                    key: e.key().unwrap_or_default().to_string(),
                    code: e.code().unwrap_or_default().to_string(),
                    message: e.message().unwrap_or_default().to_string(),
                })
                .collect(),
        })
    }
}
