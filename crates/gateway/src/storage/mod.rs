//! # オブジェクトストレージ
//!
//! Gatewayが利用するストレージプロバイダの抽象インターフェース。
//! S3実装は `s3` サブモジュールを参照。

pub mod s3;

pub use s3::S3ObjectStorage;

use stash_types::DeleteFilesResult;

use crate::error::GatewayError;

/// 署名付きPUT URLの有効期限（秒）
pub const PRESIGN_EXPIRY_SECS: u32 = 60;

/// 署名付きPUT URLの生成パラメータ。
#[derive(Debug, Clone, Copy)]
pub struct PresignPut<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub content_type: &'a str,
    pub acl: &'a str,
    pub expires_in_secs: u32,
}

/// ストレージプロバイダの抽象インターフェース。
///
/// 各呼び出しはプロバイダへの1回の往復に対応し、
/// 成功・失敗のいずれか一方のみを返す。
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// PutObject用の署名付きURLを生成する。
    ///
    /// 失敗時は `GatewayError::Signing` を返す。
    async fn presign_put(&self, params: PresignPut<'_>) -> Result<String, GatewayError>;

    /// `keys` を1回のリクエストでまとめて削除する。
    ///
    /// オブジェクト単位の失敗は結果に含めて返す。リクエスト自体の失敗のみ
    /// `GatewayError::Deletion` となる。
    async fn delete_objects(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<DeleteFilesResult, GatewayError>;
}
