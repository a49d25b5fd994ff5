//! # アップロードURL発行・一括削除
//!
//! 名前空間付きストレージキーの生成、署名付きPUT URLの発行、
//! オブジェクトの一括削除。

use rand::Rng;
use stash_types::{DeleteFilesResult, SignedUploadResult, User};

use crate::auth::check_prefix;
use crate::error::GatewayError;
use crate::storage::{ObjectStorage, PresignPut, PRESIGN_EXPIRY_SECS};
use crate::teams::TeamStore;

/// ランダムセグメントの文字集合（base36）
const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// ランダムトークン1個の長さ
const TOKEN_LEN: usize = 10;

/// 署名付きアップロードURLの発行要求。
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub file_name: &'a str,
    pub file_type: &'a str,
    pub prefix: &'a str,
    pub bucket: &'a str,
    pub user: &'a User,
    pub acl: &'a str,
}

fn random_token(rng: &mut impl Rng) -> String {
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// 独立に生成した2つのトークンを連結した20文字のセグメント。
/// 衝突回避用であり、秘密値ではない。
pub fn random_segment() -> String {
    let mut rng = rand::thread_rng();
    let mut segment = random_token(&mut rng);
    segment.push_str(&random_token(&mut rng));
    segment
}

/// `{prefix}/{segment}/{file_name}` 形式のキー。`file_name` はそのまま埋め込む。
pub fn object_key(prefix: &str, segment: &str, file_name: &str) -> String {
    format!("{prefix}/{segment}/{file_name}")
}

/// 署名付きURLからクエリと署名を除いた恒久参照用URLを得る。
///
/// scheme + host（明示ポートがあれば含む）+ path のみを残す。
pub fn canonical_url(signed: &str) -> Result<String, GatewayError> {
    let parsed = url::Url::parse(signed)
        .map_err(|e| GatewayError::Signing(format!("署名付きURLのパースに失敗: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| GatewayError::Signing(format!("署名付きURLにホストがありません: {signed}")))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}{}", parsed.scheme(), host, port, parsed.path()),
        None => format!("{}://{}{}", parsed.scheme(), host, parsed.path()),
    })
}

/// 署名付きアップロードURLを発行する。
///
/// prefixの検証に失敗した場合、ストレージプロバイダには一切接続しない。
pub async fn sign_request_for_upload(
    storage: &dyn ObjectStorage,
    teams: &dyn TeamStore,
    request: UploadRequest<'_>,
) -> Result<SignedUploadResult, GatewayError> {
    check_prefix(request.prefix, request.user, teams).await?;

    let key = object_key(request.prefix, &random_segment(), request.file_name);

    let signed_request = storage
        .presign_put(PresignPut {
            bucket: request.bucket,
            key: &key,
            content_type: request.file_type,
            acl: request.acl,
            expires_in_secs: PRESIGN_EXPIRY_SECS,
        })
        .await
        .inspect_err(|e| {
            tracing::error!(bucket = request.bucket, key = %key, error = %e, "署名付きURLの生成に失敗");
        })?;

    let url = canonical_url(&signed_request).inspect_err(|e| {
        tracing::error!(bucket = request.bucket, key = %key, error = %e, "署名付きURLの解析に失敗");
    })?;

    Ok(SignedUploadResult {
        signed_request,
        path: key,
        url,
    })
}

/// オブジェクトを一括削除する。
///
/// 認可はここでは行わない。呼び出し元が各キーの権限を確認済みであること。
/// 全キーを1回のリクエストで送信し、プロバイダの結果をそのまま返す。
pub async fn delete_files(
    storage: &dyn ObjectStorage,
    bucket: &str,
    files: &[String],
) -> Result<DeleteFilesResult, GatewayError> {
    tracing::debug!(bucket, count = files.len(), "オブジェクトを一括削除");
    storage.delete_objects(bucket, files).await
}
