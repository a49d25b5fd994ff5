//! # Stash 共有型定義
//!
//! Gatewayとそのクライアントの間でやり取りされるデータ構造を
//! Rust構造体として提供する。
//!
//! ## エンコーディング規則
//! - HTTPボディのJSONはcamelCase（既存クライアントとの互換性）
//! - ストレージキーは `{prefix}/{randomToken}/{fileName}` 形式

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 呼び出し元・チーム
// ---------------------------------------------------------------------------

/// 認証済みユーザー。外部のID基盤から供給される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// ユーザーID（チームのメンバーシップ照会に使用）
    pub id: String,
    /// ユーザー固有の名前空間（ストレージキーのprefixとして使用可能）
    pub slug: String,
}

/// チーム。外部のチームストアが所有する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// チーム固有の名前空間
    pub slug: String,
    /// 所属ユーザーのIDリスト
    #[serde(default)]
    pub member_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// /upload-url
// ---------------------------------------------------------------------------

/// ACL未指定時の既定値。
pub const DEFAULT_ACL: &str = "private";

fn default_acl() -> String {
    DEFAULT_ACL.to_string()
}

/// /upload-url リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// オブジェクト名（キーの末尾にそのまま埋め込まれる）
    pub file_name: String,
    /// コンテンツのMIMEタイプ
    pub file_type: String,
    /// 書き込み先の名前空間（ユーザーまたはチームのslug）
    pub prefix: String,
    /// 対象バケット
    pub bucket: String,
    /// ストレージプロバイダに渡すACL
    #[serde(default = "default_acl")]
    pub acl: String,
}

/// 署名付きアップロードURLの発行結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadResult {
    /// PUTに使用する署名付きURL（一度きり）
    pub signed_request: String,
    /// 割り当てられたストレージキー
    pub path: String,
    /// クエリ・署名を除いた恒久参照用URL
    pub url: String,
}

// ---------------------------------------------------------------------------
// /delete-files
// ---------------------------------------------------------------------------

/// /delete-files リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFilesRequest {
    /// 対象バケット
    pub bucket: String,
    /// 削除するオブジェクトキー（順序を保持）
    #[serde(default)]
    pub files: Vec<String>,
}

/// 一括削除のオブジェクト単位の結果。プロバイダの応答をそのまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFilesResult {
    /// 削除に成功したオブジェクト
    pub deleted: Vec<DeletedObject>,
    /// 削除に失敗したオブジェクト
    pub errors: Vec<DeleteFailure>,
}

/// 削除に成功したオブジェクト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedObject {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_marker: Option<bool>,
}

/// 削除に失敗したオブジェクト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFailure {
    pub key: String,
    pub code: String,
    pub message: String,
}
