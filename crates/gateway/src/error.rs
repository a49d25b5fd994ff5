//! # Gateway エラー型
//!
//! コア処理（prefix検証・署名・一括削除）とHTTP層で共通のエラー型。

use axum::http::StatusCode;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// prefixが呼び出し元のslugにも所属チームのslugにも一致しない
    #[error("Wrong prefix.")]
    WrongPrefix,
    /// 署名付きURLの生成に失敗（プロバイダのエラー詳細を保持）
    #[error("署名付きURL生成に失敗: {0}")]
    Signing(String),
    /// 一括削除リクエストの送信または実行に失敗
    #[error("一括削除に失敗: {0}")]
    Deletion(String),
    /// 呼び出し元のIDがリクエストに含まれていない
    #[error("認証情報がありません: {0}")]
    Unauthenticated(String),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            GatewayError::WrongPrefix => StatusCode::FORBIDDEN,
            GatewayError::Signing(_) | GatewayError::Deletion(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_wrong_prefix_message() {
        assert_eq!(GatewayError::WrongPrefix.to_string(), "Wrong prefix.");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::WrongPrefix, StatusCode::FORBIDDEN),
            (GatewayError::Signing("x".into()), StatusCode::BAD_GATEWAY),
            (GatewayError::Deletion("x".into()), StatusCode::BAD_GATEWAY),
            (GatewayError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (GatewayError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (GatewayError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
