//! # 名前空間の認可
//!
//! ストレージキーのprefixが呼び出し元に属するかを検証する。
//! 呼び出し元のIDは上流の認証プロキシが付与するヘッダから取得する。

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stash_types::User;

use crate::error::GatewayError;
use crate::teams::TeamStore;

/// 上流の認証プロキシが付与するユーザーIDヘッダ
pub const USER_ID_HEADER: &str = "x-user-id";
/// 上流の認証プロキシが付与するユーザーslugヘッダ
pub const USER_SLUG_HEADER: &str = "x-user-slug";

/// prefixが呼び出し元の名前空間であることを検証する。
///
/// - `prefix == user.slug` ならチームストアを参照せずに成功
/// - それ以外は `user.id` が所属するチームのslugと照合する
///
/// キャッシュはしない。メンバーシップは毎回照会する。
pub async fn check_prefix(
    prefix: &str,
    user: &User,
    teams: &dyn TeamStore,
) -> Result<(), GatewayError> {
    if prefix == user.slug {
        return Ok(());
    }

    let slugs = teams.team_slugs_for_member(&user.id).await?;
    if slugs.iter().any(|slug| slug == prefix) {
        return Ok(());
    }

    tracing::debug!(user_id = %user.id, prefix, "prefixが呼び出し元に属していません");
    Err(GatewayError::WrongPrefix)
}

/// HTTPリクエストの呼び出し元。
#[derive(Debug, Clone)]
pub struct Caller(pub User);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| -> Result<String, GatewayError> {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| GatewayError::Unauthenticated(format!("{name} ヘッダがありません")))
        };

        Ok(Caller(User {
            id: header(USER_ID_HEADER)?,
            slug: header(USER_SLUG_HEADER)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use stash_types::Team;

    use crate::teams::InMemoryTeamStore;

    /// 照会回数を数えるチームストア。
    struct CountingTeamStore {
        inner: InMemoryTeamStore,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TeamStore for CountingTeamStore {
        async fn team_slugs_for_member(&self, user_id: &str) -> Result<Vec<String>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.team_slugs_for_member(user_id).await
        }
    }

    /// 常に失敗するチームストア。
    struct FailingTeamStore;

    #[async_trait::async_trait]
    impl TeamStore for FailingTeamStore {
        async fn team_slugs_for_member(&self, _user_id: &str) -> Result<Vec<String>, GatewayError> {
            Err(GatewayError::Internal("team store unavailable".to_string()))
        }
    }

    fn alice() -> User {
        User {
            id: "u-alice".to_string(),
            slug: "alice".to_string(),
        }
    }

    fn store() -> CountingTeamStore {
        CountingTeamStore {
            inner: InMemoryTeamStore::new(vec![
                Team {
                    slug: "eng".to_string(),
                    member_ids: vec!["u-alice".to_string()],
                },
                Team {
                    slug: "bob".to_string(),
                    member_ids: vec!["u-bob".to_string()],
                },
            ]),
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_own_slug_skips_team_lookup() {
        let teams = store();
        check_prefix("alice", &alice(), &teams).await.unwrap();
        assert_eq!(teams.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_member_team_slug_is_allowed() {
        let teams = store();
        check_prefix("eng", &alice(), &teams).await.unwrap();
        assert_eq!(teams.calls.load(Ordering::SeqCst), 1);
    }

    /// 他人のチームslug（aliceは"bob"チームに属さない）は拒否される
    #[tokio::test]
    async fn test_foreign_prefix_is_rejected() {
        let teams = store();
        let err = check_prefix("bob", &alice(), &teams).await.unwrap_err();
        assert!(matches!(err, GatewayError::WrongPrefix));
        assert_eq!(err.to_string(), "Wrong prefix.");
    }

    #[tokio::test]
    async fn test_membership_is_requeried_every_call() {
        let teams = store();
        for _ in 0..3 {
            check_prefix("eng", &alice(), &teams).await.unwrap();
        }
        assert_eq!(teams.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_team_store_failure_propagates() {
        let err = check_prefix("eng", &alice(), &FailingTeamStore).await.unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));
    }

    #[tokio::test]
    async fn test_caller_from_headers() {
        let request = axum::http::Request::builder()
            .header(USER_ID_HEADER, "u-alice")
            .header(USER_SLUG_HEADER, "alice")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let Caller(user) = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user, alice());
    }

    #[tokio::test]
    async fn test_caller_missing_header_is_unauthenticated() {
        let request = axum::http::Request::builder()
            .header(USER_ID_HEADER, "u-alice")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let err = Caller::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unauthenticated(_)));
    }
}
