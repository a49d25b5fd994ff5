//! # チームストア
//!
//! チームのメンバーシップ照会の抽象インターフェースと、
//! JSONファイルから読み込むインメモリ実装。

use std::path::Path;

use stash_types::Team;

use crate::error::GatewayError;

/// チームのメンバーシップ照会。
///
/// 実運用ではチームを管理する外部ストアを実装として差し込む。
/// 照会は呼び出し元ユーザーのメンバーシップに限定し、slugのみを返す。
#[async_trait::async_trait]
pub trait TeamStore: Send + Sync {
    /// `user_id` をメンバーに含むチームのslug一覧を返す。
    async fn team_slugs_for_member(&self, user_id: &str) -> Result<Vec<String>, GatewayError>;
}

/// 起動時に読み込んだチーム一覧を保持するチームストア。
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamStore {
    teams: Vec<Team>,
}

impl InMemoryTeamStore {
    /// チーム一覧から構築する。
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    /// JSON配列（`[{"slug": "...", "memberIds": [...]}]`）のファイルから構築する。
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("チームファイルの読み込みに失敗 ({}): {e}", path.display()))?;
        let teams: Vec<Team> = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("チームファイルのパースに失敗 ({}): {e}", path.display()))?;
        Ok(Self::new(teams))
    }

    /// 保持しているチーム数。
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

#[async_trait::async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn team_slugs_for_member(&self, user_id: &str) -> Result<Vec<String>, GatewayError> {
        Ok(self
            .teams
            .iter()
            .filter(|t| t.member_ids.iter().any(|m| m == user_id))
            .map(|t| t.slug.clone())
            .collect())
    }
}
