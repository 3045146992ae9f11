use std::env;

use async_trait::async_trait;
use quiz_core::model::{HighScores, ScoreSubmission};
use reqwest::Client;
use serde::Serialize;

use super::{RemoteScoreRow, ScoreSync, best_per_game};
use crate::error::SyncError;

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub base_url: String,
    pub api_key: String,
    /// Player session token. Falls back to `api_key` when absent.
    pub access_token: Option<String>,
    pub user_id: String,
}

impl SyncConfig {
    /// Reads `MATHS_SYNC_URL`, `MATHS_SYNC_KEY`, `MATHS_USER_ID` and the optional
    /// `MATHS_SYNC_TOKEN`. Returns `None` unless all required values are set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = non_empty_var("MATHS_SYNC_URL")?;
        let api_key = non_empty_var("MATHS_SYNC_KEY")?;
        let user_id = non_empty_var("MATHS_USER_ID")?;
        Some(Self {
            base_url,
            api_key,
            access_token: non_empty_var("MATHS_SYNC_TOKEN"),
            user_id,
        })
    }

    fn scores_url(&self) -> String {
        format!("{}/scores", self.base_url.trim_end_matches('/'))
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// `ScoreSync` over a PostgREST-style `scores` table.
///
/// Without a config every call fails with `SyncError::Disabled`.
#[derive(Clone)]
pub struct HttpScoreSync {
    client: Client,
    config: Option<SyncConfig>,
}

impl HttpScoreSync {
    #[must_use]
    pub fn new(config: Option<SyncConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(SyncConfig::from_env())
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    #[must_use]
    pub fn config(&self) -> Option<&SyncConfig> {
        self.config.as_ref()
    }

    fn require_config(&self) -> Result<&SyncConfig, SyncError> {
        self.config.as_ref().ok_or(SyncError::Disabled)
    }
}

#[async_trait]
impl ScoreSync for HttpScoreSync {
    async fn push_result(&self, submission: &ScoreSubmission) -> Result<(), SyncError> {
        let config = self.require_config()?;
        let payload = ScoreInsert {
            user_id: &config.user_id,
            game_name: submission.game_id.as_str(),
            score: submission.score,
            total: submission.total,
            percentage: submission.percentage,
        };

        let response = self
            .client
            .post(config.scores_url())
            .header("apikey", &config.api_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(config.bearer())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }
        Ok(())
    }

    async fn fetch_high_scores(&self) -> Result<HighScores, SyncError> {
        let config = self.require_config()?;
        let user_filter = format!("eq.{}", config.user_id);
        let response = self
            .client
            .get(config.scores_url())
            .header("apikey", &config.api_key)
            .bearer_auth(config.bearer())
            .query(&[
                ("select", "game_name,score,total,percentage,created_at"),
                ("user_id", user_filter.as_str()),
                ("order", "score.desc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }

        let rows: Vec<RemoteScoreRow> = response.json().await?;
        best_per_game(rows)
    }
}

#[derive(Debug, Serialize)]
struct ScoreInsert<'a> {
    user_id: &'a str,
    game_name: &'a str,
    score: u32,
    total: u32,
    percentage: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use quiz_core::model::GameId;

    fn config(token: Option<&str>) -> SyncConfig {
        SyncConfig {
            base_url: "https://example.test/rest/v1/".into(),
            api_key: "anon".into(),
            access_token: token.map(str::to_string),
            user_id: "u-1".into(),
        }
    }

    #[test]
    fn scores_url_trims_trailing_slash() {
        assert_eq!(config(None).scores_url(), "https://example.test/rest/v1/scores");
    }

    #[test]
    fn bearer_prefers_session_token() {
        assert_eq!(config(None).bearer(), "anon");
        assert_eq!(config(Some("jwt")).bearer(), "jwt");
    }

    #[test]
    fn insert_payload_uses_remote_column_names() {
        let payload = ScoreInsert {
            user_id: "u-1",
            game_name: "speed-maths",
            score: 17,
            total: 20,
            percentage: 85,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["game_name"], "speed-maths");
        assert_eq!(json["percentage"], 85);
    }

    #[test]
    fn decodes_postgrest_rows_with_fractional_timestamps() {
        let body = r#"[
            {"game_name":"speed-maths","score":17,"total":20,"percentage":85,"created_at":"2024-05-01T12:34:56.789012+00:00"},
            {"game_name":"speed-maths","score":9,"total":20,"created_at":"2024-04-30T08:00:00+00:00"}
        ]"#;
        let rows: Vec<RemoteScoreRow> = serde_json::from_str(body).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].percentage, 85);
        assert_eq!(rows[1].percentage, 0);
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap()
            + chrono::Duration::microseconds(789_012);
        assert_eq!(rows[0].created_at, expected);

        let best = best_per_game(rows).unwrap();
        let speed = best.get(&GameId::from("speed-maths")).unwrap();
        assert_eq!(speed.score, 17);
        assert_eq!(speed.date, expected);
    }

    #[tokio::test]
    async fn unconfigured_sync_reports_disabled() {
        let sync = HttpScoreSync::new(None);
        assert!(!sync.enabled());
        assert!(sync.config().is_none());

        let submission = ScoreSubmission {
            game_id: GameId::from("speed-maths"),
            score: 3,
            total: 4,
            percentage: 75,
        };
        assert!(matches!(
            sync.push_result(&submission).await,
            Err(SyncError::Disabled)
        ));
        assert!(matches!(
            sync.fetch_high_scores().await,
            Err(SyncError::Disabled)
        ));
    }

    #[test]
    fn configured_sync_is_enabled() {
        let sync = HttpScoreSync::new(Some(config(None)));
        assert!(sync.enabled());
        assert_eq!(sync.config().unwrap().user_id, "u-1");
    }
}
