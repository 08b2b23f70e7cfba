use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::domain::{best_match_index, MatchPolicy, MatchResult, SearchQuery};

use super::SearchStage;

/// Anything that can turn a query into an ordered list of candidate titles.
#[async_trait]
pub trait TitleSource: Send + Sync {
    async fn fetch_titles(&self, query: &str) -> anyhow::Result<Vec<String>>;
}

/// Fetches candidate titles for a query and picks the closest one.
///
/// When built with a non-zero session limit, searches beyond the limit wait
/// (first come, first served) until a running one finishes. Nothing is rejected.
pub struct TitleSearch {
    source: Arc<dyn TitleSource>,
    policy: MatchPolicy,
    sessions: Option<Semaphore>,
}

impl TitleSearch {
    pub fn new(source: Arc<dyn TitleSource>, policy: MatchPolicy, max_sessions: usize) -> Self {
        let sessions = match max_sessions {
            0 => None,
            n => Some(Semaphore::new(n)),
        };

        TitleSearch {
            source,
            policy,
            sessions,
        }
    }

    pub async fn search(&self, query: &SearchQuery) -> anyhow::Result<MatchResult> {
        let request_id = Uuid::new_v4();
        let query = query.as_ref();
        log::info!("[{}] Searching titles for query: {}", request_id, query);

        let titles = {
            let _permit = match self.sessions {
                Some(ref sessions) => Some(
                    sessions
                        .acquire()
                        .await
                        .context("Browser session limiter was closed")?,
                ),
                None => None,
            };

            match self.source.fetch_titles(query).await {
                Ok(titles) => titles,
                Err(e) => {
                    log::debug!("[{}] Stage: {:?}", request_id, SearchStage::Failed);
                    log::error!("[{}] Title search failed: {:?}", request_id, e);
                    return Err(e);
                }
            }
        };

        if titles.is_empty() {
            log::info!("[{}] Found no results on query: {}", request_id, query);
            log::debug!("[{}] Stage: {:?}", request_id, SearchStage::Done);
            return Ok(MatchResult::not_found(query));
        }

        log::debug!("[{}] Stage: {:?}", request_id, SearchStage::Matched);

        let best_match = match best_match_index(query, &titles, self.policy) {
            Some(index) => titles[index].clone(),
            None => String::new(),
        };

        log::info!(
            "[{}] Matched {:?} out of {} results",
            request_id,
            best_match,
            titles.len()
        );

        log::debug!("[{}] Stage: {:?}", request_id, SearchStage::Done);

        Ok(MatchResult::new(query, best_match, titles.len()))
    }
}
