use std::{fmt, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use thirtyfour::prelude::*;

use crate::configuration::{BrowserSettings, PortalSettings};

use super::{Droid, TitleSource};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Where a portal search is at. Errors raised while in a stage carry it as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Init,
    BrowserReady,
    Navigated,
    QuerySubmitted,
    ResultsWaited,
    ResultsFound,
    ResultsEmpty,
    Matched,
    Done,
    Failed,
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            SearchStage::Init => "starting browser session",
            SearchStage::BrowserReady => "opening search portal",
            SearchStage::Navigated => "submitting query",
            SearchStage::QuerySubmitted => "waiting for results",
            SearchStage::ResultsWaited => "reading results",
            SearchStage::ResultsFound => "results found",
            SearchStage::ResultsEmpty => "no results",
            SearchStage::Matched => "matching titles",
            SearchStage::Done => "done",
            SearchStage::Failed => "failed",
        };
        f.write_str(description)
    }
}

/// The browser-facing steps of one portal search.
#[async_trait]
pub trait PortalSession: Send {
    async fn submit_query(&mut self, query: &str) -> anyhow::Result<()>;
    async fn collect_titles(&mut self) -> anyhow::Result<Vec<String>>;
    /// Releases the browser. Called exactly once, whatever the outcome.
    async fn close(&mut self);
}

/// Runs the steps of a search on `session` and closes it on every path.
///
/// Failing to submit the query is an error; failing to find or read result
/// rows afterwards yields an empty list.
pub async fn run_session<S: PortalSession>(
    mut session: S,
    query: &str,
) -> anyhow::Result<Vec<String>> {
    let result = match session.submit_query(query).await {
        Ok(()) => match session.collect_titles().await {
            Ok(titles) => {
                log::debug!("Stage: {:?}", SearchStage::ResultsFound);
                Ok(titles)
            }
            Err(e) => {
                // A page without result rows is a search with no hits, not a failure
                log::error!("Found no results on query: {} | {:?}", query, e);
                log::debug!("Stage: {:?}", SearchStage::ResultsEmpty);
                Ok(vec![])
            }
        },
        Err(e) => {
            log::debug!("Stage: {:?}", SearchStage::Failed);
            Err(e)
        }
    };

    session.close().await;

    result
}

struct DroidSession<'a> {
    droid: Option<Droid>,
    browser: &'a BrowserSettings,
    portal: &'a PortalSettings,
}

impl DroidSession<'_> {
    fn driver(&self) -> anyhow::Result<&WebDriver> {
        self.droid
            .as_ref()
            .map(|d| &d.driver)
            .context("Browser session already closed")
    }
}

#[async_trait]
impl PortalSession for DroidSession<'_> {
    async fn submit_query(&mut self, query: &str) -> anyhow::Result<()> {
        let driver = self.driver()?;

        driver
            .goto(self.portal.base_url.as_str())
            .await
            .with_context(|| SearchStage::BrowserReady)?;
        tokio::time::sleep(self.portal.navigation_delay_ms.sample()).await;
        log::debug!("Stage: {:?}", SearchStage::Navigated);

        let search_box = driver
            .query(By::Id(self.portal.search_box_id.as_str()))
            .wait(self.browser.element_wait_timeout(), POLL_INTERVAL)
            .first()
            .await
            .with_context(|| SearchStage::Navigated)?;
        search_box
            .clear()
            .await
            .with_context(|| SearchStage::Navigated)?;

        for c in query.chars() {
            search_box
                .send_keys(c.to_string())
                .await
                .with_context(|| SearchStage::Navigated)?;
            tokio::time::sleep(self.portal.keystroke_delay_ms.sample()).await;
        }

        driver
            .find(By::ClassName(self.portal.search_button_class.as_str()))
            .await
            .with_context(|| SearchStage::Navigated)?
            .click()
            .await
            .with_context(|| SearchStage::Navigated)?;

        tokio::time::sleep(self.portal.submit_delay_ms.sample()).await;
        log::debug!("Stage: {:?}", SearchStage::QuerySubmitted);

        Ok(())
    }

    async fn collect_titles(&mut self) -> anyhow::Result<Vec<String>> {
        let driver = self.driver()?;
        let xpath = self.portal.results_xpath.as_str();

        driver
            .query(By::XPath(xpath))
            .wait(self.browser.element_wait_timeout(), POLL_INTERVAL)
            .first()
            .await
            .with_context(|| SearchStage::QuerySubmitted)?;
        log::debug!("Stage: {:?}", SearchStage::ResultsWaited);

        let mut titles = vec![];
        for element in driver
            .find_all(By::XPath(xpath))
            .await
            .with_context(|| SearchStage::ResultsWaited)?
        {
            let text = element
                .text()
                .await
                .with_context(|| SearchStage::ResultsWaited)?;
            titles.push(text.trim().to_string());
        }

        Ok(titles)
    }

    async fn close(&mut self) {
        if let Some(droid) = self.droid.take() {
            droid.quit().await;
        }
    }
}

/// Scrapes result titles from the academic search portal with a fresh browser per query.
pub struct PortalScraper {
    browser: BrowserSettings,
    portal: PortalSettings,
}

impl PortalScraper {
    pub fn new(browser: BrowserSettings, portal: PortalSettings) -> Self {
        PortalScraper { browser, portal }
    }
}

#[async_trait]
impl TitleSource for PortalScraper {
    async fn fetch_titles(&self, query: &str) -> anyhow::Result<Vec<String>> {
        log::debug!("Stage: {:?}", SearchStage::Init);
        let droid = Droid::new(&self.browser)
            .await
            .with_context(|| SearchStage::Init)?;
        log::debug!("Stage: {:?}", SearchStage::BrowserReady);

        let session = DroidSession {
            droid: Some(droid),
            browser: &self.browser,
            portal: &self.portal,
        };

        run_session(session, query).await
    }
}
