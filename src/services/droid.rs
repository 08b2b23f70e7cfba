use serde_json::json;
use thirtyfour::{
    error::WebDriverResult, extensions::cdp::ChromeDevTools, ChromiumLikeCapabilities,
    DesiredCapabilities, WebDriver,
};

use crate::configuration::BrowserSettings;

const HIDE_WEBDRIVER_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
      get: () => undefined
    })
"#;

/// One browser session. Must be closed with [`Droid::quit`].
pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &BrowserSettings) -> WebDriverResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        for arg in chrome_arguments(settings.headless, &settings.random_user_agent()) {
            caps.add_arg(&arg)?;
        }
        caps.add_experimental_option("excludeSwitches", vec!["enable-automation"])?;
        caps.add_experimental_option("useAutomationExtension", false)?;
        if let Some(ref binary) = settings.chrome_binary {
            caps.set_binary(binary)?;
        }

        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps).await?;
        let droid = Droid { driver };

        // The session is live from here on, so it has to be closed even if setup fails
        if let Err(e) = droid.prepare(settings).await {
            droid.quit().await;
            return Err(e);
        }

        Ok(droid)
    }

    async fn prepare(&self, settings: &BrowserSettings) -> WebDriverResult<()> {
        if !settings.headless {
            self.driver.maximize_window().await?;
        }
        self.driver
            .set_page_load_timeout(settings.page_load_timeout())
            .await?;

        let dev_tools = ChromeDevTools::new(self.driver.handle.clone());
        dev_tools
            .execute_cdp_with_params(
                "Page.addScriptToEvaluateOnNewDocument",
                json!({ "source": HIDE_WEBDRIVER_SCRIPT }),
            )
            .await?;

        Ok(())
    }

    pub async fn quit(self) {
        if let Err(e) = self.driver.quit().await {
            log::error!("Failed to quit browser session: {:?}", e);
        }
    }
}

pub fn chrome_arguments(headless: bool, user_agent: &str) -> Vec<String> {
    let mut args: Vec<String> = [
        "--disable-blink-features=AutomationControlled",
        "--disable-dev-shm-usage",
        "--no-sandbox",
        "--disable-infobars",
        "--disable-extensions",
        "--disable-gpu",
        "--log-level=3",
    ]
    .iter()
    .map(|a| a.to_string())
    .collect();

    args.push(format!("--user-agent={}", user_agent));
    if headless {
        args.push("--headless=new".to_string());
        args.push("--window-size=1920,1080".to_string());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::chrome_arguments;

    #[test]
    fn arguments_carry_user_agent_and_stealth_flags() {
        let args = chrome_arguments(false, "test-agent/1.0");

        assert!(args.contains(&"--user-agent=test-agent/1.0".to_string()));
        assert!(args.contains(&"--disable-blink-features=AutomationControlled".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
    }

    #[test]
    fn headless_adds_window_size() {
        let args = chrome_arguments(true, "ua");

        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
    }
}
