use std::time::Duration;

use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};
use url::Url;

use crate::domain::MatchPolicy;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub browser: BrowserSettings,
    pub portal: PortalSettings,
    pub matcher: MatcherSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BrowserSettings {
    /// Address of the chromedriver (or selenium) endpoint sessions are opened against
    pub webdriver_url: String,
    pub chrome_binary: Option<String>,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub headless: bool,
    #[serde(default)]
    pub user_agents: Vec<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_load_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub element_wait_timeout_secs: u64,
    /// 0 means no limit on simultaneous browser sessions
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_sessions: usize,
}

impl BrowserSettings {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn element_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.element_wait_timeout_secs)
    }

    pub fn random_user_agent(&self) -> String {
        match self.user_agents.choose(&mut rand::thread_rng()) {
            Some(ua) => ua.to_string(),
            None => fake_user_agent::get_rua().to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct PortalSettings {
    pub base_url: String,
    pub search_box_id: String,
    pub search_button_class: String,
    pub results_xpath: String,
    pub keystroke_delay_ms: DelayRange,
    pub navigation_delay_ms: DelayRange,
    pub submit_delay_ms: DelayRange,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DelayRange {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub min: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max: u64,
}

impl DelayRange {
    pub fn sample(&self) -> Duration {
        let millis = match self.max > self.min {
            true => rand::thread_rng().gen_range(self.min..=self.max),
            false => self.min,
        };
        Duration::from_millis(millis)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct MatcherSettings {
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub strict_no_match: bool,
}

impl MatcherSettings {
    pub fn policy(&self) -> MatchPolicy {
        match self.strict_no_match {
            true => MatchPolicy::Strict,
            false => MatchPolicy::FirstOnNoOverlap,
        }
    }
}

impl Settings {
    fn validate(self) -> Result<Self, config::ConfigError> {
        for (key, value) in [
            ("portal.base_url", &self.portal.base_url),
            ("browser.webdriver_url", &self.browser.webdriver_url),
        ] {
            if let Err(e) = Url::parse(value) {
                return Err(config::ConfigError::Message(format!(
                    "{} is not a valid url ({}): {}",
                    key, value, e
                )));
            }
        }

        for (key, range) in [
            ("portal.keystroke_delay_ms", &self.portal.keystroke_delay_ms),
            ("portal.navigation_delay_ms", &self.portal.navigation_delay_ms),
            ("portal.submit_delay_ms", &self.portal.submit_delay_ms),
        ] {
            if range.min > range.max {
                return Err(config::ConfigError::Message(format!(
                    "{} has min {} greater than max {}",
                    key, range.min, range.max
                )));
            }
        }

        Ok(self)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        // e.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()?.validate()
}

#[cfg(test)]
mod tests {
    use super::{get_configuration, BrowserSettings, DelayRange, MatcherSettings};
    use crate::domain::MatchPolicy;
    use std::time::Duration;

    fn browser_settings(user_agents: Vec<String>) -> BrowserSettings {
        BrowserSettings {
            webdriver_url: "http://localhost:9515".to_string(),
            chrome_binary: None,
            headless: true,
            user_agents,
            page_load_timeout_secs: 30,
            element_wait_timeout_secs: 15,
            max_sessions: 1,
        }
    }

    #[test]
    fn base_configuration_loads() {
        let settings = get_configuration().unwrap();

        assert_eq!(settings.portal.base_url, "https://www.cnki.net/");
        assert_eq!(settings.portal.search_box_id, "txt_SearchText");
        assert_eq!(settings.browser.element_wait_timeout(), Duration::from_secs(15));
        assert_eq!(settings.browser.user_agents.len(), 3);
        assert!(!settings.matcher.strict_no_match);
    }

    #[test]
    fn delay_range_samples_within_bounds() {
        let range = DelayRange { min: 50, max: 150 };
        for _ in 0..100 {
            let delay = range.sample();
            assert!(delay >= Duration::from_millis(50));
            assert!(delay <= Duration::from_millis(150));
        }
    }

    #[test]
    fn fixed_delay_range_samples_exactly() {
        let range = DelayRange { min: 300, max: 300 };
        assert_eq!(range.sample(), Duration::from_millis(300));
    }

    #[test]
    fn inverted_delay_range_is_rejected() {
        let mut settings = get_configuration().unwrap();
        settings.portal.submit_delay_ms = DelayRange { min: 3000, max: 2000 };

        let err = settings.validate().unwrap_err();

        assert!(err.to_string().contains("portal.submit_delay_ms"));
    }

    #[test]
    fn invalid_portal_url_is_rejected() {
        let mut settings = get_configuration().unwrap();
        settings.portal.base_url = "not a url".to_string();

        assert!(settings.validate().is_err());
    }

    #[test]
    fn user_agent_is_picked_from_pool() {
        let pool = vec!["agent-a".to_string(), "agent-b".to_string()];
        let settings = browser_settings(pool.clone());

        for _ in 0..20 {
            assert!(pool.contains(&settings.random_user_agent()));
        }
    }

    #[test]
    fn user_agent_falls_back_when_pool_empty() {
        let settings = browser_settings(vec![]);
        assert!(!settings.random_user_agent().is_empty());
    }

    #[test]
    fn strict_flag_selects_policy() {
        let strict = MatcherSettings {
            strict_no_match: true,
        };
        let lenient = MatcherSettings {
            strict_no_match: false,
        };

        assert_eq!(strict.policy(), MatchPolicy::Strict);
        assert_eq!(lenient.policy(), MatchPolicy::FirstOnNoOverlap);
    }
}
