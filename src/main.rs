use std::{net::TcpListener, sync::Arc};

use env_logger::Env;
use paper_scout::{
    configuration::get_configuration,
    services::{PortalScraper, TitleSearch},
    startup::run,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    let max_sessions = configuration.browser.max_sessions;
    let scraper = PortalScraper::new(configuration.browser, configuration.portal);
    let title_search = TitleSearch::new(
        Arc::new(scraper),
        configuration.matcher.policy(),
        max_sessions,
    );

    log::info!(
        "Listening on {} | browser session limit: {}",
        listener.local_addr()?,
        match max_sessions {
            0 => "none".to_string(),
            n => n.to_string(),
        }
    );

    run(listener, title_search)?.await
}
