use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config;
use crate::fetch::Orchestrator;
use crate::logging;
use crate::server;
use crate::source::{self, DatasetSource};
use crate::surface::Bindings;
use crate::ui;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub open_browser: Option<bool>,
}

pub fn run(options: RunOptions) -> Result<()> {
    logging::init();

    let cfg = config::load(config::LoadOptions::default()).context("load config")?;
    if let Some(path) = config::default_path() {
        tracing::debug!(path = %path.display(), "config location");
    }

    let dataset: Arc<dyn DatasetSource> = Arc::new(
        source::HttpDatasetSource::new(source::ClientConfig {
            url: cfg.source.url.clone(),
            user_agent: cfg.source.user_agent.clone(),
            timeout: cfg.source.timeout,
            http_client: None,
        })
        .context("build dataset client")?,
    );
    let orchestrator = Arc::new(Orchestrator::new(dataset, cfg.gallery.min_loading));

    let mut model = ui::Model::new(ui::Options {
        bindings: Bindings::default(),
        orchestrator,
        max_cards: cfg.gallery.max_cards,
    });

    let http = server::bind(&cfg.server.listen_addr)?;
    let page_url = format!("http://{}/", http.server_addr());
    tracing::info!(url = %page_url, source = %cfg.source.url, "gallery ready");
    println!("APOD Gallery is running at {page_url} (Ctrl-C to quit)");

    if options.open_browser.unwrap_or(cfg.server.open_browser) {
        if let Err(err) = webbrowser::open(&page_url) {
            tracing::warn!(error = %err, "could not open a browser; visit the address manually");
        }
    }

    server::serve(&http, &mut model)
}
