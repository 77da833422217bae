use std::sync::Arc;

use crate::components::TemplateSet;
use crate::config::Config;
use crate::errors::WikiError;
use crate::services::{PageStore, TitleValidator};

/// A wiki page: its title and raw body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self { title: title.into(), body: body.into() }
    }

    /// A page with no body yet
    pub fn empty(title: impl Into<String>) -> Self {
        Self { title: title.into(), body: Vec::new() }
    }
}

/// Application state shared across all handlers.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub store: PageStore,
    pub templates: Arc<TemplateSet>,
    pub titles: Arc<TitleValidator>,
    pub front_page: Arc<str>,
}

impl AppState {
    /// Load templates and compile the title pattern for `config`
    pub fn from_config(config: &Config) -> Result<Self, WikiError> {
        Ok(Self {
            store: PageStore::new(config.data_dir.clone()),
            templates: Arc::new(TemplateSet::load(&config.template_dir)?),
            titles: Arc::new(TitleValidator::new(config.title_mode)?),
            front_page: Arc::from(config.front_page.as_str()),
        })
    }
}
