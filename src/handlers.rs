use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRequestParts, State},
    http::request::Parts,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::errors::WikiError;
use crate::types::{AppState, Page};
use crate::utils::{found, page_url};

/// Page title taken from the request path by the shared [`TitleValidator`].
///
/// Rejects with [`WikiError::InvalidTitle`] (404) before the handler runs.
///
/// [`TitleValidator`]: crate::services::TitleValidator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(pub String);

#[async_trait]
impl FromRequestParts<AppState> for Title {
    type Rejection = WikiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.titles.title_from_path(parts.uri.path()).map(Title)
    }
}

/// Form submitted by the edit page
#[derive(Debug, Default, Deserialize)]
pub struct SaveForm {
    #[serde(default)]
    pub body: String,
}

/// Redirect `/` to the front page
pub async fn handle_root(State(state): State<AppState>) -> Response {
    log::debug!("Root request, redirecting to front page '{}'", state.front_page);
    found(&page_url("/view/", &state.front_page))
}

/// Render a page, or send the user to its edit form if it does not exist yet
pub async fn handle_view(
    State(state): State<AppState>,
    Title(title): Title,
) -> Result<Response, WikiError> {
    let page = match state.store.load(&title) {
        Ok(page) => page,
        Err(e) => {
            log::info!("Page '{}' unavailable ({}), redirecting to editor", title, e);
            return Ok(found(&page_url("/edit/", &title)));
        }
    };

    let html = state.templates.render("view", &page).map_err(|e| {
        log::error!("Failed to render view for '{}': {}", title, e);
        e
    })?;
    log::info!("Serving page '{}'", title);
    Ok(Html(html).into_response())
}

/// Render the edit form, blank when the page does not exist
pub async fn handle_edit(
    State(state): State<AppState>,
    Title(title): Title,
) -> Result<Response, WikiError> {
    let page = state.store.load(&title).unwrap_or_else(|e| {
        log::debug!("No stored page '{}' ({}), editing a blank one", title, e);
        Page::empty(title.as_str())
    });

    let html = state.templates.render("edit", &page).map_err(|e| {
        log::error!("Failed to render editor for '{}': {}", title, e);
        e
    })?;
    log::info!("Serving editor for '{}'", title);
    Ok(Html(html).into_response())
}

/// Persist the submitted body and redirect to the page
pub async fn handle_save(
    State(state): State<AppState>,
    Title(title): Title,
    form: Result<Form<SaveForm>, FormRejection>,
) -> Result<Response, WikiError> {
    // Only a request that is not a form at all counts as an empty body; an
    // oversized or malformed submission must not overwrite the page.
    let body = match form {
        Ok(Form(form)) => form.body,
        Err(FormRejection::InvalidFormContentType(_)) => String::new(),
        Err(rejection) => {
            log::warn!("Rejected save for '{}': {}", title, rejection.body_text());
            return Ok(rejection.into_response());
        }
    };
    let page = Page::new(title.as_str(), body);

    state.store.save(&page)?;
    log::info!("Page '{}' saved", title);
    Ok(found(&page_url("/view/", &title)))
}
