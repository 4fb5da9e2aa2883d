//! Web form: the interactive front end over HTTP.
//!
//! `GET /` renders a form asking for a repository URL and a branch,
//! `POST /consolidate` runs one consolidation and answers with the document as
//! a plain-text attachment, and `GET /health` reports build metadata. The
//! document is built in memory and never touches the disk.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{info, warn};

use repotext_config::AppConfig;

use crate::consolidate::{ConsolidateError, ConsolidateRequest, Consolidator};
use crate::filter::ExclusionRule;
use crate::host::RepositoryHost;
use crate::observer::{CollectingObserver, ErrorKind};

/// Header carrying the number of files in the returned document.
pub const FILES_HEADER: &str = "x-repotext-files";
/// Header carrying the number of files left out after a failed download.
pub const SKIPPED_HEADER: &str = "x-repotext-skipped";
/// Header carrying the download error messages, separated by `" | "`.
pub const ERRORS_HEADER: &str = "x-repotext-errors";

/// Shared state accessible to all route handlers.
pub struct WebState {
    pub config: AppConfig,
    pub host: Arc<dyn RepositoryHost>,
}

/// Form fields posted to `/consolidate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsolidateForm {
    #[serde(default)]
    pub repo_url: String,
    #[serde(default)]
    pub branch: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub git_hash: String,
}

/// Build the axum router with all routes.
pub fn router(state: Arc<WebState>) -> axum::Router {
    axum::Router::new()
        .route("/", get(handle_index))
        .route("/consolidate", post(handle_consolidate))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Bind `server.listen_addr:server.listen_port` and serve until Ctrl-C.
pub async fn serve(state: Arc<WebState>) -> Result<(), std::io::Error> {
    let addr = format!(
        "{}:{}",
        state.config.server.listen_addr, state.config.server.listen_port
    );
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "Web form listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Web form shutting down");
        })
        .await
}

// ── Route handlers ──────────────────────────────────────────────────────

async fn handle_index(State(state): State<Arc<WebState>>) -> Html<String> {
    let rule = ExclusionRule::from_config(&state.config.filter);
    Html(render_index(&rule))
}

async fn handle_consolidate(
    State(state): State<Arc<WebState>>,
    Form(form): Form<ConsolidateForm>,
) -> Response {
    let request = ConsolidateRequest::new(form.repo_url, form.branch);
    let observer = CollectingObserver::new();
    let consolidator = Consolidator::from_config(state.host.as_ref(), &state.config);

    let doc = match consolidator.run(&request, &observer).await {
        Ok(doc) => doc,
        Err(err) => {
            let status = match err {
                ConsolidateError::MissingInput | ConsolidateError::InvalidUrl(_) => {
                    StatusCode::BAD_REQUEST
                }
                ConsolidateError::Access(_) => StatusCode::BAD_GATEWAY,
            };
            warn!(%status, error = %err, "Consolidation rejected");
            return error_page(status, &err.to_string());
        }
    };

    if doc.walked() == 0 {
        return error_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            "No content to consolidate. Every file was excluded or the repository is empty.",
        );
    }

    let download_errors: Vec<String> = observer
        .errors()
        .into_iter()
        .filter(|(kind, _)| *kind == ErrorKind::Download)
        .map(|(_, message)| message)
        .collect();
    info!(
        files = doc.len(),
        download_errors = download_errors.len(),
        "Serving consolidated document"
    );

    let mut resp = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", state.config.output.file_name),
            ),
            (HeaderName::from_static(FILES_HEADER), doc.len().to_string()),
            (HeaderName::from_static(SKIPPED_HEADER), doc.skipped().to_string()),
        ],
        doc.into_text(),
    )
        .into_response();
    if let Some(summary) = error_summary(&download_errors) {
        resp.headers_mut()
            .insert(HeaderName::from_static(ERRORS_HEADER), summary);
    }
    resp
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::build_info::version_string(),
        git_hash: crate::build_info::GIT_HASH.to_string(),
    })
}

// ── Rendering ───────────────────────────────────────────────────────────

fn render_index(rule: &ExclusionRule) -> String {
    let mut page = String::from(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>repotext</title></head>\n<body>\n\
         <h1>GitHub Repository Text Consolidator</h1>\n\
         <p>Only public repositories can be consolidated.</p>\n\
         <form method=\"post\" action=\"/consolidate\">\n\
         <label>Repository URL <input name=\"repo_url\" placeholder=\"https://github.com/owner/repo\"></label>\n\
         <label>Branch <input name=\"branch\" value=\"main\"></label>\n\
         <button type=\"submit\">Consolidate</button>\n\
         </form>\n",
    );
    push_list(&mut page, "Excluded extensions", rule.excluded_extensions());
    push_list(&mut page, "Excluded files", rule.excluded_filenames());
    page.push_str("</body>\n</html>\n");
    page
}

fn push_list<'a>(page: &mut String, title: &str, items: impl Iterator<Item = &'a str>) {
    let _ = writeln!(page, "<h2>{title}</h2>\n<ul>");
    for item in items {
        let _ = writeln!(page, "<li><code>{}</code></li>", escape_html(item));
    }
    page.push_str("</ul>\n");
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>repotext</title></head>\n<body>\n\
         <p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>\n</body>\n</html>\n",
        escape_html(message)
    );
    (status, Html(body)).into_response()
}

/// Join error messages into one header value.
///
/// Header values only allow visible ASCII, space and tab, so anything else
/// becomes `?`.
fn error_summary(messages: &[String]) -> Option<HeaderValue> {
    if messages.is_empty() {
        return None;
    }
    let joined: String = messages
        .join(" | ")
        .chars()
        .map(|c| if c == '\t' || (' '..='~').contains(&c) { c } else { '?' })
        .collect();
    HeaderValue::from_str(&joined).ok()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
