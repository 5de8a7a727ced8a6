//! HTTP front-end for gfcombine.
//!
//! Both endpoints are pure transforms over the request body, so handlers run
//! them inline. The options resolved at startup act as defaults; each request
//! may override the markup type.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use gfcombine_core::collection::FontCollection;
use gfcombine_core::config::{CombineOptions, MarkupType};
use gfcombine_core::markup::rewrite;
use gfcombine_core::output::{render_markup, render_original_links, CollectionSummary};
use gfcombine_core::urls::is_font_request_url;

/// Font request URLs to merge.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CombineRequest {
    pub urls: Vec<String>,
    /// Markup to render alongside the summary; server default when absent
    pub markup: Option<MarkupType>,
    pub min_candidates: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CombineResponse {
    #[serde(flatten)]
    pub summary: CollectionSummary,
    /// False when there were too few font requests; `markup` then links the
    /// original URLs unchanged
    pub combined: bool,
    /// Rendered `<link>` elements or script block
    pub markup: String,
}

/// An HTML document to rewrite.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RewriteRequest {
    pub markup: String,
    pub markup_type: Option<MarkupType>,
    pub min_candidates: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RewriteResponse {
    pub markup: String,
    pub changed: bool,
    pub summary: Option<CollectionSummary>,
}

/// Bind `bind` and serve until the process is stopped.
pub async fn serve(bind: &str, options: CombineOptions) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding HTTP server to {bind}"))?;
    info!(%bind, markup = %options.markup_type, "serving font combiner");

    axum::serve(listener, router(options))
        .await
        .context("serving HTTP")?;
    Ok(())
}

pub fn router(options: CombineOptions) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/combine", post(combine_handler))
        .route("/rewrite", post(rewrite_handler))
        .with_state(Arc::new(options))
}

async fn combine_handler(
    State(defaults): State<Arc<CombineOptions>>,
    Json(req): Json<CombineRequest>,
) -> Result<Json<CombineResponse>, (StatusCode, String)> {
    if req.urls.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "at least one url is required".to_string(),
        ));
    }

    let collection = FontCollection::from_urls(&req.urls).map_err(to_bad_request)?;
    let markup_type = req.markup.unwrap_or(defaults.markup_type);
    let min_candidates = req.min_candidates.unwrap_or(defaults.min_candidates);
    let candidates = req.urls.iter().filter(|url| is_font_request_url(url)).count();
    let combined = CombineOptions::clone(&defaults)
        .with_min_candidates(min_candidates)
        .has_enough_candidates(candidates);

    let markup = if combined {
        render_markup(&collection, markup_type)
    } else {
        render_original_links(&req.urls)
    };

    Ok(Json(CombineResponse {
        summary: CollectionSummary::from(&collection),
        combined,
        markup,
    }))
}

async fn rewrite_handler(
    State(defaults): State<Arc<CombineOptions>>,
    Json(req): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, (StatusCode, String)> {
    let mut options = CombineOptions::clone(&defaults);
    if let Some(markup_type) = req.markup_type {
        options = options.with_markup_type(markup_type);
    }
    if let Some(min) = req.min_candidates {
        options = options.with_min_candidates(min);
    }

    let result = rewrite(&req.markup, &options).map_err(to_bad_request)?;

    Ok(Json(RewriteResponse {
        markup: result.markup,
        changed: result.changed,
        summary: result.summary,
    }))
}

fn to_bad_request(err: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}
