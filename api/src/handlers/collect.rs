//! Collection handlers
//!
//! Batch invocation surface for the source collectors. The request body is
//! validated into an `EntitySelection` before anything is fetched.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::domain::entities::{BatchReport, EntityId, EntitySelection, Source};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    Single,
    Batch,
    All,
}

/// Body of `POST /collect/:source`
#[derive(Debug, Default, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub mode: Option<BatchMode>,
    #[serde(default, alias = "packages")]
    pub items: Option<Vec<String>>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Query of `GET /collect/:source`
#[derive(Debug, Default, Deserialize)]
pub struct CollectQuery {
    pub entity: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl From<CollectQuery> for BatchRequest {
    fn from(q: CollectQuery) -> Self {
        Self {
            mode: None,
            items: None,
            entity: q.entity,
            limit: q.limit,
            offset: q.offset,
        }
    }
}

impl BatchRequest {
    /// Parse a raw body; an empty body selects every tracked entity
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
    }

    pub fn into_selection(self) -> Result<EntitySelection, AppError> {
        if self.limit == Some(0) {
            return Err(AppError::BadRequest("limit must be at least 1".into()));
        }
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit;

        let entity = self
            .entity
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        let items = self.items.map(|items| {
            items
                .into_iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .map(EntityId::new)
                .collect::<Vec<_>>()
        });

        if entity.is_some() && items.is_some() {
            return Err(AppError::BadRequest(
                "entity and items cannot be combined".into(),
            ));
        }

        let mode = self.mode.unwrap_or(match (&entity, &items) {
            (Some(_), _) => BatchMode::Single,
            (None, Some(_)) => BatchMode::Batch,
            (None, None) => BatchMode::All,
        });

        match (mode, entity, items) {
            (BatchMode::Single, Some(id), None) => Ok(EntitySelection::Single(EntityId::new(id))),
            (BatchMode::Single, _, _) => Err(AppError::BadRequest(
                "mode single requires entity".into(),
            )),
            (BatchMode::Batch, None, Some(ids)) if !ids.is_empty() => Ok(EntitySelection::Items {
                ids,
                offset,
                limit,
            }),
            (BatchMode::Batch, _, _) => Err(AppError::BadRequest(
                "mode batch requires a non-empty items list".into(),
            )),
            (BatchMode::All, None, None) => Ok(EntitySelection::All { offset, limit }),
            (BatchMode::All, _, _) => Err(AppError::BadRequest(
                "mode all takes no entity or items".into(),
            )),
        }
    }
}

fn parse_source(source: &str) -> Result<Source, AppError> {
    source.parse().map_err(AppError::BadRequest)
}

async fn run(
    state: &AppState,
    source: Source,
    request: BatchRequest,
) -> Result<Json<BatchReport>, AppError> {
    let selection = request.into_selection()?;
    let report = state.collection_service.collect(source, selection).await?;
    Ok(Json(report))
}

/// POST /collect/:source
pub async fn post_collect(
    State(state): State<AppState>,
    Path(source): Path<String>,
    body: Bytes,
) -> Result<Json<BatchReport>, AppError> {
    let source = parse_source(&source)?;
    let request = BatchRequest::from_body(&body)?;
    run(&state, source, request).await
}

/// GET /collect/:source
pub async fn get_collect(
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(query): Query<CollectQuery>,
) -> Result<Json<BatchReport>, AppError> {
    let source = parse_source(&source)?;
    run(&state, source, query.into()).await
}
