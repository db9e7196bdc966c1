use axum::{
    extract::{Path, Query},
    Json,
};
use axum_extra::extract::WithRejection;
use shared::api::{
    error::{ServerError, ServerErrorContext},
    payloads::{LogQuery, LogResponse},
};
use tracing::instrument;

use super::find_user;
use crate::store::Storage;

const FETCH_LOGS_FAILED: &str = "Failed to fetch logs";

#[instrument(skip(store))]
pub async fn fetch_log(
    Storage(store): Storage,
    WithRejection(Path(user_id), _): WithRejection<Path<String>, ServerError>,
    WithRejection(Query(query), _): WithRejection<Query<LogQuery>, ServerError>,
) -> Result<Json<LogResponse>, ServerError> {
    let user = find_user(store.as_ref(), &user_id, FETCH_LOGS_FAILED).await?;

    let filter = query
        .into_filter(user.id)
        .or_persistence(FETCH_LOGS_FAILED)?;

    let exercises = store
        .fetch_exercises(filter.clone())
        .await
        .or_persistence(FETCH_LOGS_FAILED)?;

    Ok(Json(LogResponse::new(&user, &filter, &exercises)))
}
