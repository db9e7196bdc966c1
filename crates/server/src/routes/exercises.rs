use axum::{extract::Path, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use shared::{
    api::{
        error::{ServerError, ServerErrorContext},
        payloads::{ExerciseResponse, NewExercisePayload},
    },
    model::ValidateModel,
};
use tracing::{info, instrument};

use super::find_user;
use crate::{extract::FormOrJson, store::Storage};

const SAVE_EXERCISE_FAILED: &str = "Failed to save exercise";

#[instrument(skip(store))]
pub async fn log_exercise(
    Storage(store): Storage,
    WithRejection(Path(user_id), _): WithRejection<Path<String>, ServerError>,
    FormOrJson(payload): FormOrJson<NewExercisePayload>,
) -> Result<(StatusCode, Json<ExerciseResponse>), ServerError> {
    // Missing fields are reported before the user lookup
    let fields = payload.validate()?;

    let user = find_user(store.as_ref(), &user_id, SAVE_EXERCISE_FAILED).await?;

    let new_exercise = fields
        .into_new_exercise(&user, Utc::now())
        .or_persistence(SAVE_EXERCISE_FAILED)?;

    let exercise = store
        .create_exercise(new_exercise)
        .await
        .or_persistence(SAVE_EXERCISE_FAILED)?;
    info!(id = %exercise.id, user_id = %exercise.user_id, "Logged exercise");

    Ok((StatusCode::CREATED, Json(ExerciseResponse::from(&exercise))))
}
