use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use shared::api::error::ServerError;

/// Body extractor accepting either `application/json` or
/// `application/x-www-form-urlencoded`, picked by the `Content-Type` header.
/// Any other content type is rejected by the form decoder
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .map_or(false, |m| m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
}

#[async_trait]
impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(FormOrJson(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(FormOrJson(value))
        }
    }
}
