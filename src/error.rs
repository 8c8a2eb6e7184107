use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures named by the publish / view / fetch contracts.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a room needs at least one link before it can be published")]
    EmptyRoom,

    #[error("could not determine the next room id: {0}")]
    IdAllocation(String),

    #[error("room not found")]
    RoomNotFound,

    #[error("All proxy attempts failed. Last error: {last}")]
    AllProxiesFailed { last: String },

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Fetch(#[from] reqwest::Error),
}

pub type AppResult<T> = Result<T, AppError>;

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<Error>() {
            Some(Error::RoomNotFound) => StatusCode::NOT_FOUND,
            Some(Error::EmptyRoom) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(Error::AllProxiesFailed { .. }) | Some(Error::Fetch(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self.0);
        }
        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
