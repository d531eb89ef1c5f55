use axum::response::{IntoResponse, Response};
use http::StatusCode;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Dal(#[from] libcat_dal::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Dal(libcat_dal::Error::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Dal(
                libcat_dal::Error::InvalidOrderByField(_)
                | libcat_dal::Error::InvalidFilterField(_)
                | libcat_dal::Error::InvalidDate(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::Dal(_) => {
                tracing::error!("Internal error: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
