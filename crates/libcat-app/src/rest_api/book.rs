use crate::state::AppState;
use libcat_dal::book::BookRepository;

#[allow(unused_imports)]
use axum::routing::{get, post};

crate::repository_from_request!(BookRepository);

mod api {
    use axum::extract::{Path, Query};
    use axum::response::IntoResponse;
    use axum::Json;
    use axum_valid::Garde;
    use http::StatusCode;
    use libcat_dal::book::{BookRepository, CreateBook};
    use libcat_dal::Order;

    use crate::error::ApiResult;

    pub async fn create(
        repository: BookRepository,
        Garde(Json(payload)): Garde<Json<CreateBook>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.create(payload).await?;
        Ok((StatusCode::CREATED, Json(record)))
    }

    pub async fn list(repository: BookRepository) -> ApiResult<impl IntoResponse> {
        let books = repository
            .list(Some(Order::Asc("title".to_string())))
            .await?;
        Ok((StatusCode::OK, Json(books)))
    }

    #[derive(Debug, serde::Deserialize)]
    pub struct ByAuthorParams {
        author_id: i64,
    }

    pub async fn list_by_author(
        repository: BookRepository,
        Query(params): Query<ByAuthorParams>,
    ) -> ApiResult<impl IntoResponse> {
        let books = repository.list_by_author(params.author_id).await?;
        Ok((StatusCode::OK, Json(books)))
    }

    pub async fn get(
        Path(id): Path<i64>,
        repository: BookRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get(id).await?;
        Ok((StatusCode::OK, Json(record)))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(api::list).post(api::create))
        .route("/by-author", get(api::list_by_author))
        .route("/{id}", get(api::get))
}
