use crate::authors::AuthorService;
use crate::state::AppState;
use libcat_dal::author::AuthorRepository;
use libcat_dal::Order;

#[allow(unused_imports)]
use axum::routing::{get, post, put};

crate::repository_from_request!(AuthorRepository);
crate::repository_from_request!(AuthorService);

/// Fixed payload returned for both an empty collection and a failed query.
/// Callers must special-case this text; it is a product decision, not an
/// accident.
pub const NO_AUTHORS_FOUND: &str = "No authors found";

const SORT_FIELDS: &[&str] = &["family_name", "first_name"];

/// Picks the sort spec from raw query pairs of the form `<field>=1|-1`.
/// When several recognized pairs are present the last one wins; anything
/// unrecognized is ignored.
fn sort_from_query(query: Option<&str>) -> Option<Order> {
    let query = query?;
    let mut selected = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if !SORT_FIELDS.contains(&key.as_ref()) {
            continue;
        }
        match value.as_ref() {
            "1" => selected = Some(Order::Asc(key.into_owned())),
            "-1" => selected = Some(Order::Desc(key.into_owned())),
            _ => {}
        }
    }
    selected
}

mod api {
    use axum::extract::{Path, Query, RawQuery};
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use axum_valid::Garde;
    use http::StatusCode;
    use libcat_dal::author::{AuthorRepository, CreateAuthor};
    use libcat_dal::{Filter, Order};

    use super::{sort_from_query, NO_AUTHORS_FOUND};
    use crate::authors::AuthorService;
    use crate::error::ApiResult;

    /// Author listing. Responds 200 in every case: a JSON array of display
    /// strings, or the plain-text empty-state body for an empty collection
    /// and for a storage failure alike (the failure is logged, the client
    /// sees no difference).
    pub async fn list(service: AuthorService, RawQuery(query): RawQuery) -> Response {
        let order = sort_from_query(query.as_deref())
            .unwrap_or_else(|| Order::Asc("family_name".to_string()));
        match service.list(Some(order)).await {
            Ok(authors) if authors.is_empty() => {
                (StatusCode::OK, NO_AUTHORS_FOUND).into_response()
            }
            Ok(authors) => (StatusCode::OK, Json(authors)).into_response(),
            Err(error) => {
                tracing::error!("Error processing request: {error}");
                (StatusCode::OK, NO_AUTHORS_FOUND).into_response()
            }
        }
    }

    #[derive(Debug, serde::Deserialize)]
    pub struct CountParams {
        first_name: Option<String>,
        family_name: Option<String>,
        has_date_of_birth: Option<bool>,
        has_date_of_death: Option<bool>,
    }

    impl CountParams {
        fn into_filter(self) -> Filter {
            let mut filter = Filter::new();
            if let Some(value) = self.first_name {
                filter = filter.equals("first_name", value);
            }
            if let Some(value) = self.family_name {
                filter = filter.equals("family_name", value);
            }
            if let Some(present) = self.has_date_of_birth {
                filter = filter.exists("date_of_birth", present);
            }
            if let Some(present) = self.has_date_of_death {
                filter = filter.exists("date_of_death", present);
            }
            filter
        }
    }

    pub async fn count(
        service: AuthorService,
        Query(params): Query<CountParams>,
    ) -> ApiResult<impl IntoResponse> {
        let count = service.count(&params.into_filter()).await?;
        Ok((StatusCode::OK, Json(count)))
    }

    #[derive(Debug, serde::Deserialize)]
    pub struct FindParams {
        family_name: String,
        first_name: String,
    }

    pub async fn find(
        service: AuthorService,
        Query(params): Query<FindParams>,
    ) -> ApiResult<impl IntoResponse> {
        let id = service
            .find_id_by_name(&params.family_name, &params.first_name)
            .await?;
        // No match is a normal result, serialized as null
        Ok((StatusCode::OK, Json(id)))
    }

    pub async fn create(
        repository: AuthorRepository,
        Garde(Json(payload)): Garde<Json<CreateAuthor>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.create(payload).await?;
        Ok((StatusCode::CREATED, Json(record)))
    }

    pub async fn get(
        Path(id): Path<i64>,
        repository: AuthorRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get(id).await?;
        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn update(
        Path(id): Path<i64>,
        repository: AuthorRepository,
        Garde(Json(payload)): Garde<Json<CreateAuthor>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.update(id, payload).await?;
        Ok((StatusCode::OK, Json(record)))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(api::list).post(api::create))
        .route("/count", get(api::count))
        .route("/find", get(api::find))
        .route("/{id}", get(api::get).put(api::update))
}
