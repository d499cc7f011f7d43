use crate::{
    api::envelope::{ListQueryResult, PagedQueryResult, QueryResult},
    data::student::{SaveStudent, Student},
    error::{ApiError, IdMismatchSnafu, MissingStudentSnafu},
    state::AppState,
    store::{PageQuery, StudentStore},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use snafu::OptionExt;

pub mod envelope;

type ApiResult<T> = Result<T, ApiError>;

/// The REST surface, nested under `/api/v1` by the caller.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(get_students).post(post_student))
        .route("/students/paged", get(get_students_paged))
        .route(
            "/students/{id}",
            get(get_student).put(put_student).delete(delete_student),
        )
}

#[axum::debug_handler]
async fn get_students(State(state): State<AppState>) -> ApiResult<Json<ListQueryResult<Student>>> {
    info!("Listing all students");
    let students = state.store().list().await?;
    Ok(Json(ListQueryResult::success(students)))
}

#[axum::debug_handler]
async fn get_students_paged(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PagedQueryResult<Student>>> {
    info!(page = query.page, page_size = query.page_size, "Listing students by page");
    let page = state.store().page(query).await?;
    Ok(Json(PagedQueryResult::from(page)))
}

#[axum::debug_handler]
async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<QueryResult<Student>>> {
    info!(id, "Getting student");
    let student = state
        .store()
        .get(id)
        .await?
        .context(MissingStudentSnafu { id })?;
    Ok(Json(QueryResult::success(student)))
}

#[axum::debug_handler]
async fn post_student(
    State(state): State<AppState>,
    Json(payload): Json<SaveStudent>,
) -> ApiResult<(StatusCode, Json<QueryResult<Student>>)> {
    // a client-supplied id on create carries no meaning
    let draft = payload.validate()?;

    let created = state.store().create(draft).await?;
    info!(id = created.id, "Student successfully created");
    Ok((StatusCode::CREATED, Json(QueryResult::success(created))))
}

#[axum::debug_handler]
async fn put_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SaveStudent>,
) -> ApiResult<Json<QueryResult<Student>>> {
    if let Some(body_id) = payload.id {
        snafu::ensure!(
            body_id == id,
            IdMismatchSnafu {
                path_id: id,
                body_id
            }
        );
    }
    snafu::ensure!(
        state.store().exists(id).await?,
        MissingStudentSnafu { id }
    );

    let draft = payload.validate()?;
    let updated = state
        .store()
        .update(id, draft)
        .await?
        .context(MissingStudentSnafu { id })?;

    info!(id, "Student successfully updated");
    Ok(Json(QueryResult::success(updated)))
}

#[axum::debug_handler]
async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<QueryResult<Student>>> {
    let deleted = state
        .store()
        .delete(id)
        .await?
        .context(MissingStudentSnafu { id })?;

    info!(id, "Student successfully deleted");
    Ok(Json(QueryResult::success(deleted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_router() -> Router {
        router().with_state(AppState::in_memory())
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn ada() -> Value {
        json!({
            "name": "Ada Lovelace",
            "gender": "F",
            "bloodGroup": "O+",
            "address": {"street": "1 Main", "city": "London", "country": "UK"}
        })
    }

    #[tokio::test]
    async fn create_assigns_id_and_echoes_fields() {
        let router = test_router();
        let (status, body) = send(&router, "POST", "/students", Some(ada())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));

        let resource = &body["resource"];
        assert!(resource["id"].as_i64().unwrap() > 0);
        assert_eq!(resource["name"], json!("Ada Lovelace"));
        assert_eq!(resource["gender"], json!("F"));
        assert_eq!(resource["bloodGroup"], json!("O+"));
        assert_eq!(resource["address"]["street"], json!("1 Main"));
        assert_eq!(resource["address"]["city"], json!("London"));
        assert_eq!(resource["address"]["country"], json!("UK"));
        assert_eq!(resource["email"], Value::Null);
        assert_eq!(resource["phone"], Value::Null);
    }

    #[tokio::test]
    async fn create_ignores_client_supplied_id() {
        let router = test_router();
        let mut payload = ada();
        payload["id"] = json!(777);

        let (status, body) = send(&router, "POST", "/students", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["resource"]["id"], json!(1));
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/students", Some(ada())).await;
        let id = created["resource"]["id"].as_i64().unwrap();

        let (status, fetched) = send(&router, "GET", &format!("/students/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["resource"], created["resource"]);
    }

    #[tokio::test]
    async fn list_after_three_creates_is_set_equal() {
        let router = test_router();
        for name in ["Ada Lovelace", "Grace Hopper", "Radia Perlman"] {
            let mut payload = ada();
            payload["name"] = json!(name);
            let (status, _) = send(&router, "POST", "/students", Some(payload)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&router, "GET", "/students", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["totalCount"], json!(3));

        let mut names: Vec<&str> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper", "Radia Perlman"]);
    }

    #[tokio::test]
    async fn get_of_unknown_id_is_not_found() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/students/999", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["resource"], Value::Null);
        assert!(!body["messages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_with_missing_required_fields_persists_nothing() {
        let router = test_router();
        let (status, body) = send(
            &router,
            "POST",
            "/students",
            Some(json!({"email": "ada@example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        let messages = body["messages"].as_array().unwrap();
        assert!(messages.contains(&json!("name is required")));
        assert!(messages.contains(&json!("bloodGroup is required")));

        let (_, list) = send(&router, "GET", "/students", None).await;
        assert_eq!(list["totalCount"], json!(0));
    }

    #[tokio::test]
    async fn update_replaces_every_mutable_field() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/students", Some(ada())).await;
        let id = created["resource"]["id"].as_i64().unwrap();

        let replacement = json!({
            "id": id,
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "phone": "+1 555 0100",
            "gender": "F",
            "bloodGroup": "AB-",
            "address": {"street": "90 Church St", "city": "New York", "state": "NY", "country": "USA"}
        });
        let (status, updated) =
            send(&router, "PUT", &format!("/students/{id}"), Some(replacement)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["resource"]["name"], json!("Grace Hopper"));

        let (_, fetched) = send(&router, "GET", &format!("/students/{id}"), None).await;
        let resource = &fetched["resource"];
        assert_eq!(resource["id"], json!(id));
        assert_eq!(resource["email"], json!("grace@example.com"));
        assert_eq!(resource["phone"], json!("+1 555 0100"));
        assert_eq!(resource["bloodGroup"], json!("AB-"));
        assert_eq!(resource["address"]["state"], json!("NY"));
        assert_eq!(resource["address"]["country"], json!("USA"));
    }

    #[tokio::test]
    async fn update_with_id_mismatch_mutates_nothing() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/students", Some(ada())).await;
        let id = created["resource"]["id"].as_i64().unwrap();

        let mut payload = ada();
        payload["id"] = json!(id + 1);
        payload["name"] = json!("Somebody Else");

        let (status, body) = send(&router, "PUT", &format!("/students/{id}"), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));

        let (_, fetched) = send(&router, "GET", &format!("/students/{id}"), None).await;
        assert_eq!(fetched["resource"]["name"], json!("Ada Lovelace"));
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let router = test_router();
        let (status, body) = send(&router, "PUT", "/students/41", Some(ada())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn missing_record_takes_precedence_over_validation() {
        let router = test_router();
        let (status, _) = send(&router, "PUT", "/students/41", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_returns_the_record_then_not_found() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/students", Some(ada())).await;
        let id = created["resource"]["id"].as_i64().unwrap();

        let (status, deleted) = send(&router, "DELETE", &format!("/students/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["resource"], created["resource"]);

        let (second, _) = send(&router, "DELETE", &format!("/students/{id}"), None).await;
        assert_eq!(second, StatusCode::NOT_FOUND);

        let (gone, _) = send(&router, "GET", &format!("/students/{id}"), None).await;
        assert_eq!(gone, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn paged_listing_reports_page_shape() {
        let router = test_router();
        for i in 0..12 {
            let mut payload = ada();
            payload["name"] = json!(format!("Student {i}"));
            send(&router, "POST", "/students", Some(payload)).await;
        }

        let (status, body) = send(&router, "GET", "/students/paged?page=2&pageSize=5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pageIndex"], json!(2));
        assert_eq!(body["pageSize"], json!(5));
        assert_eq!(body["totalCount"], json!(12));
        assert_eq!(body["totalPages"], json!(3));
        assert_eq!(body["hasPreviousPage"], json!(true));
        assert_eq!(body["hasNextPage"], json!(true));
        assert_eq!(body["items"].as_array().unwrap().len(), 5);

        let (_, defaults) = send(&router, "GET", "/students/paged", None).await;
        assert_eq!(defaults["pageIndex"], json!(1));
        assert_eq!(defaults["pageSize"], json!(10));
    }
}
