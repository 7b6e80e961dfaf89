use super::repository;
use crate::{types::Context, utils};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct CreateCityPayload {
    name: String,
    countrycode: String,
    district: String,
    #[validate(range(min = 0, message = "population must not be negative"))]
    population: i32,
}

#[derive(Deserialize, Validate)]
pub struct UpdateCityPayload {
    #[validate(range(min = 0, message = "population must not be negative"))]
    population: i32,
}

async fn get_by_name(
    Path(name): Path<String>,
    State(ctx): State<Arc<Context>>,
) -> impl IntoResponse {
    match repository::find_many_by_name(&ctx.db_conn.pool, &name).await {
        Ok(cities) => {
            // The emptiness check happens on the raw result set, before the
            // rows are reduced to their public projection.
            if cities.is_empty() {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "CityNotFound" })),
                );
            }

            let listings = cities
                .into_iter()
                .map(repository::CityListing::from)
                .collect::<Vec<_>>();

            (StatusCode::OK, Json(json!(listings)))
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch cities" })),
        ),
    }
}

async fn create(
    State(ctx): State<Arc<Context>>,
    Json(payload): Json<CreateCityPayload>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return utils::validation::into_response(errors);
    }

    match repository::create(
        &ctx.db_conn.pool,
        repository::CreateCityPayload {
            name: payload.name,
            countrycode: payload.countrycode,
            district: payload.district,
            population: payload.population,
        },
    )
    .await
    {
        Ok(city) => (StatusCode::OK, Json(json!(city))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to create city" })),
        ),
    }
}

async fn update_by_name(
    Path(name): Path<String>,
    State(ctx): State<Arc<Context>>,
    Json(payload): Json<UpdateCityPayload>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return utils::validation::into_response(errors);
    }

    if repository::update_population_by_name(&ctx.db_conn.pool, &name, payload.population)
        .await
        .is_err()
    {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to update city" })),
        );
    }

    // A second, independent lookup decides between 200 and 404: when the
    // update matched zero rows this also comes back empty.
    match repository::find_many_by_name(&ctx.db_conn.pool, &name).await {
        Ok(cities) => {
            if cities.is_empty() {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "CityNotFound" })),
                );
            }

            (StatusCode::OK, Json(json!(cities)))
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch cities" })),
        ),
    }
}

async fn delete_by_name(
    Path(name): Path<String>,
    State(ctx): State<Arc<Context>>,
) -> impl IntoResponse {
    match repository::delete_many_by_name(&ctx.db_conn.pool, &name).await {
        Ok(deleted) if deleted > 0 => (StatusCode::OK, Json(json!({ "successful": true }))),
        Ok(_) => (StatusCode::NOT_FOUND, Json(json!({ "successful": false }))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to delete city" })),
        ),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", post(create)).route(
        "/:name",
        get(get_by_name).put(update_by_name).delete(delete_by_name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_accepts_lowercase_body_fields() {
        let payload = serde_json::from_value::<CreateCityPayload>(json!({
            "name": "Testville",
            "countrycode": "TST",
            "district": "Test",
            "population": 100
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.population, 100);
    }

    #[test]
    fn create_payload_rejects_non_numeric_population() {
        let result = serde_json::from_value::<CreateCityPayload>(json!({
            "name": "Testville",
            "countrycode": "TST",
            "district": "Test",
            "population": "a lot"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn negative_population_fails_validation() {
        let payload = serde_json::from_value::<CreateCityPayload>(json!({
            "name": "Testville",
            "countrycode": "TST",
            "district": "Test",
            "population": -5
        }))
        .unwrap();

        assert!(payload.validate().is_err());
    }

    #[test]
    fn zero_population_passes_validation() {
        let payload = serde_json::from_value::<UpdateCityPayload>(json!({ "population": 0 })).unwrap();

        assert!(payload.validate().is_ok());
    }
}
