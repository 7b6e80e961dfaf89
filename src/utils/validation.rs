use axum::{http::StatusCode, Json};
use serde_json::json;
use validator::ValidationErrors;

pub fn into_response(errors: ValidationErrors) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(range(min = 0))]
        population: i32,
    }

    #[test]
    fn maps_validation_errors_to_bad_request() {
        let errors = Payload { population: -1 }.validate().unwrap_err();
        let (status, body) = into_response(errors);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.0.get("errors").is_some());
    }
}
