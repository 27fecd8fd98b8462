//! # Error Crate Tests
//!
//! Tests for error variants, status mapping and payloads.

#[cfg(test)]
mod error_status_mapping_tests {
    use error::AppError;

    #[test]
    fn test_all_status_codes() {
        let cases = vec![
            (AppError::not_found("x"), 404),
            (AppError::bad_request("x"), 400),
            (AppError::unauthorized("x"), 401),
            (AppError::forbidden("x"), 403),
            (AppError::conflict("x"), 409),
            (AppError::validation("x"), 422),
            (AppError::internal("x"), 500),
            (AppError::database("x"), 500),
            (AppError::config("x"), 500),
            (AppError::cycle_detected(uuid::Uuid::nil()), 500),
        ];

        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "unexpected status for {}", err);
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            AppError::not_found("x"),
            AppError::bad_request("x"),
            AppError::unauthorized("x"),
            AppError::forbidden("x"),
            AppError::conflict("x"),
            AppError::validation("x"),
            AppError::internal("x"),
            AppError::database("x"),
            AppError::config("x"),
            AppError::cycle_detected(uuid::Uuid::nil()),
        ];
        let codes: std::collections::HashSet<&str> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }
}

#[cfg(test)]
mod error_body_tests {
    use error::AppError;

    #[test]
    fn test_body_serializes() {
        let body = AppError::forbidden("Missing permission class:create").to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], 403);
        assert_eq!(json["code"], "FORBIDDEN");
        assert_eq!(json["message"], "Missing permission class:create");
    }
}
