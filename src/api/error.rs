//! Domain-to-HTTP error mapping

use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler's `Result`.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Map a domain error to its HTTP status and the standard error envelope.
pub fn domain_error(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Gateway(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(ApiResponse::error(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_variants() {
        let (s, _) = domain_error(DomainError::Validation("x".into()));
        assert_eq!(s, StatusCode::BAD_REQUEST);

        let (s, _) = domain_error(DomainError::NotFound {
            entity: "Trip",
            field: "id",
            value: "1".into(),
        });
        assert_eq!(s, StatusCode::NOT_FOUND);

        let (s, _) = domain_error(DomainError::Conflict("x".into()));
        assert_eq!(s, StatusCode::CONFLICT);

        let (s, _) = domain_error(DomainError::Unauthorized("x".into()));
        assert_eq!(s, StatusCode::UNAUTHORIZED);

        let (s, _) = domain_error(DomainError::Gateway("x".into()));
        assert_eq!(s, StatusCode::BAD_GATEWAY);
    }
}
