//! Request router.
//!
//! The API has one collection and its members:
//!
//! ```text
//! GET    /calculations        ListCalculations
//! POST   /calculations        CreateCalculation
//! GET    /calculations/{id}   GetCalculation
//! PATCH  /calculations/{id}   UpdateCalculation
//! DELETE /calculations/{id}   DeleteCalculation
//! ```
//!
//! A single trailing slash is tolerated. Unknown paths are `NotFound`; a known
//! path with an unsupported method is `MethodNotAllowed`.

use calcstack_model::error::CalcError;
use calcstack_model::operations::CalcOperation;

/// Path of the calculations collection.
pub const COLLECTION_PATH: &str = "/calculations";

/// Methods accepted on the collection path.
pub const COLLECTION_METHODS: &str = "GET, POST, OPTIONS";

/// Methods accepted on a member path.
pub const MEMBER_METHODS: &str = "GET, PATCH, DELETE, OPTIONS";

/// A routed request: the operation and, for member paths, the record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedRequest {
    /// Resolved operation.
    pub operation: CalcOperation,
    /// Record id for member operations.
    pub id: Option<String>,
}

/// Resolve the operation for a method and path.
pub fn resolve_route(method: &http::Method, path: &str) -> Result<RoutedRequest, CalcError> {
    let normalized = match path.strip_suffix('/') {
        Some(p) if !p.is_empty() => p,
        _ => path,
    };

    let rest = normalized
        .strip_prefix(COLLECTION_PATH)
        .ok_or_else(|| CalcError::route_not_found(path))?;

    if rest.is_empty() {
        let operation = match *method {
            http::Method::GET => CalcOperation::ListCalculations,
            http::Method::POST => CalcOperation::CreateCalculation,
            _ => return Err(CalcError::method_not_allowed(method, path)),
        };
        return Ok(RoutedRequest {
            operation,
            id: None,
        });
    }

    let id = rest
        .strip_prefix('/')
        .filter(|id| !id.is_empty() && !id.contains('/'))
        .ok_or_else(|| CalcError::route_not_found(path))?;

    let operation = match *method {
        http::Method::GET => CalcOperation::GetCalculation,
        http::Method::PATCH => CalcOperation::UpdateCalculation,
        http::Method::DELETE => CalcOperation::DeleteCalculation,
        _ => return Err(CalcError::method_not_allowed(method, path)),
    };
    Ok(RoutedRequest {
        operation,
        id: Some(id.to_owned()),
    })
}

/// Methods allowed on `path`, for the `allow` header of `405` responses.
#[must_use]
pub fn allowed_methods(path: &str) -> &'static str {
    if path.trim_end_matches('/') == COLLECTION_PATH {
        COLLECTION_METHODS
    } else {
        MEMBER_METHODS
    }
}

#[cfg(test)]
mod tests {
    use calcstack_model::error::CalcErrorCode;

    use super::*;

    #[test]
    fn test_should_resolve_all_operations() {
        let routes = [
            (http::Method::GET, "/calculations", CalcOperation::ListCalculations, None),
            (http::Method::POST, "/calculations", CalcOperation::CreateCalculation, None),
            (http::Method::GET, "/calculations/", CalcOperation::ListCalculations, None),
            (http::Method::GET, "/calculations/a1", CalcOperation::GetCalculation, Some("a1")),
            (http::Method::PATCH, "/calculations/a1", CalcOperation::UpdateCalculation, Some("a1")),
            (http::Method::DELETE, "/calculations/a1/", CalcOperation::DeleteCalculation, Some("a1")),
        ];
        for (method, path, expected, id) in routes {
            let routed = resolve_route(&method, path).unwrap();
            assert_eq!(routed.operation, expected, "failed for {method} {path}");
            assert_eq!(routed.id.as_deref(), id);
        }
    }

    #[test]
    fn test_should_error_on_unknown_path() {
        for path in ["/", "/calc", "/calculationsX", "/calculations/a/b", "/calculations//"] {
            let err = resolve_route(&http::Method::GET, path).unwrap_err();
            assert_eq!(err.code, CalcErrorCode::NotFound, "failed for {path}");
        }
    }

    #[test]
    fn test_should_error_on_wrong_method() {
        let err = resolve_route(&http::Method::PUT, "/calculations").unwrap_err();
        assert_eq!(err.code, CalcErrorCode::MethodNotAllowed);
        let err = resolve_route(&http::Method::POST, "/calculations/a1").unwrap_err();
        assert_eq!(err.code, CalcErrorCode::MethodNotAllowed);
        assert_eq!(err.status_code, http::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_should_list_allowed_methods() {
        assert_eq!(allowed_methods("/calculations"), COLLECTION_METHODS);
        assert_eq!(allowed_methods("/calculations/x"), MEMBER_METHODS);
    }
}
