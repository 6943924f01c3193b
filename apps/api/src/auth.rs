use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

/// Authenticated company identity, supplied by the upstream auth layer via
/// the `x-company-id` header. The core trusts the id once present and applies
/// no further authorization logic.
#[derive(Debug, Clone, Copy)]
pub struct CompanyId(pub Uuid);

const COMPANY_ID_HEADER: &str = "x-company-id";

#[async_trait]
impl<S> FromRequestParts<S> for CompanyId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(COMPANY_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let id = Uuid::parse_str(raw).map_err(|_| AppError::Unauthorized)?;
        Ok(CompanyId(id))
    }
}
