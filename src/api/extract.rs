use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::models::MemberId;

/// HTTP header carrying the caller's identity from the identity provider
pub const MEMBER_ID_HEADER: &str = "x-member-id";

/// The acting member, taken from the `x-member-id` header
#[derive(Debug, Clone)]
pub struct Member(pub MemberId);

#[async_trait]
impl<S> FromRequestParts<S> for Member
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(MEMBER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Member(MemberId::from(id)))
            .ok_or_else(|| AppError::InvalidInput(format!("Missing {} header", MEMBER_ID_HEADER)))
    }
}
