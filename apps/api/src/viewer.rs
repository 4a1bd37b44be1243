//! Request identity.
//!
//! Authentication happens upstream; the gateway forwards the signed-in
//! profile id in `X-Viewer-Id`. The extractor resolves it to a role.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRole, ProfileRow};
use crate::state::AppState;

pub const VIEWER_HEADER: &str = "x-viewer-id";

/// What a request wants to do with a student's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    /// Writes a student may make to their own records (goals, applications, uploads).
    OwnerWrite,
    /// Coaching records only staff may write (reviews, interviews, office hours).
    StaffWrite,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    pub id: Uuid,
    pub role: ProfileRole,
    pub full_name: String,
}

impl Viewer {
    pub fn is_staff(&self) -> bool {
        self.role == ProfileRole::Staff
    }

    pub fn authorize(&self, student_id: Uuid, access: Access) -> Result<(), AppError> {
        if is_permitted(self.role, self.id, student_id, access) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn is_permitted(role: ProfileRole, viewer_id: Uuid, student_id: Uuid, access: Access) -> bool {
    match (role, access) {
        (ProfileRole::Staff, _) => true,
        (ProfileRole::Student, Access::StaffWrite) => false,
        (ProfileRole::Student, Access::Read | Access::OwnerWrite) => viewer_id == student_id,
    }
}

fn parse_viewer_header(parts: &Parts) -> Result<Uuid, AppError> {
    let raw = parts
        .headers
        .get(VIEWER_HEADER)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Unauthorized)
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = parse_viewer_header(parts)?;

        let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(Viewer {
            id: profile.id,
            role: profile.role,
            full_name: profile.full_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_staff_may_do_anything() {
        let staff = Uuid::new_v4();
        let student = Uuid::new_v4();
        for access in [Access::Read, Access::OwnerWrite, Access::StaffWrite] {
            assert!(is_permitted(ProfileRole::Staff, staff, student, access));
        }
    }

    #[test]
    fn test_student_limited_to_own_records() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(is_permitted(ProfileRole::Student, me, me, Access::Read));
        assert!(is_permitted(ProfileRole::Student, me, me, Access::OwnerWrite));
        assert!(!is_permitted(ProfileRole::Student, me, me, Access::StaffWrite));
        assert!(!is_permitted(ProfileRole::Student, me, other, Access::Read));
    }

    #[test]
    fn test_missing_or_malformed_header_is_unauthorized() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(matches!(parse_viewer_header(&parts), Err(AppError::Unauthorized)));

        let (parts, _) = Request::builder()
            .header(VIEWER_HEADER, "not-a-uuid")
            .body(())
            .unwrap()
            .into_parts();
        assert!(matches!(parse_viewer_header(&parts), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_header_parsed() {
        let id = Uuid::new_v4();
        let (parts, _) = Request::builder()
            .header(VIEWER_HEADER, id.to_string())
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(parse_viewer_header(&parts).unwrap(), id);
    }
}
