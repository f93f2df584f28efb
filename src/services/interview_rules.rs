use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::middleware::RequestContext;

pub const MAX_INTERVIEWS_PER_USER: i64 = 3;

/// 2022-05-10T00:00:00.000Z
pub const WINDOW_START_MS: i64 = 1_652_140_800_000;
/// 2022-05-13T23:59:59.999Z
pub const WINDOW_END_MS: i64 = 1_652_486_399_999;

/// Non-admins may hold at most `MAX_INTERVIEWS_PER_USER` interviews
pub fn check_quota(context: &RequestContext, existing: i64) -> Result<(), ApiError> {
    if context.is_admin() || existing < MAX_INTERVIEWS_PER_USER {
        return Ok(());
    }

    Err(ApiError::quota_exceeded(format!(
        "The user with ID {} has already made {} interviews",
        context.user_id, MAX_INTERVIEWS_PER_USER
    )))
}

/// Inclusive on both ends, compared as instants
pub fn check_interview_date(date: &DateTime<Utc>) -> Result<(), ApiError> {
    let millis = date.timestamp_millis();
    if (WINDOW_START_MS..=WINDOW_END_MS).contains(&millis) {
        Ok(())
    } else {
        Err(ApiError::bad_request("Please choose a date during May 10th - 13th, 2022"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use uuid::Uuid;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn window_constants_match_calendar_bounds() {
        assert_eq!(at("2022-05-10T00:00:00.000Z").timestamp_millis(), WINDOW_START_MS);
        assert_eq!(at("2022-05-13T23:59:59.999Z").timestamp_millis(), WINDOW_END_MS);
    }

    #[test]
    fn window_boundaries() {
        assert!(check_interview_date(&at("2022-05-10T00:00:00.000+00:00")).is_ok());
        assert!(check_interview_date(&at("2022-05-09T23:59:59.999+00:00")).is_err());
        assert!(check_interview_date(&at("2022-05-13T23:59:59.999+00:00")).is_ok());
        assert!(check_interview_date(&at("2022-05-14T00:00:00.000+00:00")).is_err());
    }

    #[test]
    fn offsets_are_compared_as_instants() {
        // 06:59 on the 14th in Bangkok is still the 13th in UTC
        assert!(check_interview_date(&at("2022-05-14T06:59:59+07:00")).is_ok());
        assert!(check_interview_date(&at("2022-05-10T06:59:59+07:00")).is_err());
    }

    #[test]
    fn quota_blocks_fourth_interview_for_users() {
        let member = RequestContext { user_id: Uuid::new_v4(), role: Role::User };
        assert!(check_quota(&member, 2).is_ok());

        let err = check_quota(&member, 3).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.message(),
            format!("The user with ID {} has already made 3 interviews", member.user_id)
        );
    }

    #[test]
    fn admins_are_never_limited() {
        let admin = RequestContext { user_id: Uuid::new_v4(), role: Role::Admin };
        assert!(check_quota(&admin, 3).is_ok());
        assert!(check_quota(&admin, 100).is_ok());
    }
}
