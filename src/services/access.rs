use std::fmt;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::RequestContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewAction {
    Read,
    Update,
    Delete,
}

impl fmt::Display for InterviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            InterviewAction::Read => "read",
            InterviewAction::Update => "update",
            InterviewAction::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Which interviews a caller may list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewScope {
    All,
    OwnedBy(Uuid),
}

pub fn interview_scope(context: &RequestContext) -> InterviewScope {
    if context.is_admin() {
        InterviewScope::All
    } else {
        InterviewScope::OwnedBy(context.user_id)
    }
}

/// Owner or admin only
pub fn authorize_interview(
    context: &RequestContext,
    owner: Uuid,
    action: InterviewAction,
) -> Result<(), ApiError> {
    if context.user_id == owner || context.is_admin() {
        return Ok(());
    }

    tracing::debug!("User {} denied {} on interview owned by {}", context.user_id, action, owner);
    Err(ApiError::unauthorized(format!(
        "User {} is not authorized to {} this interview",
        context.user_id, action
    )))
}
