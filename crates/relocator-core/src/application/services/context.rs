use crate::domain::Guid;

/// Who is asking, passed explicitly into every query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub session_id: String,
    pub user_id: Option<Guid>,
    user_is_admin: bool,
    /// Set when the engine itself runs the query on a user's behalf.
    pub internal_execution: bool,
}

impl ExecutionContext {
    /// A regular user session.
    pub fn user(session_id: impl Into<String>, user_id: Guid, is_admin: bool) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: Some(user_id),
            user_is_admin: is_admin,
            internal_execution: false,
        }
    }

    /// The engine acting for itself.
    pub fn internal() -> Self {
        Self {
            session_id: "internal".into(),
            user_id: None,
            user_is_admin: false,
            internal_execution: true,
        }
    }

    pub fn with_internal_execution(mut self, internal: bool) -> Self {
        self.internal_execution = internal;
        self
    }

    pub fn user_is_admin(&self) -> bool {
        self.user_is_admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_is_not_internal() {
        assert!(!ExecutionContext::default().internal_execution);
    }

    #[test]
    fn internal_flag_can_be_cleared() {
        let ctx = ExecutionContext::internal().with_internal_execution(false);
        assert!(!ctx.internal_execution);
        assert!(!ctx.user_is_admin());
    }
}
