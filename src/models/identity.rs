use crate::models::{AdminModel, UserModel};

/// Which of the two account stores a token subject points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    User,
    Admin,
}

/// An authenticated account. Users and admins live in separate tables with
/// different shapes, so the authenticated principal carries the whole model
/// of whichever store it came from.
#[derive(Debug, Clone)]
pub enum Identity {
    User(UserModel),
    Admin(AdminModel),
}

impl Identity {
    pub fn id(&self) -> i32 {
        match self {
            Identity::User(u) => u.id,
            Identity::Admin(a) => a.id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Identity::User(u) => &u.username,
            Identity::Admin(a) => &a.username,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin(_))
    }

    pub fn kind(&self) -> IdentityKind {
        match self {
            Identity::User(_) => IdentityKind::User,
            Identity::Admin(_) => IdentityKind::Admin,
        }
    }

    /// Token subject, e.g. `user:42` or `admin:1`.
    pub fn subject(&self) -> String {
        format_subject(self.kind(), self.id())
    }
}

pub fn format_subject(kind: IdentityKind, id: i32) -> String {
    match kind {
        IdentityKind::User => format!("user:{id}"),
        IdentityKind::Admin => format!("admin:{id}"),
    }
}

/// Parse a token subject back into its store and id.
pub fn parse_subject(sub: &str) -> Option<(IdentityKind, i32)> {
    let (kind, id) = sub.split_once(':')?;
    let id: i32 = id.parse().ok()?;
    match kind {
        "user" => Some((IdentityKind::User, id)),
        "admin" => Some((IdentityKind::Admin, id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_round_trips_for_both_kinds() {
        assert_eq!(
            parse_subject(&format_subject(IdentityKind::User, 42)),
            Some((IdentityKind::User, 42))
        );
        assert_eq!(
            parse_subject(&format_subject(IdentityKind::Admin, 1)),
            Some((IdentityKind::Admin, 1))
        );
    }

    #[test]
    fn unknown_or_malformed_subjects_are_rejected() {
        assert_eq!(parse_subject("moderator:1"), None);
        assert_eq!(parse_subject("user:abc"), None);
        assert_eq!(parse_subject("42"), None);
        assert_eq!(parse_subject(""), None);
    }
}
