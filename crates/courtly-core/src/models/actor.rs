use std::collections::HashSet;
use uuid::Uuid;

/// Precomputed role facts for one authenticated user.
///
/// Loaded freshly per request from the identity tables - never cached across
/// requests, since memberships and manager assignments change between calls.
/// The access resolver works exclusively off these sets; it never queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_system_admin: bool,
    /// Organizations this user owns.
    pub owned_org_ids: HashSet<Uuid>,
    /// Organizations where this user is an organization manager.
    pub manager_of_org_ids: HashSet<Uuid>,
    /// Locations where this user is a location manager.
    pub manager_of_location_ids: HashSet<Uuid>,
    /// Organizations where this user holds a plain membership.
    pub member_of_org_ids: HashSet<Uuid>,
}

impl Actor {
    /// An actor with no roles beyond being authenticated.
    pub fn plain(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_system_admin: false,
            owned_org_ids: HashSet::new(),
            manager_of_org_ids: HashSet::new(),
            manager_of_location_ids: HashSet::new(),
            member_of_org_ids: HashSet::new(),
        }
    }
}
