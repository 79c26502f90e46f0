use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{Actor, BookingStatus};

/// Default and maximum page sizes for booking listings.
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

/// Filter for listing bookings. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookingFilter {
    pub resource_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    /// Only bookings ending after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only bookings starting before this instant.
    pub until: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl BookingFilter {
    /// Effective limit, clamped to `MAX_PAGE_SIZE`.
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Effective offset, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// One page of results with the total match count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// What slice of the booking table an actor may see.
///
/// Derived from role facts at request time: system admins see everything,
/// everyone else sees their own bookings plus all bookings under the
/// organizations they own or manage and the locations they manage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    All,
    Scoped {
        user_id: Uuid,
        org_ids: Vec<Uuid>,
        location_ids: Vec<Uuid>,
    },
}

impl Visibility {
    pub fn for_actor(actor: &Actor) -> Self {
        if actor.is_system_admin {
            return Visibility::All;
        }
        let mut org_ids: Vec<Uuid> = actor
            .owned_org_ids
            .iter()
            .chain(actor.manager_of_org_ids.iter())
            .copied()
            .collect();
        org_ids.sort();
        org_ids.dedup();
        let mut location_ids: Vec<Uuid> = actor.manager_of_location_ids.iter().copied().collect();
        location_ids.sort();
        Visibility::Scoped {
            user_id: actor.user_id,
            org_ids,
            location_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let filter = BookingFilter {
            limit: Some(100_000),
            ..Default::default()
        };
        assert_eq!(filter.limit(), MAX_PAGE_SIZE);

        let filter = BookingFilter {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.limit(), 1);

        let filter = BookingFilter::default();
        assert_eq!(filter.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_visibility_for_admin_is_all() {
        let mut actor = Actor::plain(Uuid::new_v4());
        actor.is_system_admin = true;
        assert_eq!(Visibility::for_actor(&actor), Visibility::All);
    }

    #[test]
    fn test_visibility_for_plain_member_is_own_bookings_only() {
        let actor = Actor::plain(Uuid::new_v4());
        match Visibility::for_actor(&actor) {
            Visibility::Scoped {
                user_id,
                org_ids,
                location_ids,
            } => {
                assert_eq!(user_id, actor.user_id);
                assert!(org_ids.is_empty());
                assert!(location_ids.is_empty());
            }
            Visibility::All => panic!("plain member must not see everything"),
        }
    }

    #[test]
    fn test_visibility_merges_owned_and_managed_orgs() {
        let org = Uuid::new_v4();
        let mut actor = Actor::plain(Uuid::new_v4());
        actor.owned_org_ids.insert(org);
        actor.manager_of_org_ids.insert(org);
        match Visibility::for_actor(&actor) {
            Visibility::Scoped { org_ids, .. } => assert_eq!(org_ids, vec![org]),
            Visibility::All => panic!("owner without admin flag must be scoped"),
        }
    }
}
