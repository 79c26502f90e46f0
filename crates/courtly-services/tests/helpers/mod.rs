//! In-memory store doubles for scheduler tests.
//!
//! `MemoryStore` honors the same contracts as the Postgres repositories: a
//! single mutex serializes check-and-insert, so concurrent overlapping
//! creations see exactly the at-most-one-succeeds behavior the exclusion
//! constraint provides in production.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use courtly_core::models::{
    Actor, Booking, BookingFilter, BookingStatus, Location, NewBooking, NewResource, Organization,
    Page, Resource, ResourcePath, ResourceType, ResourceUpdate, Visibility,
};
use courtly_core::{AppError, BookingStore, CatalogStore};

#[derive(Default)]
struct State {
    organizations: HashMap<Uuid, Organization>,
    locations: HashMap<Uuid, Location>,
    resource_types: HashMap<Uuid, ResourceType>,
    resources: HashMap<Uuid, Resource>,
    bookings: HashMap<Uuid, Booking>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn insert_organization(&self, org: Organization) {
        self.state.lock().unwrap().organizations.insert(org.id, org);
    }

    pub fn insert_location(&self, location: Location) {
        self.state.lock().unwrap().locations.insert(location.id, location);
    }

    pub fn insert_resource_type(&self, rt: ResourceType) {
        self.state.lock().unwrap().resource_types.insert(rt.id, rt);
    }

    pub fn insert_resource(&self, resource: Resource) {
        self.state.lock().unwrap().resources.insert(resource.id, resource);
    }

    pub fn booking_status(&self, id: Uuid) -> Option<BookingStatus> {
        self.state.lock().unwrap().bookings.get(&id).map(|b| b.status)
    }

    pub fn get_organization_unchecked(&self, id: Uuid) -> Organization {
        self.state.lock().unwrap().organizations[&id].clone()
    }

    pub fn get_location_unchecked(&self, id: Uuid) -> Location {
        self.state.lock().unwrap().locations[&id].clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        Ok(self.state.lock().unwrap().organizations.get(&id).cloned())
    }

    async fn get_location(&self, id: Uuid) -> Result<Option<Location>, AppError> {
        Ok(self.state.lock().unwrap().locations.get(&id).cloned())
    }

    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>, AppError> {
        Ok(self.state.lock().unwrap().resources.get(&id).cloned())
    }

    async fn get_resource_type(&self, id: Uuid) -> Result<Option<ResourceType>, AppError> {
        Ok(self.state.lock().unwrap().resource_types.get(&id).cloned())
    }

    async fn resolve_resource_path(
        &self,
        resource_id: Uuid,
    ) -> Result<Option<ResourcePath>, AppError> {
        let state = self.state.lock().unwrap();
        let Some(resource) = state.resources.get(&resource_id).cloned() else {
            return Ok(None);
        };
        let location = state
            .locations
            .get(&resource.location_id)
            .cloned()
            .ok_or_else(|| AppError::Internal("dangling location reference".to_string()))?;
        let organization = state
            .organizations
            .get(&location.organization_id)
            .cloned()
            .ok_or_else(|| AppError::Internal("dangling organization reference".to_string()))?;
        Ok(Some(ResourcePath {
            resource,
            location,
            organization,
        }))
    }

    async fn create_resource_type(
        &self,
        organization_id: Uuid,
        name: &str,
    ) -> Result<ResourceType, AppError> {
        let rt = ResourceType {
            id: Uuid::new_v4(),
            organization_id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state
            .lock()
            .unwrap()
            .resource_types
            .insert(rt.id, rt.clone());
        Ok(rt)
    }

    async fn create_resource(&self, new: NewResource) -> Result<Resource, AppError> {
        let mut state = self.state.lock().unwrap();
        let organization_id = state
            .locations
            .get(&new.location_id)
            .map(|l| l.organization_id)
            .ok_or_else(|| AppError::NotFound(format!("location {} not found", new.location_id)))?;
        let resource = Resource {
            id: Uuid::new_v4(),
            location_id: new.location_id,
            organization_id,
            resource_type_id: new.resource_type_id,
            name: new.name,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.resources.insert(resource.id, resource.clone());
        Ok(resource)
    }

    async fn update_resource(
        &self,
        id: Uuid,
        update: ResourceUpdate,
    ) -> Result<Option<Resource>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(resource) = state.resources.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            resource.name = name;
        }
        if let Some(rt) = update.resource_type_id {
            resource.resource_type_id = rt;
        }
        if let Some(active) = update.is_active {
            resource.is_active = active;
        }
        resource.updated_at = Utc::now();
        Ok(Some(resource.clone()))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn create_pending(&self, new: NewBooking) -> Result<Booking, AppError> {
        // The lock spans check and insert, like the DB transaction plus
        // exclusion constraint.
        let mut state = self.state.lock().unwrap();
        let overlap = state.bookings.values().any(|b| {
            b.resource_id == new.resource_id
                && b.status.blocks_slot()
                && b.overlaps(new.start_time, new.end_time)
        });
        if overlap {
            return Err(AppError::Conflict(
                "interval overlaps an existing booking on this resource".to_string(),
            ));
        }
        let booking = Booking {
            id: Uuid::new_v4(),
            resource_id: new.resource_id,
            user_id: new.user_id,
            start_time: new.start_time,
            end_time: new.end_time,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        Ok(self.state.lock().unwrap().bookings.get(&id).cloned())
    }

    async fn has_conflict(
        &self,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.bookings.values().any(|b| {
            b.resource_id == resource_id
                && Some(b.id) != exclude_booking_id
                && b.status.blocks_slot()
                && b.overlaps(start, end)
        }))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<Booking, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(booking) = state.bookings.get_mut(&id) else {
            return Err(AppError::NotFound(format!("booking {} not found", id)));
        };
        if !from.contains(&booking.status) {
            return Err(AppError::InvalidTransition {
                from: booking.status,
                to,
            });
        }
        booking.status = to;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn list(
        &self,
        filter: &BookingFilter,
        visibility: &Visibility,
    ) -> Result<Page<Booking>, AppError> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| filter.resource_id.map_or(true, |r| b.resource_id == r))
            .filter(|b| filter.user_id.map_or(true, |u| b.user_id == u))
            .filter(|b| filter.from.map_or(true, |from| b.end_time > from))
            .filter(|b| filter.until.map_or(true, |until| b.start_time < until))
            .filter(|b| filter.status.map_or(true, |s| b.status == s))
            .filter(|b| match visibility {
                Visibility::All => true,
                Visibility::Scoped {
                    user_id,
                    org_ids,
                    location_ids,
                } => {
                    if b.user_id == *user_id {
                        return true;
                    }
                    state.resources.get(&b.resource_id).is_some_and(|r| {
                        org_ids.contains(&r.organization_id)
                            || location_ids.contains(&r.location_id)
                    })
                }
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(a.id.cmp(&b.id)));
        let total = items.len() as i64;
        let items: Vec<Booking> = items
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect();
        Ok(Page {
            items,
            total,
            limit: filter.limit(),
            offset: filter.offset(),
        })
    }
}

/// A seeded hierarchy: one active organization with two open locations
/// (08:00-22:00) and one resource at each.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub owner_id: Uuid,
    pub org_id: Uuid,
    pub location_a: Uuid,
    pub location_b: Uuid,
    pub resource_type_id: Uuid,
    pub resource_a: Uuid,
    pub resource_b: Uuid,
}

pub fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::default());
    let owner_id = Uuid::new_v4();
    let org_id = Uuid::new_v4();
    let location_a = Uuid::new_v4();
    let location_b = Uuid::new_v4();
    let resource_type_id = Uuid::new_v4();
    let resource_a = Uuid::new_v4();
    let resource_b = Uuid::new_v4();
    let now = Utc::now();

    store.insert_organization(Organization {
        id: org_id,
        owner_id,
        name: "Shuttle Club".to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    });
    for (location_id, name) in [(location_a, "North Hall"), (location_b, "South Hall")] {
        store.insert_location(Location {
            id: location_id,
            organization_id: org_id,
            name: name.to_string(),
            open_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            is_open: true,
            created_at: now,
            updated_at: now,
        });
    }
    store.insert_resource_type(ResourceType {
        id: resource_type_id,
        organization_id: org_id,
        name: "badminton court".to_string(),
        created_at: now,
        updated_at: now,
    });
    for (resource_id, location_id, name) in [
        (resource_a, location_a, "Court A1"),
        (resource_b, location_b, "Court B1"),
    ] {
        store.insert_resource(Resource {
            id: resource_id,
            location_id,
            organization_id: org_id,
            resource_type_id,
            name: name.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        });
    }

    Fixture {
        store,
        owner_id,
        org_id,
        location_a,
        location_b,
        resource_type_id,
        resource_a,
        resource_b,
    }
}

pub fn member() -> Actor {
    Actor::plain(Uuid::new_v4())
}

pub fn admin() -> Actor {
    let mut actor = Actor::plain(Uuid::new_v4());
    actor.is_system_admin = true;
    actor
}

pub fn org_owner(f: &Fixture) -> Actor {
    let mut actor = Actor::plain(f.owner_id);
    actor.owned_org_ids.insert(f.org_id);
    actor
}

pub fn org_manager(f: &Fixture) -> Actor {
    let mut actor = Actor::plain(Uuid::new_v4());
    actor.manager_of_org_ids.insert(f.org_id);
    actor.member_of_org_ids.insert(f.org_id);
    actor
}

pub fn location_manager(f: &Fixture, location_id: Uuid) -> Actor {
    let mut actor = Actor::plain(Uuid::new_v4());
    actor.manager_of_location_ids.insert(location_id);
    actor.member_of_org_ids.insert(f.org_id);
    actor
}

/// 2026-09-01 at the given hour/minute, UTC.
pub fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, h, m, 0).unwrap()
}
