//! Listing and retrieval visibility: own bookings, managed scopes, admin.

mod helpers;

use std::sync::Arc;

use courtly_core::models::{BookingFilter, BookingStatus};
use courtly_core::AppError;
use courtly_services::BookingScheduler;
use helpers::{admin, at, fixture, location_manager, member, org_owner, Fixture, MemoryStore};

fn scheduler(f: &Fixture) -> BookingScheduler {
    let catalog: Arc<MemoryStore> = f.store.clone();
    let bookings: Arc<MemoryStore> = f.store.clone();
    BookingScheduler::new(catalog, bookings)
}

#[tokio::test]
async fn members_see_only_their_own_bookings() {
    let f = fixture();
    let s = scheduler(&f);
    let alice = member();
    let bob = member();

    s.create_booking(&alice, f.resource_a, at(10, 0), at(11, 0))
        .await
        .unwrap();
    s.create_booking(&bob, f.resource_a, at(11, 0), at(12, 0))
        .await
        .unwrap();

    let page = s
        .list_bookings(&alice, &BookingFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].user_id, alice.user_id);
}

#[tokio::test]
async fn location_manager_sees_their_location_not_siblings() {
    let f = fixture();
    let s = scheduler(&f);
    let alice = member();
    let bob = member();

    s.create_booking(&alice, f.resource_a, at(10, 0), at(11, 0))
        .await
        .unwrap();
    s.create_booking(&bob, f.resource_b, at(10, 0), at(11, 0))
        .await
        .unwrap();

    let manager_a = location_manager(&f, f.location_a);
    let page = s
        .list_bookings(&manager_a, &BookingFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].resource_id, f.resource_a);
}

#[tokio::test]
async fn org_owner_and_admin_see_all_org_bookings() {
    let f = fixture();
    let s = scheduler(&f);

    s.create_booking(&member(), f.resource_a, at(10, 0), at(11, 0))
        .await
        .unwrap();
    s.create_booking(&member(), f.resource_b, at(10, 0), at(11, 0))
        .await
        .unwrap();

    for actor in [org_owner(&f), admin()] {
        let page = s
            .list_bookings(&actor, &BookingFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }
}

#[tokio::test]
async fn filters_narrow_by_status_and_time_range() {
    let f = fixture();
    let s = scheduler(&f);
    let alice = member();

    let a = s
        .create_booking(&alice, f.resource_a, at(10, 0), at(11, 0))
        .await
        .unwrap();
    s.create_booking(&alice, f.resource_a, at(12, 0), at(13, 0))
        .await
        .unwrap();
    s.confirm_booking(&org_owner(&f), a.id).await.unwrap();

    let confirmed_only = BookingFilter {
        status: Some(BookingStatus::Confirmed),
        ..Default::default()
    };
    let page = s.list_bookings(&alice, &confirmed_only).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, a.id);

    let morning = BookingFilter {
        from: Some(at(9, 0)),
        until: Some(at(11, 30)),
        ..Default::default()
    };
    let page = s.list_bookings(&alice, &morning).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, a.id);
}

#[tokio::test]
async fn pagination_slices_and_reports_total() {
    let f = fixture();
    let s = scheduler(&f);
    let alice = member();

    for i in 0..5 {
        s.create_booking(&alice, f.resource_a, at(8 + i, 0), at(9 + i, 0))
            .await
            .unwrap();
    }

    let filter = BookingFilter {
        limit: Some(2),
        offset: Some(2),
        ..Default::default()
    };
    let page = s.list_bookings(&alice, &filter).await.unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.limit, 2);
    assert_eq!(page.offset, 2);
}

#[tokio::test]
async fn invisible_booking_reads_as_not_found() {
    let f = fixture();
    let s = scheduler(&f);
    let alice = member();

    let booking = s
        .create_booking(&alice, f.resource_a, at(10, 0), at(11, 0))
        .await
        .unwrap();

    // A stranger cannot see it.
    let err = s.get_booking(&member(), booking.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // The author and the location manager can.
    assert!(s.get_booking(&alice, booking.id).await.is_ok());
    assert!(s
        .get_booking(&location_manager(&f, f.location_a), booking.id)
        .await
        .is_ok());
}
