//! OpenAPI documentation, served at /api/openapi.json.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use courtly_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Courtly API",
        version = "0.1.0",
        description = "Multi-tenant booking API for organizations, locations, and bookable resources. Bookings are half-open intervals with storage-level overlap exclusion; access follows the organization hierarchy."
    ),
    paths(
        // Bookings
        handlers::bookings::create_booking,
        handlers::bookings::confirm_booking,
        handlers::bookings::cancel_booking,
        handlers::bookings::get_booking,
        handlers::bookings::list_bookings,
        // Catalog
        handlers::resources::create_resource_type,
        handlers::resources::create_resource,
        handlers::resources::update_resource,
        handlers::resources::get_resource,
        handlers::organizations::get_organization,
        handlers::organizations::get_location,
    ),
    components(
        schemas(
            models::Booking,
            models::BookingStatus,
            models::Organization,
            models::Location,
            models::Resource,
            models::ResourceType,
            models::Page<models::Booking>,
            handlers::bookings::CreateBookingRequest,
            handlers::resources::CreateResourceTypeRequest,
            handlers::resources::CreateResourceRequest,
            handlers::resources::UpdateResourceRequest,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "bookings", description = "Booking lifecycle"),
        (name = "catalog", description = "Organizations, locations, and resources")
    )
)]
pub struct ApiDoc;
