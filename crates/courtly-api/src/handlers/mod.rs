pub mod bookings;
pub mod organizations;
pub mod resources;
