//! Application state shared across handlers.

use std::sync::Arc;

use courtly_core::{Config, RoleFactsStore};
use courtly_db::{BookingRepository, CatalogRepository, RoleFactsRepository};
use courtly_services::{BookingScheduler, CatalogService};
use sqlx::PgPool;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub roles: Arc<dyn RoleFactsStore>,
    pub scheduler: BookingScheduler,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Arc<Self> {
        let catalog_repo = Arc::new(CatalogRepository::new(pool.clone()));
        let booking_repo = Arc::new(BookingRepository::new(pool.clone()));
        let roles: Arc<dyn RoleFactsStore> = Arc::new(RoleFactsRepository::new(pool.clone()));

        let scheduler = BookingScheduler::new(catalog_repo.clone(), booking_repo);
        let catalog = CatalogService::new(catalog_repo);

        Arc::new(Self {
            pool,
            config,
            roles,
            scheduler,
            catalog,
        })
    }
}
