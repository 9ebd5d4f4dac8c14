//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use libhub_auth::JwtDecoder;
use libhub_core::config::AppConfig;
use libhub_core::result::AppResult;
use libhub_core::traits::{BlobStorage, Clock};
use libhub_database::LibraryStore;
use libhub_service::borrow::ReminderNotifier;
use libhub_service::{
    AnalyticsAggregator, BorrowLedger, ResourceService, SeatLedger, SeatPolicy, StudentDirectory,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Backend-bound stores
    pub store: LibraryStore,
    /// Source of `now` for every ledger call
    pub clock: Arc<dyn Clock>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub seat_ledger: Arc<SeatLedger>,
    pub borrow_ledger: Arc<BorrowLedger>,
    pub analytics: Arc<AnalyticsAggregator>,
    pub resources: Arc<ResourceService>,
    pub students: Arc<StudentDirectory>,
}

impl AppState {
    /// Wire every service over `store`.
    pub fn new(
        config: AppConfig,
        store: LibraryStore,
        storage: Arc<dyn BlobStorage>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn ReminderNotifier>,
    ) -> AppResult<Self> {
        let seat_policy = SeatPolicy::from_config(&config.library)?;

        let seat_ledger = SeatLedger::new(
            Arc::clone(&store.users),
            Arc::clone(&store.activity),
            seat_policy,
        );
        let borrow_ledger = BorrowLedger::new(&store, &config.library, notifier);
        let analytics = AnalyticsAggregator::new(
            Arc::clone(&store.users),
            Arc::clone(&store.activity),
            &config.library,
        );
        let resources =
            ResourceService::new(Arc::clone(&store.resources), storage, &config.storage);
        let students = StudentDirectory::new(Arc::clone(&store.users));

        Ok(Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            config: Arc::new(config),
            store,
            clock,
            seat_ledger: Arc::new(seat_ledger),
            borrow_ledger: Arc::new(borrow_ledger),
            analytics: Arc::new(analytics),
            resources: Arc::new(resources),
            students: Arc::new(students),
        })
    }

    /// The current instant according to the configured clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
