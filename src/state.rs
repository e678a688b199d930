use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::config::Config;
use crate::models::assignment::{Assignment, MatchEvent};
use crate::models::donation::Donation;
use crate::models::order::Order;
use crate::models::user::UserProfile;
use crate::observability::metrics::Metrics;
use crate::store::memory::{MemoryNgoRepository, MemoryRestaurantRepository};
use crate::store::{NgoRepository, RestaurantRepository};

pub struct AppState {
    pub config: Config,
    pub ngos: Arc<dyn NgoRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub users: DashMap<Uuid, UserProfile>,
    pub donations: DashMap<Uuid, Donation>,
    pub orders: DashMap<Uuid, Order>,
    pub assignments: DashMap<Uuid, Assignment>,
    pub donation_tx: mpsc::Sender<Uuid>,
    pub match_events_tx: broadcast::Sender<MatchEvent>,
    pub metrics: Metrics,
}

impl AppState {
    /// State backed by the in-memory repositories.
    pub fn new(config: Config) -> (Self, mpsc::Receiver<Uuid>) {
        Self::with_repositories(
            config,
            Arc::new(MemoryNgoRepository::new()),
            Arc::new(MemoryRestaurantRepository::new()),
        )
    }

    pub fn with_repositories(
        config: Config,
        ngos: Arc<dyn NgoRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
    ) -> (Self, mpsc::Receiver<Uuid>) {
        let (donation_tx, donation_rx) = mpsc::channel(config.donation_queue_size);
        let (match_events_tx, _unused_rx) = broadcast::channel(config.event_buffer_size);

        (
            Self {
                config,
                ngos,
                restaurants,
                users: DashMap::new(),
                donations: DashMap::new(),
                orders: DashMap::new(),
                assignments: DashMap::new(),
                donation_tx,
                match_events_tx,
                metrics: Metrics::new(),
            },
            donation_rx,
        )
    }
}
