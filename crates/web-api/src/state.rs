use std::sync::Arc;

use application::{AdService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub ad_service: Arc<AdService>,
}

impl AppState {
    pub fn new(user_service: Arc<UserService>, ad_service: Arc<AdService>) -> Self {
        Self {
            user_service,
            ad_service,
        }
    }
}
