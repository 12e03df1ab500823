mod ad_service;
mod user_service;

pub use ad_service::{AdListing, AdService, AdServiceDependencies};
pub use user_service::{
    AuthenticateUserRequest, RegisterUserRequest, UserService, UserServiceDependencies,
};
