pub mod auth;
pub mod client;
pub mod error;
pub mod movies;
pub mod notifications;
pub mod subscription;

pub use auth::{AuthService, UserProfile};
pub use client::{ApiClient, RequestSpec};
pub use error::{ApiError, ApiResult};
pub use movies::{CatalogApi, MovieService};
pub use notifications::NotificationService;
pub use subscription::{CheckoutRedirect, SubscriptionService, SubscriptionStatus};
