pub mod user;

pub use user::{AuthenticatedUser, FederatedSignIn};
