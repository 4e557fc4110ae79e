//! Client side of the login flow: HTTP access to the auth service, durable
//! session storage, the session manager driving the login form, and the
//! repository search collaborator.

pub mod api;
pub mod config;
pub mod error;
pub mod github;
pub mod session;
pub mod storage;

pub use api::{AuthApi, HttpAuthApi};
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::{ClientSession, LoginFailure, LoginForm, SessionManager, View};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
