pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::app::App;
pub use crate::config::{cli::FileTokenStore, CliConfig};
pub use crate::core::alert::DialogController;
pub use crate::core::api::ApiClient;
pub use crate::core::auth::AuthClient;
pub use crate::core::lookup::LookupClient;
pub use crate::core::search::{MajorSearch, UniversitySearch};
pub use crate::core::session::SessionContext;
pub use crate::utils::error::{ClientError, Result};
