pub mod alert;
pub mod api;
pub mod auth;
pub mod lookup;
pub mod navstate;
pub mod notice;
pub mod problem;
pub mod search;
pub mod session;

pub use crate::domain::model::{Major, Problem, University, User};
pub use crate::domain::ports::{TokenStore, UniversityRegistry};
pub use crate::utils::error::Result;
