//! Notices Module
//! Mission: Persisted notice records and their HTTP endpoints

pub mod api;
pub mod models;
pub mod store;

pub use api::{notices_admin_router, notices_public_router};
pub use models::{Notice, NoticeFields};
pub use store::NoticeStore;
