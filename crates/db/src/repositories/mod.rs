//! One repository per table. Each is a unit struct whose associated
//! functions take a `&PgPool` and return `Result<_, sqlx::Error>`.

pub mod activity_image_repo;
pub mod activity_repo;
pub mod profile_repo;
pub mod user_repo;
pub mod warning_repo;

pub use activity_image_repo::ActivityImageRepo;
pub use activity_repo::ActivityRepo;
pub use profile_repo::ProfileRepo;
pub use user_repo::{AdminUserListQuery, UserRepo};
pub use warning_repo::WarningRepo;
