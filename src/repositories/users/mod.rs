//! 사용자 리포지토리
//!
//! ```rust,ignore
//! use crate::repositories::users::user_repo::UserRepository;
//!
//! let user_repo = UserRepository::instance();
//! let user = user_repo.find_by_email("chef@example.com").await?;
//! ```

pub mod user_repo;

pub use user_repo::UserRepository;
