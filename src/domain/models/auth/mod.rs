pub mod access_rule;
pub mod authenticated_user;

pub use access_rule::*;
pub use authenticated_user::*;
