//! Authentication: password hashing, JWT sessions, the request extractor
//! and the Google OAuth client.

pub mod current_user;
pub mod google;
pub mod password;
pub mod session;
