pub mod admin;
pub mod blog;
pub mod docs;
pub mod model;
