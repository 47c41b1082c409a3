pub mod admin;
pub mod health;
pub mod images;
pub mod session;
pub mod submission;

mod multipart;
