pub mod contact;
pub mod project;
pub mod session;
pub mod settings;
pub mod user;
