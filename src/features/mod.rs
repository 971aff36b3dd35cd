pub mod accounts;
pub mod appointments;
pub mod auth;
pub mod dashboard;
pub mod pages;
pub mod records;
