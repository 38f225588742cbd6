pub mod contact;
pub mod service;
pub mod submission;
