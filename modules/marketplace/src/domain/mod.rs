pub mod browse;
pub mod contact;
pub mod error;
pub mod events;
pub mod ports;
pub mod rating;
pub mod repo;
pub mod service;
