pub mod api;
pub mod model;
pub mod service;
pub mod validation;
pub mod workflow;
