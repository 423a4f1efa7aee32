pub mod controller;
pub mod policy;
pub mod router;
pub mod service;
