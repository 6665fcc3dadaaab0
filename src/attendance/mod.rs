pub mod aggregate;
pub mod geofence;
pub mod service;
