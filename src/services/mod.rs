pub mod admin_service;
pub mod design_service;
pub mod storefront_service;
pub mod worker_service;
