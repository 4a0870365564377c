pub mod admin;
pub mod storefront;
pub mod worker;
