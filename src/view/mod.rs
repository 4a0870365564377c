//! Typed render functions, one per entity. Each module pairs a serialisable
//! view-model with an askama template under `templates/`.

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod design;
pub mod html;
pub mod inventory;
pub mod promotions;
