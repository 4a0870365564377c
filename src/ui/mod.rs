pub mod i18n;
pub mod modal;
pub mod pairing;
pub mod session;
