pub mod api;
pub mod categories;
pub mod coupons;
pub mod main;
pub mod newsletter;
