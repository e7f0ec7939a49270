pub mod category;
pub mod coupon;
pub mod order;
pub mod subscriber;
