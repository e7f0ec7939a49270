pub mod category;
pub mod coupon;
pub mod sales;
pub mod subscriber;
