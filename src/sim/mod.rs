pub mod recommend;
pub mod shadow;
pub mod solar;
