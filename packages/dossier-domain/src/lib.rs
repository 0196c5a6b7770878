pub mod kinds;
pub mod policy;
pub mod validate;
