pub mod availability;
pub mod export;
pub mod schema;
pub mod view;
