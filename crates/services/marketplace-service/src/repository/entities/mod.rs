//! SeaORM entities, one module per table.

pub mod favorite;
pub mod notification;
pub mod order;
pub mod product;
pub mod review;
pub mod user;
