//! Domain types: bars, order sides, fills, positions, portfolio.

pub mod bar;
pub mod fill;
pub mod order;
pub mod portfolio;
pub mod position;

pub use bar::Bar;
pub use fill::Fill;
pub use order::OrderSide;
pub use portfolio::Portfolio;
pub use position::Position;
