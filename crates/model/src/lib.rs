pub mod change;
pub mod error;
pub mod row;
pub mod state;
