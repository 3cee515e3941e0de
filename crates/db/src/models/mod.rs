pub mod activity;
pub mod neighbor;
pub mod user;
pub mod warning;
