pub mod catalog;
pub mod explainer;
pub mod health;
pub mod session;
