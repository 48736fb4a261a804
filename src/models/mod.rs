pub mod explainer;
pub mod question;
pub mod session;
