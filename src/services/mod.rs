pub mod explainer_service;
pub mod gateway;
pub mod question_service;
pub mod review_service;
pub mod session_service;
pub mod summary_service;
