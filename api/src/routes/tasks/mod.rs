pub mod chain_request;
pub mod chain_route;
pub mod generate_request;
pub mod generate_route;
pub mod qa_request;
pub mod qa_route;
pub mod summarize_request;
pub mod summarize_route;
