pub mod add_request;
pub mod add_route;
pub mod ask_from_document_route;
pub mod ask_request;
pub mod ask_route;
pub mod delete_all_request;
pub mod delete_all_route;
pub mod query_request;
pub mod query_route;
pub mod retrieve_route;
pub mod status_route;
