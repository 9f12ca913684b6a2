pub mod health;
pub mod rag;
pub mod tasks;
