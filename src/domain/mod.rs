pub mod auth;
pub mod client;
pub mod company;
pub mod invoice;
pub mod pagination;

pub use pagination::Page;
