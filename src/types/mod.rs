pub mod category;
pub mod pagination;
pub mod question;
pub mod quiz;
pub mod search;
