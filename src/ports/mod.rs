pub mod resolver;
pub mod search_page;
