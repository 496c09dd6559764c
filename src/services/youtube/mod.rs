pub mod search_page;
pub mod urls;
pub mod ytdlp;
