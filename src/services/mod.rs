pub mod droid;
pub mod portal_scraper;
pub mod title_search;

pub use droid::*;
pub use portal_scraper::*;
pub use title_search::*;
