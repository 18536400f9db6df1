//! Data of the public marketing pages.

use serde::Serialize;

use crate::dto::catalogue::ProductRow;
use crate::services::news::NewsArticle;

/// Number of news teasers shown on the home page.
pub const HOME_NEWS_COUNT: usize = 3;

#[derive(Debug, Serialize)]
pub struct HomePageData {
    pub products: Vec<ProductRow>,
    pub news: &'static [NewsArticle],
}

impl HomePageData {
    pub fn new(products: Vec<ProductRow>, news: &'static [NewsArticle]) -> Self {
        Self {
            products,
            news: &news[..news.len().min(HOME_NEWS_COUNT)],
        }
    }
}
