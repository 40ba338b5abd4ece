//! Article context
//!
//! Everything the notification and announcement steps need to describe an
//! approved article, resolved once per approval.

use crate::domain::entities::{Article, ArticleId};

/// An approved article plus the names and link used in outbound messages
#[derive(Debug, Clone)]
pub struct ArticleContext {
    pub article: Article,
    pub author_name: String,
    /// None for independent articles
    pub publisher_name: Option<String>,
    pub url: String,
}

impl ArticleContext {
    pub fn new(
        article: Article,
        author_name: impl Into<String>,
        publisher_name: Option<String>,
        base_url: &str,
    ) -> Self {
        let url = article_url(base_url, &article.id);
        Self {
            article,
            author_name: author_name.into(),
            publisher_name,
            url,
        }
    }

    pub fn id(&self) -> ArticleId {
        self.article.id
    }

    pub fn title(&self) -> &str {
        &self.article.title
    }

    pub fn publisher_label(&self) -> &str {
        self.publisher_name.as_deref().unwrap_or("Independent")
    }
}

/// Public link to an article
pub fn article_url(base_url: &str, id: &ArticleId) -> String {
    format!("{}/articles/{}/", base_url.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn url_joins_base_without_double_slash() {
        let author = test_journalist("Clark");
        let article = test_article(&author, None);
        let id = article.id;
        let ctx = ArticleContext::new(article, "Clark", None, "https://news.test/");
        assert_eq!(ctx.url, format!("https://news.test/articles/{}/", id));
    }

    #[test]
    fn independent_articles_are_labelled() {
        let author = test_journalist("Clark");
        let ctx = ArticleContext::new(test_article(&author, None), "Clark", None, "http://x");
        assert_eq!(ctx.publisher_label(), "Independent");
    }
}
