//! Base layout components for the web UI.
//!
//! This module provides the main page layout structure including
//! the HTML skeleton, navigation, and footer.

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Minimal inline stylesheet; the UI ships no static assets.
const BASE_STYLE: &str = r"
:root { color-scheme: light dark; font-family: system-ui, sans-serif; }
body { margin: 0; line-height: 1.5; }
.container { max-width: 72rem; margin: 0 auto; padding: 0 1rem; }
header nav { display: flex; justify-content: space-between; align-items: center; }
header nav ul { display: flex; gap: 1rem; list-style: none; padding: 0; }
table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
th, td { text-align: left; padding: 0.4rem; border-bottom: 1px solid #8884; vertical-align: top; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
article.error { border-left: 4px solid #c0392b; padding: 0.5rem 1rem; }
article.info { border-left: 4px solid #2980b9; padding: 0.5rem 1rem; }
.profile-stats { display: flex; gap: 1.5rem; }
.muted { opacity: 0.7; }
";

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page").render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title.
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="color-scheme" content="light dark";
                    title { (self.title) " - Bluesky Post Reporter" }
                    link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🦋</text></svg>";
                    style { (PreEscaped(BASE_STYLE)) }
                }
                body {
                    (Self::render_header())
                    main class="container" {
                        (content)
                    }
                    (Self::render_footer())
                }
            }
        }
    }

    fn render_header() -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li {
                            a href="/" {
                                strong class="site-logo" { "Bluesky Post Reporter" }
                            }
                        }
                    }
                    ul {
                        li { a href="/" { "New report" } }
                    }
                }
            }
        }
    }

    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small class="muted" {
                    "Data from the public Bluesky AppView | JSON API: "
                    code { "/api/report?actor=handle&limit=50&format=json" }
                }
            }
        }
    }
}
