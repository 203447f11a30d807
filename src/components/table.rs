//! Table components for maud templates.

use maud::{html, Markup, Render};

/// A table element with headers and pre-rendered rows.
#[derive(Debug)]
pub struct Table<'a> {
    /// Column headers
    pub headers: Vec<&'a str>,
    /// Pre-rendered row content
    pub rows: Vec<Markup>,
    /// Optional CSS class
    pub class: Option<&'a str>,
}

impl<'a> Table<'a> {
    /// Create a new table with the given headers.
    #[must_use]
    pub fn new(headers: Vec<&'a str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            class: None,
        }
    }

    /// Replace the rows.
    #[must_use]
    pub fn rows(mut self, rows: Vec<Markup>) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for Table<'_> {
    fn render(&self) -> Markup {
        html! {
            table class=[self.class] {
                @if !self.headers.is_empty() {
                    thead {
                        tr {
                            @for header in &self.headers {
                                th { (header) }
                            }
                        }
                    }
                }
                tbody {
                    @for row in &self.rows {
                        (row)
                    }
                }
            }
        }
    }
}

/// A table row with cells.
#[derive(Debug, Default)]
pub struct TableRow {
    /// Pre-rendered cell content
    pub cells: Vec<Markup>,
}

impl TableRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a right-aligned numeric cell.
    #[must_use]
    pub fn num(mut self, value: u64) -> Self {
        self.cells.push(html! { td class="num" { (value) } });
        self
    }

    /// Add a cell with pre-rendered markup.
    #[must_use]
    #[allow(clippy::needless_pass_by_value)] // Markup is idiomatically passed by value
    pub fn cell_markup(mut self, content: Markup) -> Self {
        self.cells.push(html! { td { (content) } });
        self
    }
}

impl Render for TableRow {
    fn render(&self) -> Markup {
        html! {
            tr {
                @for cell in &self.cells {
                    (cell)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_render() {
        let row = TableRow::new().cell_markup(html! { "alice" }).num(3).render();
        let html = Table::new(vec!["Handle", "Likes"])
            .class("posts-table")
            .rows(vec![row])
            .render()
            .into_string();

        assert!(html.starts_with(r#"<table class="posts-table">"#));
        assert!(html.contains("<th>Handle</th><th>Likes</th>"));
        assert!(html.contains(r#"<tr><td>alice</td><td class="num">3</td></tr>"#));
    }

    #[test]
    fn test_table_without_class_or_headers() {
        let html = Table::new(vec![]).render().into_string();
        assert_eq!(html, "<table><tbody></tbody></table>");
    }
}
