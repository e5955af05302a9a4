//! The two dashboard pages: each binds a measurement endpoint to the
//! column set its table displays.

use std::sync::Arc;

use perfdash_protocol::ColumnDefinition;

pub struct Page {
    pub title: &'static str,
    pub endpoint: String,
    pub columns: Arc<Vec<ColumnDefinition>>,
}

pub fn dashboard_pages(base_url: &str) -> Vec<Page> {
    vec![summary_page(base_url), details_page(base_url)]
}

/// Per-route aggregates.
pub fn summary_page(base_url: &str) -> Page {
    Page {
        title: "Summary",
        endpoint: join(base_url, "api/measurements/summary"),
        columns: Arc::new(vec![
            ColumnDefinition::new("Method", "method", "string"),
            ColumnDefinition::new("Name", "name", "string"),
            ColumnDefinition::new("#Requests", "count", "number"),
            ColumnDefinition::new("Avg. response time", "avgElapsed", "time"),
            ColumnDefinition::new("Min. response time", "minElapsed", "time"),
            ColumnDefinition::new("Max. response time", "maxElapsed", "time"),
        ]),
    }
}

/// Individual measurements, newest first as served.
pub fn details_page(base_url: &str) -> Page {
    Page {
        title: "Details",
        endpoint: join(base_url, "api/measurements"),
        columns: Arc::new(vec![
            ColumnDefinition::new("Method", "method", "string"),
            ColumnDefinition::new("Name", "name", "string"),
            ColumnDefinition::new("Duration", "elapsed", "time"),
            ColumnDefinition::new("Time", "startedAt", "datetime"),
        ]),
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_columns_are_in_display_order() {
        let page = summary_page("http://127.0.0.1:5000");
        let attributes: Vec<&str> = page
            .columns
            .iter()
            .map(|column| column.attribute.as_str())
            .collect();
        assert_eq!(
            attributes,
            ["method", "name", "count", "avgElapsed", "minElapsed", "maxElapsed"]
        );
        assert_eq!(page.endpoint, "http://127.0.0.1:5000/api/measurements/summary");
    }

    #[test]
    fn base_url_trailing_slash_does_not_double_up() {
        let page = details_page("http://profiler.test/");
        assert_eq!(page.endpoint, "http://profiler.test/api/measurements");
    }

    #[test]
    fn every_configured_format_kind_resolves() {
        for page in dashboard_pages("http://profiler.test") {
            for column in page.columns.iter() {
                perfdash_core::format::lookup(&column.format)
                    .unwrap_or_else(|err| panic!("{}: {err}", page.title));
            }
        }
    }
}
