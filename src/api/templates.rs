//! HTML templates for the viewer page
//!
//! Inline templates with plain CSS, so the binary serves the whole UI
//! without a frontend build. All user- and database-provided text passes
//! through `escape_html`.

use crate::pipeline::FilterOutcome;

/// Base layout; `{title}` and `{content}` are substituted
pub const BASE_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  body { margin: 0; font-family: system-ui, sans-serif; color: #1f2937; display: flex; min-height: 100vh; }
  aside { width: 18rem; background: #f3f4f6; padding: 1.25rem; box-sizing: border-box; }
  aside h2 { font-size: 1rem; margin: 1.25rem 0 0.5rem; }
  aside label { display: block; font-size: 0.85rem; margin: 0.6rem 0 0.2rem; }
  aside input { width: 100%; box-sizing: border-box; padding: 0.35rem; }
  aside button { margin-top: 1rem; width: 100%; padding: 0.5rem; }
  main { flex: 1; padding: 1.5rem 2rem; overflow-x: auto; }
  .caption { color: #6b7280; margin-top: -0.5rem; }
  .metrics { display: flex; gap: 2.5rem; margin: 1.25rem 0; }
  .metric .label { font-size: 0.8rem; color: #6b7280; }
  .metric .value { font-size: 1.6rem; }
  .notice { padding: 0.75rem 1rem; border-radius: 0.3rem; margin: 1rem 0; }
  .notice.info { background: #e0f2fe; }
  .notice.error { background: #fee2e2; white-space: pre-wrap; }
  .note { color: #6b7280; font-size: 0.85rem; }
  table { border-collapse: collapse; font-size: 0.85rem; }
  th, td { border: 1px solid #e5e7eb; padding: 0.3rem 0.5rem; text-align: left; white-space: nowrap; }
  th { background: #f9fafb; }
  a.download { display: inline-block; margin: 1rem 0; padding: 0.45rem 0.9rem; background: #2563eb; color: #fff; text-decoration: none; border-radius: 0.3rem; }
</style>
</head>
<body>
{content}
</body>
</html>
"#;

/// Message shown instead of results
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Nothing to show yet, e.g. no database path entered
    Info(String),
    /// Loading or filtering failed
    Error(String),
}

/// Everything the index page renders
pub struct PageView<'a> {
    pub db_path: &'a str,
    pub table: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    pub date_column: &'a str,
    /// (input name, column label, current value)
    pub fields: Vec<(&'a str, &'a str, &'a str)>,
    pub amount_column: Option<&'a str>,
    pub result: Result<&'a FilterOutcome, Notice>,
    /// Query string for the export link
    pub export_query: String,
    pub row_limit: usize,
}

/// Escape HTML special characters
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render a full page by wrapping `content` inside the base layout
pub fn render_page(title: &str, content: &str) -> String {
    BASE_LAYOUT
        .replace("{title}", &escape_html(title))
        .replace("{content}", content)
}

/// Render the index page
pub fn render_index(view: &PageView<'_>) -> String {
    let mut content = render_sidebar(view);

    content.push_str("<main>\n<h1>Report Viewer</h1>\n");
    content.push_str(
        "<p class=\"caption\">Browse and export records from your local SQLite database.</p>\n",
    );

    match &view.result {
        Err(Notice::Info(message)) => {
            content.push_str(&format!(
                "<div class=\"notice info\">{}</div>\n",
                escape_html(message)
            ));
        }
        Err(Notice::Error(message)) => {
            content.push_str(&format!(
                "<div class=\"notice error\">{}</div>\n",
                escape_html(message)
            ));
        }
        Ok(outcome) => content.push_str(&render_results(view, outcome)),
    }

    content.push_str("</main>\n");
    render_page("Report Viewer", &content)
}

fn render_sidebar(view: &PageView<'_>) -> String {
    let mut html = String::from("<aside>\n<form method=\"get\" action=\"/\">\n");

    html.push_str("<h2>Connection</h2>\n");
    html.push_str(&text_input(
        "db_path",
        "SQLite database path",
        view.db_path,
        "text",
        "/path/to/EFRIS PDF Report.db",
    ));
    html.push_str(&text_input("table", "Table name", view.table, "text", ""));

    html.push_str("<h2>Filters</h2>\n");
    html.push_str(&text_input(
        "from",
        &format!("{} from", view.date_column),
        view.from,
        "date",
        "",
    ));
    html.push_str(&text_input(
        "to",
        &format!("{} to", view.date_column),
        view.to,
        "date",
        "",
    ));

    for (name, label, value) in &view.fields {
        html.push_str(&text_input(name, label, value, "text", ""));
    }

    html.push_str("<button type=\"submit\">Apply</button>\n</form>\n</aside>\n");
    html
}

fn text_input(name: &str, label: &str, value: &str, kind: &str, placeholder: &str) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\n<input id=\"{name}\" name=\"{name}\" type=\"{kind}\" value=\"{value}\" placeholder=\"{placeholder}\">\n",
        name = escape_html(name),
        label = escape_html(label),
        kind = kind,
        value = escape_html(value),
        placeholder = escape_html(placeholder),
    )
}

fn render_results(view: &PageView<'_>, outcome: &FilterOutcome) -> String {
    let rows = outcome.rows();
    let summary = &outcome.summary;
    let mut html = String::from("<div class=\"metrics\">\n");

    html.push_str(&metric("Rows", &group_thousands(summary.row_count as u64)));
    if let (Some(column), Some(total)) = (view.amount_column, summary.amount_total) {
        html.push_str(&metric(&format!("Total {}", column), &format_amount(total)));
    }
    if let Some((lo, hi)) = summary.date_span {
        html.push_str(&metric(
            "Data Date Range",
            &format!("{} \u{2192} {}", lo.format("%Y-%m-%d"), hi.format("%Y-%m-%d")),
        ));
    }
    html.push_str("</div>\n");

    if outcome.unparsed_rows > 0 {
        html.push_str(&format!(
            "<p class=\"note\">{} of {} rows have an unreadable {} and are not shown.</p>\n",
            group_thousands(outcome.unparsed_rows as u64),
            group_thousands(outcome.source_rows as u64),
            escape_html(view.date_column),
        ));
    }

    html.push_str("<h2>Results</h2>\n<table>\n<thead><tr>");
    for column in rows.columns() {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in rows.iter().take(view.row_limit) {
        html.push_str("<tr>");
        for value in row {
            html.push_str(&format!("<td>{}</td>", escape_html(&value.to_string())));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");

    if rows.len() > view.row_limit {
        html.push_str(&format!(
            "<p class=\"note\">Showing the first {} of {} rows. The CSV download contains all of them.</p>\n",
            group_thousands(view.row_limit as u64),
            group_thousands(rows.len() as u64),
        ));
    }

    html.push_str(&format!(
        "<a class=\"download\" href=\"/api/v1/export?{}\">Download CSV</a>\n",
        escape_html(&view.export_query)
    ));
    html.push_str(&format!(
        "<p class=\"note\">Connected to: {}</p>\n",
        escape_html(view.db_path)
    ));

    html
}

fn metric(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>\n",
        escape_html(label),
        escape_html(value)
    )
}

/// `1234567` → `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `1250.5` → `1,250.50`
pub fn format_amount(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    format!("{}{}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}
