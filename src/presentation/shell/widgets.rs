// Page widgets and their HTML rendering
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Radar,
    Pie,
}

/// Declarative chart option for the client-side chart library
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    pub option: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Card { title: String, children: Vec<Widget> },
    Stat { label: String, value: String },
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },
    Chart(ChartSpec),
    /// Module navigation tiles: (label, page path)
    Links(Vec<(String, String)>),
    Text(String),
}

impl Widget {
    pub fn card(title: impl Into<String>, children: Vec<Widget>) -> Self {
        Widget::Card {
            title: title.into(),
            children,
        }
    }

    pub fn stat(label: impl Into<String>, value: impl Into<String>) -> Self {
        Widget::Stat {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn render(&self, out: &mut String) {
        match self {
            Widget::Card { title, children } => {
                let _ = write!(out, r#"<div class="card"><h2>{}</h2>"#, escape(title));
                for child in children {
                    child.render(out);
                }
                out.push_str("</div>");
            }
            Widget::Stat { label, value } => {
                let _ = write!(
                    out,
                    r#"<div class="stat-item"><div class="stat-label">{}</div><div class="stat-value">{}</div></div>"#,
                    escape(label),
                    escape(value)
                );
            }
            Widget::Table { headers, rows } => {
                out.push_str("<table><thead><tr>");
                for header in headers {
                    let _ = write!(out, "<th>{}</th>", escape(header));
                }
                out.push_str("</tr></thead><tbody>");
                for row in rows {
                    out.push_str("<tr>");
                    for cell in row {
                        let _ = write!(out, "<td>{}</td>", escape(cell));
                    }
                    out.push_str("</tr>");
                }
                out.push_str("</tbody></table>");
            }
            Widget::Chart(chart) => {
                let option = serde_json::to_string(chart).unwrap_or_default();
                let _ = write!(
                    out,
                    r#"<div id="{}" class="chart-container" data-chart="{}"></div>"#,
                    escape(&chart.id),
                    escape(&option)
                );
            }
            Widget::Links(links) => {
                out.push_str(r#"<div class="modules-grid">"#);
                for (label, path) in links {
                    let _ = write!(
                        out,
                        r#"<a class="module-card" href="{}"><h3>{}</h3></a>"#,
                        escape(path),
                        escape(label)
                    );
                }
                out.push_str("</div>");
            }
            Widget::Text(text) => {
                let _ = write!(out, "<p>{}</p>", escape(text));
            }
        }
    }
}

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_is_escaped() {
        let mut out = String::new();
        Widget::card("<b>", vec![Widget::Text("a & b".into())]).render(&mut out);
        assert_eq!(out, r#"<div class="card"><h2>&lt;b&gt;</h2><p>a &amp; b</p></div>"#);
    }

    #[test]
    fn test_chart_spec_lands_in_data_attribute() {
        let mut out = String::new();
        Widget::Chart(ChartSpec {
            id: "esgChart".into(),
            kind: ChartKind::Radar,
            option: json!({ "series": [] }),
        })
        .render(&mut out);
        assert!(out.contains(r#"id="esgChart""#));
        assert!(out.contains("&quot;kind&quot;:&quot;radar&quot;"));
    }
}
