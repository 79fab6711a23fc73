//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use penmark_core::highlight::HighlightSpan;
use penmark_core::report::AssessmentReport;
use penmark_core::scoring::Scores;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escape `text` and wrap every highlight span in a `<mark>` element.
///
/// Spans are character offsets and must be sorted and non-overlapping, as
/// produced by the result aggregator. Spans past the end of the text are
/// clamped; anything out of order is skipped.
pub fn render_highlighted(text: &str, highlights: &[HighlightSpan]) -> String {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;
    let byte_at = |c: usize| boundaries[c.min(char_len)];

    let mut out = String::with_capacity(text.len() + highlights.len() * 40);
    let mut cursor = 0usize;
    for h in highlights {
        let start = h.span.start.min(char_len);
        let end = h.span.end.min(char_len);
        if start < cursor || end <= start {
            continue;
        }
        out.push_str(&html_escape(&text[byte_at(cursor)..byte_at(start)]));
        out.push_str(&format!("<mark class=\"{}\">", h.source.css_class()));
        out.push_str(&html_escape(&text[byte_at(start)..byte_at(end)]));
        out.push_str("</mark>");
        cursor = end;
    }
    out.push_str(&html_escape(&text[byte_at(cursor)..]));
    out
}

/// Generate an HTML report from an assessment report.
pub fn generate_html(report: &AssessmentReport) -> String {
    let result = &report.result;
    let card = &result.scorecard;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>penmark report: {}</title>\n",
        html_escape(&report.task.label)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>penmark report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Task: <strong>{}</strong> ({}) | {} | proofing {} | {}</p>\n",
        html_escape(&report.task.label),
        html_escape(&report.task.id),
        report.language,
        html_escape(&report.proofing.to_string()),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(source) = &report.source {
        html.push_str(&format!(
            "<p class=\"meta\">Source: {}</p>\n",
            html_escape(source)
        ));
    }
    html.push_str("</header>\n");

    // Scores
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str(&format!("<h2>Score: {}/40</h2>\n", card.total));
    html.push_str("<div class=\"cards\">\n");
    for (name, value) in criteria(&card.scores) {
        html.push_str(&format!(
            "<div class=\"card {}\"><span class=\"label\">{}</span><span class=\"value\">{}/10</span></div>\n",
            band(value),
            name,
            value
        ));
    }
    html.push_str("</div>\n");
    html.push_str(&generate_bar_chart(&card.scores));
    if card.length_cap < 10 {
        html.push_str(&format!(
            "<p class=\"warn\">Length cap: every criterion is limited to {}/10.</p>\n",
            card.length_cap
        ));
    }

    let f = &card.facts;
    html.push_str("<table class=\"facts\">\n<tbody>\n");
    html.push_str(&format!(
        "<tr><th>Words</th><td>{} / {}</td></tr>\n",
        f.words, report.task.min_words
    ));
    html.push_str(&format!("<tr><th>Paragraphs</th><td>{}</td></tr>\n", f.paragraphs));
    html.push_str(&format!(
        "<tr><th>Linking words</th><td>{}</td></tr>\n",
        f.linking_words
    ));
    html.push_str(&format!(
        "<tr><th>Contractions</th><td>{}</td></tr>\n",
        f.contractions
    ));
    html.push_str(&format!(
        "<tr><th>Type-token ratio</th><td>{:.2}</td></tr>\n",
        f.type_token_ratio
    ));
    html.push_str(&format!(
        "<tr><th>Formality cues</th><td>{}</td></tr>\n",
        f.formality_cues
    ));
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Submission text
    html.push_str("<section class=\"submission\">\n");
    html.push_str("<h2>Submission</h2>\n");
    html.push_str("<div class=\"text\">");
    html.push_str(&render_highlighted(&report.text, &result.highlights));
    html.push_str("</div>\n");
    html.push_str("</section>\n");

    // Coverage and advice
    html.push_str("<section class=\"coverage\">\n");
    html.push_str("<h2>Task points</h2>\n<ul>\n");
    for c in &card.coverage {
        let (class, mark) = if c.covered {
            ("pass", "covered")
        } else {
            ("fail", "missing")
        };
        html.push_str(&format!(
            "<li class=\"{}\"><strong>{}</strong> {} <em>({})</em></li>\n",
            class,
            html_escape(&c.id),
            html_escape(&c.text),
            mark
        ));
    }
    html.push_str("</ul>\n");
    if !card.advice.is_empty() {
        html.push_str("<h2>Advice</h2>\n<ol>\n");
        for tip in &card.advice {
            html.push_str(&format!("<li>{}</li>\n", html_escape(tip)));
        }
        html.push_str("</ol>\n");
    }
    html.push_str("</section>\n");

    // Issues
    html.push_str("<section class=\"issues\">\n");
    html.push_str("<h2>Issues</h2>\n");
    html.push_str("<table class=\"issues-table\" id=\"issues\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Source</th><th onclick=\"sortTable(1)\">Issue</th><th onclick=\"sortTable(2)\">Suggestion / example</th><th onclick=\"sortTable(3)\">Count</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for i in &result.spelling.issues {
        push_issue_row(&mut html, "spelling", &i.word, &i.suggestion, i.count);
    }
    for i in &result.unknown_words.issues {
        push_issue_row(&mut html, "unknown word", &i.word, &i.suggestion, i.count);
    }
    for i in &result.grammar.issues {
        push_issue_row(
            &mut html,
            "grammar",
            &i.message,
            i.example.as_deref().unwrap_or("-"),
            i.count,
        );
    }
    if let Some(proof) = &result.proof {
        for i in &proof.issues {
            let detail = i
                .suggestion
                .as_deref()
                .or(i.example.as_deref())
                .unwrap_or("-");
            let source = format!("{:?}", i.kind).to_lowercase();
            push_issue_row(&mut html, &format!("proof: {source}"), &i.message, detail, 1);
        }
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

fn push_issue_row(html: &mut String, source: &str, issue: &str, detail: &str, count: usize) {
    html.push_str(&format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        html_escape(source),
        html_escape(issue),
        html_escape(detail),
        count
    ));
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AssessmentReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn criteria(scores: &Scores) -> [(&'static str, u32); 4] {
    [
        ("Language", scores.language),
        ("Form", scores.form),
        ("Organisation", scores.organisation),
        ("Effect", scores.effect),
    ]
}

fn band(score: u32) -> &'static str {
    if score >= 8 {
        "pass"
    } else if score >= 5 {
        "mid"
    } else {
        "fail"
    }
}

fn generate_bar_chart(scores: &Scores) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 140;

    let rows = criteria(scores);
    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (name, score)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = *score as usize * max_width / 10;

        let color = match band(*score) {
            "pass" => "#22c55e",
            "mid" => "#eab308",
            _ => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            name
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}/10</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --mid: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --mid: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); max-width: 960px; }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.warn { color: #b45309; font-weight: bold; }
.cards { display: flex; gap: 1rem; flex-wrap: wrap; }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 0.75rem 1rem; min-width: 120px; }
.card .label { display: block; font-size: 0.85rem; color: #6b7280; }
.card .value { font-size: 1.5rem; font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.mid { background: var(--mid); }
.fail { background: var(--fail); }
.text { white-space: pre-wrap; line-height: 1.6; border: 1px solid var(--border); border-radius: 8px; padding: 1rem; }
mark { background: none; color: inherit; text-decoration: underline wavy; text-underline-offset: 3px; }
mark.hl-misspelling, mark.hl-spelling { text-decoration-color: #ef4444; }
mark.hl-unknown { text-decoration-color: #f97316; }
mark.hl-grammar { text-decoration-color: #3b82f6; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('issues');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
