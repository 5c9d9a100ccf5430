use crate::aging::Bucket;
use crate::models::{Board, IssueCard, PageviewWindow, PageviewsResponse, ReportMonth};

const TOP_ROWS: usize = 5;

pub fn render_index(month: &ReportMonth, pageviews: &PageviewsResponse, board: &Board) -> String {
    let windows = [
        ("Last 30 days", pageviews.day30.as_ref()),
        ("Last 7 days", pageviews.day7.as_ref()),
        ("Yesterday", pageviews.day1.as_ref()),
    ]
    .iter()
    .map(|(label, window)| render_window(label, *window))
    .collect::<String>();

    let buckets = Bucket::ALL
        .iter()
        .map(|bucket| render_section(bucket.css_class(), bucket.heading(), board.bucket(*bucket)))
        .collect::<String>();

    INDEX_HTML
        .replace("{{MONTH}}", &escape_html(&month.label))
        .replace("{{MONTH_KEY}}", &escape_html(&month.formatted))
        .replace("{{PAGEVIEWS}}", &windows)
        .replace("{{BUCKETS}}", &buckets)
        .replace(
            "{{UNBUCKETED}}",
            &render_section("awaiting-posts", "Not yet sent for approval", &board.unbucketed),
        )
        .replace("{{REJECTED}}", &render_rejected(board))
}

fn render_window(label: &str, window: Option<&PageviewWindow>) -> String {
    let Some(window) = window else {
        return format!(
            "<div class=\"stat\"><span class=\"label\">{label}</span><span class=\"value\">&mdash;</span></div>"
        );
    };

    let rows: String = window
        .rows
        .iter()
        .take(TOP_ROWS)
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", escape_html(cell)))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        "<div class=\"stat\"><span class=\"label\">{label}</span><span class=\"value\">{}</span><table>{rows}</table></div>",
        window.total
    )
}

fn render_section(class: &str, heading: &str, cards: &[IssueCard]) -> String {
    let none = if cards.is_empty() {
        "<p class=\"none\">None yet.</p>"
    } else {
        ""
    };
    let items: String = cards.iter().map(render_card).collect();
    format!("<section class=\"{class}\"><h2>{heading}</h2>{none}<ol>{items}</ol></section>")
}

fn render_card(card: &IssueCard) -> String {
    let title = escape_html(&card.issue.title);
    let link = match &card.issue.url {
        Some(url) => format!("<a href=\"{}\">#{} {title}</a>", escape_html(url), card.issue.number),
        None => format!("#{} {title}", card.issue.number),
    };
    let labels: String = card
        .issue
        .labels
        .iter()
        .map(|label| format!("<span class=\"label-tag\">{}</span>", escape_html(label)))
        .collect();

    format!(
        "<li class=\"blog-issue\" data-number=\"{}\">{link}{labels}{}</li>",
        card.issue.number, card.report.summary_html
    )
}

fn render_rejected(board: &Board) -> String {
    if board.rejected.is_empty() {
        return String::new();
    }
    let items: String = board
        .rejected
        .iter()
        .map(|rejected| format!("<li>#{}: {}</li>", rejected.number, escape_html(&rejected.error)))
        .collect();
    format!("<section class=\"rejected\"><h2>Could not read</h2><ul>{items}</ul></section>")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Blog Drafts Dashboard</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat table {
      font-size: 0.85rem;
    }

    .buckets {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    section h2 {
      font-size: 1.2rem;
      margin: 0 0 8px;
    }

    .none {
      color: #8b857d;
    }

    .blog-issue {
      margin-bottom: 12px;
    }

    .label-tag {
      margin-left: 6px;
      padding: 2px 8px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.08);
      font-size: 0.75rem;
    }

    .meta {
      margin: 4px 0 0;
      padding-left: 18px;
      color: #5f5c57;
      font-size: 0.85rem;
    }

    .oldest-posts h2 {
      color: var(--accent);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Blog Drafts Dashboard</h1>
      <p class="subtitle" data-month="{{MONTH_KEY}}">Reporting on {{MONTH}}</p>
    </header>
    <div class="panel">{{PAGEVIEWS}}</div>
    <div class="buckets">{{BUCKETS}}</div>
    {{UNBUCKETED}}
    {{REJECTED}}
  </main>
</body>
</html>
"#;
