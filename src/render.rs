//! HTML and plain-text rendering of a leaderboard.
//!
//! The HTML page is self-contained (inline CSS, no scripts) so it can be opened
//! straight from disk or served as a static file.

use crate::pipeline::{Leaderboard, RankedEntry};

/// Page-level settings that are not part of the leaderboard itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    /// Heading and document title
    pub title: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Scrandle Leaderboard".to_string(),
        }
    }
}

// ============================================================================
// HTML
// ============================================================================

/// Render a complete HTML document for a leaderboard.
pub fn render_page(board: &Leaderboard<'_>, options: &PageOptions) -> String {
    log::info!(
        "Rendering {} of {} entries ({})",
        board.rows.len(),
        board.total_entries,
        board.controls.sort.label()
    );
    wrap_page(
        options,
        &format!(
            "{controls}\n{table}",
            controls = render_controls(board),
            table = render_table(board),
        ),
    )
}

/// Render a visible error page for a leaderboard that could not be loaded.
pub fn render_error_page(message: &str, options: &PageOptions) -> String {
    wrap_page(
        options,
        &format!(
            r#"<div class="error">
    <h2>Could not load the leaderboard</h2>
    <p>{message}</p>
</div>"#,
            message = html_escape(message),
        ),
    )
}

fn wrap_page(options: &PageOptions, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1 class="title">🏆 {title}</h1>
        {body}
    </div>
</body>
</html>
"#,
        title = html_escape(&options.title),
        css = inline_css(),
        body = body,
    )
}

/// Summary of the controls that produced this leaderboard.
fn render_controls(board: &Leaderboard<'_>) -> String {
    let controls = &board.controls;
    format!(
        r#"<div class="controls">
    <div class="control"><span class="control-label">Sort by:</span> {sort}</div>
    <div class="control"><span class="control-label">Minimum Games Played:</span> {min_games}</div>
    <div class="control"><span class="control-label">Played Within (Days):</span> {max_days}</div>
    <div class="control count">Showing {shown} of {total}</div>
</div>"#,
        sort = html_escape(controls.sort.label()),
        min_games = controls.min_games,
        max_days = controls.max_inactive_days,
        shown = board.rows.len(),
        total = board.total_entries,
    )
}

/// Render the leaderboard table. An empty leaderboard keeps its header row.
pub fn render_table(board: &Leaderboard<'_>) -> String {
    let rows: Vec<String> = board.rows.iter().map(render_row).collect();

    format!(
        r#"<table class="leaderboard">
    <thead>
        <tr>
            <th>Profile</th>
            <th>Author</th>
            <th>Average Score</th>
            <th>Games Played</th>
        </tr>
    </thead>
    <tbody>
        {rows}
    </tbody>
</table>"#,
        rows = rows.join("\n"),
    )
}

fn render_row(row: &RankedEntry<'_>) -> String {
    let entry = row.entry;
    let avatar = entry
        .profile_image_url
        .as_deref()
        .map(|url| format!(r#"<img class="avatar" src="{}">"#, html_escape(url)))
        .unwrap_or_default();
    let row_class = if row.top_row { r#" class="top""# } else { "" };

    format!(
        r#"<tr{row_class}>
    <td>{avatar}</td>
    <td><strong style='font-size:17px'>{marker}{author}</strong></td>
    <td class="{score_class}">{score:.2}</td>
    <td>{played}</td>
</tr>"#,
        row_class = row_class,
        avatar = avatar,
        marker = row.marker.map(|m| m.symbol()).unwrap_or(""),
        author = html_escape(&entry.author),
        score_class = row.tier.css_class(),
        score = entry.average_score,
        played = entry.number_played,
    )
}

fn inline_css() -> &'static str {
    r#"
body {
    margin: 0;
    background-color: #0e1117;
    font-family: Arial, sans-serif;
}

.container {
    max-width: 1200px;
    margin: 0 auto;
    padding: 2rem;
}

h1.title {
    font-size: 40px;
    color: #f1f1f1;
}

.controls {
    display: flex;
    flex-wrap: wrap;
    gap: 2rem;
    color: #c9ccd3;
    font-size: 14px;
}

.control-label {
    font-weight: bold;
}

.controls .count {
    margin-left: auto;
}

.leaderboard {
    width: 100%;
    border-collapse: collapse;
    font-family: Arial, sans-serif;
    font-size: 16px;
    margin-top: 20px;
    border-radius: 12px;
    overflow: hidden;
    box-shadow: 0 4px 12px rgba(0,0,0,0.1);
    background-color: #ffffff;
    color: #222222;
}

.leaderboard thead {
    background-color: #f2f2f2;
    color: #222222;
}

.leaderboard th, .leaderboard td {
    text-align: left;
    padding: 12px;
    border-bottom: 1px solid #e0e0e0;
    vertical-align: middle;
}

.leaderboard tr:nth-child(even) {
    background-color: #fafafa;
}

.leaderboard tr:nth-child(odd) {
    background-color: #ffffff;
}

.leaderboard .top {
    background-color: #fff7cc !important;
}

img.avatar {
    border-radius: 50%;
    width: 60px;
    height: 60px;
    object-fit: cover;
}

.score-green {
    color: #2e7d32;
    font-weight: bold;
}

.score-orange {
    color: #f9a825;
    font-weight: bold;
}

.score-red {
    color: #c62828;
    font-weight: bold;
}

.error {
    padding: 1.5rem;
    border-radius: 12px;
    background-color: #fdecea;
    color: #611a15;
}
"#
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Plain text
// ============================================================================

const AUTHOR_WIDTH: usize = 28;

/// Render a fixed-width text table for terminal output.
pub fn render_text(board: &Leaderboard<'_>) -> String {
    let controls = &board.controls;
    let mut out = String::new();

    out.push_str(&format!("{:=^72}\n", " Scrandle Leaderboard "));
    out.push_str(&format!(
        "Sort by: {}    Min games: {}    Played within: {} days\n\n",
        controls.sort.label(),
        controls.min_games,
        controls.max_inactive_days
    ));
    out.push_str(&format!(
        "{:>4} {:<5} {:<width$} {:>10} {:>8} {:>10}\n",
        "#",
        "Rank",
        "Author",
        "Avg Score",
        "Games",
        "Inactive",
        width = AUTHOR_WIDTH
    ));
    out.push_str(&format!("{:-<72}\n", ""));

    for row in &board.rows {
        let entry = row.entry;
        let inactive = entry
            .inactive_days
            .map(|d| format!("{:.0}d", d))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>4} {:<5} {:<width$} {:>10.2} {:>8} {:>10}\n",
            row.position + 1,
            row.marker.map(|m| m.label()).unwrap_or(""),
            truncate_name(&entry.author, AUTHOR_WIDTH),
            entry.average_score,
            entry.number_played,
            inactive,
            width = AUTHOR_WIDTH
        ));
    }

    if board.rows.is_empty() {
        out.push_str("(No authors match the current filters)\n");
    }
    out.push_str(&format!(
        "{:-<72}\nShowing {} of {}\n",
        "",
        board.rows.len(),
        board.total_entries
    ));
    out
}

/// Truncate a name to fit in a column.
fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let kept: String = name.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LeaderboardEntry;
    use crate::pipeline::{build_leaderboard, Controls};

    fn entry(author: &str, score: f64, avatar: Option<&str>) -> LeaderboardEntry {
        LeaderboardEntry {
            profile_image_url: avatar.map(str::to_string),
            author: author.to_string(),
            average_score: score,
            number_played: 10,
            inactive_days: Some(1.0),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("abcdefghijkl", 10), "abcdefg...");
        assert_eq!(truncate_name("ééééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_row_markup() {
        let entries = vec![
            entry("Alice", 9.5, Some("https://img/a.png")),
            entry("Bob", 7.0, None),
        ];
        let board = build_leaderboard(&entries, &Controls::default());
        let table = render_table(&board);

        assert!(table.contains(r#"<tr class="top">"#));
        assert_eq!(table.matches(r#"class="top""#).count(), 1);
        assert!(table.contains(r#"<img class="avatar" src="https://img/a.png">"#));
        assert!(table.contains("<strong style='font-size:17px'>🥇Alice</strong>"));
        assert!(table.contains("<strong style='font-size:17px'>🥈Bob</strong>"));
        assert!(table.contains(r#"<td class="score-green">9.50</td>"#));
        assert!(table.contains(r#"<td class="score-orange">7.00</td>"#));
        assert_eq!(table.matches("<img").count(), 1);
        assert!(table.contains("<td></td>"));
    }

    #[test]
    fn test_author_and_url_are_escaped() {
        let entries = vec![entry("<script>", 8.0, Some(r#"x" onerror="y"#))];
        let board = build_leaderboard(&entries, &Controls::default());
        let table = render_table(&board);
        assert!(!table.contains("<script>"));
        assert!(table.contains("&lt;script&gt;"));
        assert!(table.contains(r#"src="x&quot; onerror=&quot;y""#));
    }

    #[test]
    fn test_empty_board_keeps_header() {
        let board = build_leaderboard(&[], &Controls::default());
        let page = render_page(&board, &PageOptions::default());
        for header in ["Profile", "Author", "Average Score", "Games Played"] {
            assert!(page.contains(&format!("<th>{}</th>", header)));
        }
        assert!(!page.contains("<td"));
        assert!(page.contains("Showing 0 of 0"));
    }

    #[test]
    fn test_page_shows_title_and_controls() {
        let board = build_leaderboard(&[], &Controls::default());
        let options = PageOptions {
            title: "Friday Cup".to_string(),
        };
        let page = render_page(&board, &options);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Friday Cup</title>"));
        assert!(page.contains("🏆 Friday Cup"));
        assert!(page.contains("Average Score (High → Low)"));
        assert!(page.contains("Played Within (Days):</span> 7"));
    }

    #[test]
    fn test_error_page_is_visible() {
        let page = render_error_page("file <missing>", &PageOptions::default());
        assert!(page.contains("Could not load the leaderboard"));
        assert!(page.contains("file &lt;missing&gt;"));
        assert!(!page.contains("<table"));
    }

    #[test]
    fn test_render_text() {
        let entries = vec![entry("Alice", 9.5, None), entry("Bob", 8.25, None)];
        let board = build_leaderboard(&entries, &Controls::default());
        let text = render_text(&board);
        assert!(text.contains("1st"));
        assert!(text.contains("2nd"));
        assert!(text.contains("9.50"));
        assert!(text.contains("8.25"));
        assert!(text.contains("Showing 2 of 2"));

        let empty = render_text(&build_leaderboard(&[], &Controls::default()));
        assert!(empty.contains("No authors match"));
    }
}
