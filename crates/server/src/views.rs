//! Server-rendered HTML pages.

use skill_analyzer::AnalysisResult;

use crate::db::UploadedGameRecord;

const STYLE: &str = r#"
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 720px;
            margin: 40px auto;
            padding: 0 20px;
            color: #222;
        }
        h1 { color: #2f5d8a; }
        .card {
            border: 1px solid #ddd;
            border-radius: 6px;
            padding: 16px 20px;
            margin: 16px 0;
        }
        .stat { margin: 4px 0; }
        .category { font-size: 22px; font-weight: 600; }
        .muted { color: #777; }
        .button {
            display: inline-block;
            padding: 8px 16px;
            background: #2f5d8a;
            color: #fff;
            border-radius: 4px;
            text-decoration: none;
        }
"#;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// GET /upload
pub fn upload_page() -> String {
    page(
        "Upload a game",
        r#"<h1>Analyze your game</h1>
<p>Upload a PGN file and choose which side you played.</p>
<form class="card" method="post" action="/upload" enctype="multipart/form-data">
    <p><input type="file" name="file" accept=".pgn,text/plain" required></p>
    <p>
        <label for="player_color">I played</label>
        <select id="player_color" name="player_color">
            <option value="white" selected>White</option>
            <option value="black">Black</option>
        </select>
    </p>
    <p><button class="button" type="submit">Upload</button></p>
</form>"#,
    )
}

/// GET /upload/success
pub fn upload_success_page(record_id: Option<i64>) -> String {
    let results_link = match record_id {
        Some(id) => format!("/results?record_id={id}"),
        None => "/results".to_string(),
    };
    page(
        "Upload complete",
        &format!(
            r#"<h1>File uploaded</h1>
<p>Your game was saved. Analysis takes about one second per move.</p>
<p><a class="button" href="{results_link}">View analysis</a></p>
<p><a href="/upload">Upload another game</a></p>"#
        ),
    )
}

/// GET /results
pub fn results_page(
    record: Option<&UploadedGameRecord>,
    analysis: Option<&AnalysisResult>,
) -> String {
    let Some(record) = record else {
        return page(
            "Analysis",
            r#"<h1>No games yet</h1>
<p class="muted">Nothing has been uploaded.</p>
<p><a class="button" href="/upload">Upload a game</a></p>"#,
        );
    };

    let header = format!(
        r#"<h1>Analysis</h1>
<div class="card">
    <div class="stat">File: {name}</div>
    <div class="stat">Uploaded: {uploaded}</div>
    <div class="stat">Analyzed side: {color}</div>
</div>"#,
        name = escape_html(&record.file_name),
        uploaded = record.uploaded_at.format("%Y-%m-%d %H:%M UTC"),
        color = record.player_color,
    );

    let Some(analysis) = analysis else {
        return page(
            "Analysis",
            &format!(
                r#"{header}
<p class="muted">No game could be read from this file.</p>
<p><a href="/upload">Upload another game</a></p>"#
            ),
        );
    };

    let resources: String = analysis
        .learning_resources
        .iter()
        .map(|r| format!("        <li>{}</li>\n", escape_html(r)))
        .collect();

    page(
        "Analysis",
        &format!(
            r#"{header}
<div class="card">
    <div class="category">{category}</div>
    <div class="stat">Games analyzed: {games}</div>
    <div class="stat">Moves analyzed: {moves}</div>
    <div class="stat">Average centipawn loss: {average:.1}</div>
    <div class="stat">Skill score: {scaled:.2}</div>
</div>
<div class="card">
    <h2>Recommended study</h2>
    <ul>
{resources}    </ul>
    <p><a class="button" href="/download-pdf/{id}?category={category}">Download the {category} guide</a></p>
</div>
<p><a href="/upload">Upload another game</a></p>"#,
            category = analysis.category,
            games = analysis.total_games,
            moves = analysis.total_moves,
            average = analysis.average_cpl,
            scaled = analysis.scaled_cpl,
            id = record.id,
        ),
    )
}
