//! HTML fragments summarising search results.
//!
//! Timestamps use local time, `dd/mm/YYYY HH:MM:SS`.

use super::{ModifiedFile, PhraseMatches, Since};
use chrono::{DateTime, Local};
use std::fmt::Write;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Render a modified-file search.
pub fn render_modified_report(
    root: &Path,
    since: Since,
    files: &[ModifiedFile],
    generated_at: DateTime<Local>,
) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<h1>Files modified since {} under {} at {}</h1>",
        escape(&since.to_string()),
        escape(&root.display().to_string()),
        generated_at.format(TIMESTAMP_FORMAT)
    );

    if files.is_empty() {
        html.push_str("No files found\n");
        return html;
    }

    html.push_str("<table>\n");
    for file in files {
        let modified = DateTime::<Local>::from(file.modified);
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            modified.format(TIMESTAMP_FORMAT),
            escape(&file.path.display().to_string())
        );
    }
    html.push_str("</table>\n");
    html
}

/// Render a phrase search. `query` is the phrase list as the user gave it.
pub fn render_phrase_report(
    root: &Path,
    query: &str,
    results: &[PhraseMatches],
    generated_at: DateTime<Local>,
) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<h1>Files containing phrase from &quot;{}&quot; under {} at {}</h1>",
        escape(query),
        escape(&root.display().to_string()),
        generated_at.format(TIMESTAMP_FORMAT)
    );

    if results.is_empty() {
        html.push_str("<p>No phrases found to search for</p>\n");
        return html;
    }

    for result in results {
        let _ = writeln!(html, "<h2>Phrase = {}</h2>", escape(&result.phrase));
        if result.files.is_empty() {
            html.push_str("<p>No matches found</p>\n");
        }
        for file in &result.files {
            let _ = writeln!(html, "<p>{}</p>", escape(&file.display().to_string()));
        }
    }
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
