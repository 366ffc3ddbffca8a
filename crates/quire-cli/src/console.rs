//! Human-facing progress lines on stdout. Logs go to stderr.

use owo_colors::OwoColorize;
use quire_renderer::SyncedSnippet;

pub fn status(emoji: &str, message: &str) {
    println!("{emoji} {}", message.green());
}

pub fn substatus(message: &str) {
    println!("   └─ {message}");
}

/// OSC 8 terminal hyperlink
pub fn linkify(url: &str, label: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{label}\x1b]8;;\x1b\\")
}

/// Created gists are announced in green, updates in blue
pub fn snippet_line(snippet: &SyncedSnippet) -> String {
    let link = linkify(&snippet.html_url, &snippet.filename);
    if snippet.created {
        format!("{} {link}", "creating new gist".green())
    } else {
        format!("{} {link}", "updating existing gist".blue())
    }
}
