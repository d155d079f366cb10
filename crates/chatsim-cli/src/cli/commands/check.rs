//! `chatsim check`: validates a content file and prints its timeline.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chatsim_core::config::Config;
use chatsim_core::content::{Presentation, load_presentation};
use chatsim_core::core::sequencer::StartBehavior;
use chatsim_core::message::Origin;
use chatsim_core::timeline::{Timeline, estimate_timeline};
use comfy_table::{ContentArrangement, Table};
use serde_json::json;

/// Longest message preview shown in the table, in characters.
const PREVIEW_CHARS: usize = 40;

pub fn run(file: &Path, config: &Config, as_json: bool) -> Result<()> {
    let presentation = load_presentation(file, config.playback_defaults())
        .with_context(|| format!("check {}", file.display()))?;
    let timeline = estimate_timeline(&presentation.messages);

    if as_json {
        let report = json_report(&presentation, &timeline);
        let rendered = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{rendered}");
    } else {
        print!("{}", text_report(&presentation, &timeline));
    }
    Ok(())
}

fn origin_counts(presentation: &Presentation) -> (usize, usize) {
    let left = presentation
        .messages
        .iter()
        .filter(|message| message.origin == Origin::Left)
        .count();
    (left, presentation.messages.len() - left)
}

fn text_report(presentation: &Presentation, timeline: &Timeline) -> String {
    let mut report = String::new();
    let (left, right) = origin_counts(presentation);
    let navigation = if presentation.show_navigation_bar() {
        "shown"
    } else {
        "hidden"
    };

    report.push_str(&format!("Content: {}\n", presentation.content_id));
    report.push_str(&format!(
        "Messages: {} (left: {left}, right: {right})\n",
        presentation.messages.len()
    ));
    report.push_str(&format!("Start behavior: {}\n", start_label(presentation)));
    report.push_str(&format!("Navigation bar: {navigation}\n"));

    if presentation.messages.is_empty() {
        report.push_str(&presentation.dictionary.get("l10n.noMessages"));
        report.push('\n');
        return report;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["#", "Origin", "Author", "Text", "Starts", "Typing", "Revealed"]);
    for (message, entry) in presentation.messages.iter().zip(&timeline.entries) {
        table.add_row([
            (entry.index + 1).to_string(),
            message.origin.to_string(),
            message.user_name.clone().unwrap_or_default(),
            preview(&message.text),
            seconds(entry.starts_at),
            seconds(entry.typing),
            seconds(entry.revealed_at),
        ]);
    }
    report.push_str(&table.to_string());
    report.push('\n');
    report.push_str(&format!("Estimated duration: {}\n", seconds(timeline.total)));
    report
}

fn json_report(presentation: &Presentation, timeline: &Timeline) -> serde_json::Value {
    let (left, right) = origin_counts(presentation);
    let messages: Vec<_> = presentation
        .messages
        .iter()
        .zip(&timeline.entries)
        .map(|(message, entry)| {
            json!({
                "index": entry.index,
                "origin": message.origin,
                "userName": message.user_name,
                "text": message.text,
                "startsAtMs": millis(entry.starts_at),
                "typingMs": millis(entry.typing),
                "revealedAtMs": millis(entry.revealed_at),
            })
        })
        .collect();

    json!({
        "contentId": presentation.content_id.to_string(),
        "startBehavior": presentation.start_behavior,
        "showNavigationBar": presentation.show_navigation_bar(),
        "origins": { "left": left, "right": right },
        "totalMs": millis(timeline.total),
        "messages": messages,
    })
}

fn start_label(presentation: &Presentation) -> &'static str {
    match presentation.start_behavior {
        StartBehavior::Auto => "auto",
        StartBehavior::Manually => "manually",
    }
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(PREVIEW_CHARS - 1).collect();
    cut.push('…');
    cut
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}
