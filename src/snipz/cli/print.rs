use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use snipz::api::{CmdMessage, MessageLevel};
use snipz::model::Metadata;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const MAX_KEY_WIDTH: usize = 40;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        println!("{}", colorize(message));
    }
}

/// For commands whose stdout is data (`get`, `save`).
pub(super) fn eprint_messages(messages: &[CmdMessage]) {
    for message in messages {
        eprintln!("{}", colorize(message));
    }
}

fn colorize(message: &CmdMessage) -> colored::ColoredString {
    match message.level {
        MessageLevel::Info => message.content.dimmed(),
        MessageLevel::Success => message.content.green(),
        MessageLevel::Warning => message.content.yellow(),
    }
}

pub(super) fn print_tag_changes(added: &[String], removed: &[String]) {
    for tag in added {
        println!("  {} {}", "+".green(), tag);
    }
    for tag in removed {
        println!("  {} {}", "-".red(), tag);
    }
}

pub(super) fn print_records(records: &[Metadata], verbose: bool) {
    if records.is_empty() {
        println!("No snippets found.");
        return;
    }

    let now = Utc::now();
    let key_width = records
        .iter()
        .map(|r| r.key.width())
        .max()
        .unwrap_or(0)
        .min(MAX_KEY_WIDTH);

    for record in records {
        let key = truncate_to_width(&record.key, key_width);
        let key_pad = key_width.saturating_sub(key.width());

        let tags = if record.tags.is_empty() {
            String::new()
        } else {
            format!("[{}] ", record.tags)
        };

        let fixed = key_width + 2 + tags.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let description = truncate_to_width(&record.description.replace('\n', " "), available);
        let padding = available.saturating_sub(description.width());

        let key_colored = match record.kind {
            snipz::model::SnippetType::Url => key.blue(),
            snipz::model::SnippetType::Text => key.normal(),
        };

        println!(
            "{}{}  {}{}{}{}",
            key_colored,
            " ".repeat(key_pad),
            description,
            " ".repeat(padding),
            tags.cyan(),
            format_time_ago(record.modified, now).dimmed()
        );

        if verbose {
            println!(
                "{}",
                format!(
                    "    created {}  modified {}",
                    rfc3339(record.created),
                    rfc3339(record.modified)
                )
                .dimmed()
            );
        }
    }
}

pub(super) fn print_plain(records: &[Metadata], delimiter: &str, verbose: bool) {
    for record in records {
        println!("{}", format_plain_row(record, delimiter, verbose));
    }
}

/// `key, type, tags, description` joined by `delimiter`; verbose appends
/// created and modified.
fn format_plain_row(record: &Metadata, delimiter: &str, verbose: bool) -> String {
    let mut fields = vec![
        record.key.clone(),
        record.kind.to_string(),
        record.tags.clone(),
        record.description.replace('\n', " "),
    ];
    if verbose {
        fields.push(rfc3339(record.created));
        fields.push(rfc3339(record.modified));
    }
    fields.join(delimiter)
}

fn rfc3339(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
