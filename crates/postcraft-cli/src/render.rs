//! Terminal rendering for posts, content and notifications.

use colored::{ColoredString, Colorize};
use postcraft_core::calendar::{PostStatus, ScheduledPost};
use postcraft_core::content::{ContentMachine, ContentState, FormField};
use postcraft_core::notification::{Notification, NotificationLevel};
use strum::IntoEnumIterator;

pub fn status_label(status: &PostStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        PostStatus::Planned => label.yellow(),
        PostStatus::Ready => label.blue(),
        PostStatus::Done => label.green(),
        _ => label.bright_black(),
    }
}

/// One line per post: id, date, status and title.
pub fn post_line(post: &ScheduledPost) -> String {
    let id = post
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>6}  {}  {:<8} {}",
        id.bright_black(),
        post.formatted_date(),
        status_label(&post.status),
        post.display_title()
    )
}

pub fn print_posts(posts: &[ScheduledPost]) {
    for post in posts {
        println!("{}", post_line(post));
    }
}

pub fn print_post_detail(post: &ScheduledPost) {
    println!("{}", post_line(post));
    if let Some(summary) = post.summary.as_deref().filter(|s| !s.is_empty()) {
        println!("  {}", summary.italic());
    }
    if let Some(content) = post.content.as_deref() {
        for line in content.lines() {
            println!("  {line}");
        }
    }
    if let Some(url) = post.image_url.as_deref() {
        println!("  {} {}", "image:".bright_black(), url);
    }
}

pub fn print_notification(notification: &Notification) {
    let line = match notification.level {
        NotificationLevel::Info => notification.message.bright_black(),
        NotificationLevel::Success => notification.message.bright_green(),
        NotificationLevel::Error => notification.message.red(),
    };
    println!("{line}");
}

pub fn state_label(state: &ContentState) -> String {
    match state {
        ContentState::Idle => "idle".to_string(),
        ContentState::Loading { action, .. } => format!("loading ({action})"),
        ContentState::Loaded(_) => "loaded".to_string(),
        ContentState::Failed { action, error, .. } => format!("failed ({action}): {error}"),
    }
}

/// Form fields, draft, image and the preview.
pub fn print_content(machine: &ContentMachine) {
    for field in FormField::iter() {
        let value = machine.form().get(field);
        if !value.is_empty() {
            println!("{} {}", format!("[{field}]").bright_magenta(), value);
        }
    }
    if let Some(date) = machine.scheduled_date() {
        println!("{} {}", "[date]".bright_magenta(), date);
    }
    if let Some(url) = machine.image() {
        println!("{} {}", "[image]".bright_magenta(), url);
    }
    match machine.preview_text() {
        Some(text) => {
            println!("{}", "--- preview ---".bright_black());
            for line in text.lines() {
                println!("{}", line.bright_blue());
            }
        }
        None => println!("{}", "Nothing generated yet.".bright_black()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postcraft_core::calendar::PostId;

    #[test]
    fn test_post_line_falls_back_for_missing_fields() {
        colored::control::set_override(false);
        let post = ScheduledPost {
            id: None,
            date: None,
            status: PostStatus::Other("draft".into()),
            title: None,
            content: None,
            summary: None,
            image_url: None,
        };
        let line = post_line(&post);
        assert!(line.contains("No date"));
        assert!(line.contains("Untitled"));
        assert!(line.contains("draft"));
    }

    #[test]
    fn test_post_line_shows_id_and_date() {
        colored::control::set_override(false);
        let post = ScheduledPost {
            id: Some(PostId::Number(12)),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 5),
            status: PostStatus::Planned,
            title: Some("Launch".into()),
            content: None,
            summary: None,
            image_url: None,
        };
        let line = post_line(&post);
        assert!(line.contains("12"));
        assert!(line.contains("Jan 05, 2024"));
        assert!(line.contains("planned"));
    }
}
