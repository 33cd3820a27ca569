use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use postcraft_application::ChannelNotifier;
use std::sync::Arc;

use super::flush_notifications;
use crate::bootstrap::AppContext;
use crate::render;

#[derive(Subcommand)]
pub enum CalendarAction {
    /// List posts for the next two weeks
    List {
        /// Include removed posts
        #[arg(long)]
        all: bool,
        /// Only posts on this date (yyyy-mm-dd)
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    /// Remove a post by id
    Remove { id: String },
    /// Move a post to another date
    Reschedule { id: String, date: NaiveDate },
    /// Schedule content on a date
    Schedule {
        date: NaiveDate,
        /// Post body. Defaults to the last generated content.
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
}

pub async fn run(ctx: &AppContext, action: CalendarAction) -> Result<()> {
    let (notifier, mut notices) = ChannelNotifier::new();
    let notifier = Arc::new(notifier);
    let calendar = ctx.calendar(notifier.clone())?;

    let result = match action {
        CalendarAction::List { all, day } => {
            let fetched = calendar.refresh().await.map(|_| ());
            if fetched.is_ok() {
                let posts = match (day, all) {
                    (Some(day), _) => calendar.on_day(day).await,
                    (None, true) => calendar.posts().await,
                    (None, false) => calendar.visible().await,
                };
                render::print_posts(&posts);
            }
            fetched
        }
        CalendarAction::Remove { id } => match find(&calendar, &id).await {
            Ok(post) => calendar.remove(&post).await,
            Err(e) => Err(e),
        },
        CalendarAction::Reschedule { id, date } => match find(&calendar, &id).await {
            Ok(post) => calendar.reschedule(&post, date).await,
            Err(e) => Err(e),
        },
        CalendarAction::Schedule {
            date,
            content,
            image_url,
        } => {
            let (content, image_url) = match content {
                Some(content) => (content, image_url),
                None => last_generated(ctx, notifier.clone(), image_url).await?,
            };
            calendar.schedule_new(date, content, image_url).await
        }
    };

    flush_notifications(&mut notices);
    Ok(result?)
}

async fn find(
    calendar: &postcraft_application::CalendarSynchronizer,
    id: &str,
) -> postcraft_core::Result<postcraft_core::calendar::ScheduledPost> {
    calendar.refresh().await?;
    calendar.find(id).await
}

/// Draft or generated text from the session cache, plus its image.
async fn last_generated(
    ctx: &AppContext,
    notifier: Arc<ChannelNotifier>,
    image_url: Option<String>,
) -> Result<(String, Option<String>)> {
    let session = ctx.content_session(notifier)?;
    session.restore().await;
    let machine = session.snapshot().await;
    let content = machine
        .preview_text()
        .map(str::to_string)
        .context("No content to schedule: pass --content or generate something first")?;
    let image_url = image_url.or_else(|| machine.image().map(str::to_string));
    Ok((content, image_url))
}
