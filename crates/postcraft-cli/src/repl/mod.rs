//! Interactive shell.

mod command;
mod helper;

use std::sync::Arc;

use anyhow::{Result, bail};
use colored::Colorize;
use postcraft_application::{
    CalendarSynchronizer, ChannelNotifier, ContentSession, RecordingPhase, RecordingSession,
};
use postcraft_core::content::ContentAction;
use postcraft_core::notification::Notification;
use postcraft_interaction::load_image;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc::UnboundedReceiver;

use self::command::{DictateCommand, HELP, ReplCommand};
use self::helper::ReplHelper;
use crate::bootstrap::AppContext;
use crate::clipboard::{self, COPIED, COPY_FAILED};
use crate::commands::flush_notifications;
use crate::render;

struct Shell {
    content: Arc<ContentSession>,
    calendar: Arc<CalendarSynchronizer>,
    recording: RecordingSession,
    notices: UnboundedReceiver<Notification>,
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let (notifier, notices) = ChannelNotifier::new();
    let notifier = Arc::new(notifier);
    let content = ctx.content_session(notifier.clone())?;
    let calendar = ctx.calendar(notifier.clone())?;
    let recording = ctx.recording_session(content.clone(), notifier);

    let mut shell = Shell {
        content,
        calendar,
        recording,
        notices,
    };

    println!("{}", "=== Postcraft ===".bright_magenta().bold());
    if shell.content.restore().await {
        println!("{}", "Restored content from the previous session.".bright_black());
        render::print_content(&shell.content.snapshot().await);
    }
    println!(
        "{}",
        "Type '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ReplHelper::new()));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let outcome = match command::parse(trimmed) {
                    Ok(ReplCommand::Quit) => break,
                    Ok(command) => shell.execute(command).await,
                    Err(e) => Err(e),
                };
                let notified = flush_notifications(&mut shell.notices);
                if let Err(e) = outcome {
                    tracing::debug!("Command failed: {:#}", e);
                    if notified == 0 {
                        eprintln!("{}", format!("Error: {e:#}").red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    shell.recording.cancel().await;
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

impl Shell {
    async fn execute(&self, command: ReplCommand) -> Result<()> {
        match command {
            ReplCommand::Set(field, text) => self.content.set_field(field, text).await,
            ReplCommand::Draft(text) => self.content.set_draft(text).await,
            ReplCommand::Run(action) => self.run_action(action).await?,
            ReplCommand::Regenerate(options) => {
                self.content.set_regenerate_options(options).await;
                self.run_action(ContentAction::Regenerate).await?;
            }
            ReplCommand::Upload(path) => {
                let image = load_image(&path).await?;
                let url = self.content.upload_image(image).await?;
                println!("{} {}", "[image]".bright_magenta(), url);
            }
            ReplCommand::Date(date) => {
                self.content.set_scheduled_date(date).await;
                match date {
                    Some(date) => println!("{} {}", "Scheduling date:".bright_black(), date),
                    None => println!("{}", "Scheduling date cleared.".bright_black()),
                }
            }
            ReplCommand::ScheduleAction => self.run_action(ContentAction::AddItem).await?,
            ReplCommand::ScheduleOn(date) => {
                let machine = self.content.snapshot().await;
                let Some(text) = machine.preview_text().map(str::to_string) else {
                    bail!("Nothing to schedule yet");
                };
                let image = machine.image().map(str::to_string);
                let scheduled = self.calendar.schedule_new(date, text, image).await;
                self.content.set_scheduled_date(None).await;
                render::print_posts(&self.calendar.visible().await);
                scheduled?;
            }
            ReplCommand::Calendar => {
                self.calendar.refresh().await?;
                render::print_posts(&self.calendar.visible().await);
            }
            ReplCommand::Day(date) => {
                let posts = self.calendar.on_day(date).await;
                if posts.is_empty() {
                    println!("{}", format!("No posts on {date}.").bright_black());
                }
                for post in &posts {
                    render::print_post_detail(post);
                }
            }
            ReplCommand::Reschedule { id, date } => {
                let post = self.calendar.find(&id).await?;
                self.calendar.reschedule(&post, date).await?;
                render::print_posts(&self.calendar.visible().await);
            }
            ReplCommand::Remove(id) => {
                let post = self.calendar.find(&id).await?;
                self.calendar.remove(&post).await?;
                render::print_posts(&self.calendar.visible().await);
            }
            ReplCommand::Dictate(dictate) => self.dictate(dictate).await?,
            ReplCommand::Copy => {
                let text = self.content.copy_text().await;
                match clipboard::copy_to_clipboard(&text) {
                    Ok(()) => println!("{}", COPIED.bright_green()),
                    Err(e) => {
                        tracing::warn!("Clipboard copy failed: {:#}", e);
                        println!("{}", COPY_FAILED.red());
                    }
                }
            }
            ReplCommand::Show => render::print_content(&self.content.snapshot().await),
            ReplCommand::Status => {
                println!(
                    "{} {}",
                    "content:".bright_black(),
                    render::state_label(&self.content.state().await)
                );
                println!(
                    "{} {}",
                    "dictation:".bright_black(),
                    self.recording.phase().await
                );
                println!(
                    "{} {} scheduled",
                    "calendar:".bright_black(),
                    self.calendar.visible().await.len()
                );
            }
            ReplCommand::Reset => {
                self.recording.cancel().await;
                self.content.reset().await?;
                println!("{}", "Cleared.".bright_black());
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => {}
        }
        Ok(())
    }

    async fn run_action(&self, action: ContentAction) -> Result<()> {
        println!("{}", format!("Running {action}...").bright_black());
        self.content.run(action).await?;
        render::print_content(&self.content.snapshot().await);
        Ok(())
    }

    async fn dictate(&self, dictate: DictateCommand) -> Result<()> {
        match dictate {
            DictateCommand::Toggle(kind) => {
                let routed = self.recording.toggle(kind).await?;
                if routed.is_some() {
                    render::print_content(&self.content.snapshot().await);
                }
            }
            DictateCommand::Stop => {
                if self.recording.stop().await?.is_some() {
                    render::print_content(&self.content.snapshot().await);
                }
            }
            DictateCommand::Cancel => self.recording.cancel().await,
        }
        if let RecordingPhase::Recording(kind) = self.recording.phase().await {
            println!(
                "{}",
                format!("Recording {kind}... '/dictate {kind}' again to stop.").yellow()
            );
        }
        Ok(())
    }
}
