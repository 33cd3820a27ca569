//! Slash-command parsing for the REPL.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use postcraft_core::content::{
    ContentAction, FormField, LengthMode, LlmModel, RegenerateOptions, WritingStyle,
};
use postcraft_core::recording::RecordingType;

/// Completion candidates, in help order.
pub const COMMANDS: &[&str] = &[
    "/set",
    "/draft",
    "/generate",
    "/news",
    "/spotlight",
    "/regenerate",
    "/image",
    "/upload",
    "/post",
    "/date",
    "/schedule",
    "/calendar",
    "/day",
    "/reschedule",
    "/remove",
    "/dictate",
    "/copy",
    "/show",
    "/status",
    "/reset",
    "/help",
    "quit",
];

pub const HELP: &str = "\
/set <news|personal|controversial|projects> <text>   fill a form field
/draft <text>                  replace the draft
/generate | /news | /spotlight generate content
/regenerate [model] [length] [style]
                               regenerate (OpenAI|Claude|OpenRouter, same|Shorty|Extender, default|myStory|WisdomDrop)
/image                         generate an image
/upload <path>                 upload an image (max 10MB)
/post                          publish to LinkedIn
/date <yyyy-mm-dd|clear>       set the scheduling date
/schedule                      schedule the content on the selected date
/schedule <yyyy-mm-dd>         add the content to the calendar directly
/calendar                      refresh and list scheduled posts
/day <yyyy-mm-dd>              show posts on one day
/reschedule <id> <yyyy-mm-dd>  move a post
/remove <id>                   remove a post
/dictate <personal|project|provoking|stop|cancel>
                               toggle voice dictation
/copy                          copy the preview as plain text
/show | /status | /reset | /help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum DictateCommand {
    Toggle(RecordingType),
    Stop,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Set(FormField, String),
    Draft(String),
    Run(ContentAction),
    Regenerate(RegenerateOptions),
    Upload(PathBuf),
    Date(Option<NaiveDate>),
    ScheduleAction,
    ScheduleOn(NaiveDate),
    Calendar,
    Day(NaiveDate),
    Reschedule { id: String, date: NaiveDate },
    Remove(String),
    Dictate(DictateCommand),
    Copy,
    Show,
    Status,
    Reset,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    if line == "quit" || line == "exit" {
        return Ok(ReplCommand::Quit);
    }
    let Some(body) = line.strip_prefix('/') else {
        bail!("Unknown input. Commands start with '/', try /help");
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match name {
        "set" => {
            let (field, text) = rest
                .split_once(char::is_whitespace)
                .map(|(field, text)| (field, text.trim()))
                .unwrap_or((rest, ""));
            let field = FormField::from_str(field)
                .with_context(|| format!("Unknown field '{field}'"))?;
            ReplCommand::Set(field, text.to_string())
        }
        "draft" => ReplCommand::Draft(rest.to_string()),
        "generate" => ReplCommand::Run(ContentAction::Generate),
        "news" => ReplCommand::Run(ContentAction::GetNews),
        "spotlight" => ReplCommand::Run(ContentAction::Spotlight),
        "image" => ReplCommand::Run(ContentAction::GenerateImage),
        "post" => ReplCommand::Run(ContentAction::PostLinkedin),
        "regenerate" => ReplCommand::Regenerate(parse_regenerate(&args)?),
        "upload" => {
            if rest.is_empty() {
                bail!("Usage: /upload <path>");
            }
            ReplCommand::Upload(PathBuf::from(rest))
        }
        "date" => match args.as_slice() {
            ["clear"] => ReplCommand::Date(None),
            [date] => ReplCommand::Date(Some(parse_date(date)?)),
            _ => bail!("Usage: /date <yyyy-mm-dd|clear>"),
        },
        "schedule" => match args.as_slice() {
            [] => ReplCommand::ScheduleAction,
            [date] => ReplCommand::ScheduleOn(parse_date(date)?),
            _ => bail!("Usage: /schedule [yyyy-mm-dd]"),
        },
        "calendar" => ReplCommand::Calendar,
        "day" => match args.as_slice() {
            [date] => ReplCommand::Day(parse_date(date)?),
            _ => bail!("Usage: /day <yyyy-mm-dd>"),
        },
        "reschedule" => match args.as_slice() {
            [id, date] => ReplCommand::Reschedule {
                id: id.to_string(),
                date: parse_date(date)?,
            },
            _ => bail!("Usage: /reschedule <id> <yyyy-mm-dd>"),
        },
        "remove" => match args.as_slice() {
            [id] => ReplCommand::Remove(id.to_string()),
            _ => bail!("Usage: /remove <id>"),
        },
        "dictate" => match args.as_slice() {
            ["stop"] | [] => ReplCommand::Dictate(DictateCommand::Stop),
            ["cancel"] => ReplCommand::Dictate(DictateCommand::Cancel),
            [kind] => ReplCommand::Dictate(DictateCommand::Toggle(
                RecordingType::from_str(kind)
                    .with_context(|| format!("Unknown dictation type '{kind}'"))?,
            )),
            _ => bail!("Usage: /dictate <personal|project|provoking|stop|cancel>"),
        },
        "copy" => ReplCommand::Copy,
        "show" => ReplCommand::Show,
        "status" => ReplCommand::Status,
        "reset" => ReplCommand::Reset,
        "help" => ReplCommand::Help,
        other => bail!("Unknown command '/{other}', try /help"),
    };
    Ok(command)
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{text}', expected yyyy-mm-dd"))
}

/// Positional `[model] [length] [style]`; omitted values keep their defaults.
fn parse_regenerate(args: &[&str]) -> Result<RegenerateOptions> {
    let mut options = RegenerateOptions::default();
    if let Some(model) = args.first() {
        options.model =
            LlmModel::from_str(model).with_context(|| format!("Unknown model '{model}'"))?;
    }
    if let Some(length) = args.get(1) {
        options.length =
            LengthMode::from_str(length).with_context(|| format!("Unknown length '{length}'"))?;
    }
    if let Some(style) = args.get(2) {
        options.style =
            WritingStyle::from_str(style).with_context(|| format!("Unknown style '{style}'"))?;
    }
    if args.len() > 3 {
        bail!("Usage: /regenerate [model] [length] [style]");
    }
    Ok(options)
}
