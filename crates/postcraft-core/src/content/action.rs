//! Content actions and regeneration modifiers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A generation-family action sent to the content webhook.
///
/// `Display` yields the wire name expected by the webhook.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ContentAction {
    #[serde(rename = "generate")]
    #[strum(serialize = "generate")]
    Generate,
    #[serde(rename = "get_news")]
    #[strum(to_string = "get_news", serialize = "news")]
    GetNews,
    #[serde(rename = "spotlight")]
    #[strum(serialize = "spotlight")]
    Spotlight,
    #[serde(rename = "re-generate")]
    #[strum(to_string = "re-generate", serialize = "regenerate")]
    Regenerate,
    #[serde(rename = "generate_image")]
    #[strum(to_string = "generate_image", serialize = "image")]
    GenerateImage,
    #[serde(rename = "post_linkedin")]
    #[strum(to_string = "post_linkedin", serialize = "post")]
    PostLinkedin,
    #[serde(rename = "add_item")]
    #[strum(serialize = "add_item")]
    AddItem,
}

impl ContentAction {
    /// Success text for actions that publish or schedule content.
    pub fn success_notice(&self) -> Option<&'static str> {
        match self {
            Self::PostLinkedin => Some("Post successfully sent to LinkedIn!"),
            Self::AddItem => Some("Post successfully scheduled!"),
            _ => None,
        }
    }
}

/// Model used for regeneration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LlmModel {
    #[default]
    OpenAI,
    Claude,
    OpenRouter,
}

/// Length modifier for regeneration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LengthMode {
    #[default]
    #[serde(rename = "same")]
    #[strum(serialize = "same")]
    Same,
    Shorty,
    Extender,
}

/// Writing style for regeneration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum WritingStyle {
    #[default]
    #[serde(rename = "default")]
    #[strum(serialize = "default")]
    Default,
    #[serde(rename = "myStory")]
    #[strum(serialize = "myStory")]
    MyStory,
    WisdomDrop,
}

/// Request modifier attached to `re-generate` calls only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerateOptions {
    pub model: LlmModel,
    pub length: LengthMode,
    pub style: WritingStyle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(ContentAction::Regenerate.to_string(), "re-generate");
        assert_eq!(ContentAction::GetNews.to_string(), "get_news");
        assert_eq!(
            serde_json::to_value(ContentAction::PostLinkedin).unwrap(),
            "post_linkedin"
        );
    }

    #[test]
    fn test_action_aliases() {
        assert_eq!(
            ContentAction::from_str("regenerate").unwrap(),
            ContentAction::Regenerate
        );
        assert_eq!(
            ContentAction::from_str("re-generate").unwrap(),
            ContentAction::Regenerate
        );
        assert_eq!(ContentAction::from_str("post").unwrap(), ContentAction::PostLinkedin);
    }

    #[test]
    fn test_success_notice_only_for_publishing_actions() {
        assert!(ContentAction::PostLinkedin.success_notice().is_some());
        assert!(ContentAction::AddItem.success_notice().is_some());
        assert!(ContentAction::Generate.success_notice().is_none());
    }

    #[test]
    fn test_default_regenerate_options_serialization() {
        let json = serde_json::to_value(RegenerateOptions::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "OpenAI", "length": "same", "style": "default"})
        );
    }

    #[test]
    fn test_regenerate_option_parsing() {
        assert_eq!(LlmModel::from_str("openrouter").unwrap(), LlmModel::OpenRouter);
        assert_eq!(LengthMode::from_str("shorty").unwrap(), LengthMode::Shorty);
        assert_eq!(WritingStyle::from_str("mystory").unwrap(), WritingStyle::MyStory);
        assert_eq!(
            serde_json::to_value(WritingStyle::MyStory).unwrap(),
            "myStory"
        );
    }
}
