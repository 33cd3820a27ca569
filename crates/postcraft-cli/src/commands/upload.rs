use anyhow::Result;
use postcraft_application::ChannelNotifier;
use postcraft_interaction::load_image;
use std::path::Path;
use std::sync::Arc;

use super::flush_notifications;
use crate::bootstrap::AppContext;

/// Uploads an image and prints its hosted URL.
pub async fn run(ctx: &AppContext, path: &Path) -> Result<()> {
    let (notifier, mut notices) = ChannelNotifier::new();
    let session = ctx.content_session(Arc::new(notifier))?;

    let image = load_image(path).await?;
    let result = session.upload_image(image).await;
    flush_notifications(&mut notices);

    println!("{}", result?);
    Ok(())
}
