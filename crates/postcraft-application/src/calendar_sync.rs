//! Calendar synchronizer use case.
//!
//! Keeps the local post list consistent with the scheduling endpoint. Removal
//! and scheduling always end in a full refresh; rescheduling patches the list
//! optimistically and settles it with the server's answer.

use chrono::{Local, NaiveDate};
use postcraft_core::calendar::{
    CalendarMutation, PostId, ScheduledPost, posts_on, validate_schedule_date, visible_posts,
};
use postcraft_core::error::{PostcraftError, Result};
use postcraft_core::gateway::WebhookGateway;
use postcraft_core::notification::{Notification, Notifier};
use postcraft_core::optimistic::Optimistic;
use std::sync::Arc;
use tokio::sync::RwLock;

const NO_POSTS: &str = "No scheduled posts found.";
const FETCH_FAILED: &str = "Failed to fetch calendar data. Please try again.";
const RESCHEDULED: &str = "Post rescheduled successfully";
const RESCHEDULE_FAILED: &str = "Failed to reschedule post. Please try again.";
const REMOVE_FAILED: &str = "Failed to remove post. Please try again.";
const SCHEDULED: &str = "Post successfully scheduled!";

pub struct CalendarSynchronizer {
    posts: Arc<RwLock<Optimistic<Vec<ScheduledPost>>>>,
    gateway: Arc<dyn WebhookGateway>,
    notifier: Arc<dyn Notifier>,
}

impl CalendarSynchronizer {
    pub fn new(gateway: Arc<dyn WebhookGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            posts: Arc::new(RwLock::new(Optimistic::default())),
            gateway,
            notifier,
        }
    }

    /// Every post held locally, including removed ones.
    pub async fn posts(&self) -> Vec<ScheduledPost> {
        self.posts.read().await.value().clone()
    }

    /// Posts for list views.
    pub async fn visible(&self) -> Vec<ScheduledPost> {
        let posts = self.posts.read().await;
        visible_posts(posts.value()).cloned().collect()
    }

    /// Posts for one grid day.
    pub async fn on_day(&self, date: NaiveDate) -> Vec<ScheduledPost> {
        let posts = self.posts.read().await;
        posts_on(posts.value(), date).into_iter().cloned().collect()
    }

    /// Dates that have at least one visible post.
    pub async fn scheduled_dates(&self) -> Vec<NaiveDate> {
        let posts = self.posts.read().await;
        let mut dates: Vec<NaiveDate> = visible_posts(posts.value())
            .filter_map(|post| post.date)
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Looks up a visible post by id as typed by the user.
    pub async fn find(&self, id: &str) -> Result<ScheduledPost> {
        let posts = self.posts.read().await;
        visible_posts(posts.value())
            .find(|post| post.id.as_ref().is_some_and(|post_id| post_id.matches(id)))
            .cloned()
            .ok_or_else(|| PostcraftError::validation(format!("No scheduled post with id {id}")))
    }

    /// Replaces the local list with the server's.
    pub async fn refresh(&self) -> Result<usize> {
        match self.gateway.get_calendar().await {
            Ok(posts) => {
                let count = posts.len();
                if count == 0 {
                    self.notifier.notify(Notification::info(NO_POSTS));
                }
                self.posts.write().await.replace(posts);
                tracing::info!(count, "Calendar refreshed");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Calendar refresh failed: {}", e);
                self.posts.write().await.replace(Vec::new());
                self.notifier.notify(Notification::error(FETCH_FAILED));
                Err(e)
            }
        }
    }

    /// Removes a post on the server, then refreshes. The local list is never
    /// edited before the refresh.
    pub async fn remove(&self, post: &ScheduledPost) -> Result<()> {
        ensure_changeable(post)?;
        tracing::info!(id = ?post.id, date = ?post.date, "Removing post");

        let removed = self.gateway.mutate_calendar(&CalendarMutation::remove(post)).await;
        if let Err(e) = &removed {
            tracing::warn!("Remove failed: {}", e);
            self.notifier.notify(Notification::error(REMOVE_FAILED));
        }

        let refreshed = self.refresh().await;
        removed?;
        refreshed.map(|_| ())
    }

    /// Moves a post to `new_date`, showing the change before the server answers.
    pub async fn reschedule(&self, post: &ScheduledPost, new_date: NaiveDate) -> Result<()> {
        ensure_changeable(post)?;
        let id = post
            .id
            .clone()
            .ok_or_else(|| PostcraftError::validation("Post has no id and cannot be rescheduled"))?;

        let ticket = self
            .posts
            .write()
            .await
            .apply(|posts| move_post(posts, &id, new_date));
        tracing::info!(id = %id, new_date = %new_date, "Rescheduling post");

        let outcome = self
            .gateway
            .mutate_calendar(&CalendarMutation::reschedule(post, new_date))
            .await
            .and_then(|posts| {
                posts.ok_or_else(|| PostcraftError::response_format("Unexpected response format"))
            });

        match outcome {
            Ok(server_posts) => {
                self.posts.write().await.confirm(ticket, server_posts);
                self.notifier.notify(Notification::success(RESCHEDULED));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %id, "Reschedule failed: {}", e);
                self.posts.write().await.rollback(ticket);
                self.notifier.notify(Notification::error(RESCHEDULE_FAILED));
                if let Err(refresh_error) = self.refresh().await {
                    tracing::warn!("Refresh after failed reschedule failed: {}", refresh_error);
                }
                Err(e)
            }
        }
    }

    /// Adds a post on the server, then refreshes whatever the add returned.
    pub async fn schedule_new(
        &self,
        date: NaiveDate,
        content: impl Into<String>,
        image_url: Option<String>,
    ) -> Result<()> {
        if let Err(e) = validate_schedule_date(date, Local::now().date_naive()) {
            self.notifier.notify(Notification::error(e.to_string()));
            return Err(e);
        }

        let added = self
            .gateway
            .mutate_calendar(&CalendarMutation::add_item(date, content, image_url))
            .await;
        match &added {
            Ok(_) => self.notifier.notify(Notification::success(SCHEDULED)),
            Err(e) => tracing::warn!(date = %date, "Scheduling failed: {}", e),
        }

        let refreshed = self.refresh().await;
        added?;
        refreshed.map(|_| ())
    }
}

fn ensure_changeable(post: &ScheduledPost) -> Result<()> {
    if post.status.allows_changes() {
        Ok(())
    } else {
        Err(PostcraftError::validation(format!(
            "Post '{}' is already {} and cannot be changed",
            post.display_title(),
            post.status
        )))
    }
}

fn move_post(posts: &mut [ScheduledPost], id: &PostId, new_date: NaiveDate) {
    for post in posts.iter_mut().filter(|post| post.has_id(id)) {
        post.date = Some(new_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CollectingNotifier, MockGateway};
    use postcraft_core::calendar::PostStatus;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    fn post(id: i64, day: &str, status: PostStatus) -> ScheduledPost {
        ScheduledPost {
            id: Some(PostId::Number(id)),
            date: Some(date(day)),
            status,
            title: Some(format!("Post {id}")),
            content: Some("body".into()),
            summary: None,
            image_url: None,
        }
    }

    fn synchronizer(gateway: MockGateway) -> (Arc<CalendarSynchronizer>, Arc<MockGateway>, Arc<CollectingNotifier>) {
        let gateway = Arc::new(gateway);
        let notifier = Arc::new(CollectingNotifier::default());
        let sync = Arc::new(CalendarSynchronizer::new(gateway.clone(), notifier.clone()));
        (sync, gateway, notifier)
    }

    #[tokio::test]
    async fn test_refresh_replaces_list() {
        let (sync, gateway, notifier) = synchronizer(MockGateway::new());
        gateway.push_calendar(Ok(vec![post(1, "2024-01-02", PostStatus::Planned)]));
        gateway.push_calendar(Ok(vec![post(2, "2024-01-03", PostStatus::Ready)]));

        assert_eq!(sync.refresh().await.unwrap(), 1);
        assert_eq!(sync.refresh().await.unwrap(), 1);
        assert_eq!(sync.posts().await[0].id, Some(PostId::Number(2)));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_refresh_is_a_notice_not_an_error() {
        let (sync, gateway, notifier) = synchronizer(MockGateway::new());
        gateway.push_calendar(Ok(Vec::new()));

        assert_eq!(sync.refresh().await.unwrap(), 0);
        assert_eq!(notifier.messages(), vec![NO_POSTS]);
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_empties_list() {
        let (sync, gateway, notifier) = synchronizer(MockGateway::new());
        gateway.push_calendar(Ok(vec![post(1, "2024-01-02", PostStatus::Planned)]));
        sync.refresh().await.unwrap();

        gateway.push_calendar(Err(PostcraftError::calendar_fetch("Server error: 500")));
        assert!(sync.refresh().await.unwrap_err().is_calendar_fetch());
        assert!(sync.posts().await.is_empty());
        assert_eq!(notifier.errors(), vec![FETCH_FAILED]);
    }

    #[tokio::test]
    async fn test_removed_posts_are_hidden_but_kept() {
        let (sync, gateway, _) = synchronizer(MockGateway::new());
        gateway.push_calendar(Ok(vec![
            post(1, "2024-01-02", PostStatus::Planned),
            post(2, "2024-01-02", PostStatus::Removed),
        ]));
        sync.refresh().await.unwrap();

        assert_eq!(sync.posts().await.len(), 2);
        assert_eq!(sync.visible().await.len(), 1);
        assert_eq!(sync.on_day(date("2024-01-02")).await.len(), 1);
        assert_eq!(sync.scheduled_dates().await, vec![date("2024-01-02")]);
        assert!(sync.find("2").await.is_err());
        assert!(sync.find("1").await.is_ok());
    }

    #[tokio::test]
    async fn test_reschedule_is_visible_before_server_answers() {
        let (gateway, entered, release) = MockGateway::new().with_mutation_gate();
        let (sync, gateway, notifier) = synchronizer(gateway);
        let original = post(42, "2024-01-02", PostStatus::Planned);
        gateway.push_calendar(Ok(vec![original.clone()]));
        sync.refresh().await.unwrap();

        let mut moved = original.clone();
        moved.date = Some(date("2024-01-10"));
        gateway.push_mutate(Ok(Some(vec![moved])));

        let task = {
            let sync = sync.clone();
            let original = original.clone();
            tokio::spawn(async move { sync.reschedule(&original, date("2024-01-10")).await })
        };

        entered.notified().await;
        assert_eq!(sync.posts().await[0].date, Some(date("2024-01-10")));

        release.notify_one();
        task.await.unwrap().unwrap();
        assert_eq!(sync.posts().await[0].date, Some(date("2024-01-10")));
        assert_eq!(notifier.messages(), vec![RESCHEDULED]);
    }

    #[tokio::test]
    async fn test_failed_reschedule_restores_server_state() {
        let (sync, gateway, notifier) = synchronizer(MockGateway::new());
        let original = post(42, "2024-01-02", PostStatus::Planned);
        gateway.push_calendar(Ok(vec![original.clone()]));
        sync.refresh().await.unwrap();

        gateway.push_mutate(Err(PostcraftError::server(500, "Internal Server Error")));
        gateway.push_calendar(Ok(vec![original.clone()]));

        let err = sync
            .reschedule(&original, date("2024-01-10"))
            .await
            .unwrap_err();
        assert!(err.is_server());
        assert_eq!(sync.posts().await[0].date, Some(date("2024-01-02")));
        assert_eq!(gateway.calendar_calls_left(), 0);
        assert_eq!(notifier.errors(), vec![RESCHEDULE_FAILED]);
    }

    #[tokio::test]
    async fn test_reschedule_without_list_counts_as_failure() {
        let (sync, gateway, _) = synchronizer(MockGateway::new());
        let original = post(7, "2024-03-01", PostStatus::Ready);
        gateway.push_calendar(Ok(vec![original.clone()]));
        sync.refresh().await.unwrap();

        gateway.push_mutate(Ok(None));
        gateway.push_calendar(Ok(vec![original.clone()]));

        let err = sync.reschedule(&original, date("2024-03-05")).await.unwrap_err();
        assert!(err.is_response_format());
        assert_eq!(sync.posts().await[0].date, Some(date("2024-03-01")));
    }

    #[tokio::test]
    async fn test_done_posts_cannot_change() {
        let (sync, gateway, _) = synchronizer(MockGateway::new());
        let done = post(1, "2024-01-02", PostStatus::Done);

        assert!(sync.remove(&done).await.is_err());
        assert!(sync.reschedule(&done, date("2024-01-03")).await.is_err());
        assert!(gateway.mutations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_waits_for_refresh() {
        let (gateway, entered, release) = MockGateway::new().with_mutation_gate();
        let (sync, gateway, _) = synchronizer(gateway);
        let target = post(5, "2024-01-04", PostStatus::Planned);
        gateway.push_calendar(Ok(vec![target.clone()]));
        sync.refresh().await.unwrap();

        gateway.push_mutate(Ok(None));
        gateway.push_calendar(Ok(Vec::new()));

        let task = {
            let sync = sync.clone();
            let target = target.clone();
            tokio::spawn(async move { sync.remove(&target).await })
        };

        entered.notified().await;
        assert_eq!(sync.visible().await.len(), 1);

        release.notify_one();
        task.await.unwrap().unwrap();
        assert!(sync.visible().await.is_empty());
        assert!(matches!(
            gateway.mutations.lock().unwrap()[0],
            CalendarMutation::Remove { .. }
        ));
    }

    #[tokio::test]
    async fn test_failed_remove_still_refreshes() {
        let (sync, gateway, notifier) = synchronizer(MockGateway::new());
        let target = post(5, "2024-01-04", PostStatus::Planned);
        gateway.push_mutate(Err(PostcraftError::network("timeout")));
        gateway.push_calendar(Ok(vec![target.clone()]));

        assert!(sync.remove(&target).await.unwrap_err().is_network());
        assert_eq!(sync.visible().await.len(), 1);
        assert_eq!(notifier.errors(), vec![REMOVE_FAILED]);
    }

    #[tokio::test]
    async fn test_schedule_new_always_refreshes() {
        let (sync, gateway, _) = synchronizer(MockGateway::new());
        let day = Local::now().date_naive();
        gateway.push_mutate(Err(PostcraftError::server(502, "Bad Gateway")));
        gateway.push_calendar(Ok(vec![post(9, &day.to_string(), PostStatus::Planned)]));

        let err = sync
            .schedule_new(day, "content", Some("https://img.example/x.png".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(sync.visible().await.len(), 1);

        let mutations = gateway.mutations.lock().unwrap();
        match &mutations[0] {
            CalendarMutation::AddItem { title, image_url, .. } => {
                assert_eq!(title, "Scheduled Post");
                assert_eq!(image_url, "https://img.example/x.png");
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schedule_new_rejects_past_dates() {
        let (sync, gateway, notifier) = synchronizer(MockGateway::new());
        let past = Local::now().date_naive() - chrono::Days::new(3);

        assert!(sync.schedule_new(past, "content", None).await.is_err());
        assert!(gateway.mutations.lock().unwrap().is_empty());
        assert_eq!(notifier.errors().len(), 1);
    }
}
