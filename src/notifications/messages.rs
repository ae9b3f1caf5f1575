//! User-facing wording for activity events.

use crate::events::{ActivityEvent, ActivityEventKind};
use crate::types::{format_usd, NotificationContext, NotificationInput, NotificationKind};

/// The notification an event should raise, if any.
///
/// Baselines never notify, and neither does the observer's own new post.
pub fn notification_for(event: &ActivityEvent) -> Option<NotificationInput> {
    match &event.kind {
        ActivityEventKind::Baseline { .. } => None,

        ActivityEventKind::NewPost { own: true, .. } => None,

        ActivityEventKind::NewPost {
            author,
            user_name,
            excerpt,
            truncated,
            own: false,
        } => {
            let ellipsis = if *truncated { "..." } else { "" };
            Some(
                NotificationInput::new(
                    NotificationKind::Activity,
                    "New Activity Posted",
                    format!("{} shared: \"{}{}\"", user_name, excerpt, ellipsis),
                )
                .with_data(NotificationContext {
                    post_id: Some(event.post_id.clone()),
                    user_id: author.clone(),
                    ..Default::default()
                }),
            )
        }

        ActivityEventKind::TipAccrued {
            delta,
            own_post,
            recipient,
            ..
        } => {
            let (title, message) = if *own_post {
                (
                    "USDC Received!",
                    format!("You received {} USDC for your activity!", format_usd(*delta)),
                )
            } else {
                (
                    "USDC Sent",
                    format!("You sent {} USDC to {}", format_usd(*delta), recipient),
                )
            };
            Some(
                NotificationInput::new(NotificationKind::Tip, title, message).with_data(
                    NotificationContext {
                        post_id: Some(event.post_id.clone()),
                        amount: Some(*delta),
                        recipient: Some(recipient.clone()),
                        ..Default::default()
                    },
                ),
            )
        }

        ActivityEventKind::Minted {
            delta,
            own_post,
            recipient,
            ..
        } => {
            let (title, message) = match (*own_post, *delta) {
                (true, 1) => (
                    "NFT Minted!",
                    "Someone minted an NFT for your activity!".to_string(),
                ),
                (true, n) => (
                    "NFT Minted!",
                    format!("{} NFTs were minted for your activity!", n),
                ),
                (false, _) => (
                    "NFT Sent",
                    format!("You minted an NFT for {}'s activity", recipient),
                ),
            };
            Some(
                NotificationInput::new(NotificationKind::Mint, title, message).with_data(
                    NotificationContext {
                        post_id: Some(event.post_id.clone()),
                        amount: Some(*delta),
                        recipient: Some(recipient.clone()),
                        ..Default::default()
                    },
                ),
            )
        }
    }
}
