//! Core types for posts and notifications.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Opaque identifier of a post.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId(s.to_string())
    }
}

/// Wallet address of a user.
///
/// Compared ASCII-case-insensitively: the same hex address shows up both
/// lowercased and checksum-cased depending on where it came from.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Self {
        WalletAddress(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for WalletAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for WalletAddress {}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self.0)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        WalletAddress(s.to_string())
    }
}

/// Milliseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_millis() as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// Fixed set of activity categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fitness,
    Learning,
    Creativity,
    Health,
    Social,
    Work,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Fitness,
        Category::Learning,
        Category::Creativity,
        Category::Health,
        Category::Social,
        Category::Work,
        Category::Other,
    ];

    /// Identifier used in storage and search.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fitness => "fitness",
            Category::Learning => "learning",
            Category::Creativity => "creativity",
            Category::Health => "health",
            Category::Social => "social",
            Category::Work => "work",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Fitness => "Fitness",
            Category::Learning => "Learning",
            Category::Creativity => "Creativity",
            Category::Health => "Health",
            Category::Social => "Social",
            Category::Work => "Work",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Category filter for the feed; `All` never appears on a post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// A user-authored activity update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,

    /// Author wallet; `None` for legacy records.
    #[serde(default)]
    pub wallet_address: Option<WalletAddress>,

    pub user_name: String,

    pub activity: String,

    #[serde(default)]
    pub category: Category,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub timestamp: Timestamp,

    /// Collectibles minted for this post.
    #[serde(default)]
    pub nft_count: u64,

    /// Total tips in cents.
    #[serde(default)]
    pub usdc_earned: u64,
}

impl Post {
    /// Whether `address` authored this post. Legacy posts have no author.
    pub fn is_authored_by(&self, address: Option<&WalletAddress>) -> bool {
        match (&self.wallet_address, address) {
            (Some(author), Some(addr)) => author == addr,
            _ => false,
        }
    }
}

/// Input for creating a post (before id/timestamp assigned).
#[derive(Clone, Debug, Default)]
pub struct PostDraft {
    pub wallet_address: Option<WalletAddress>,
    pub user_name: String,
    pub activity: String,
    pub category: Category,
    pub image: Option<String>,
}

impl PostDraft {
    pub fn new(
        wallet_address: impl Into<WalletAddress>,
        user_name: impl Into<String>,
        activity: impl Into<String>,
    ) -> Self {
        Self {
            wallet_address: Some(wallet_address.into()),
            user_name: user_name.into(),
            activity: activity.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Partial edit of a post. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct PostPatch {
    pub activity: Option<String>,
    pub category: Option<Category>,
    /// `Some(None)` removes the image.
    pub image: Option<Option<String>>,
}

/// Identifier of a notification: `notif_<millis>_<random suffix>`.
///
/// Uniqueness is best-effort.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub String);

impl NotificationId {
    const SUFFIX_LEN: usize = 9;

    pub fn generate(at: Timestamp) -> Self {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let mut rng = rand::thread_rng();
        let suffix: String = (0..Self::SUFFIX_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        NotificationId(format!("notif_{}_{}", at.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NotificationId({})", self.0)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(s: &str) -> Self {
        NotificationId(s.to_string())
    }
}

/// Classification of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Stablecoin tip received or sent.
    #[serde(rename = "usdc")]
    Tip,
    /// Collectible minted for a post.
    #[serde(rename = "nft")]
    Mint,
    #[serde(rename = "activity")]
    Activity,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "error")]
    Error,
}

impl NotificationKind {
    /// Money and collectibles stay on screen until dismissed.
    pub fn requires_interaction(&self) -> bool {
        matches!(self, NotificationKind::Tip | NotificationKind::Mint)
    }
}

/// Free-form context attached to a notification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,

    /// Tip amount in cents, or number of collectibles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,

    /// Display name of the counterpart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<WalletAddress>,
}

/// A single inbox entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    pub title: String,

    pub message: String,

    pub timestamp: Timestamp,

    pub read: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NotificationContext>,
}

/// Input for a new notification (before id, timestamp and read flag).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationInput {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: Option<NotificationContext>,
}

impl NotificationInput {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            data: None,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }

    pub fn with_data(mut self, data: NotificationContext) -> Self {
        self.data = Some(data);
        self
    }
}

/// Render cents as a dollar amount, e.g. `$5.00`.
pub fn format_usd(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Coarse relative age for display: `just now`, `5m ago`, `3h ago`, `2d ago`.
pub fn format_age(now: Timestamp, then: Timestamp) -> String {
    let diff = (now.0 - then.0).max(0);
    let minutes = diff / 60_000;
    let hours = diff / 3_600_000;
    let days = diff / 86_400_000;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", days)
    }
}

/// First `max_chars` characters of `text`, and whether anything was cut.
pub fn excerpt(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (text[..cut].to_string(), true),
        None => (text.to_string(), false),
    }
}
