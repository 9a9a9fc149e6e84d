use serde::Deserialize;

use crate::analytics::DeviceClass;

/// The full profile document: `{ profile, links, socialMedia, settings }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub profile: Profile,
    #[serde(default)]
    pub links: Vec<LinkCategory>,
    #[serde(default)]
    pub social_media: Vec<SocialMedia>,
    #[serde(default)]
    pub settings: SiteSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub bio: String,
    pub description: String,
    pub avatar: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub status: Status,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Available,
    Busy,
}

/// One named group of link cards.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkCategory {
    pub category: String,
    #[serde(default)]
    pub items: Vec<LinkItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub badge: Option<Badge>,
    pub is_active: Option<bool>,
    pub device_only: Option<DeviceClass>,
}

impl LinkItem {
    /// The analytics key for this link: its `id`, or a slug derived from the
    /// title when the document omits ids.
    pub fn slug(&self) -> String {
        if self.id.trim().is_empty() {
            slugify(&self.title)
        } else {
            self.id.clone()
        }
    }

    /// Links default to active unless explicitly disabled.
    pub fn active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Badge {
    New,
    Hot,
    Private,
    Hidden,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::New => "NEW",
            Badge::Hot => "HOT",
            Badge::Private => "PRIVATE",
            Badge::Hidden => "HIDDEN",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialMedia {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub site_name: String,
    pub copyright: String,
    pub enable_analytics: bool,
    pub theme: ThemeColors,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeColors {
    pub primary_color: String,
    pub accent_color: String,
}

/// Lowercase, whitespace runs become `_`, everything outside `[\w-]` is
/// dropped. Used for analytics slugs and export filenames.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push('_');
            pending_space = false;
        }
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        }
    }

    out
}
