//! The `App` struct holds the loaded profile, the flattened link list with
//! its cursor and filters, and the state of every overlay panel.

use std::collections::BTreeMap;

use crate::analytics::{DeviceClass, LinkStats};
use crate::contact::{ContactForm, Field, FieldError};
use crate::i18n::Lang;
use crate::profile::{LinkItem, ProfileData};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Which panel is drawn on top of the link list, if any.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Player,
    Analytics,
    Contact,
    Share,
}

/// One renderable link card: its item plus the category it came from.
#[derive(Debug, Clone)]
pub struct FlatLink {
    pub category: String,
    pub item: LinkItem,
}

/// The main application model.
pub struct App {
    pub profile: Option<ProfileData>,
    pub data_error: Option<String>,
    pub playlist_error: Option<String>,

    links: Vec<FlatLink>,
    categories: Vec<String>,
    pub selected: usize,
    /// `None` means all categories.
    pub category: Option<String>,
    pub search_mode: bool,
    pub search_query: String,

    pub theme: Theme,
    pub lang: Lang,
    pub overlay: Overlay,
    pub status: Option<String>,

    pub analytics_snapshot: BTreeMap<String, LinkStats>,

    pub contact: ContactForm,
    pub contact_focus: Field,
    pub contact_errors: Vec<FieldError>,

    pub should_quit: bool,
}

impl App {
    pub fn new(theme: Theme, lang: Lang) -> Self {
        Self {
            profile: None,
            data_error: None,
            playlist_error: None,
            links: Vec::new(),
            categories: Vec::new(),
            selected: 0,
            category: None,
            search_mode: false,
            search_query: String::new(),
            theme,
            lang,
            overlay: Overlay::None,
            status: None,
            analytics_snapshot: BTreeMap::new(),
            contact: ContactForm::default(),
            contact_focus: Field::Name,
            contact_errors: Vec::new(),
            should_quit: false,
        }
    }

    /// Install a loaded profile and rebuild the flattened link list.
    /// Inactive and mobile-only links are dropped (this is a desktop
    /// surface); category order follows the document.
    pub fn set_profile(&mut self, data: ProfileData) {
        self.links = data
            .links
            .iter()
            .flat_map(|group| {
                group
                    .items
                    .iter()
                    .filter(|item| {
                        item.active() && item.device_only != Some(DeviceClass::Mobile)
                    })
                    .map(|item| FlatLink {
                        category: group.category.clone(),
                        item: item.clone(),
                    })
            })
            .collect();

        self.categories = data
            .links
            .iter()
            .map(|group| group.category.clone())
            .collect();

        self.profile = Some(data);
        self.data_error = None;
        self.selected = 0;
        self.category = None;
        self.search_query.clear();
    }

    pub fn links(&self) -> &[FlatLink] {
        &self.links
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }

    /// Indices into `links` that pass the active category and search filters,
    /// in document order.
    pub fn visible_indices(&self) -> Vec<usize> {
        let query = self.search_query.trim();
        (0..self.links.len())
            .filter(|&i| {
                let link = &self.links[i];
                if let Some(cat) = self.category.as_deref()
                    && link.category != cat
                {
                    return false;
                }
                query.is_empty()
                    || Self::fuzzy_match_positions(&link.item.title, query).is_some()
            })
            .collect()
    }

    /// The link under the cursor, only while it is actually in the filtered
    /// view. A "no results" view yields `None` so activation cannot reach a
    /// link that is not on screen.
    pub fn selected_link(&self) -> Option<&FlatLink> {
        if !self.visible_indices().contains(&self.selected) {
            return None;
        }
        self.links.get(self.selected)
    }

    /// Move the cursor to the next visible link, wrapping.
    pub fn next(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(p) => visible[(p + 1) % visible.len()],
            None => visible[0],
        };
    }

    /// Move the cursor to the previous visible link, wrapping.
    pub fn prev(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(0) => visible[visible.len() - 1],
            Some(p) => visible[p - 1],
            None => visible[visible.len() - 1],
        };
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.visible_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.visible_indices().last() {
            self.selected = last;
        }
    }

    /// Cycle the category filter: all, then each category in document order.
    pub fn cycle_category(&mut self) {
        self.category = match self.category.as_deref() {
            None => self.categories.first().cloned(),
            Some(current) => {
                let pos = self.categories.iter().position(|c| c == current);
                match pos {
                    Some(p) if p + 1 < self.categories.len() => {
                        Some(self.categories[p + 1].clone())
                    }
                    _ => None,
                }
            }
        };
        self.ensure_selected_visible();
    }

    pub fn enter_search(&mut self) {
        self.search_mode = true;
    }

    pub fn exit_search(&mut self) {
        self.search_mode = false;
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.search_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        self.ensure_selected_visible();
    }

    /// Keep the cursor on a visible link, falling back to the first one.
    pub fn ensure_selected_visible(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            self.selected = 0;
            return;
        }
        if !visible.contains(&self.selected) {
            self.selected = visible[0];
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    pub fn toggle_lang(&mut self) {
        self.lang = self.lang.toggle();
    }

    /// Open an overlay, or close it when it is already open.
    pub fn toggle_overlay(&mut self, overlay: Overlay) {
        self.overlay = if self.overlay == overlay {
            Overlay::None
        } else {
            overlay
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Cycle focus through the contact form fields.
    pub fn contact_focus_next(&mut self) {
        self.contact_focus = match self.contact_focus {
            Field::Name => Field::Email,
            Field::Email => Field::Message,
            Field::Message => Field::Name,
        };
    }

    pub fn contact_field_mut(&mut self) -> &mut String {
        match self.contact_focus {
            Field::Name => &mut self.contact.name,
            Field::Email => &mut self.contact.email,
            Field::Message => &mut self.contact.message,
        }
    }

    /// Fuzzy/subsequence match: the character positions in `title` matching
    /// `query`, or `None` when it does not match.
    pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
        if query.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut title_iter = title.chars().enumerate();

        for qc in query.chars() {
            let qc_low = qc.to_ascii_lowercase();
            loop {
                match title_iter.next() {
                    Some((ti, tc)) if tc.to_ascii_lowercase() == qc_low => {
                        positions.push(ti);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }
}
