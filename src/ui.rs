//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::analytics::LinkStats;
use crate::app::{App, Overlay, Theme};
use crate::contact::{Field, ValidationKind};
use crate::i18n::Strings;
use crate::player::PlaybackState;
use crate::profile::Status;

/// Styles derived from the active theme.
struct Palette {
    base: Style,
    accent: Style,
    dim: Style,
    error: Style,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            base: Style::default().fg(Color::White),
            accent: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
        },
        Theme::Light => Palette {
            base: Style::default().fg(Color::Black),
            accent: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::Red),
        },
    }
}

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn controls_text() -> String {
    [
        "[j/k] up/down",
        "[enter] open link",
        "[/] search",
        "[tab] category",
        "[m] player",
        "[space] play/pause",
        "[h/l] prev/next",
        "[a] analytics",
        "[e] export",
        "[c] contact",
        "[S] share",
        "[t] theme",
        "[i] language",
        "[q] quit",
    ]
    .join(" | ")
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, player: &PlaybackState) {
    let strings = Strings::for_lang(app.lang);
    let pal = palette(app.theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, strings, &pal, chunks[0]);
    draw_filter_line(frame, app, strings, &pal, chunks[1]);

    if let Some(error) = app.data_error.as_deref() {
        draw_data_error(frame, error, strings, &pal, chunks[2]);
    } else {
        draw_link_list(frame, app, strings, &pal, chunks[2]);
    }

    draw_player_bar(frame, app, player, strings, &pal, chunks[3]);

    let footer_text = match app.status.as_deref() {
        Some(status) => format!("{status} | {}", controls_text()),
        None => controls_text(),
    };
    let footer = Paragraph::new(footer_text)
        .style(pal.dim)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    match app.overlay {
        Overlay::None => {}
        Overlay::Player => draw_player_overlay(frame, app, player, strings, &pal, chunks[2]),
        Overlay::Analytics => draw_analytics_overlay(frame, app, strings, &pal, chunks[2]),
        Overlay::Contact => draw_contact_overlay(frame, app, strings, &pal, chunks[2]),
        Overlay::Share => draw_share_overlay(frame, app, strings, &pal, chunks[2]),
    }
}

fn draw_header(frame: &mut Frame, app: &App, strings: &Strings, pal: &Palette, area: Rect) {
    let (title, text) = match app.profile.as_ref() {
        Some(data) => {
            let p = &data.profile;
            let status = match p.status {
                Status::Available => strings.status_available,
                Status::Busy => strings.status_busy,
            };
            (
                format!(" {} ", p.name),
                format!("{} [{status}]\n{}", p.bio, p.location),
            )
        }
        None => (" linkfolio ".to_string(), strings.loading_profile.to_string()),
    };

    let header = Paragraph::new(text)
        .style(pal.base)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center)
                .title_style(pal.accent),
        );
    frame.render_widget(header, area);
}

fn draw_filter_line(frame: &mut Frame, app: &App, strings: &Strings, pal: &Palette, area: Rect) {
    let category = app
        .category
        .as_deref()
        .unwrap_or(strings.category_all);

    let search = if app.search_mode || !app.search_query.is_empty() {
        format!("/{}", app.search_query)
    } else {
        strings.search_placeholder.to_string()
    };

    let line = Paragraph::new(format!("[{category}] {search}"))
        .style(if app.search_mode { pal.accent } else { pal.dim })
        .block(Block::default().borders(Borders::ALL).padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        }));
    frame.render_widget(line, area);
}

fn draw_data_error(frame: &mut Frame, error: &str, strings: &Strings, pal: &Palette, area: Rect) {
    let text = format!(
        "{}\n\n{error}\n\n{}\n{}",
        strings.load_error, strings.check_data, strings.retry_hint
    );
    let par = Paragraph::new(text)
        .style(pal.error)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(par, area);
}

/// The "no results" line shown in place of the link list.
fn no_results_text(strings: &Strings, query: &str) -> String {
    format!("{} \"{}\"", strings.no_results, query.trim())
}

fn draw_link_list(frame: &mut Frame, app: &App, strings: &Strings, pal: &Palette, area: Rect) {
    let visible = app.visible_indices();
    let query = app.search_query.trim();

    if visible.is_empty() {
        let par = Paragraph::new(no_results_text(strings, query))
            .style(pal.dim)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" links "))
            .wrap(Wrap { trim: true });
        frame.render_widget(par, area);
        return;
    }

    // Window the list around the selection so long lists stay centered.
    let total = visible.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = visible
        .iter()
        .position(|&i| i == app.selected)
        .unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = if sel_pos > half { sel_pos - half } else { 0 };
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .map(|&i| {
            let link = &app.links()[i];
            let badge = link
                .item
                .badge
                .map(|b| format!(" [{}]", b.label()))
                .unwrap_or_default();
            let title = if query.is_empty() {
                link.item.title.clone()
            } else {
                highlight_matches(&link.item.title, query)
            };
            let line = if link.item.description.is_empty() {
                format!("{title}{badge}")
            } else {
                format!("{title}{badge} - {}", link.item.description)
            };
            ListItem::new(line).style(pal.base)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" links "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Uppercase the characters matched by the fuzzy query, mirroring how the
/// filter works, so the user can see why an entry is in the view.
fn highlight_matches(title: &str, query: &str) -> String {
    let Some(positions) = App::fuzzy_match_positions(title, query) else {
        return title.to_string();
    };

    let mut rendered = String::new();
    let mut pos_iter = positions.into_iter();
    let mut next_pos = pos_iter.next();

    for (ci, ch) in title.chars().enumerate() {
        if next_pos == Some(ci) {
            for up in ch.to_uppercase() {
                rendered.push(up);
            }
            next_pos = pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

fn draw_player_bar(
    frame: &mut Frame,
    app: &App,
    player: &PlaybackState,
    strings: &Strings,
    pal: &Palette,
    area: Rect,
) {
    let text = player_line(app, player, strings);
    let par = Paragraph::new(text)
        .style(if player.is_playing { pal.accent } else { pal.dim })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", strings.music_title))
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        );
    frame.render_widget(par, area);
}

fn player_line(app: &App, player: &PlaybackState, strings: &Strings) -> String {
    if let Some(error) = app.playlist_error.as_deref() {
        return error.to_string();
    }
    if let Some(error) = player.error.as_deref() {
        return error.to_string();
    }
    if player.loading {
        return "...".to_string();
    }

    let state = if player.is_playing {
        strings.now_playing
    } else {
        strings.paused
    };
    let volume = if player.muted {
        "muted".to_string()
    } else {
        format!("vol {:3.0}%", player.volume * 100.0)
    };
    format!(
        "{state} [{} / {}] {volume}",
        format_mmss(player.position),
        format_mmss(player.duration)
    )
}

fn draw_player_overlay(
    frame: &mut Frame,
    app: &App,
    player: &PlaybackState,
    strings: &Strings,
    pal: &Palette,
    area: Rect,
) {
    let popup = centered_rect_sized(60, 8, area);
    frame.render_widget(Clear, popup);

    let text = format!("{}\n\nspace play/pause | h/l prev/next | H/L scrub | +/- vol | v mute",
        player_line(app, player, strings));
    let par = Paragraph::new(text)
        .style(pal.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} (m closes) ", strings.music_title))
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(par, popup);
}

fn draw_analytics_overlay(
    frame: &mut Frame,
    app: &App,
    strings: &Strings,
    pal: &Palette,
    area: Rect,
) {
    let popup = centered_rect_sized(64, 14, area);
    frame.render_widget(Clear, popup);

    let total: u64 = app.analytics_snapshot.values().map(|s| s.clicks).sum();

    // Top links by total clicks.
    let mut ranked: Vec<(&String, &LinkStats)> = app.analytics_snapshot.iter().collect();
    ranked.sort_by(|a, b| b.1.clicks.cmp(&a.1.clicks).then_with(|| a.0.cmp(b.0)));

    let mut lines = vec![format!("{}: {total}", strings.total_clicks), String::new()];
    lines.push(strings.top_links.to_string());
    for (slug, stats) in ranked.iter().take(8) {
        lines.push(format!(
            "  {slug}: {} ({} recent)",
            stats.clicks,
            stats.last_seven_days()
        ));
    }
    if ranked.is_empty() {
        lines.push("  -".to_string());
    }
    lines.push(String::new());
    lines.push(format!("[e] {}", strings.export_csv));

    let par = Paragraph::new(lines.join("\n"))
        .style(pal.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} (a closes) ", strings.analytics_title))
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(par, popup);
}

fn draw_contact_overlay(
    frame: &mut Frame,
    app: &App,
    strings: &Strings,
    pal: &Palette,
    area: Rect,
) {
    let popup = centered_rect_sized(60, 12, area);
    frame.render_widget(Clear, popup);

    let marker = |field: Field| if app.contact_focus == field { ">" } else { " " };
    let field_error = |field: Field| {
        app.contact_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| match e.kind {
                ValidationKind::Required => format!("  ({})", strings.fill_required),
                ValidationKind::InvalidEmail => format!("  ({})", strings.invalid_email),
            })
            .unwrap_or_default()
    };

    let text = format!(
        "{m0} {}: {}{e0}\n{m1} {}: {}{e1}\n{m2} {}: {}{e2}\n\n[tab] next field | [enter] {}",
        strings.contact_name,
        app.contact.name,
        strings.contact_email,
        app.contact.email,
        strings.contact_message,
        app.contact.message,
        strings.send,
        m0 = marker(Field::Name),
        e0 = field_error(Field::Name),
        m1 = marker(Field::Email),
        e1 = field_error(Field::Email),
        m2 = marker(Field::Message),
        e2 = field_error(Field::Message),
    );

    let par = Paragraph::new(text)
        .style(pal.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} (esc closes) ", strings.contact_title))
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(par, popup);
}

/// The share panel body: owner contact details, the social handles from the
/// profile document, and the contact-card download hint.
fn share_text(app: &App, strings: &Strings) -> String {
    let Some(data) = app.profile.as_ref() else {
        return strings.loading_profile.to_string();
    };

    let p = &data.profile;
    let mut lines = vec![p.name.clone(), p.email.clone(), p.phone.clone()];

    if !data.social_media.is_empty() {
        lines.push(String::new());
        for social in &data.social_media {
            lines.push(format!("{}: {}", social.platform, social.url));
        }
    }

    lines.push(String::new());
    lines.push(format!("[d] {}", strings.add_to_contacts));
    lines.join("\n")
}

fn draw_share_overlay(frame: &mut Frame, app: &App, strings: &Strings, pal: &Palette, area: Rect) {
    let popup = centered_rect_sized(60, 14, area);
    frame.render_widget(Clear, popup);

    let par = Paragraph::new(share_text(app, strings))
        .style(pal.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} (S closes) ", strings.share_title))
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(par, popup);
}
