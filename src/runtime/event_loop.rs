use std::process::Command;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::analytics::{AnalyticsStore, DeviceClass, Storage, export_filename};
use crate::app::{App, Overlay};
use crate::config;
use crate::i18n::Strings;
use crate::player::{PlayerController, RodioDevice};
use crate::runtime::startup;
use crate::ui;
use crate::vcard::VCard;

const SCRUB_SECONDS: i64 = 5;
const VOLUME_STEP: f32 = 0.1;

/// State tracked by the runtime event loop across iterations.
struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
}

/// Main terminal event loop: handles input, UI drawing and sync with the
/// audio device. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlayerController<RodioDevice>,
    analytics: &mut AnalyticsStore<Box<dyn Storage>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = EventLoopState { pending_gg: false };

    loop {
        controller.pump_events();

        terminal.draw(|f| ui::draw(f, app, controller.state()))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key_event(key, settings, app, controller, analytics, &mut state);
        }

        if app.should_quit {
            controller.shutdown();
            return Ok(());
        }
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlayerController<RodioDevice>,
    analytics: &mut AnalyticsStore<Box<dyn Storage>>,
    state: &mut EventLoopState,
) {
    if app.search_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Enter => app.exit_search(),
            KeyCode::Char(c) if !c.is_control() => app.push_search_char(c),
            _ => {}
        }
        return;
    }

    if app.overlay == Overlay::Contact {
        state.pending_gg = false;
        handle_contact_key(key, app);
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            app.should_quit = true;
        }
        KeyCode::Esc => {
            state.pending_gg = false;
            app.close_overlay();
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.enter_search();
        }
        KeyCode::Tab => {
            state.pending_gg = false;
            app.cycle_category();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.select_last();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            open_selected_link(app, analytics);
        }
        KeyCode::Char('m') => {
            state.pending_gg = false;
            app.toggle_overlay(Overlay::Player);
        }
        KeyCode::Char(' ') => {
            state.pending_gg = false;
            controller.toggle_play();
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            controller.prev();
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            controller.next();
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            controller.seek_by(-SCRUB_SECONDS);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            controller.seek_by(SCRUB_SECONDS);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            controller.change_volume_by(VOLUME_STEP);
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            controller.change_volume_by(-VOLUME_STEP);
        }
        KeyCode::Char('v') => {
            state.pending_gg = false;
            controller.toggle_mute();
        }
        KeyCode::Char('a') => {
            state.pending_gg = false;
            app.analytics_snapshot = analytics.get_all();
            app.toggle_overlay(Overlay::Analytics);
        }
        KeyCode::Char('e') => {
            state.pending_gg = false;
            export_analytics(app, analytics);
        }
        KeyCode::Char('c') => {
            state.pending_gg = false;
            app.contact_errors.clear();
            app.toggle_overlay(Overlay::Contact);
        }
        KeyCode::Char('S') => {
            state.pending_gg = false;
            app.toggle_overlay(Overlay::Share);
        }
        KeyCode::Char('d') if app.overlay == Overlay::Share => {
            state.pending_gg = false;
            download_vcard(app);
        }
        KeyCode::Char('t') => {
            state.pending_gg = false;
            app.toggle_theme();
        }
        KeyCode::Char('i') => {
            state.pending_gg = false;
            app.toggle_lang();
        }
        KeyCode::Char('R') => {
            state.pending_gg = false;
            startup::load_profile_into(app, settings);
            *controller = startup::build_controller(app, settings);
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }
}

fn handle_contact_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.contact_errors.clear();
            app.close_overlay();
        }
        KeyCode::Tab => app.contact_focus_next(),
        KeyCode::Backspace => {
            app.contact_field_mut().pop();
        }
        KeyCode::Enter => submit_contact(app),
        KeyCode::Char(c) if !c.is_control() => app.contact_field_mut().push(c),
        _ => {}
    }
}

fn submit_contact(app: &mut App) {
    let strings = Strings::for_lang(app.lang);

    app.contact_errors = app.contact.validate();
    if !app.contact_errors.is_empty() {
        app.set_status(strings.fill_required);
        return;
    }

    let recipient = app
        .profile
        .as_ref()
        .map(|data| data.profile.email.clone())
        .unwrap_or_default();

    if let Some(url) = app.contact.mailto(&recipient) {
        open_url(&url);
        app.set_status(strings.email_sent);
        app.contact.clear();
        app.close_overlay();
    }
}

/// Record the click, then open the target. The record is best effort and
/// failing to open never touches the recorded counters.
fn open_selected_link(app: &mut App, analytics: &mut AnalyticsStore<Box<dyn Storage>>) {
    let Some(link) = app.selected_link() else {
        return;
    };
    let slug = link.item.slug();
    let url = link.item.url.clone();
    let title = link.item.title.clone();

    analytics.record_click(&slug, DeviceClass::Desktop, "direct");
    app.analytics_snapshot = analytics.get_all();

    open_url(&url);
    app.set_status(title);
}

fn export_analytics(app: &mut App, analytics: &AnalyticsStore<Box<dyn Storage>>) {
    let strings = Strings::for_lang(app.lang);
    let filename = export_filename();
    match std::fs::write(&filename, analytics.export_csv()) {
        Ok(()) => app.set_status(format!("{} -> {filename}", strings.analytics_exported)),
        Err(e) => {
            warn!("failed to export analytics: {e}");
            app.set_status(e.to_string());
        }
    }
}

fn download_vcard(app: &mut App) {
    let Some(data) = app.profile.as_ref() else {
        return;
    };
    let strings = Strings::for_lang(app.lang);

    let card = VCard::from_profile(&data.profile, None);
    let filename = card.download_filename();
    match std::fs::write(&filename, card.generate()) {
        Ok(()) => app.set_status(format!("{} -> {filename}", strings.vcard_downloaded)),
        Err(e) => {
            warn!("failed to write vcard: {e}");
            app.set_status(e.to_string());
        }
    }
}

/// Hand a URL to the desktop opener. Best effort; a missing opener is
/// logged, not surfaced as a hard error.
fn open_url(url: &str) {
    if let Err(e) = Command::new("xdg-open").arg(url).spawn() {
        warn!("failed to open {url}: {e}");
    }
}
