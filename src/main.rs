mod analytics;
mod app;
mod config;
mod contact;
mod i18n;
mod player;
mod profile;
mod runtime;
mod ui;
mod vcard;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
