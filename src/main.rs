#![allow(dead_code)]

use cosmic::app::Settings;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::iced::Limits;

mod application;
mod components;
mod localize;
mod message;
mod pages;

use waypoint::backend;
use waypoint::config;
use waypoint::core;

use application::{Flags, Waypoint};
use config::{WaypointConfig, CONFIG_VERSION};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cosmic_cfg = cosmic::cosmic_config::Config::new("dev.waypoint.app", CONFIG_VERSION)
        .expect("Failed to create cosmic config");
    let config = WaypointConfig::get_entry(&cosmic_cfg).unwrap_or_else(|(_, cfg)| cfg);

    // Set up logging to the systemd user journal (`journalctl --user -t waypoint -f`).
    // Wrapper filters: waypoint crate at info/debug (per config), everything else at warn.
    {
        struct FilteredJournal {
            inner: systemd_journal_logger::JournalLog,
        }

        impl log::Log for FilteredJournal {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                let target = metadata.target();
                if target.starts_with("waypoint")
                    || target.starts_with("application")
                    || target.starts_with("pages")
                    || target.starts_with("components")
                {
                    let max = if waypoint::debug_logging() {
                        log::LevelFilter::Debug
                    } else {
                        log::LevelFilter::Info
                    };
                    metadata.level() <= max
                } else {
                    metadata.level() <= log::LevelFilter::Warn
                }
            }
            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    self.inner.log(record);
                }
            }
            fn flush(&self) {
                self.inner.flush();
            }
        }

        let journal = systemd_journal_logger::JournalLog::new()
            .unwrap()
            .with_syslog_identifier("waypoint".to_string());

        waypoint::set_debug_logging(config.debug_logging);

        log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).unwrap();
        // Global max must be Debug so waypoint debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }

    localize::localize();

    let mut settings = Settings::default();
    settings = settings.size_limits(Limits::NONE.min_width(400.0).min_height(300.0));
    // Theme preference is read once at startup
    settings = settings.theme(if config.dark_mode {
        cosmic::theme::system_dark()
    } else {
        cosmic::theme::system_light()
    });

    let flags = Flags {
        config,
        cosmic_config: cosmic_cfg,
    };
    cosmic::app::run::<Waypoint>(settings, flags)?;

    Ok(())
}
