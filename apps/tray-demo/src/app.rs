//! Demo application: a tray with a dynamic "Open Recent" submenu.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use traybridge_tray::{Icon, MenuItem, Tray, TrayOptions};

use crate::config::Config;

const QUIT_ID: &str = "quit";
const CLEAR_RECENT_ID: &str = "clear-recent";
const RECENT_PREFIX: &str = "recent:";

/// What a menu click asks the demo to do.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Quit,
    ClearRecent,
    OpenRecent(usize),
    Unknown,
}

impl Action {
    fn from_id(id: &str) -> Self {
        match id {
            QUIT_ID => Action::Quit,
            CLEAR_RECENT_ID => Action::ClearRecent,
            _ => id
                .strip_prefix(RECENT_PREFIX)
                .and_then(|n| n.parse().ok())
                .map_or(Action::Unknown, Action::OpenRecent),
        }
    }
}

/// Recently opened entries, most recent first.
#[derive(Debug)]
struct RecentList {
    entries: Vec<String>,
    max: usize,
}

impl RecentList {
    fn new(mut entries: Vec<String>, max: usize) -> Self {
        entries.truncate(max);
        Self { entries, max }
    }

    /// Moves entry `index` to the front and returns its name.
    fn open(&mut self, index: usize) -> Option<String> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        self.entries.insert(0, entry.clone());
        self.entries.truncate(self.max);
        Some(entry)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

type SharedRecent = Arc<Mutex<RecentList>>;

fn lock(recent: &SharedRecent) -> MutexGuard<'_, RecentList> {
    recent.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builds the full menu from the current recent list.
fn build_menu(recent: &RecentList) -> Vec<MenuItem> {
    let entries: Vec<MenuItem> = if recent.entries.is_empty() {
        vec![MenuItem::new("recent-empty", "No recent items").with_enabled(false)]
    } else {
        recent
            .entries
            .iter()
            .enumerate()
            .map(|(i, name)| MenuItem::new(format!("{RECENT_PREFIX}{i}"), name))
            .collect()
    };

    vec![
        MenuItem::submenu("open-recent", "Open Recent", entries),
        MenuItem::new(CLEAR_RECENT_ID, "Clear Recent").with_enabled(!recent.entries.is_empty()),
        MenuItem::separator(),
        MenuItem::new("version", format!("Version {}", env!("CARGO_PKG_VERSION")))
            .with_enabled(false),
        MenuItem::new(QUIT_ID, "Quit").with_tooltip("Close the demo"),
    ]
}

fn handle_click(tray: &Tray, id: &str, recent: &SharedRecent) {
    match Action::from_id(id) {
        Action::Quit => {
            tracing::info!("quit requested via tray");
            if let Err(e) = tray.quit() {
                tracing::debug!("quit skipped: {e}");
            }
        }
        Action::ClearRecent => {
            lock(recent).clear();
            tracing::info!("recent list cleared");
        }
        Action::OpenRecent(index) => {
            let Some(name) = lock(recent).open(index) else {
                tracing::warn!(index, "stale recent entry clicked");
                return;
            };
            tracing::info!(entry = %name, "opening recent entry");
            if let Err(e) = tray.set_tooltip(format!("Last opened: {name}")) {
                tracing::debug!("tooltip not updated: {e}");
            }
        }
        Action::Unknown => tracing::debug!(id, "click on item without action"),
    }
}

/// Reads the configured icon files. A single configured file serves both
/// platforms.
fn load_icon(config: &Config) -> anyhow::Result<Option<Icon>> {
    let png = config.icon_png.as_deref().map(std::fs::read).transpose()?;
    let ico = config.icon_ico.as_deref().map(std::fs::read).transpose()?;
    Ok(match (png, ico) {
        (Some(png), Some(ico)) => Some(Icon::new(png, ico)),
        (Some(bytes), None) | (None, Some(bytes)) => Some(Icon::new(bytes.clone(), bytes)),
        (None, None) => None,
    })
}

/// Runs the demo until the helper exits.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let recent: SharedRecent = Arc::new(Mutex::new(RecentList::new(
        config.recent.clone(),
        config.max_recent,
    )));

    let provider_recent = Arc::clone(&recent);
    let click_recent = Arc::clone(&recent);
    let mut options = TrayOptions::new()
        .with_tooltip(config.tooltip.clone())
        .on_menu_requested(move || {
            let items = build_menu(&lock(&provider_recent));
            async move { items }
        })
        .on_clicked(move |tray, id| handle_click(tray, id, &click_recent))
        .on_protocol_error(|e| tracing::warn!("helper sent a bad line: {e}"));
    if let Some(icon) = load_icon(&config)? {
        options = options.with_icon(icon);
    }
    if let Some(path) = &config.helper_path {
        options = options.with_helper_path(path);
    }

    let tray = Tray::new(options)?;

    tokio::select! {
        res = tray.ready() => {
            res?;
            tracing::info!("tray ready, press Ctrl-C to quit");
        }
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("SIGINT received before ready");
            tray.quit()?;
        }
    }

    tokio::select! {
        code = tray.closed() => {
            report_exit(code);
            return Ok(());
        }
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("SIGINT received, shutting down");
        }
    }

    if let Err(e) = tray.quit() {
        tracing::debug!("quit skipped: {e}");
    }
    report_exit(tray.closed().await);
    Ok(())
}

fn report_exit(code: Option<i32>) {
    if code == Some(0) {
        tracing::info!("tray helper exited");
    } else {
        tracing::warn!(?code, "tray helper exited abnormally");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traybridge_tray::validate_menu;

    fn recent(entries: &[&str], max: usize) -> RecentList {
        RecentList::new(entries.iter().map(|s| s.to_string()).collect(), max)
    }

    #[test]
    fn action_from_id() {
        assert_eq!(Action::from_id("quit"), Action::Quit);
        assert_eq!(Action::from_id("clear-recent"), Action::ClearRecent);
        assert_eq!(Action::from_id("recent:2"), Action::OpenRecent(2));
        assert_eq!(Action::from_id("recent:x"), Action::Unknown);
        assert_eq!(Action::from_id("version"), Action::Unknown);
    }

    #[test]
    fn recent_list_is_capped() {
        let list = recent(&["a", "b", "c"], 2);
        assert_eq!(list.entries, vec!["a", "b"]);
    }

    #[test]
    fn open_moves_entry_to_front() {
        let mut list = recent(&["a", "b", "c"], 5);
        assert_eq!(list.open(2).as_deref(), Some("c"));
        assert_eq!(list.entries, vec!["c", "a", "b"]);
        assert_eq!(list.open(9), None);
    }

    #[test]
    fn menu_lists_recent_entries() {
        let menu = build_menu(&recent(&["notes.txt", "report.pdf"], 5));
        let submenu = &menu[0];
        assert_eq!(submenu.title.as_deref(), Some("Open Recent"));
        let ids: Vec<_> = submenu
            .children()
            .iter()
            .map(|i| i.id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["recent:0", "recent:1"]);
        assert!(menu[1].is_enabled());
        assert_eq!(menu.last().unwrap().id.as_deref(), Some("quit"));
        assert!(validate_menu(&menu).is_ok());
    }

    #[test]
    fn empty_recent_shows_placeholder() {
        let menu = build_menu(&recent(&[], 5));
        let children = menu[0].children();
        assert_eq!(children.len(), 1);
        assert!(!children[0].is_enabled());
        assert!(!menu[1].is_enabled());
    }

    #[test]
    fn single_icon_file_serves_both_formats() {
        let tmp = tempfile::tempdir().unwrap();
        let png = tmp.path().join("icon.png");
        std::fs::write(&png, b"png").unwrap();
        let config = Config {
            icon_png: Some(png),
            ..Config::default()
        };

        let icon = load_icon(&config).unwrap().unwrap();
        assert_eq!(icon, Icon::new(b"png".to_vec(), b"png".to_vec()));
        assert!(load_icon(&Config::default()).unwrap().is_none());
    }

    #[test]
    fn missing_icon_file_is_an_error() {
        let config = Config {
            icon_ico: Some("/nonexistent/icon.ico".into()),
            ..Config::default()
        };
        assert!(load_icon(&config).is_err());
    }
}
