use keycode::Chord;
use meow_engine::{AppController, Error, MODIFIER_REQUIRED, Result, SaveStatus, ShortcutTarget};
use meow_protocol::ShortcutDescriptor;
use tracing::debug;

use crate::{ApiCmd, Command, CommunityCmd};

/// Run one subcommand against the connected app.
pub async fn run(app: &AppController, cmd: Command) -> Result<()> {
    match cmd {
        Command::Check => Ok(()),
        Command::Search { keyword, pick } => search(app, &keyword, pick).await,
        Command::Prefs => prefs(app).await,
        Command::Save {
            copy_to_clipboard,
            shortcut,
            reset_shortcut,
        } => save(app, copy_to_clipboard, shortcut.as_deref(), reset_shortcut).await,
        Command::Community(c) => community(app, c).await,
        Command::Api(c) => api(app, c).await,
    }
}

async fn search(app: &AppController, keyword: &str, pick: Option<u8>) -> Result<()> {
    let items = app.search().search(keyword).await?;
    if items.is_empty() {
        println!("no results");
        return Ok(());
    }
    for (i, item) in items.iter().enumerate() {
        let desc = item.description.as_deref().unwrap_or("");
        println!("{:>2}. {}  {}  {}", i + 1, item.id, item.url, desc);
    }
    if let Some(n) = pick {
        let key = char::from(b'0' + n);
        let item = app.search().select_hotkey(key).await?;
        println!("selected {}", item.id);
    }
    Ok(())
}

async fn prefs(app: &AppController) -> Result<()> {
    let settings = app.settings();
    settings.load().await?;
    let p = settings.preferences();
    println!("copy_to_clipboard: {}", p.copy_to_clipboard);
    for target in ShortcutTarget::ALL {
        println!("{}: {}", target.as_str(), target.slot(&p.shortcuts).display());
    }
    Ok(())
}

/// Parse a user-entered chord into a descriptor for `target`.
fn parse_shortcut(spec: &str, target: ShortcutTarget) -> Result<ShortcutDescriptor> {
    let chord =
        Chord::parse(spec).ok_or_else(|| Error::Validation(format!("invalid shortcut: {spec}")))?;
    if !chord.has_modifier() {
        return Err(Error::Validation(MODIFIER_REQUIRED.to_string()));
    }
    Ok(ShortcutDescriptor::from_chord(&chord, target.action()))
}

async fn save(
    app: &AppController,
    copy_to_clipboard: Option<bool>,
    shortcut: Option<&str>,
    reset_shortcut: bool,
) -> Result<()> {
    let settings = app.settings();
    settings.load().await?;

    if let Some(enabled) = copy_to_clipboard {
        settings.set_copy_to_clipboard(enabled);
    }
    if let Some(spec) = shortcut {
        let target = ShortcutTarget::ToggleApp;
        settings.set_shortcut(target, parse_shortcut(spec, target)?)?;
    }
    if reset_shortcut {
        settings.reset_shortcut(ShortcutTarget::ToggleApp);
    }

    settings.request_save();
    let report = settings
        .wait_for_saves(1)
        .await
        .ok_or_else(|| Error::Msg("save coordinator stopped".into()))?;
    debug!(status = ?report.status(), "save finished");
    match report.status() {
        SaveStatus::AllFailed => Err(Error::Msg("nothing was saved".into())),
        SaveStatus::AllSucceeded | SaveStatus::PartialSuccess => Ok(()),
    }
}

async fn community(app: &AppController, cmd: CommunityCmd) -> Result<()> {
    let c = app.community();
    match cmd {
        CommunityCmd::Refresh => c.refresh().await,
        CommunityCmd::List { query } => {
            c.load().await?;
            for lib in c.filtered(query.as_deref().unwrap_or("")) {
                let mark = if c.is_enabled(&lib.uuid) { "*" } else { " " };
                println!(
                    "{mark} {}  {} {}  by {}  [{}]",
                    lib.uuid,
                    lib.name,
                    lib.version,
                    lib.author,
                    lib.tags.join(", ")
                );
            }
            Ok(())
        }
        CommunityCmd::Enable { uuid } => set_lib(app, &uuid, true).await,
        CommunityCmd::Disable { uuid } => set_lib(app, &uuid, false).await,
    }
}

/// Bring pack `uuid` to the `enabled` state, toggling only when needed.
async fn set_lib(app: &AppController, uuid: &str, enabled: bool) -> Result<()> {
    let c = app.community();
    c.load().await?;
    if c.is_enabled(uuid) != enabled {
        c.toggle(uuid).await?;
    }
    println!("{uuid}: {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

async fn api(app: &AppController, cmd: ApiCmd) -> Result<()> {
    let a = app.api_urls();
    let cfg = match cmd {
        ApiCmd::List => a.load().await?,
        ApiCmd::Add { name, url } => {
            a.load().await?;
            a.add(&name, &url).await?
        }
        ApiCmd::Remove { index } => {
            a.load().await?;
            a.remove(index).await?
        }
        ApiCmd::Use { index } => {
            a.load().await?;
            a.set_active(index).await?
        }
    };
    let active = cfg.active().map(|u| u.url.clone());
    for (i, u) in cfg.urls.iter().enumerate() {
        let mark = if Some(&u.url) == active.as_ref() { "*" } else { " " };
        println!("{mark} {i}  {}  {}", u.name, u.url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_needs_a_modifier() {
        let d = parse_shortcut("Ctrl+Shift+K", ShortcutTarget::ToggleApp).expect("valid");
        assert_eq!(d.modifiers, vec!["ctrl", "shift"]);
        assert_eq!(d.key, "k");
        assert!(matches!(
            parse_shortcut("k", ShortcutTarget::ToggleApp),
            Err(Error::Validation(_))
        ));
        assert!(parse_shortcut("ctrl+shift", ShortcutTarget::ToggleApp).is_err());
    }
}
