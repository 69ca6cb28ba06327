use meow_engine::{Error, Severity};
use meow_protocol::{NotifyKind, UiMsg, ipc::UiRx};

/// Print every UI message queued so far to stderr. Returns whether any of
/// them was an error notice or a fatal panel.
pub fn drain(rx: &mut UiRx) -> bool {
    let mut shown_error = false;
    while let Ok(msg) = rx.try_recv() {
        shown_error |= is_error(&msg);
        if let Some(line) = render(&msg) {
            eprintln!("{line}");
        }
    }
    shown_error
}

/// Whether a failed command still needs `err` reported. Controllers already
/// raise a notice for most failures; fatal errors always reach the fatal
/// panel.
pub fn needs_report(err: &Error, shown_error: bool) -> bool {
    err.severity() == Severity::Fatal || !shown_error
}

fn is_error(msg: &UiMsg) -> bool {
    matches!(
        msg,
        UiMsg::Fatal(_)
            | UiMsg::Notify {
                kind: NotifyKind::Error,
                ..
            }
    )
}

/// One terminal line for a UI message; clears and selections print nothing.
fn render(msg: &UiMsg) -> Option<String> {
    match msg {
        UiMsg::Notify { kind, text, .. } => {
            let tag = match kind {
                NotifyKind::Error => "error",
                NotifyKind::Success => "ok",
            };
            Some(format!("{tag}: {text}"))
        }
        UiMsg::Fatal(text) => Some(format!("fatal: {text}")),
        UiMsg::NotifyCleared { .. } | UiMsg::MemeSelected(_) | UiMsg::Reloaded => None,
    }
}

#[cfg(test)]
mod tests {
    use meow_protocol::{Surface, ipc::ui_channel};

    use super::*;

    #[test]
    fn renders_notices_and_fatal() {
        let msg = UiMsg::Notify {
            surface: Surface::Settings,
            kind: NotifyKind::Error,
            text: "Failed to save shortcuts".into(),
        };
        assert_eq!(render(&msg).as_deref(), Some("error: Failed to save shortcuts"));
        assert_eq!(
            render(&UiMsg::Fatal("gone".into())).as_deref(),
            Some("fatal: gone")
        );
        assert_eq!(render(&UiMsg::Reloaded), None);
    }

    #[test]
    fn failures_print_once() {
        let (tx, mut rx) = ui_channel();
        tx.send(UiMsg::Notify {
            surface: Surface::App,
            kind: NotifyKind::Error,
            text: "Search failed: index offline".into(),
        })
        .expect("send");
        let shown = drain(&mut rx);
        assert!(shown);

        let recoverable = Error::Msg("search_memes failed: index offline".into());
        assert!(!needs_report(&recoverable, shown));
        assert!(needs_report(&Error::Fatal("corrupt state".into()), shown));
        assert!(needs_report(&Error::Validation("no result at position 4".into()), false));

        tx.send(UiMsg::Notify {
            surface: Surface::App,
            kind: NotifyKind::Success,
            text: "Copied to clipboard".into(),
        })
        .expect("send");
        assert!(!drain(&mut rx));
    }
}
