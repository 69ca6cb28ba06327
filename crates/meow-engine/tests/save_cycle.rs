use std::{sync::Arc, time::Duration};

use config::Config;
use meow_engine::{
    PARTIALLY_SAVED, SAVED, SaveStatus, SettingsController, ShortcutTarget,
};
use meow_gateway::{Gateway, MockBackend, Reply};
use meow_protocol::{Method, ShortcutDescriptor, ipc::ui_channel};
use serde_json::{Value, json};
use tokio::time::sleep;

fn setup() -> (Arc<MockBackend>, SettingsController) {
    let mock = Arc::new(MockBackend::new());
    let (tx, _rx) = ui_channel();
    let ctl = SettingsController::new(Gateway::new(mock.clone()), &Config::default(), tx);
    (mock, ctl)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn ctrl_shift(key: &str) -> ShortcutDescriptor {
    ShortcutDescriptor {
        modifiers: vec!["ctrl".into(), "shift".into()],
        key: key.into(),
        action: "Toggle app window".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_requests_collapse_into_one_cycle_with_latest_state() {
    let (mock, ctl) = setup();

    ctl.set_copy_to_clipboard(false);
    assert!(ctl.request_save());
    sleep(ms(150)).await;
    ctl.set_copy_to_clipboard(true);
    assert!(ctl.request_save());
    sleep(ms(150)).await;
    ctl.set_copy_to_clipboard(false);
    ctl.set_shortcut(ShortcutTarget::ToggleApp, ctrl_shift("k"))
        .expect("valid shortcut");
    assert!(ctl.request_save());

    sleep(ms(150)).await;
    assert_eq!(mock.calls().len(), 0, "window still open");

    let report = ctl.wait_for_saves(1).await.expect("cycle report");
    assert_eq!(report.status(), SaveStatus::AllSucceeded);

    sleep(ms(1000)).await;
    assert_eq!(mock.count(Method::SetCopyToClipboard), 1);
    assert_eq!(mock.count(Method::SetShortcuts), 1);
    assert_eq!(
        mock.calls_to(Method::SetCopyToClipboard),
        vec![json!({ "enabled": false })]
    );
    let sent = &mock.calls_to(Method::SetShortcuts)[0]["shortcuts"]["toggle_app"];
    assert_eq!(sent["key"], "k");
    assert_eq!(sent["modifiers"], json!(["ctrl", "shift"]));
    assert_eq!(*ctl.save_cycles().borrow(), 1);
}

#[tokio::test(start_paused = true)]
async fn steps_run_in_order() {
    let (mock, ctl) = setup();
    ctl.request_save();
    let report = ctl.wait_for_saves(1).await.expect("report");

    let order: Vec<Method> = mock.calls().into_iter().map(|(m, _)| m).collect();
    assert_eq!(
        order,
        vec![
            Method::SetCopyToClipboard,
            Method::SetShortcuts,
            Method::RefreshShortcuts
        ]
    );
    assert!(report.clipboard_saved && report.shortcuts_saved && report.shortcuts_refreshed);
    assert_eq!(ctl.success_message().as_deref(), Some(SAVED));
    assert_eq!(ctl.error_message(), None);

    // Success line clears after 3000 ms.
    sleep(ms(2900)).await;
    assert!(ctl.success_message().is_some());
    sleep(ms(200)).await;
    assert_eq!(ctl.success_message(), None);
}

#[tokio::test(start_paused = true)]
async fn clipboard_failure_is_partial_success_with_one_error() {
    let (mock, ctl) = setup();
    mock.fail(Method::SetCopyToClipboard, "store locked");

    ctl.request_save();
    let report = ctl.wait_for_saves(1).await.expect("report");

    assert_eq!(report.status(), SaveStatus::PartialSuccess);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("store locked"));
    assert_eq!(mock.count(Method::RefreshShortcuts), 1);
    assert_eq!(ctl.success_message().as_deref(), Some(PARTIALLY_SAVED));
    assert!(ctl.error_message().is_some_and(|m| m.contains("store locked")));

    // Partial-save errors stay up for 7000 ms.
    sleep(ms(6900)).await;
    assert!(ctl.error_message().is_some());
    sleep(ms(200)).await;
    assert_eq!(ctl.error_message(), None);
}

#[tokio::test(start_paused = true)]
async fn refresh_failure_is_partial_success() {
    let (mock, ctl) = setup();
    mock.fail(Method::RefreshShortcuts, "hotkey taken");

    ctl.request_save();
    let report = ctl.wait_for_saves(1).await.expect("report");
    assert_eq!(report.status(), SaveStatus::PartialSuccess);
    assert!(report.shortcuts_saved);
    assert!(!report.shortcuts_refreshed);
}

#[tokio::test(start_paused = true)]
async fn both_failures_skip_refresh_and_fail_everything() {
    let (mock, ctl) = setup();
    mock.fail(Method::SetCopyToClipboard, "a");
    mock.fail(Method::SetShortcuts, "b");

    ctl.request_save();
    let report = ctl.wait_for_saves(1).await.expect("report");

    assert_eq!(report.status(), SaveStatus::AllFailed);
    assert_eq!(mock.count(Method::RefreshShortcuts), 0);
    assert_eq!(report.errors.len(), 2);
    assert_eq!(ctl.success_message(), None);
    let msg = ctl.error_message().expect("error line");
    assert_eq!(msg.lines().count(), 2);

    // Plain save errors stay up for 5000 ms.
    sleep(ms(4900)).await;
    assert!(ctl.error_message().is_some());
    sleep(ms(200)).await;
    assert_eq!(ctl.error_message(), None);
}

#[tokio::test(start_paused = true)]
async fn request_during_cycle_is_dropped() {
    let (mock, ctl) = setup();
    mock.reply_after(Method::SetShortcuts, Reply::Ok(Value::Null), ms(1000));

    ctl.request_save();
    sleep(ms(400)).await;
    assert!(ctl.is_saving());
    assert!(!ctl.request_save());

    ctl.wait_for_saves(1).await.expect("report");
    assert!(!ctl.is_saving());
    sleep(ms(2000)).await;
    assert_eq!(mock.count(Method::SetCopyToClipboard), 1);
    assert_eq!(*ctl.save_cycles().borrow(), 1);

    // Once the cycle is over, requests are accepted again.
    assert!(ctl.request_save());
    ctl.wait_for_saves(2).await.expect("second report");
    assert_eq!(mock.count(Method::SetCopyToClipboard), 2);
}

#[tokio::test(start_paused = true)]
async fn late_reply_after_timeout_leaves_report_untouched() {
    let (mock, ctl) = setup();
    mock.reply_after(Method::SetShortcuts, Reply::Ok(Value::Null), ms(5000));

    ctl.request_save();
    let report = ctl.wait_for_saves(1).await.expect("report");
    assert!(!report.shortcuts_saved);
    assert!(report.errors[0].contains("set_shortcuts timed out"));
    assert_eq!(mock.count(Method::RefreshShortcuts), 0);
    assert_eq!(mock.completed(Method::SetShortcuts), 0);

    sleep(ms(3000)).await;
    assert_eq!(mock.completed(Method::SetShortcuts), 1);
    let after = ctl.wait_for_saves(1).await.expect("report");
    assert_eq!(after, report);
    assert_eq!(*ctl.save_cycles().borrow(), 1);
    assert_eq!(mock.count(Method::RefreshShortcuts), 0);
}
