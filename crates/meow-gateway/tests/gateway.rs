use std::{sync::Arc, time::Duration};

use meow_gateway::{Gateway, MockBackend, OperationError, Reply};
use meow_protocol::{Method, ShortcutConfigs};
use serde_json::{Value, json};

fn gateway() -> (Gateway, Arc<MockBackend>) {
    let mock = Arc::new(MockBackend::new());
    (Gateway::new(mock.clone()), mock)
}

#[tokio::test(start_paused = true)]
async fn success_returns_value() {
    let (gw, mock) = gateway();
    mock.reply(Method::GetApiUrlConfig, Reply::Ok(json!({"urls": [], "active_index": 0})));

    let v = gw
        .call(Method::GetApiUrlConfig, Value::Null, Duration::from_millis(100))
        .await
        .expect("call succeeds");
    assert_eq!(v["active_index"], 0);
    assert_eq!(mock.count(Method::GetApiUrlConfig), 1);
}

#[tokio::test(start_paused = true)]
async fn remote_failure_carries_cause() {
    let (gw, mock) = gateway();
    mock.fail(Method::SetShortcuts, "disk full");

    let err = gw
        .set_shortcuts(&ShortcutConfigs::default())
        .await
        .expect_err("remote failure");
    assert_eq!(
        err,
        OperationError::Remote {
            method: Method::SetShortcuts,
            cause: "disk full".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn timer_wins_and_late_reply_is_ignored() {
    let (gw, mock) = gateway();
    mock.reply_after(
        Method::SetCopyToClipboard,
        Reply::Ok(Value::Bool(true)),
        Duration::from_millis(5000),
    );

    let mut reported: Vec<Result<(), OperationError>> = Vec::new();
    reported.push(gw.set_copy_to_clipboard(false).await);
    assert_eq!(
        reported,
        vec![Err(OperationError::Timeout {
            method: Method::SetCopyToClipboard
        })]
    );
    assert_eq!(mock.completed(Method::SetCopyToClipboard), 0);

    // Let the backend finish; its reply has nowhere to go.
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(mock.completed(Method::SetCopyToClipboard), 1);
    assert_eq!(reported.len(), 1);
    assert!(reported[0].as_ref().is_err_and(OperationError::is_timeout));
}

#[tokio::test(start_paused = true)]
async fn search_uses_caller_timeout() {
    let (gw, mock) = gateway();
    mock.reply_after(
        Method::SearchMemes,
        Reply::Ok(json!([{"id": "1", "url": "https://img.invalid/1.png"}])),
        Duration::from_millis(10_000),
    );

    let items = gw
        .search_memes("cat", Duration::from_millis(15_000))
        .await
        .expect("slow search still inside its timeout");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].description, None);
    assert_eq!(mock.calls_to(Method::SearchMemes), vec![json!({"keyword": "cat"})]);
}

#[tokio::test(start_paused = true)]
async fn typed_helpers_decode_and_encode() {
    let (gw, mock) = gateway();
    mock.reply(
        Method::GetUserPreferences,
        Reply::Ok(json!({"copy_to_clipboard": false, "api_urls": {}})),
    );
    mock.reply(Method::GetShortcuts, Reply::Ok(json!("nope")));
    mock.reply(
        Method::GetEnabledMemeLibs,
        Reply::Ok(json!(["b", "a", "b"])),
    );

    let prefs = gw.get_user_preferences().await.expect("prefs");
    assert!(!prefs.copy_to_clipboard);

    let err = gw.get_shortcuts().await.expect_err("bad payload");
    assert!(matches!(err, OperationError::Decode { method: Method::GetShortcuts, .. }));

    let libs = gw.get_enabled_meme_libs().await.expect("libs");
    assert_eq!(libs.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);

    gw.copy_image_to_clipboard("https://img.invalid/x.gif")
        .await
        .expect("copy");
    gw.remove_api_url(2).await.expect("remove");
    assert_eq!(
        mock.calls_to(Method::CopyImageToClipboard),
        vec![json!({"imageUrl": "https://img.invalid/x.gif"})]
    );
    assert_eq!(mock.calls_to(Method::RemoveApiUrl), vec![json!({"index": 2})]);
}
