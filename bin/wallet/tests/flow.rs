//! End-to-end command flows against in-memory wallet and token fakes, with
//! the real file store underneath.


use alloy_primitives::{Address, B256, U256};
use setup::{temp_storage, RECIPIENT};
use std::{sync::Arc, time::Duration, time::Instant};
use store::{FileStore, TransactionRecord, TxStatus, TxStore};
use transfer::{
    test_utils::{FakeToken, FakeWallet},
    MonitorOptions, TransferApp, TransferRequest,
};
use wallet::{follow, metrics::Metrics, resolve, send, start, view::Renderer};

const POLL: Duration = Duration::from_millis(10);
const ACCOUNT: Address = Address::repeat_byte(1);

type App = TransferApp<FakeWallet, FakeToken, Arc<FileStore>>;

fn dai_with_balance(raw: u128) -> FakeToken {
    let token = FakeToken::new("DAI", 18);
    token.set_balance(ACCOUNT, U256::from(raw));
    token
}

fn app(wallet: &FakeWallet, token: &FakeToken, path: &std::path::Path) -> App {
    TransferApp::new(
        wallet.clone(),
        token.clone(),
        Arc::new(FileStore::new(path, POLL)),
        MonitorOptions::default(),
    )
}

#[tokio::test]
async fn test_send_ten_dai_until_confirmed() {
    let (_dir, path) = temp_storage("send");
    let wallet = FakeWallet::new(vec![ACCOUNT]);
    let token = dai_with_balance(12_500_000_000_000_000_000);
    token.next_hash(B256::repeat_byte(0xab));
    let app = app(&wallet, &token, &path);
    let metrics = Metrics::new();

    assert!(start(&app).await.unwrap().is_none());
    assert_eq!(app.state().token.unwrap().display_balance(), "12.5");

    let monitor = send(&app, &TransferRequest::new(RECIPIENT, "10"), false, &metrics)
        .await
        .unwrap();

    let stored = FileStore::new(&path, POLL).load().unwrap();
    assert_eq!(stored, Some(TransactionRecord::pending(B256::repeat_byte(0xab))));

    token.set_balance(ACCOUNT, U256::from(2_500_000_000_000_000_000u128));
    wallet.resolve(B256::repeat_byte(0xab), true);

    let mut renderer = Renderer::new(config::ExplorerConfig::etherscan());
    let outcome = follow(
        app.subscribe(),
        &mut renderer,
        &metrics,
        resolve(monitor, Instant::now(), &metrics),
    )
    .await
    .unwrap();

    assert_eq!(outcome.status, TxStatus::Confirmed);
    assert_eq!(
        FileStore::new(&path, POLL).load().unwrap(),
        Some(TransactionRecord {
            hash: B256::repeat_byte(0xab),
            status: TxStatus::Confirmed,
        })
    );
    assert_eq!(token.transfers().len(), 1);
    assert_eq!(
        token.transfers()[0].value,
        U256::from(10_000_000_000_000_000_000u128)
    );
}

#[tokio::test]
async fn test_send_refused_while_restored_transfer_pending() {
    let (_dir, path) = temp_storage("pending");
    FileStore::new(&path, POLL)
        .save(&TransactionRecord::pending(B256::repeat_byte(1)))
        .unwrap();

    let wallet = FakeWallet::new(vec![ACCOUNT]);
    let token = dai_with_balance(5_000_000_000_000_000_000);
    let app = app(&wallet, &token, &path);
    let metrics = Metrics::new();

    let resumed = start(&app).await.unwrap();
    assert!(resumed.is_some());
    assert!(app.state().is_pending());

    let err = send(&app, &TransferRequest::new(RECIPIENT, "1"), false, &metrics)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("still pending"));
    assert!(token.transfers().is_empty());

    token.next_hash(B256::repeat_byte(2));
    send(&app, &TransferRequest::new(RECIPIENT, "1"), true, &metrics)
        .await
        .unwrap();
    assert_eq!(app.state().tracked_hash(), Some(B256::repeat_byte(2)));
}

#[tokio::test]
async fn test_validation_error_reaches_state() {
    let (_dir, path) = temp_storage("invalid");
    let wallet = FakeWallet::new(vec![ACCOUNT]);
    let token = dai_with_balance(1);
    let app = app(&wallet, &token, &path);

    start(&app).await.unwrap();
    let result = send(&app, &TransferRequest::new(RECIPIENT, "0.5.1"), false, &Metrics::new()).await;

    assert!(result.is_err());
    assert!(app.state().error.is_some());
    assert!(FileStore::new(&path, POLL).load().unwrap().is_none());
}

#[tokio::test]
async fn test_start_keeps_restored_record_when_wallet_missing() {
    let (_dir, path) = temp_storage("nowallet");
    let record = TransactionRecord {
        hash: B256::repeat_byte(3),
        status: TxStatus::Confirmed,
    };
    FileStore::new(&path, POLL).save(&record).unwrap();

    let app = app(&FakeWallet::unavailable(), &FakeToken::new("DAI", 18), &path);

    assert!(start(&app).await.is_err());
    let state = app.state();
    assert_eq!(state.transaction, Some(record));
    assert_eq!(state.session, None);
    assert!(state.error.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_session_follows_without_network_calls() {
    let (_dir, path) = temp_storage("sessions");

    let wallet_a = FakeWallet::new(vec![ACCOUNT]);
    let token_a = dai_with_balance(3_000_000_000_000_000_000);
    token_a.next_hash(B256::repeat_byte(0xcd));
    let session_a = app(&wallet_a, &token_a, &path);

    let wallet_b = FakeWallet::new(vec![ACCOUNT]);
    let token_b = FakeToken::new("DAI", 18);
    let session_b = app(&wallet_b, &token_b, &path);
    let _sync = session_b.watch_storage();
    let mut updates = session_b.subscribe();

    start(&session_a).await.unwrap();
    let monitor = send(
        &session_a,
        &TransferRequest::new(RECIPIENT, "1"),
        false,
        &Metrics::new(),
    )
    .await
    .unwrap();

    tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|s| s.tracked_hash() == Some(B256::repeat_byte(0xcd))),
    )
    .await
    .expect("pending transfer not seen")
    .unwrap();

    wallet_a.resolve(B256::repeat_byte(0xcd), true);
    monitor.await.unwrap();

    tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|s| s.status() == TxStatus::Confirmed),
    )
    .await
    .expect("confirmation not seen")
    .unwrap();

    assert_eq!(wallet_b.calls(), 0);
    assert_eq!(token_b.calls(), 0);
}

#[tokio::test]
async fn test_follow_returns_when_future_completes() {
    let wallet = FakeWallet::new(vec![ACCOUNT]);
    let token = dai_with_balance(0);
    let (_dir, path) = temp_storage("follow");
    let app = app(&wallet, &token, &path);
    let mut renderer = Renderer::new(config::ExplorerConfig::etherscan());

    let output = follow(app.subscribe(), &mut renderer, &Metrics::new(), async { 7 }).await;

    assert_eq!(output, 7);
}
