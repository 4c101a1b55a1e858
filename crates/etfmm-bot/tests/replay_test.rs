//! Replay integration tests.
//!
//! Drives `Application::replay` with in-memory JSON lines and checks the
//! commands written out.

use std::io::Cursor;
use std::time::Duration;

use etfmm_bot::{AppConfig, Application};
use etfmm_core::{Lifespan, OrderCommand, OrderId, Price, Side, Volume};
use tokio::io::{AsyncWriteExt, BufReader};

fn book_line(instrument: &str, sequence: u64, best_bid: i64, best_ask: i64) -> String {
    let asks: Vec<i64> = (0..5).map(|i| best_ask + 100 * i).collect();
    let bids: Vec<i64> = (0..5).map(|i| best_bid - 100 * i).collect();
    format!(
        r#"{{"type":"order_book_update","instrument":"{instrument}","sequence":{sequence},"ask_prices":{asks:?},"ask_volumes":[10,10,10,10,10],"bid_prices":{bids:?},"bid_volumes":[10,10,10,10,10]}}"#
    )
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.telemetry.metrics_enabled = false;
    config.replay.channel_capacity = 4;
    config
}

fn parse_commands(output: &[u8]) -> Vec<OrderCommand> {
    std::str::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

async fn replay(input: String) -> (etfmm_bot::app::ReplayReport, Vec<OrderCommand>) {
    let app = Application::new(test_config()).unwrap();
    let mut output = Vec::new();
    let report = app
        .replay(Cursor::new(input.into_bytes()), &mut output)
        .await
        .unwrap();
    let commands = parse_commands(&output);
    (report, commands)
}

#[tokio::test]
async fn test_future_update_then_fill_writes_quotes_and_hedge() {
    let input = [
        book_line("future", 1, 10_000, 10_100),
        r#"{"type":"order_filled","order_id":3,"price":9800,"volume":10}"#.to_string(),
    ]
    .join("\n");

    let (report, commands) = replay(input).await;

    assert_eq!(commands.len(), 7);
    assert_eq!(
        commands[0],
        OrderCommand::Insert {
            order_id: OrderId(1),
            side: Side::Buy,
            price: Price::new(9_900),
            volume: Volume::new(20),
            lifespan: Lifespan::FillAndKill,
        }
    );
    assert_eq!(
        commands[6],
        OrderCommand::Hedge {
            order_id: OrderId(7),
            side: Side::Sell,
            price: Price::new(100),
            volume: Volume::new(10),
        }
    );
    assert_eq!(report.positions, [10, 10, 10]);
    assert_eq!(report.commands_written, 7);
    assert_eq!(report.stats.hedges, 1);
}

#[tokio::test]
async fn test_bad_lines_are_skipped() {
    let input = [
        "not json".to_string(),
        String::new(),
        r#"{"type":"mystery"}"#.to_string(),
        book_line("etf", 1, 9_900, 10_000),
    ]
    .join("\n");

    let (report, commands) = replay(input).await;

    assert!(commands.is_empty());
    assert_eq!(report.read.lines, 4);
    assert_eq!(report.read.skipped, 2);
    assert_eq!(report.read.events, 1);
    assert_eq!(report.stats.etf_updates, 1);
}

#[tokio::test]
async fn test_shallow_book_does_not_stop_replay() {
    let shallow = r#"{"type":"order_book_update","instrument":"future","sequence":1,"ask_prices":[10100],"ask_volumes":[1],"bid_prices":[10000],"bid_volumes":[1]}"#;
    let input = [shallow.to_string(), book_line("future", 2, 10_000, 10_100)].join("\n");

    let (report, commands) = replay(input).await;

    assert_eq!(report.stats.rejected_snapshots, 1);
    assert_eq!(commands.len(), 6);
    assert_eq!(commands[0].order_id(), OrderId(1));
}

#[tokio::test]
async fn test_error_event_frees_slot_for_requote() {
    let input = [
        book_line("future", 1, 10_000, 10_100),
        r#"{"type":"error","order_id":5,"message":"price out of range"}"#.to_string(),
        book_line("etf", 1, 10_000, 10_100),
        book_line("future", 2, 10_000, 10_100),
    ]
    .join("\n");

    let (report, commands) = replay(input).await;

    assert_eq!(commands.len(), 7);
    assert_eq!(
        commands[6],
        OrderCommand::Insert {
            order_id: OrderId(7),
            side: Side::Sell,
            price: Price::new(10_300),
            volume: Volume::new(25),
            lifespan: Lifespan::GoodForDay,
        }
    );
    assert_eq!(report.stats.venue_errors, 1);
}

#[tokio::test]
async fn test_replay_from_mock_reader() {
    let line = format!("{}\n", book_line("future", 1, 10_000, 10_100));
    let mock = tokio_test::io::Builder::new().read(line.as_bytes()).build();

    let app = Application::new(test_config()).unwrap();
    let mut output = Vec::new();
    let report = app.replay(BufReader::new(mock), &mut output).await.unwrap();

    assert_eq!(report.read.events, 1);
    assert_eq!(parse_commands(&output).len(), 6);
}

#[tokio::test]
async fn test_non_utf8_line_is_skipped() {
    let mut input = b"\xff\xfe garbage\n".to_vec();
    input.extend_from_slice(book_line("future", 1, 10_000, 10_100).as_bytes());
    input.push(b'\n');

    let app = Application::new(test_config()).unwrap();
    let mut output = Vec::new();
    let report = app.replay(Cursor::new(input), &mut output).await.unwrap();

    assert_eq!(report.read.lines, 2);
    assert_eq!(report.read.skipped, 1);
    assert_eq!(report.read.events, 1);
    assert_eq!(parse_commands(&output).len(), 6);
}

#[tokio::test]
async fn test_shutdown_with_idle_input_returns_report() {
    // Input stays open with no further data, like an interactive stdin.
    let (mut feed, input) = tokio::io::duplex(4096);
    let line = format!("{}\n", book_line("future", 1, 10_000, 10_100));
    feed.write_all(line.as_bytes()).await.unwrap();

    let app = Application::new(test_config()).unwrap();
    let mut output = Vec::new();
    let shutdown = tokio::time::sleep(Duration::from_millis(200));
    let report = tokio::time::timeout(
        Duration::from_secs(5),
        app.replay_until(BufReader::new(input), &mut output, shutdown),
    )
    .await
    .expect("replay did not stop after shutdown")
    .unwrap();

    assert_eq!(report.read.events, 1);
    assert_eq!(report.commands_written, 6);
    assert_eq!(parse_commands(&output).len(), 6);
    drop(feed);
}
