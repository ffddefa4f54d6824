mod common;

use std::{sync::Arc, time::Duration};

use client::http_client::CanvasHttpClient;
use common::*;
use shared::{
    graphics::palette::NUM_COLOURS,
    models::pixel::{pixel_balances::PIXEL_BALANCES_LEN, pixel_coord::PixelCoord},
    networking::error::NetworkingError,
};
use tokio::time::Instant;

fn http_client(http: Arc<MockHttp>) -> CanvasHttpClient {
    CanvasHttpClient::new(http, HTTP_URL, RATE_LIMIT, Duration::from_secs(1), None)
}

#[tokio::test(start_paused = true)]
async fn requests_are_relative_to_the_api_url() {
    let http = Arc::new(MockHttp::canvas(Duration::ZERO));
    let client = http_client(http.clone());
    assert_eq!(client.url(), "https://canvas.test/api/");

    client.pixel_balances(PixelCoord::new(3, 4)).await.unwrap();

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1.url, "https://canvas.test/api/balances/3/4");
    assert_eq!(requests[0].1.max_length, PIXEL_BALANCES_LEN);
}

#[tokio::test(start_paused = true)]
async fn wrong_length_is_rejected() {
    let http = Arc::new(MockHttp::new(|_| MockResponse::ok(vec![0; 12])));
    let client = http_client(http);

    assert!(matches!(
        client.pixel_balances(PixelCoord::new(0, 0)).await,
        Err(NetworkingError::UnexpectedLength { expected: PIXEL_BALANCES_LEN, actual: 12 })
    ));
}

#[tokio::test(start_paused = true)]
async fn concurrent_queries_are_spaced() {
    let h = harness(MockHttp::new(|_| {
        MockResponse::ok(balances_body()).after(Duration::from_millis(50))
    }));

    let (a, b, c) = tokio::join!(
        h.client.pixel(PixelCoord::new(0, 0)),
        h.client.pixel(PixelCoord::new(1, 0)),
        h.client.pixel(PixelCoord::new(2, 0)),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());

    let starts: Vec<Instant> = h.http.requests().into_iter().map(|(at, _)| at).collect();
    assert_eq!(starts.len(), 3);
    for pair in starts.windows(2) {
        // each starts a full interval after the previous one completed
        assert!(pair[1] - pair[0] >= RATE_LIMIT + Duration::from_millis(50));
    }
}

#[tokio::test(start_paused = true)]
async fn failed_query_still_spaces_the_next() {
    let first = std::sync::atomic::AtomicBool::new(true);
    let h = harness(MockHttp::new(move |_| {
        if first.swap(false, std::sync::atomic::Ordering::SeqCst) {
            MockResponse::err(NetworkingError::Timeout)
        } else {
            MockResponse::ok(balances_body())
        }
    }));

    assert!(matches!(
        h.client.pixel(PixelCoord::new(0, 0)).await,
        Err(NetworkingError::Timeout)
    ));
    let failed_at = Instant::now();
    h.client.pixel(PixelCoord::new(0, 0)).await.unwrap();

    let requests = h.http.requests();
    assert!(requests[1].0 - failed_at >= RATE_LIMIT);
}

#[tokio::test(start_paused = true)]
async fn pixel_pairs_balances_with_burn_addresses() {
    let h = harness(MockHttp::canvas(Duration::ZERO));

    let data = h.client.pixel(PixelCoord::new(0, 0)).await.unwrap();
    assert_eq!(data.active.id.get(), 15);
    assert_eq!(data.colours.len(), NUM_COLOURS);
    for (i, entry) in data.colours.iter().take(15).enumerate() {
        assert_eq!(entry.balance, i as u64);
        assert_eq!(usize::from(entry.colour.id.get()), i);
    }
    assert_eq!(data.colours[15].balance, 0x1122334455667788);
    assert_eq!(
        data.colours[0].address,
        "tpc1qcanvas0000000000000000000000000000000000000qqqqqqqqq8e09fm"
    );
    assert_eq!(
        data.colours[15].address,
        "tpc1qcanvas0000000000000000000000000000000000000qqqqqqq8skerfy6"
    );

    // no socket activity for point queries
    assert_eq!(h.client.state(), client::SyncState::Idle);
}
