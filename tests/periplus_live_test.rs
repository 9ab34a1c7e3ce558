//! The cart cases against the real periplus.com.
//!
//! Needs network access, a Chrome binary (downloaded from Chrome for Testing
//! unless `CHROME_PATH` is set) and a real account in `PERI_USERNAME` /
//! `PERI_PASSWORD` (process env or `.env`). Only runs with `PERIPLUS_LIVE=1`.
//! Each case has its own test, so one can be run alone:
//!
//! ```
//! PERIPLUS_LIVE=1 cargo test --test periplus_live_test -- --nocapture --test-threads=1
//! PERIPLUS_LIVE=1 cargo test --test periplus_live_test test_delete_item_from_cart
//! ```

use periplus_e2e::config::{load_config, Credentials};
use periplus_e2e::scenarios::{self, CartTargets};
use periplus_e2e::{Suite, SuiteReport};

fn live_enabled() -> bool {
    matches!(std::env::var("PERIPLUS_LIVE").as_deref(), Ok("1") | Ok("true"))
}

async fn live_suite() -> Suite {
    periplus_e2e::init_tracing();

    let config = load_config().expect("failed to load suite config");
    let credentials = Credentials::from_env();
    assert!(
        credentials.is_complete(),
        "PERI_USERNAME and PERI_PASSWORD must be set for the live suite"
    );

    Suite::setup(config, credentials)
        .await
        .expect("suite setup failed")
}

fn assert_passed(report: &SuiteReport, expected: usize) {
    println!("{}", serde_json::to_string_pretty(report).unwrap());
    assert_eq!(report.total, expected);
    assert!(report.is_success(), "failed cases:\n{}", report.failure_summary());
}

/// One case on its own browser session.
async fn run_live_case(name: &str) {
    if !live_enabled() {
        eprintln!("SKIP: PERIPLUS_LIVE is not set");
        return;
    }

    let mut suite = live_suite().await;
    let ran = scenarios::run_cart_case(&mut suite, name, &CartTargets::default()).await;
    let report = suite.teardown().await;

    assert!(ran.is_some(), "unknown case {}", name);
    assert_passed(&report, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_add_available_stock_item_to_cart() {
    run_live_case(scenarios::CASE_ADD_AVAILABLE).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_add_out_of_stock_item_to_cart() {
    run_live_case(scenarios::CASE_ADD_OUT_OF_STOCK).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_item_from_cart() {
    run_live_case(scenarios::CASE_DELETE).await;
}

/// All three cases, in order, on one shared session.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_periplus_cart_suite() {
    if !live_enabled() {
        eprintln!("SKIP: PERIPLUS_LIVE is not set");
        return;
    }

    let mut suite = live_suite().await;
    scenarios::run_cart_cases(&mut suite, &CartTargets::default()).await;
    let report = suite.teardown().await;

    assert_passed(&report, scenarios::CART_CASES.len());
}
