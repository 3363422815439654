#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

pub use firewatch_test_utils::{init_tracing, with_timeout};

/// Poll `path` until its contents satisfy `pred`, for at most five seconds.
pub async fn wait_for_file<F>(path: &Path, pred: F) -> String
where
    F: Fn(&str) -> bool,
{
    with_timeout(async {
        loop {
            let contents = std::fs::read_to_string(path).unwrap_or_default();
            if pred(&contents) {
                return contents;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
}
