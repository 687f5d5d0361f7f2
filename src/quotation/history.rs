//! Paginated candle history fetching
//!
//! The venue serves at most 200 candles per request, newest first, bounded
//! above by a `to` cursor. [`fetch_history`] walks that cursor backward in
//! time page by page and merges the pages into one ascending series. The
//! network call itself lives behind [`CandleSource`], so the loop is
//! exercised in tests with fake transports.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::types::CandleInterval;
use crate::error::{Result, UpbitError};
use crate::types::{Candle, Market};

/// Maximum candles the venue returns in one request
pub const MAX_CANDLES_PER_REQUEST: usize = 200;

/// Hard ceiling on one history fetch (10 requests/sec quota, 200 each)
pub const MAX_TOTAL_CANDLES: usize = 2000;

/// Default pause between successive page requests
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// One bounded page request against the candles endpoint
///
/// Returns up to `count` candles at or before `to`, in any order. An empty
/// vector means no candles exist at or before the cursor.
#[async_trait]
pub trait CandleSource {
    async fn fetch_page(
        &self,
        market: &Market,
        interval: CandleInterval,
        count: usize,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>>;
}

/// Parameters for one history fetch
#[derive(Debug, Clone)]
pub struct HistoryRequest {
    /// Total number of candles requested; must not exceed
    /// [`MAX_TOTAL_CANDLES`]
    pub count: usize,
    /// Timestamp of the newest candle wanted; defaults to now
    pub to: Option<DateTime<Utc>>,
    /// Pause between page requests, on top of the client's rate limiter
    pub page_delay: Duration,
}

impl HistoryRequest {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            to: None,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Fetch history ending at the given timestamp instead of now
    pub fn ending_at(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    /// Set the inter-page pause
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }
}

/// Fetch up to `request.count` candles ending at `request.to`, merged into
/// one series with strictly ascending timestamps.
///
/// Pages are requested sequentially: each page's cursor is the earliest
/// timestamp observed in the previous page, so the walk cannot be
/// parallelized. The remaining count is decremented by the size requested
/// for each page; when the venue has less history than asked for, the walk
/// ends at the first empty page and the series is simply shorter than
/// requested.
///
/// Any page failure aborts the whole fetch with that error; no partial
/// series is ever returned.
pub async fn fetch_history<S>(
    source: &S,
    market: &Market,
    interval: CandleInterval,
    request: &HistoryRequest,
) -> Result<Vec<Candle>>
where
    S: CandleSource + Sync,
{
    if request.count > MAX_TOTAL_CANDLES {
        return Err(UpbitError::RequestTooLarge {
            requested: request.count,
            limit: MAX_TOTAL_CANDLES,
        });
    }

    let mut cursor = request.to.unwrap_or_else(Utc::now);
    let mut remaining = request.count;
    let mut candles: Vec<Candle> = Vec::with_capacity(request.count);

    while remaining > 0 {
        let page_size = remaining.min(MAX_CANDLES_PER_REQUEST);

        debug!(
            "Requesting {} {} candles for {} ending at {}",
            page_size, interval, market, cursor
        );

        let page = source.fetch_page(market, interval, page_size, cursor).await?;

        // The cursor walks to the earliest candle seen; an empty page means
        // the venue has no more history at or before it.
        let earliest = match page.iter().map(|c| c.datetime).min() {
            Some(ts) => ts,
            None => {
                debug!("No candles at or before {}, stopping early", cursor);
                break;
            }
        };

        cursor = earliest;
        candles.extend(page);
        remaining -= page_size;

        if remaining > 0 {
            tokio::time::sleep(request.page_delay).await;
        }
    }

    candles.sort_by_key(|c| c.datetime);
    candles.dedup_by_key(|c| c.datetime);

    info!(
        "Fetched {} {} candles for {}",
        candles.len(),
        interval,
        market
    );

    Ok(candles)
}
