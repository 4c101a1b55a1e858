//! Best-price history for both instruments.
//!
//! Signals compare the incoming future snapshot against what the previous
//! snapshots showed, so each instrument keeps its recent best bids and best
//! asks. Only the last and second-to-last observations are ever read; the
//! ring keeps `capacity` entries and drops the oldest beyond that.

use std::collections::VecDeque;

use etfmm_core::{BookSnapshot, Instrument, Price};
use tracing::warn;

/// Zero observations every sequence starts with.
pub const SEED_LEN: usize = 3;

/// Recent best prices for one side of one instrument.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    values: VecDeque<Price>,
    capacity: usize,
}

impl PriceHistory {
    /// Create a history seeded with `SEED_LEN` zeros.
    ///
    /// Capacities below the seed length are raised to it.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(SEED_LEN);
        let mut values = VecDeque::with_capacity(capacity);
        values.extend(std::iter::repeat(Price::ZERO).take(SEED_LEN));
        Self { values, capacity }
    }

    /// Append an observation, evicting the oldest if full.
    pub fn push(&mut self, price: Price) {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(price);
    }

    /// Most recent observation.
    pub fn last(&self) -> Price {
        self.nth_back(0)
    }

    /// Observation before the most recent one.
    pub fn previous(&self) -> Price {
        self.nth_back(1)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn nth_back(&self, n: usize) -> Price {
        // Never shorter than SEED_LEN, so n <= 1 is always present.
        self.values
            .iter()
            .rev()
            .nth(n)
            .copied()
            .unwrap_or(Price::ZERO)
    }
}

/// Best bid/ask histories for the future and the ETF.
#[derive(Debug, Clone)]
pub struct MarketHistory {
    future_bid: PriceHistory,
    future_ask: PriceHistory,
    etf_bid: PriceHistory,
    etf_ask: PriceHistory,
    last_future_sequence: Option<u64>,
    last_etf_sequence: Option<u64>,
}

impl MarketHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            future_bid: PriceHistory::new(capacity),
            future_ask: PriceHistory::new(capacity),
            etf_bid: PriceHistory::new(capacity),
            etf_ask: PriceHistory::new(capacity),
            last_future_sequence: None,
            last_etf_sequence: None,
        }
    }

    /// Note a book update's sequence number.
    ///
    /// Returns false (and warns) when it does not advance past the last one
    /// seen for that instrument. Updates are processed either way.
    pub fn check_sequence(&mut self, instrument: Instrument, sequence: u64) -> bool {
        let last = match instrument {
            Instrument::Future => &mut self.last_future_sequence,
            Instrument::Etf => &mut self.last_etf_sequence,
        };
        let in_order = last.map_or(true, |prev| sequence > prev);
        if !in_order {
            warn!(
                instrument = %instrument,
                sequence,
                last = ?*last,
                "Book update sequence did not advance"
            );
        }
        *last = Some(last.map_or(sequence, |prev| prev.max(sequence)));
        in_order
    }

    /// Append the snapshot's best bid and ask to its instrument's histories.
    pub fn record(&mut self, snapshot: &BookSnapshot) {
        let (bids, asks) = match snapshot.instrument {
            Instrument::Future => (&mut self.future_bid, &mut self.future_ask),
            Instrument::Etf => (&mut self.etf_bid, &mut self.etf_ask),
        };
        bids.push(snapshot.best_bid());
        asks.push(snapshot.best_ask());
    }

    pub fn future_bid(&self) -> &PriceHistory {
        &self.future_bid
    }

    pub fn future_ask(&self) -> &PriceHistory {
        &self.future_ask
    }

    pub fn etf_bid(&self) -> &PriceHistory {
        &self.etf_bid
    }

    pub fn etf_ask(&self) -> &PriceHistory {
        &self.etf_ask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etfmm_core::Volume;

    fn snapshot(instrument: Instrument, bid: i64, ask: i64) -> BookSnapshot {
        BookSnapshot::new(
            instrument,
            1,
            vec![Price::new(ask); 5],
            vec![Volume::new(1); 5],
            vec![Price::new(bid); 5],
            vec![Volume::new(1); 5],
        )
    }

    #[test]
    fn test_seeded_with_zeros() {
        let h = PriceHistory::new(3);
        assert_eq!(h.len(), SEED_LEN);
        assert_eq!(h.last(), Price::ZERO);
        assert_eq!(h.previous(), Price::ZERO);
    }

    #[test]
    fn test_push_tracks_last_two() {
        let mut h = PriceHistory::new(3);
        h.push(Price::new(100));
        assert_eq!(h.last(), Price::new(100));
        assert_eq!(h.previous(), Price::ZERO);
        h.push(Price::new(200));
        assert_eq!(h.last(), Price::new(200));
        assert_eq!(h.previous(), Price::new(100));
    }

    #[test]
    fn test_capacity_bounds_growth() {
        let mut h = PriceHistory::new(3);
        for i in 0..1_000 {
            h.push(Price::new(i));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.last(), Price::new(999));
        assert_eq!(h.previous(), Price::new(998));
    }

    #[test]
    fn test_capacity_floor_is_seed_len() {
        let h = PriceHistory::new(1);
        assert_eq!(h.len(), SEED_LEN);
    }

    #[test]
    fn test_record_routes_by_instrument() {
        let mut m = MarketHistory::new(3);
        m.record(&snapshot(Instrument::Future, 9_900, 10_000));
        m.record(&snapshot(Instrument::Etf, 9_800, 9_950));

        assert_eq!(m.future_bid().last(), Price::new(9_900));
        assert_eq!(m.future_ask().last(), Price::new(10_000));
        assert_eq!(m.etf_bid().last(), Price::new(9_800));
        assert_eq!(m.etf_ask().last(), Price::new(9_950));
        assert_eq!(m.future_bid().previous(), Price::ZERO);
    }

    #[test]
    fn test_sequence_check() {
        let mut m = MarketHistory::new(3);
        assert!(m.check_sequence(Instrument::Future, 1));
        assert!(m.check_sequence(Instrument::Future, 2));
        assert!(!m.check_sequence(Instrument::Future, 2));
        assert!(!m.check_sequence(Instrument::Future, 1));
        assert!(m.check_sequence(Instrument::Future, 3));
        // Independent per instrument
        assert!(m.check_sequence(Instrument::Etf, 1));
    }
}
