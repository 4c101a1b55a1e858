//! Session statistics.
//!
//! Plain counters owned by the engine. Outbound commands are counted by
//! wrapping the caller's gateway in a `CountingGateway` for the duration of
//! a handler.

use etfmm_core::{Lifespan, OrderId, Price, Side, Volume};
use tracing::info;

use crate::gateway::OrderGateway;

/// Counters for one trading session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub future_updates: u64,
    pub etf_updates: u64,
    pub rejected_snapshots: u64,
    pub out_of_order_updates: u64,
    pub trade_ticks: u64,

    pub inserts: u64,
    pub cancels: u64,
    pub hedges: u64,
    pub hedged_volume: u64,

    pub bid_fills: u64,
    pub ask_fills: u64,
    pub bid_filled_volume: u64,
    pub ask_filled_volume: u64,
    /// Fills for identifiers no longer (or never) tracked.
    pub untracked_fills: u64,

    pub hedge_fills: u64,
    pub hedge_filled_volume: u64,

    pub terminal_statuses: u64,
    pub venue_errors: u64,
    /// Sum of fees reported on status notifications (negative = rebate).
    pub fees: i64,
}

impl SessionStats {
    pub fn record_fill(&mut self, side: Side, volume: Volume) {
        let lots = u64::from(volume.lots());
        match side {
            Side::Buy => {
                self.bid_fills += 1;
                self.bid_filled_volume += lots;
            }
            Side::Sell => {
                self.ask_fills += 1;
                self.ask_filled_volume += lots;
            }
        }
    }

    /// Net filled lots (bought minus sold).
    pub fn net_filled_volume(&self) -> i64 {
        self.bid_filled_volume as i64 - self.ask_filled_volume as i64
    }

    /// Log a one-line summary.
    pub fn log_summary(&self) {
        info!(
            future_updates = self.future_updates,
            etf_updates = self.etf_updates,
            rejected_snapshots = self.rejected_snapshots,
            inserts = self.inserts,
            cancels = self.cancels,
            hedges = self.hedges,
            bid_fills = self.bid_fills,
            ask_fills = self.ask_fills,
            net_filled_volume = self.net_filled_volume(),
            hedge_filled_volume = self.hedge_filled_volume,
            venue_errors = self.venue_errors,
            fees = self.fees,
            "Session statistics"
        );
    }
}

/// Gateway adapter that counts commands before forwarding them.
pub struct CountingGateway<'a, G: OrderGateway + ?Sized> {
    inner: &'a mut G,
    stats: &'a mut SessionStats,
}

impl<'a, G: OrderGateway + ?Sized> CountingGateway<'a, G> {
    pub fn new(inner: &'a mut G, stats: &'a mut SessionStats) -> Self {
        Self { inner, stats }
    }
}

impl<G: OrderGateway + ?Sized> OrderGateway for CountingGateway<'_, G> {
    fn insert_order(
        &mut self,
        order_id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    ) {
        self.stats.inserts += 1;
        self.inner
            .insert_order(order_id, side, price, volume, lifespan);
    }

    fn cancel_order(&mut self, order_id: OrderId) {
        self.stats.cancels += 1;
        self.inner.cancel_order(order_id);
    }

    fn hedge_order(&mut self, order_id: OrderId, side: Side, price: Price, volume: Volume) {
        self.stats.hedges += 1;
        self.stats.hedged_volume += u64::from(volume.lots());
        self.inner.hedge_order(order_id, side, price, volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RecordingGateway;

    #[test]
    fn test_counting_gateway_forwards_and_counts() {
        let mut stats = SessionStats::default();
        let mut inner = RecordingGateway::new();
        {
            let mut gw = CountingGateway::new(&mut inner, &mut stats);
            gw.insert_order(
                OrderId(1),
                Side::Buy,
                Price::new(100),
                Volume::new(25),
                Lifespan::GoodForDay,
            );
            gw.cancel_order(OrderId(1));
            gw.hedge_order(OrderId(2), Side::Sell, Price::new(100), Volume::new(7));
        }
        assert_eq!(inner.len(), 3);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.cancels, 1);
        assert_eq!(stats.hedges, 1);
        assert_eq!(stats.hedged_volume, 7);
    }

    #[test]
    fn test_record_fill_by_side() {
        let mut stats = SessionStats::default();
        stats.record_fill(Side::Buy, Volume::new(10));
        stats.record_fill(Side::Sell, Volume::new(4));
        assert_eq!(stats.bid_fills, 1);
        assert_eq!(stats.ask_fills, 1);
        assert_eq!(stats.net_filled_volume(), 6);
    }
}
