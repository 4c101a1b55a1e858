//! The market-making context.
//!
//! `MarketMaker` owns every piece of mutable quoting state (history, layers,
//! order tracking, the id sequence, statistics) and processes one venue
//! notification at a time. Handlers never block and never perform I/O; all
//! outbound requests go through the `OrderGateway` passed in.

use etfmm_core::{BookSnapshot, Instrument, OrderId, Price, VenueEvent, Volume};
use tracing::{debug, info, warn};

use crate::config::QuoterConfig;
use crate::error::QuoterResult;
use crate::gateway::OrderGateway;
use crate::hedge::{HedgeController, HedgeOrder};
use crate::history::MarketHistory;
use crate::layer::{compute_targets, LayerKind, LayerTargets, QuoteLayer};
use crate::lifecycle::OrderLifecycle;
use crate::signal::derive_signals;
use crate::stats::{CountingGateway, SessionStats};

#[derive(Debug, Clone)]
pub struct MarketMaker {
    config: QuoterConfig,
    history: MarketHistory,
    lifecycle: OrderLifecycle,
    hedger: HedgeController,
    stats: SessionStats,
}

impl MarketMaker {
    pub fn new(config: QuoterConfig) -> QuoterResult<Self> {
        config.validate()?;
        info!(
            lot_size = config.lot_size,
            position_limit = config.position_limit,
            tick_size = config.tick_size,
            rearm_aggressive_layer = config.rearm_aggressive_layer,
            "Market maker initialised"
        );
        Ok(Self {
            history: MarketHistory::new(config.history_capacity),
            lifecycle: OrderLifecycle::new(&config),
            hedger: HedgeController::new(&config),
            stats: SessionStats::default(),
            config,
        })
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn history(&self) -> &MarketHistory {
        &self.history
    }

    pub fn layer(&self, kind: LayerKind) -> &QuoteLayer {
        self.lifecycle.layer(kind)
    }

    /// Layer positions in `LayerKind::ALL` order.
    pub fn positions(&self) -> [i64; 3] {
        self.lifecycle.positions()
    }

    pub fn lifecycle(&self) -> &OrderLifecycle {
        &self.lifecycle
    }

    /// Dispatch one inbound notification.
    ///
    /// Only a malformed snapshot produces an error; state is untouched in
    /// that case and the caller may continue with the next event.
    pub fn handle<G: OrderGateway + ?Sized>(
        &mut self,
        event: &VenueEvent,
        gateway: &mut G,
    ) -> QuoterResult<()> {
        match event {
            VenueEvent::OrderBookUpdate(snapshot) => self.on_order_book_update(snapshot, gateway),
            VenueEvent::TradeTicks(snapshot) => {
                self.on_trade_ticks(snapshot);
                Ok(())
            }
            VenueEvent::OrderFilled {
                order_id,
                price,
                volume,
            } => {
                self.on_order_filled(*order_id, *price, *volume, gateway);
                Ok(())
            }
            VenueEvent::OrderStatus {
                order_id,
                fill_volume,
                remaining_volume,
                fees,
            } => {
                self.on_order_status(*order_id, *fill_volume, *remaining_volume, *fees);
                Ok(())
            }
            VenueEvent::Error { order_id, message } => {
                self.on_error(*order_id, message);
                Ok(())
            }
            VenueEvent::HedgeFilled {
                order_id,
                average_price,
                volume,
            } => {
                self.on_hedge_filled(*order_id, *average_price, *volume);
                Ok(())
            }
        }
    }

    /// Process a depth snapshot.
    ///
    /// A future update re-quotes every layer and is then appended to history;
    /// an ETF update is only appended.
    pub fn on_order_book_update<G: OrderGateway + ?Sized>(
        &mut self,
        snapshot: &BookSnapshot,
        gateway: &mut G,
    ) -> QuoterResult<()> {
        if let Err(e) = snapshot.validate() {
            self.stats.rejected_snapshots += 1;
            warn!(
                instrument = %snapshot.instrument,
                sequence = snapshot.sequence,
                error = %e,
                "Rejecting book update"
            );
            return Err(e.into());
        }

        let targets = match snapshot.instrument {
            Instrument::Future => Some(self.targets_for(snapshot)?),
            Instrument::Etf => None,
        };

        debug!(
            instrument = %snapshot.instrument,
            sequence = snapshot.sequence,
            best_bid = %snapshot.best_bid(),
            best_ask = %snapshot.best_ask(),
            "Order book update"
        );
        if !self
            .history
            .check_sequence(snapshot.instrument, snapshot.sequence)
        {
            self.stats.out_of_order_updates += 1;
        }

        match targets {
            Some(targets) => {
                self.stats.future_updates += 1;
                let mut counting = CountingGateway::new(gateway, &mut self.stats);
                self.lifecycle.reconcile(&targets, &mut counting);
            }
            None => self.stats.etf_updates += 1,
        }
        self.history.record(snapshot);
        Ok(())
    }

    /// Signals and layer targets for a validated future snapshot.
    fn targets_for(&self, snapshot: &BookSnapshot) -> QuoterResult<LayerTargets> {
        let signals = derive_signals(snapshot, &self.history, &self.config);
        let targets = compute_targets(
            snapshot,
            signals,
            self.layer(LayerKind::Standard).position(),
            self.layer(LayerKind::Skewed).position(),
            &self.config,
        )?;
        debug!(?targets, "Layer targets");
        Ok(targets)
    }

    pub fn on_trade_ticks(&mut self, snapshot: &BookSnapshot) {
        self.stats.trade_ticks += 1;
        debug!(
            instrument = %snapshot.instrument,
            sequence = snapshot.sequence,
            "Trade ticks"
        );
    }

    /// Hedge a fill on one of our quotes.
    pub fn on_order_filled<G: OrderGateway + ?Sized>(
        &mut self,
        order_id: OrderId,
        price: Price,
        volume: Volume,
        gateway: &mut G,
    ) -> Option<HedgeOrder> {
        info!(
            order_id = order_id.raw(),
            price = %price,
            volume = %volume,
            "Order filled"
        );
        let mut counting = CountingGateway::new(gateway, &mut self.stats);
        let hedge =
            self.hedger
                .on_order_filled(&mut self.lifecycle, order_id, price, volume, &mut counting);
        match hedge {
            Some(h) => self.stats.record_fill(h.filled_side, volume),
            None => self.stats.untracked_fills += 1,
        }
        hedge
    }

    pub fn on_order_status(
        &mut self,
        order_id: OrderId,
        fill_volume: Volume,
        remaining_volume: Volume,
        fees: i64,
    ) {
        info!(
            order_id = order_id.raw(),
            fill_volume = %fill_volume,
            remaining_volume = %remaining_volume,
            fees,
            "Order status"
        );
        self.stats.fees += fees;
        if self.lifecycle.on_order_status(order_id, remaining_volume) {
            self.stats.terminal_statuses += 1;
        }
    }

    /// Venue error. A tracked order is terminated locally; it is never retried.
    pub fn on_error(&mut self, order_id: OrderId, message: &str) {
        self.stats.venue_errors += 1;
        warn!(order_id = order_id.raw(), error = message, "Venue error");
        if self.lifecycle.on_error(order_id) {
            self.stats.terminal_statuses += 1;
        }
    }

    /// Hedge fills are logged and counted only.
    pub fn on_hedge_filled(&mut self, order_id: OrderId, average_price: Price, volume: Volume) {
        self.stats.hedge_fills += 1;
        self.stats.hedge_filled_volume += u64::from(volume.lots());
        info!(
            order_id = order_id.raw(),
            average_price = %average_price,
            volume = %volume,
            "Hedge filled"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MockOrderGateway, RecordingGateway};
    use etfmm_core::{Lifespan, OrderCommand, Side};
    use std::collections::HashSet;

    fn book(instrument: Instrument, sequence: u64, best_bid: i64, best_ask: i64) -> BookSnapshot {
        BookSnapshot::new(
            instrument,
            sequence,
            (0..5).map(|i| Price::new(best_ask + 100 * i)).collect(),
            vec![Volume::new(100); 5],
            (0..5).map(|i| Price::new(best_bid - 100 * i)).collect(),
            vec![Volume::new(100); 5],
        )
    }

    fn future(sequence: u64, best_bid: i64, best_ask: i64) -> VenueEvent {
        VenueEvent::OrderBookUpdate(book(Instrument::Future, sequence, best_bid, best_ask))
    }

    fn etf(sequence: u64, best_bid: i64, best_ask: i64) -> VenueEvent {
        VenueEvent::OrderBookUpdate(book(Instrument::Etf, sequence, best_bid, best_ask))
    }

    fn maker() -> MarketMaker {
        MarketMaker::new(QuoterConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = QuoterConfig {
            lot_size: 0,
            ..QuoterConfig::default()
        };
        assert!(MarketMaker::new(config).is_err());
    }

    #[test]
    fn test_first_future_update_quotes_all_layers() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&future(1, 10_000, 10_100), &mut gw).unwrap();

        // Level 2: bid 9800, ask 10300; no signals on seeded history
        let inserts: Vec<(u64, Side, i64, u32, Lifespan)> = gw
            .commands()
            .iter()
            .map(|c| match c {
                OrderCommand::Insert {
                    order_id,
                    side,
                    price,
                    volume,
                    lifespan,
                } => (order_id.raw(), *side, price.cents(), volume.lots(), *lifespan),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            inserts,
            vec![
                (1, Side::Buy, 9_900, 20, Lifespan::FillAndKill),
                (2, Side::Sell, 10_200, 20, Lifespan::FillAndKill),
                (3, Side::Buy, 9_800, 25, Lifespan::GoodForDay),
                (4, Side::Buy, 9_800, 25, Lifespan::GoodForDay),
                (5, Side::Sell, 10_300, 25, Lifespan::GoodForDay),
                (6, Side::Sell, 10_300, 25, Lifespan::GoodForDay),
            ]
        );
        assert_eq!(mm.stats().inserts, 6);
        assert_eq!(mm.stats().future_updates, 1);
        assert_eq!(mm.history().future_bid().last(), Price::new(10_000));
    }

    #[test]
    fn test_etf_update_only_records_history() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&etf(1, 9_850, 9_900), &mut gw).unwrap();
        assert!(gw.is_empty());
        assert_eq!(mm.history().etf_ask().last(), Price::new(9_900));
        assert_eq!(mm.history().future_ask().last(), Price::ZERO);
        assert_eq!(mm.stats().etf_updates, 1);
    }

    #[test]
    fn test_shallow_book_rejected_without_side_effects() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        let mut shallow = book(Instrument::Future, 1, 10_000, 10_100);
        shallow.bid_prices.truncate(4);

        let result = mm.handle(&VenueEvent::OrderBookUpdate(shallow), &mut gw);
        assert!(result.is_err());
        assert!(gw.is_empty());
        assert_eq!(mm.history().future_bid().last(), Price::ZERO);
        assert_eq!(mm.stats().rejected_snapshots, 1);
        assert_eq!(mm.lifecycle().issued(), 0);

        // Processing continues normally afterwards
        mm.handle(&future(2, 10_000, 10_100), &mut gw).unwrap();
        assert_eq!(gw.len(), 6);
    }

    #[test]
    fn test_long_position_skews_standard_quotes() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&future(1, 10_000, 10_100), &mut gw).unwrap();
        // Standard bid id 3 fills for 30
        mm.handle(
            &VenueEvent::OrderFilled {
                order_id: OrderId(3),
                price: Price::new(9_800),
                volume: Volume::new(30),
            },
            &mut gw,
        )
        .unwrap();
        assert_eq!(mm.positions(), [30, 30, 30]);
        // Keep the ETF level with the future so the spread skew stays off
        mm.handle(&etf(1, 10_000, 10_100), &mut gw).unwrap();
        gw.drain();

        mm.handle(&future(2, 10_000, 10_100), &mut gw).unwrap();
        // floor(30/25) = 1 tick down: standard and skewed move to 9700/10200
        let standard = mm.layer(LayerKind::Standard);
        assert_eq!(standard.slot(Side::Buy).price(), Price::new(9_700));
        assert_eq!(standard.slot(Side::Sell).price(), Price::new(10_200));
        let skewed = mm.layer(LayerKind::Skewed);
        assert_eq!(skewed.slot(Side::Sell).price(), Price::new(10_200));
    }

    #[test]
    fn test_fill_hedges_and_updates_positions() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&future(1, 10_000, 10_100), &mut gw).unwrap();
        gw.drain();

        mm.handle(
            &VenueEvent::OrderFilled {
                order_id: OrderId(4),
                price: Price::new(9_800),
                volume: Volume::new(10),
            },
            &mut gw,
        )
        .unwrap();

        assert_eq!(mm.positions(), [10, 10, 10]);
        assert_eq!(
            gw.commands(),
            &[OrderCommand::Hedge {
                order_id: OrderId(7),
                side: Side::Sell,
                price: Price::new(100),
                volume: Volume::new(10),
            }]
        );
        assert_eq!(mm.stats().bid_fills, 1);
        assert_eq!(mm.stats().hedges, 1);
    }

    #[test]
    fn test_error_terminates_tracked_order() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&future(1, 10_000, 10_100), &mut gw).unwrap();

        mm.handle(
            &VenueEvent::Error {
                order_id: OrderId(5),
                message: "rejected".into(),
            },
            &mut gw,
        )
        .unwrap();
        assert!(!mm.lifecycle().is_bid(OrderId(5)));
        assert!(!mm.lifecycle().is_ask(OrderId(5)));
        assert_eq!(mm.stats().venue_errors, 1);
        assert_eq!(mm.stats().terminal_statuses, 1);

        // Slot was freed, so the next update re-quotes it
        mm.handle(&etf(1, 10_000, 10_100), &mut gw).unwrap();
        gw.drain();
        mm.handle(&future(2, 10_000, 10_100), &mut gw).unwrap();
        assert_eq!(
            gw.commands(),
            &[OrderCommand::Insert {
                order_id: OrderId(7),
                side: Side::Sell,
                price: Price::new(10_300),
                volume: Volume::new(25),
                lifespan: Lifespan::GoodForDay,
            }]
        );
    }

    #[test]
    fn test_general_error_without_id_counts_only() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&future(1, 10_000, 10_100), &mut gw).unwrap();
        mm.handle(
            &VenueEvent::Error {
                order_id: OrderId::UNSET,
                message: "throttled".into(),
            },
            &mut gw,
        )
        .unwrap();
        assert_eq!(mm.lifecycle().tracked(), 6);
        assert_eq!(mm.stats().terminal_statuses, 0);
    }

    #[test]
    fn test_status_accumulates_fees() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&future(1, 10_000, 10_100), &mut gw).unwrap();
        mm.handle(
            &VenueEvent::OrderStatus {
                order_id: OrderId(3),
                fill_volume: Volume::new(25),
                remaining_volume: Volume::ZERO,
                fees: -12,
            },
            &mut gw,
        )
        .unwrap();
        assert_eq!(mm.stats().fees, -12);
        assert!(mm.layer(LayerKind::Standard).slot(Side::Buy).is_empty());
    }

    #[test]
    fn test_depth_shift_moves_standard_layer_to_best() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        // fut bid 9950 -> previous, fut ask 10000 -> last; ETF ask 9900 twice
        mm.handle(&future(1, 9_950, 9_990), &mut gw).unwrap();
        mm.handle(&future(2, 9_960, 10_000), &mut gw).unwrap();
        mm.handle(&etf(1, 9_850, 9_900), &mut gw).unwrap();
        mm.handle(&etf(2, 9_850, 9_900), &mut gw).unwrap();
        gw.drain();

        mm.handle(&future(3, 9_970, 10_100), &mut gw).unwrap();
        let standard = mm.layer(LayerKind::Standard);
        assert_eq!(standard.slot(Side::Buy).price(), Price::new(9_970));
        assert_eq!(standard.slot(Side::Sell).price(), Price::new(10_100));
        // Skewed layer still quotes level 2
        let skewed = mm.layer(LayerKind::Skewed);
        assert_eq!(skewed.slot(Side::Buy).price(), Price::new(9_770));
    }

    #[test]
    fn test_out_of_order_sequence_still_processed() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&etf(5, 9_850, 9_900), &mut gw).unwrap();
        mm.handle(&etf(4, 9_860, 9_910), &mut gw).unwrap();
        assert_eq!(mm.stats().out_of_order_updates, 1);
        assert_eq!(mm.history().etf_bid().last(), Price::new(9_860));
    }

    #[test]
    fn test_identifiers_unique_across_quotes_and_hedges() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        for seq in 1..=10u64 {
            let drift = (seq as i64 % 3) * 100;
            mm.handle(&future(seq, 10_000 + drift, 10_100 + drift), &mut gw)
                .unwrap();
            let fill_id = gw.inserts().last().map(|c| c.order_id());
            if let Some(order_id) = fill_id {
                mm.handle(
                    &VenueEvent::OrderFilled {
                        order_id,
                        price: Price::new(10_000),
                        volume: Volume::new(1),
                    },
                    &mut gw,
                )
                .unwrap();
            }
        }
        let ids: Vec<OrderId> = gw
            .commands()
            .iter()
            .filter(|c| !matches!(c, OrderCommand::Cancel { .. }))
            .map(|c| c.order_id())
            .collect();
        let unique: HashSet<OrderId> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_aggressive_layer_quotes_once_by_default() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(&future(1, 10_000, 10_100), &mut gw).unwrap();
        // Venue kills the fill-and-kill orders
        for id in [1, 2] {
            mm.handle(
                &VenueEvent::OrderStatus {
                    order_id: OrderId(id),
                    fill_volume: Volume::ZERO,
                    remaining_volume: Volume::ZERO,
                    fees: 0,
                },
                &mut gw,
            )
            .unwrap();
        }
        mm.handle(&etf(1, 10_000, 10_100), &mut gw).unwrap();
        gw.drain();
        mm.handle(&future(2, 10_000, 10_100), &mut gw).unwrap();
        assert!(gw.is_empty());
    }

    #[test]
    fn test_aggressive_layer_rearms_when_enabled() {
        let config = QuoterConfig {
            rearm_aggressive_layer: true,
            ..QuoterConfig::default()
        };
        let mut mm = MarketMaker::new(config).unwrap();
        let mut gw = RecordingGateway::new();
        mm.handle(&future(1, 10_000, 10_100), &mut gw).unwrap();
        for id in [1, 2] {
            mm.handle(
                &VenueEvent::OrderStatus {
                    order_id: OrderId(id),
                    fill_volume: Volume::ZERO,
                    remaining_volume: Volume::ZERO,
                    fees: 0,
                },
                &mut gw,
            )
            .unwrap();
        }
        mm.handle(&etf(1, 10_000, 10_100), &mut gw).unwrap();
        gw.drain();
        mm.handle(&future(2, 10_000, 10_100), &mut gw).unwrap();
        assert_eq!(gw.inserts().count(), 2);
        assert_eq!(gw.commands()[0].order_id(), OrderId(7));
    }

    #[test]
    fn test_gateway_mock_sees_expected_calls() {
        let mut mm = maker();
        let mut mock = MockOrderGateway::new();
        mock.expect_insert_order().times(6).return_const(());
        mock.expect_cancel_order().never();
        mock.expect_hedge_order()
            .withf(|id, side, price, volume| {
                *id == OrderId(7)
                    && *side == Side::Buy
                    && *price == Price::new(2_147_483_600)
                    && *volume == Volume::new(5)
            })
            .times(1)
            .return_const(());

        mm.handle(&future(1, 10_000, 10_100), &mut mock).unwrap();
        mm.handle(
            &VenueEvent::OrderFilled {
                order_id: OrderId(6),
                price: Price::new(10_300),
                volume: Volume::new(5),
            },
            &mut mock,
        )
        .unwrap();
        assert_eq!(mm.positions(), [-5, -5, -5]);
    }

    #[test]
    fn test_hedge_fill_counted_only() {
        let mut mm = maker();
        let mut gw = RecordingGateway::new();
        mm.handle(
            &VenueEvent::HedgeFilled {
                order_id: OrderId(9),
                average_price: Price::new(10_050),
                volume: Volume::new(10),
            },
            &mut gw,
        )
        .unwrap();
        assert!(gw.is_empty());
        assert_eq!(mm.stats().hedge_fills, 1);
        assert_eq!(mm.stats().hedge_filled_volume, 10);
        assert_eq!(mm.positions(), [0, 0, 0]);
    }
}
