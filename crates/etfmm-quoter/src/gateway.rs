//! Outbound order interface.
//!
//! The quoting core never talks to the venue directly. Every handler takes
//! an `OrderGateway`, which allows for:
//! - Recording emitted commands in tests and in the replay host
//! - Swapping the transport without touching quoting logic

use etfmm_core::{Lifespan, OrderCommand, OrderId, Price, Side, Volume};

/// Fire-and-forget requests to the venue connector.
#[cfg_attr(test, mockall::automock)]
pub trait OrderGateway {
    /// Insert a quote on the ETF.
    fn insert_order(
        &mut self,
        order_id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    );

    /// Cancel a resting quote.
    fn cancel_order(&mut self, order_id: OrderId);

    /// Send an aggressive offsetting order on the future.
    fn hedge_order(&mut self, order_id: OrderId, side: Side, price: Price, volume: Volume);
}

/// Gateway that keeps every command in emission order.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    commands: Vec<OrderCommand>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[OrderCommand] {
        &self.commands
    }

    /// Take all recorded commands, leaving the gateway empty.
    pub fn drain(&mut self) -> Vec<OrderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn inserts(&self) -> impl Iterator<Item = &OrderCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, OrderCommand::Insert { .. }))
    }

    pub fn cancels(&self) -> impl Iterator<Item = &OrderCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, OrderCommand::Cancel { .. }))
    }

    pub fn hedges(&self) -> impl Iterator<Item = &OrderCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, OrderCommand::Hedge { .. }))
    }
}

impl OrderGateway for RecordingGateway {
    fn insert_order(
        &mut self,
        order_id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    ) {
        self.commands.push(OrderCommand::Insert {
            order_id,
            side,
            price,
            volume,
            lifespan,
        });
    }

    fn cancel_order(&mut self, order_id: OrderId) {
        self.commands.push(OrderCommand::Cancel { order_id });
    }

    fn hedge_order(&mut self, order_id: OrderId, side: Side, price: Price, volume: Volume) {
        self.commands.push(OrderCommand::Hedge {
            order_id,
            side,
            price,
            volume,
        });
    }
}
