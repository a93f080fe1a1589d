pub(crate) mod aggregate_ci_signals;
pub(crate) mod handle_ci_event;

pub use aggregate_ci_signals::{
    AggregateCiSignalsInterface, AggregatedSignals, CiSignal, SignalSource,
};
pub use handle_ci_event::HandleCiEventInterface;

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    aggregate_ci_signals::MockAggregateCiSignalsInterface,
    handle_ci_event::MockHandleCiEventInterface,
};
