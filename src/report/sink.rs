//! Output side of the runtime: where calibrated reports are delivered.
//!
//! The mapping engine never talks to a virtual controller driver. Anything
//! that accepts [`XusbReport`]s implements [`ReportSink`]; the serial bridge
//! in [`crate::serial`] is one such sink.

use async_trait::async_trait;

use crate::error::Result;
use crate::report::protocol::XusbReport;

/// Accepts calibrated gamepad reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSink: Send {
    /// Deliver one report.
    async fn submit(&mut self, report: &XusbReport) -> Result<()>;

    /// Human readable location of the sink, for log messages.
    fn describe(&self) -> String;
}
