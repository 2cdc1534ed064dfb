//! Start gate between the mapper output and the report sink.

use tracing::{info, warn};

use crate::controller::input::PhysicalInput;
use crate::error::Result;
use crate::mapping::calibration::CalibrationRecord;
use crate::mapping::mapper::InputMapper;
use crate::mapping::xinput::{XInputState, XInputType};
use crate::report::protocol::XusbReport;
use crate::report::sink::ReportSink;

/// Holds the output at neutral until forwarding is enabled.
///
/// With `StartWhenConnected` set, forwarding begins immediately. Otherwise it
/// begins on the first press of the virtual Home channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardGate {
    open: bool,
    home_bound: bool,
}

impl ForwardGate {
    /// Gate for a mapper whose Home channel has a physical source.
    #[must_use]
    pub fn new(start_when_connected: bool) -> Self {
        Self {
            open: start_when_connected,
            home_bound: true,
        }
    }

    /// Gate configured from the mapper's settings and Home mapping.
    ///
    /// Warns when the gate starts closed and nothing can open it.
    pub fn for_mapper<P: PhysicalInput>(mapper: &InputMapper<P>) -> Self {
        let home_bound = mapper
            .try_get(XInputType::Home)
            .is_some_and(CalibrationRecord::is_enabled);
        let gate = Self {
            open: mapper.settings.start_when_connected,
            home_bound,
        };

        if gate.never_opens() {
            warn!(
                "StartWhenConnected is false and Home has no source: \
                 output will stay neutral until the profile maps Home"
            );
        } else if !gate.open {
            info!("Press Home to start forwarding");
        }

        gate
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True when the gate is closed and no physical control drives Home.
    #[must_use]
    pub fn never_opens(&self) -> bool {
        !self.open && !self.home_bound
    }

    /// Returns the state to send, opening the gate on Home.
    pub fn filter(&mut self, state: XInputState) -> XInputState {
        if !self.open && state.is_pressed(XInputType::Home) {
            info!("Home pressed, forwarding controller input");
            self.open = true;
        }

        if self.open {
            state
        } else {
            XInputState::neutral()
        }
    }
}

/// Passes `state` through the gate and submits the resulting report.
///
/// Returns the state that was submitted.
pub async fn forward<S>(sink: &mut S, gate: &mut ForwardGate, state: XInputState) -> Result<XInputState>
where
    S: ReportSink + ?Sized,
{
    let sent = gate.filter(state);
    sink.submit(&XusbReport::from_state(&sent)).await?;
    Ok(sent)
}
