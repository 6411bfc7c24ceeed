use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::{Error, PanelRequest, PanelService, Result};

/// Messages sent to the UI layer that hosts the panel.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelMsg {
    /// Show (or replace) a panel.
    Show(PanelRequest),
    /// Dismiss the panel with this id.
    Dismiss {
        /// Panel id.
        id: String,
    },
}

/// Panel service that forwards requests to a UI layer over a channel.
#[derive(Clone, Debug)]
pub struct ChannelPanel {
    /// Outbound channel.
    tx: UnboundedSender<PanelMsg>,
}

impl ChannelPanel {
    /// Create a panel from a UI message channel.
    pub fn new(tx: UnboundedSender<PanelMsg>) -> Self {
        Self { tx }
    }
}

impl PanelService for ChannelPanel {
    fn show(&self, request: PanelRequest) -> Result<()> {
        self.tx
            .send(PanelMsg::Show(request))
            .map_err(|_| Error::ChannelClosed)
    }

    fn dismiss(&self, id: &str) {
        if self
            .tx
            .send(PanelMsg::Dismiss { id: id.to_string() })
            .is_err()
        {
            trace!(panel = %id, "dismiss dropped; panel channel closed");
        }
    }
}
