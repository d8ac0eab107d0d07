use tracing::debug;

/// Ticket handed to an asynchronous file read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReadTicket(u64);

/// Tracks file selections on one input so that a read finishing after a
/// newer selection is discarded.
#[derive(Clone, Debug, Default)]
pub struct PreviewTracker {
    generation: u64,
}

impl PreviewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call on every change event, including one that clears the selection.
    pub fn begin(&mut self) -> ReadTicket {
        self.generation += 1;
        ReadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: ReadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// The data URL to show, or `None` when the read is stale.
    pub fn accept(&self, ticket: ReadTicket, data_url: String) -> Option<String> {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, current = self.generation, "discarding stale preview");
            return None;
        }
        if !data_url.starts_with("data:") {
            return None;
        }
        Some(data_url)
    }
}
