/// Identity of one issued list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Issues monotonically increasing tickets; only the latest one is current.
///
/// A fetch takes a ticket before it suspends and checks it again when the
/// response settles, so a slow response to an older request can never
/// overwrite state produced by a newer one.
#[derive(Debug, Default, Clone)]
pub struct TicketBook {
    issued: u64,
}

impl TicketBook {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }
}

/// What happened to a settled list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer fetch was issued while this one was in flight; its result was dropped.
    Superseded,
}
