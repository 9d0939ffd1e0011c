use std::cell::Cell;

/// Token handed to a deferred fit; only the newest one is honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitTicket(u64);

/// Tracks which deferred fit-to-view request is still wanted.
#[derive(Debug, Default)]
pub struct FitScheduler {
	epoch: Cell<u64>,
}

impl FitScheduler {
	/// Issue a ticket, invalidating all earlier ones.
	pub fn schedule(&self) -> FitTicket {
		let next = self.epoch.get().wrapping_add(1);
		self.epoch.set(next);
		FitTicket(next)
	}

	pub fn is_current(&self, ticket: FitTicket) -> bool {
		self.epoch.get() == ticket.0
	}
}
