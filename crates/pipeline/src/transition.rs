//! Bookkeeping for optimistic status transitions.
//!
//! Every optimistic move of an application is tagged with a
//! [`TransitionTicket`]. Tickets of one application form a chain: each
//! remembers the ticket that produced the state it moved away from. The
//! chain head is the newest optimistic state. When a persistence call fails,
//! only the head may be rolled back, and the rollback keeps walking down the
//! chain past ancestors that are already known to have failed.

use std::collections::HashMap;

use hireboard_protocol::{ApplicationId, StageKey};

/// Identifier of an issued transition, increasing over the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TicketId(pub u64);

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag attached to an in-flight status write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTicket {
    /// Sequence number.
    pub id: TicketId,
    /// The application that moved.
    pub application: ApplicationId,
    /// Status before the move.
    pub from: StageKey,
    /// Status the move issued.
    pub to: StageKey,
}

/// Where a card sat in its column before it moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    /// The card directly below it, if any.
    pub next: Option<ApplicationId>,
    /// The card directly above it, if any.
    pub previous: Option<ApplicationId>,
    /// Index in the backing list.
    pub index: usize,
}

/// How a settled transition affected the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The write succeeded.
    Confirmed,
    /// The write failed and the application was moved back.
    RolledBack {
        /// Status the application was restored to.
        restored: StageKey,
    },
    /// The write failed but a newer move owns the card; nothing changed.
    Superseded,
}

#[derive(Debug, Clone)]
struct Pending {
    ticket: TransitionTicket,
    parent: Option<TicketId>,
    origin: Placement,
    failed: bool,
}

#[derive(Debug, Clone, Default)]
struct Lineage {
    head: Option<TicketId>,
    pending: Vec<Pending>,
}

impl Lineage {
    fn find(&self, id: TicketId) -> Option<usize> {
        self.pending.iter().position(|p| p.ticket.id == id)
    }

    fn prune(&mut self) {
        if self.head.is_none() {
            self.pending.retain(|p| !p.failed);
        }
    }
}

/// A rollback the store has to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rollback {
    pub status: StageKey,
    pub origin: Placement,
}

/// Tracks in-flight transitions per application.
#[derive(Debug, Clone, Default)]
pub(crate) struct InFlight {
    next: u64,
    lineages: HashMap<ApplicationId, Lineage>,
}

impl InFlight {
    /// Issues a ticket for a move that has just been applied.
    pub fn issue(
        &mut self,
        application: ApplicationId,
        from: StageKey,
        to: StageKey,
        origin: Placement,
    ) -> TransitionTicket {
        self.next += 1;
        let ticket = TransitionTicket {
            id: TicketId(self.next),
            application,
            from,
            to,
        };
        let lineage = self.lineages.entry(application).or_default();
        lineage.pending.push(Pending {
            ticket: ticket.clone(),
            parent: lineage.head,
            origin,
            failed: false,
        });
        lineage.head = Some(ticket.id);
        ticket
    }

    /// Returns `true` if the application has unresolved writes.
    pub fn is_pending(&self, application: ApplicationId) -> bool {
        self.lineages
            .get(&application)
            .is_some_and(|l| l.pending.iter().any(|p| !p.failed))
    }

    /// Returns the newest optimistic ticket for an application.
    pub fn head(&self, application: ApplicationId) -> Option<TicketId> {
        self.lineages.get(&application).and_then(|l| l.head)
    }

    /// Forgets every in-flight ticket of an application.
    ///
    /// Used when the application is moved by something other than a drag,
    /// so that late failures cannot pull it back.
    pub fn forget(&mut self, application: ApplicationId) {
        self.lineages.remove(&application);
    }

    /// Records a successful write.
    pub fn confirm(&mut self, ticket: &TransitionTicket) {
        let Some(lineage) = self.lineages.get_mut(&ticket.application) else {
            return;
        };
        if let Some(index) = lineage.find(ticket.id) {
            lineage.pending.remove(index);
        }
        if lineage.head == Some(ticket.id) {
            lineage.head = None;
        }
        lineage.prune();
        if lineage.pending.is_empty() {
            self.lineages.remove(&ticket.application);
        }
    }

    /// Records a failed write and returns the rollback to apply, if any.
    ///
    /// `current` is the application's status right now; a head ticket whose
    /// target no longer matches it is treated as superseded.
    pub fn fail(&mut self, ticket: &TransitionTicket, current: &StageKey) -> Option<Rollback> {
        let lineage = self.lineages.get_mut(&ticket.application)?;
        let index = lineage.find(ticket.id)?;

        if lineage.head != Some(ticket.id) || current != &ticket.to {
            lineage.pending[index].failed = true;
            lineage.prune();
            if lineage.pending.is_empty() {
                self.lineages.remove(&ticket.application);
            }
            return None;
        }

        let failed = lineage.pending.remove(index);
        let mut rollback = Rollback {
            status: failed.ticket.from,
            origin: failed.origin,
        };
        let mut head = failed.parent;
        while let Some(parent) = head {
            match lineage.find(parent) {
                Some(i) if lineage.pending[i].failed => {
                    let ancestor = lineage.pending.remove(i);
                    rollback = Rollback {
                        status: ancestor.ticket.from,
                        origin: ancestor.origin,
                    };
                    head = ancestor.parent;
                }
                Some(_) => break,
                None => {
                    head = None;
                }
            }
        }
        lineage.head = head;
        lineage.prune();
        if lineage.pending.is_empty() {
            self.lineages.remove(&ticket.application);
        }
        Some(rollback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StageKey {
        StageKey::new(s).unwrap()
    }

    fn origin(index: usize) -> Placement {
        Placement {
            next: None,
            previous: None,
            index,
        }
    }

    #[test]
    fn confirm_clears_lineage() {
        let mut flight = InFlight::default();
        let app = ApplicationId::new_v4();
        let t = flight.issue(app, key("pending"), key("reviewing"), origin(0));
        assert!(flight.is_pending(app));
        flight.confirm(&t);
        assert!(!flight.is_pending(app));
        assert_eq!(flight.head(app), None);
    }

    #[test]
    fn older_failure_is_superseded() {
        let mut flight = InFlight::default();
        let app = ApplicationId::new_v4();
        let t1 = flight.issue(app, key("pending"), key("reviewing"), origin(0));
        let t2 = flight.issue(app, key("reviewing"), key("interview"), origin(3));

        assert_eq!(flight.fail(&t1, &key("interview")), None);
        assert_eq!(flight.head(app), Some(t2.id));
    }

    #[test]
    fn head_failure_walks_past_failed_ancestors() {
        let mut flight = InFlight::default();
        let app = ApplicationId::new_v4();
        let t1 = flight.issue(app, key("pending"), key("reviewing"), origin(0));
        let t2 = flight.issue(app, key("reviewing"), key("interview"), origin(3));

        assert_eq!(flight.fail(&t1, &key("interview")), None);
        let rollback = flight.fail(&t2, &key("interview")).unwrap();
        assert_eq!(rollback.status, key("pending"));
        assert_eq!(rollback.origin.index, 0);
        assert!(!flight.is_pending(app));
    }

    #[test]
    fn head_failure_stops_at_unresolved_ancestor() {
        let mut flight = InFlight::default();
        let app = ApplicationId::new_v4();
        let t1 = flight.issue(app, key("pending"), key("reviewing"), origin(0));
        let t2 = flight.issue(app, key("reviewing"), key("interview"), origin(3));

        let rollback = flight.fail(&t2, &key("interview")).unwrap();
        assert_eq!(rollback.status, key("reviewing"));
        assert_eq!(flight.head(app), Some(t1.id));

        // The ancestor now owns the card and can still be rolled back.
        let rollback = flight.fail(&t1, &key("reviewing")).unwrap();
        assert_eq!(rollback.status, key("pending"));
    }

    #[test]
    fn confirmed_ancestor_ends_the_walk() {
        let mut flight = InFlight::default();
        let app = ApplicationId::new_v4();
        let t1 = flight.issue(app, key("pending"), key("reviewing"), origin(0));
        let t2 = flight.issue(app, key("reviewing"), key("interview"), origin(3));

        flight.confirm(&t1);
        let rollback = flight.fail(&t2, &key("interview")).unwrap();
        assert_eq!(rollback.status, key("reviewing"));
        assert_eq!(flight.head(app), None);
    }

    #[test]
    fn status_mismatch_is_superseded() {
        let mut flight = InFlight::default();
        let app = ApplicationId::new_v4();
        let t1 = flight.issue(app, key("pending"), key("reviewing"), origin(0));
        assert_eq!(flight.fail(&t1, &key("hired")), None);
    }

    #[test]
    fn forget_drops_everything() {
        let mut flight = InFlight::default();
        let app = ApplicationId::new_v4();
        let t1 = flight.issue(app, key("pending"), key("reviewing"), origin(0));
        flight.forget(app);
        assert_eq!(flight.fail(&t1, &key("reviewing")), None);
        assert_eq!(flight.head(app), None);
    }
}
