use super::{Plan, PlanOptions};
use crate::ledger::{Ledger, ServiceEvent};
use crate::model::{Party, Urgency};
use crate::roster::{RequestQueue, Roster};
use tracing::debug;

pub(super) fn plan_next(
    current: &Ledger,
    roster: &Roster,
    queue: &RequestQueue,
    opts: &PlanOptions,
) -> Plan {
    // copies de travail : les entrées de l'appelant ne bougent pas
    let mut staff = roster.clone();
    let mut requests = queue.clone();
    requests.sort_by_priority();

    let next_start = roster.header().time.advance(opts.period);
    let mut next = Ledger::empty(current.header().next(opts));
    let (mut assigned, mut redirected) = (0usize, 0usize);

    for requester in requests.requesters() {
        let party = Party::Full(requester.clone());
        let require_min_category = requester.urgency == Urgency::High;

        let Some(idx) = staff.select_best_match(require_min_category, opts) else {
            debug!(requester = %requester.name, "no candidate, redirected");
            next.push(ServiceEvent::redirected(next_start, party));
            redirected += 1;
            continue;
        };

        let member = staff.member_mut(idx);
        let Some((at, new_availability)) = member.assistance_window(next_start, opts) else {
            next.push(ServiceEvent::redirected(next_start, party));
            redirected += 1;
            continue;
        };

        if !opts.hours.contains(new_availability) {
            debug!(
                requester = %requester.name,
                staff = %member.name,
                until = %new_availability,
                "outside operating hours, redirected"
            );
            next.push(ServiceEvent::redirected(at, party));
            redirected += 1;
            continue;
        }

        member.commit(new_availability, opts);
        next.push(ServiceEvent::assigned(at, party, Party::Full(member.clone())));
        assigned += 1;
        debug!(requester = %requester.name, staff = %member.name, at = %at, "assigned");

        if member.check_daily_break(opts) {
            debug!(staff = %member.name, until = %member.availability, "daily break");
        }
        if member.has_reached_weekly_limit(opts) {
            debug!(staff = %member.name, weekly = %member.weekly, "weekly limit reached");
        }
    }

    let placed_on_leave = staff.apply_weekly_leave(opts);

    // filet de sécurité : toute demande sans intervention est réorientée
    for requester in requests.requesters() {
        if !next.contains_requester(&requester.name) {
            next.push(ServiceEvent::redirected(next_start, Party::Full(requester.clone())));
            redirected += 1;
        }
    }

    let mut carried_over = 0;
    for event in current.pending_from(next_start) {
        next.push(event.clone());
        carried_over += 1;
    }

    next.sort();

    Plan {
        ledger: next,
        roster: staff.with_header(roster.header().next(opts)),
        next_start,
        assigned,
        redirected,
        carried_over,
        placed_on_leave,
    }
}
