use std::collections::HashMap;

use crate::schemas::{Expense, MemberName};
use serde::Serialize;

/// Balances within this distance of zero count as settled; anything smaller
/// is floating-point noise from summing shares.
pub const SETTLED_TOLERANCE: f64 = 0.01;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemberBalance {
    pub member: MemberName,
    pub balance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemberAmount {
    pub member: MemberName,
    pub amount: f64,
}

/// Net position of every group member, derived from the full expense history.
///
/// `balances` holds each member at the exact computed value, in the order the
/// member list was given. `owed_to` and `owes` partition the members whose
/// balance is beyond [`SETTLED_TOLERANCE`]; amounts in `owes` are sign-flipped
/// so both lists carry positive figures.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub balances: Vec<MemberBalance>,
    pub owed_to: Vec<MemberAmount>,
    pub owes: Vec<MemberAmount>,
}

/// Computes each member's net balance (credits minus debits) from the full
/// expense history.
///
/// Every payer contribution credits the payer, every split share debits the
/// participant. Entries naming someone outside `members` are ignored rather
/// than rejected; the engine never fails, it is called on every render with
/// whatever the store returned.
pub fn compute_balances(members: &[MemberName], expenses: &[Expense]) -> BalanceSummary {
    let mut totals: HashMap<&str, f64> = members.iter().map(|m| (m.as_str(), 0.0)).collect();

    for expense in expenses {
        for payer in &expense.paid_by {
            if let Some(balance) = totals.get_mut(payer.member.as_str()) {
                *balance += payer.amount;
            }
        }
        for participant in &expense.split_by {
            if let Some(balance) = totals.get_mut(participant.member.as_str()) {
                *balance -= participant.amount;
            }
        }
    }

    let mut balances = Vec::with_capacity(members.len());
    let mut owed_to = Vec::new();
    let mut owes = Vec::new();

    for member in members {
        let balance = totals[member.as_str()];
        balances.push(MemberBalance {
            member: member.clone(),
            balance,
        });
        if balance > SETTLED_TOLERANCE {
            owed_to.push(MemberAmount {
                member: member.clone(),
                amount: balance,
            });
        } else if balance < -SETTLED_TOLERANCE {
            owes.push(MemberAmount {
                member: member.clone(),
                amount: -balance,
            });
        }
    }

    BalanceSummary {
        balances,
        owed_to,
        owes,
    }
}

/// Sum of each expense's stated total, shown alongside the balances.
pub fn total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}
