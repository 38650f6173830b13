use std::collections::HashSet;

use crate::balance::SETTLED_TOLERANCE;
use crate::schemas::{Expense, ExpenseInput, MemberName, Share};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("amount must be a positive number")]
    NonPositiveAmount,
    #[error("{side} must name at least one member")]
    EmptySide { side: &'static str },
    #[error("{member} is not a member of this group")]
    UnknownMember { member: MemberName },
    #[error("{member} appears more than once in {side}")]
    DuplicateMember {
        member: MemberName,
        side: &'static str,
    },
    #[error("every {side} amount must be positive")]
    NonPositiveShare { side: &'static str },
    #[error("{side} amounts add up to {sum:.2}, expected {expected:.2}")]
    SumMismatch {
        side: &'static str,
        sum: f64,
        expected: f64,
    },
    #[error("group name must not be empty")]
    EmptyGroupName,
    #[error("a group needs at least one member")]
    NoMembers,
    #[error("member names must not be empty")]
    EmptyMemberName,
    #[error("{member} is listed twice")]
    DuplicateGroupMember { member: MemberName },
}

/// Validates a submitted expense against the group's member list and
/// normalizes it into the canonical itemized record.
///
/// Both sides must name known members exactly once with positive amounts and
/// sum to the stated total within the settlement tolerance. The legacy
/// equal-split shape is expanded into itemized shares before the same checks
/// apply.
pub fn build_expense(
    group_members: &[MemberName],
    input: ExpenseInput,
) -> Result<Expense, ValidationError> {
    let (description, amount, paid_by, split_by) = match input {
        ExpenseInput::Itemized {
            description,
            amount,
            paid_by,
            split_by,
        } => (description, amount, paid_by, split_by),
        ExpenseInput::EqualSplit {
            description,
            amount,
            paid_by,
            split_between,
        } => {
            let split_by = equal_shares(amount, &split_between);
            let paid_by = vec![Share {
                member: paid_by,
                amount,
            }];
            (description, amount, paid_by, split_by)
        }
    };

    let description = description.trim().to_string();
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    check_side("paidBy", &paid_by, amount, group_members)?;
    check_side("splitBy", &split_by, amount, group_members)?;

    Ok(Expense {
        description,
        amount,
        paid_by,
        split_by,
    })
}

fn check_side(
    side: &'static str,
    shares: &[Share],
    expected: f64,
    group_members: &[MemberName],
) -> Result<(), ValidationError> {
    if shares.is_empty() {
        return Err(ValidationError::EmptySide { side });
    }
    let mut seen = HashSet::new();
    for share in shares {
        if !group_members.contains(&share.member) {
            return Err(ValidationError::UnknownMember {
                member: share.member.clone(),
            });
        }
        if !seen.insert(share.member.as_str()) {
            return Err(ValidationError::DuplicateMember {
                member: share.member.clone(),
                side,
            });
        }
        if !share.amount.is_finite() || share.amount <= 0.0 {
            return Err(ValidationError::NonPositiveShare { side });
        }
    }
    let sum: f64 = shares.iter().map(|share| share.amount).sum();
    if (sum - expected).abs() > SETTLED_TOLERANCE {
        return Err(ValidationError::SumMismatch {
            side,
            sum,
            expected,
        });
    }
    Ok(())
}

/// Expands "split `total` equally among `members`" into itemized shares.
///
/// Works in integer cents so the shares sum to the total exactly. When the
/// total does not divide evenly, the leftover cents go to the
/// lexicographically first members, one cent each.
fn equal_shares(total: f64, members: &[MemberName]) -> Vec<Share> {
    if members.is_empty() {
        return Vec::new();
    }
    let total_cents = (total * 100.0).round() as i64;
    let base = total_cents / members.len() as i64;
    let remainder = total_cents % members.len() as i64;

    let mut ordered: Vec<&MemberName> = members.iter().collect();
    ordered.sort();
    let extra_cent: HashSet<&MemberName> =
        ordered.into_iter().take(remainder as usize).collect();

    members
        .iter()
        .map(|member| {
            let cents = base + i64::from(extra_cent.contains(member));
            Share {
                member: member.clone(),
                amount: cents as f64 / 100.0,
            }
        })
        .collect()
}

/// Checks a new group's name and member list before it is persisted.
pub fn check_new_group(name: &str, members: &[MemberName]) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyGroupName);
    }
    if members.is_empty() {
        return Err(ValidationError::NoMembers);
    }
    let mut seen = HashSet::new();
    for member in members {
        if member.trim().is_empty() {
            return Err(ValidationError::EmptyMemberName);
        }
        if !seen.insert(member.as_str()) {
            return Err(ValidationError::DuplicateGroupMember {
                member: member.clone(),
            });
        }
    }
    Ok(())
}
