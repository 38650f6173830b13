use serde::{Deserialize, Serialize};

pub type MemberName = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub group_name: String,
    pub members: Vec<MemberName>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// One (member, amount) entry on either side of an expense.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Share {
    pub member: MemberName,
    pub amount: f64,
}

/// An immutable expense record in its canonical itemized form: who paid how
/// much, and how the total is divided among the participants.
///
/// The fields default when absent so that records written by older shapes of
/// the system still deserialize; the balance engine treats a missing side as
/// empty and a missing amount as zero.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub paid_by: Vec<Share>,
    #[serde(default)]
    pub split_by: Vec<Share>,
}

/// The two expense shapes accepted at the submission boundary.
///
/// The legacy shape carries a single payer name and a member list split
/// equally; the itemized shape spells out both sides. They are told apart by
/// the type of `paidBy` (string vs. array), so an untagged union suffices.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ExpenseInput {
    #[serde(rename_all = "camelCase")]
    Itemized {
        description: String,
        amount: f64,
        paid_by: Vec<Share>,
        split_by: Vec<Share>,
    },
    #[serde(rename_all = "camelCase")]
    EqualSplit {
        description: String,
        amount: f64,
        paid_by: MemberName,
        split_between: Vec<MemberName>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn itemized_input_deserializes() {
        let input: ExpenseInput = serde_json::from_str(
            r#"{
                "description": "Dinner",
                "amount": 90.0,
                "paidBy": [{"member": "Ana", "amount": 90.0}],
                "splitBy": [
                    {"member": "Ana", "amount": 30.0},
                    {"member": "Bo", "amount": 30.0},
                    {"member": "Cy", "amount": 30.0}
                ]
            }"#,
        )
        .unwrap();
        match input {
            ExpenseInput::Itemized {
                amount,
                paid_by,
                split_by,
                ..
            } => {
                assert_eq!(amount, 90.0);
                assert_eq!(paid_by.len(), 1);
                assert_eq!(split_by.len(), 3);
            }
            ExpenseInput::EqualSplit { .. } => panic!("parsed as legacy shape"),
        }
    }

    #[test]
    fn legacy_input_deserializes() {
        let input: ExpenseInput = serde_json::from_str(
            r#"{
                "description": "Taxi",
                "amount": 50.0,
                "paidBy": "Ana",
                "splitBetween": ["Ana", "Bo"]
            }"#,
        )
        .unwrap();
        match input {
            ExpenseInput::EqualSplit {
                paid_by,
                split_between,
                ..
            } => {
                assert_eq!(paid_by, "Ana");
                assert_eq!(split_between, vec!["Ana", "Bo"]);
            }
            ExpenseInput::Itemized { .. } => panic!("parsed as itemized shape"),
        }
    }

    #[test]
    fn partial_stored_expense_gets_tolerant_defaults() {
        let expense: Expense = serde_json::from_str(r#"{"description": "old record"}"#).unwrap();
        assert_eq!(expense.amount, 0.0);
        assert!(expense.paid_by.is_empty());
        assert!(expense.split_by.is_empty());
    }

    #[test]
    fn group_without_expenses_field_deserializes() {
        let group: Group = serde_json::from_str(
            r#"{"id": "abc", "groupName": "Trip", "members": ["Ana", "Bo"]}"#,
        )
        .unwrap();
        assert!(group.expenses.is_empty());
    }
}
