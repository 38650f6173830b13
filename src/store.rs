use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Client, Collection,
};
use serde::Serialize;
use thiserror::Error;

use crate::schemas::{Expense, Group};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to encode expense: {0}")]
    Encode(#[from] bson::ser::Error),
}

/// Name and id of a group, for the overview listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupListing {
    pub id: String,
    pub group_name: String,
}

/// MongoDB-backed group storage. Groups are whole documents in one
/// collection; expenses are appended in place and never rewritten.
#[derive(Clone)]
pub struct GroupStore {
    groups: Collection<Group>,
}

impl GroupStore {
    pub fn new(client: &Client) -> Self {
        Self {
            groups: client.database("SplitLedger").collection("Groups"),
        }
    }

    pub async fn insert_group(&self, group: &Group) -> Result<(), StoreError> {
        self.groups.insert_one(group, None).await?;
        Ok(())
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupListing>, StoreError> {
        let groups: Vec<Group> = self.groups.find(None, None).await?.try_collect().await?;
        Ok(groups
            .into_iter()
            .map(|group| GroupListing {
                id: group.id,
                group_name: group.group_name,
            })
            .collect())
    }

    pub async fn find_group(&self, id: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.find_one(doc! { "id": id }, None).await?)
    }

    /// Appends an expense and returns the group as it stands after the
    /// append, so callers render balances that include the new record.
    /// Returns `None` when no group has the given id.
    pub async fn append_expense(
        &self,
        id: &str,
        expense: &Expense,
    ) -> Result<Option<Group>, StoreError> {
        let update = doc! { "$push": { "expenses": bson::to_bson(expense)? } };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .groups
            .find_one_and_update(doc! { "id": id }, update, options)
            .await?)
    }
}
