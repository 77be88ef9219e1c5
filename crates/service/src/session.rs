//! Short-lived storage sessions.
//!
//! Every catalog operation opens one [`Session`] and drops it on the way out.
//! The transaction is begun on first use; a session dropped without
//! [`Session::commit`] rolls it back.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryFilter, TransactionTrait,
};

use models::plan::select_ordered;
use models::{Node, Plan, Record};

use crate::errors::ServiceError;

/// Hands out a fresh session per operation.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open(&self) -> Result<Session, ServiceError>;
}

#[async_trait]
impl SessionProvider for DatabaseConnection {
    async fn open(&self) -> Result<Session, ServiceError> {
        Ok(Session::new(self.clone()))
    }
}

pub struct Session {
    conn: DatabaseConnection,
    txn: Option<DatabaseTransaction>,
}

impl Session {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn, txn: None }
    }

    async fn txn(&mut self) -> Result<&DatabaseTransaction, ServiceError> {
        let txn = match self.txn.take() {
            Some(txn) => txn,
            None => self.conn.begin().await?,
        };
        Ok(&*self.txn.insert(txn))
    }

    /// Rows of `E` matching `condition`, ascending by primary key.
    pub async fn find<E: EntityTrait>(&mut self, condition: Condition) -> Result<Vec<E::Model>, ServiceError> {
        let txn = self.txn().await?;
        Ok(select_ordered::<E>().filter(condition).all(txn).await?)
    }

    pub async fn find_by_id<E>(&mut self, id: i32) -> Result<Option<E::Model>, ServiceError>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        let txn = self.txn().await?;
        Ok(E::find_by_id(id).one(txn).await?)
    }

    pub async fn count<E>(&mut self) -> Result<u64, ServiceError>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        let txn = self.txn().await?;
        Ok(E::find().count(txn).await?)
    }

    /// Insert a new row and return it as stored.
    pub async fn add<A>(&mut self, am: A) -> Result<<A::Entity as EntityTrait>::Model, ServiceError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let txn = self.txn().await?;
        Ok(am.insert(txn).await?)
    }

    /// Insert unless `on_conflict` matches an existing row; returns rows written.
    pub async fn add_if_absent<A>(&mut self, am: A, on_conflict: OnConflict) -> Result<u64, ServiceError>
    where
        A: ActiveModelTrait + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let txn = self.txn().await?;
        Ok(<A::Entity as EntityTrait>::insert(am).on_conflict(on_conflict).exec_without_returning(txn).await?)
    }

    /// Delete by identity, returning the number of rows removed.
    pub async fn delete<E>(&mut self, id: i32) -> Result<u64, ServiceError>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        let txn = self.txn().await?;
        Ok(E::delete_by_id(id).exec(txn).await?.rows_affected)
    }

    pub async fn delete_where<E: EntityTrait>(&mut self, condition: Condition) -> Result<u64, ServiceError> {
        let txn = self.txn().await?;
        Ok(E::delete_many().filter(condition).exec(txn).await?.rows_affected)
    }

    /// Apply the eager paths of `plan` to `nodes`.
    pub async fn load<R: Record>(&mut self, plan: &Plan, nodes: &mut [Node<R>]) -> Result<(), ServiceError> {
        let txn = self.txn().await?;
        plan.apply(txn, nodes).await?;
        Ok(())
    }

    /// Re-read the owning parents named by `plan` for `nodes`.
    pub async fn refresh<R: Record>(&mut self, plan: &Plan, nodes: &mut [Node<R>]) -> Result<(), ServiceError> {
        let txn = self.txn().await?;
        plan.refresh(txn, nodes).await?;
        Ok(())
    }

    pub async fn commit(&mut self) -> Result<(), ServiceError> {
        if let Some(txn) = self.txn.take() {
            txn.commit().await?;
        }
        Ok(())
    }

    /// Release the session, discarding anything not committed.
    pub async fn close(mut self) -> Result<(), ServiceError> {
        if let Some(txn) = self.txn.take() {
            txn.rollback().await?;
        }
        Ok(())
    }
}
