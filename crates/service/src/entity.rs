//! Generic Create/Get/List/Delete over any catalog entity.
//!
//! An [`EntityService`] is parametrised by the sea-orm entity, the wire type
//! it converts to, an eager-load [`Plan`] and a [`SessionProvider`]. Every
//! operation opens its own session and releases it on all exit paths.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, IntoActiveModel, PrimaryKeyTrait,
};
use tracing::{info, instrument};

use models::{CatalogEntity, Fields, Node, Plan, Record, Relations, Row};

use crate::errors::ServiceError;
use crate::session::{Session, SessionProvider};

/// Pure mapping from a loaded row to its wire form.
pub type Converter<M, W> = fn(&M, &Relations) -> W;

pub struct EntityService<E: CatalogEntity, W> {
    sessions: Arc<dyn SessionProvider>,
    convert: Converter<E::Model, W>,
    plan: Plan,
    _entity: PhantomData<fn() -> E>,
}

impl<E: CatalogEntity, W> Clone for EntityService<E, W> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            convert: self.convert,
            plan: self.plan,
            _entity: PhantomData,
        }
    }
}

impl<E: CatalogEntity, W> fmt::Debug for EntityService<E, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityService")
            .field("entity", &E::KIND)
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

impl<E, W> EntityService<E, W>
where
    E: CatalogEntity,
    E::Model: Record + Into<Row> + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    E::Column: FromStr,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    W: Send,
{
    /// Service using the kind's default plan.
    pub fn new(sessions: Arc<dyn SessionProvider>, convert: Converter<E::Model, W>) -> Self {
        Self { sessions, convert, plan: E::KIND.plan(), _entity: PhantomData }
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn sessions(&self) -> &Arc<dyn SessionProvider> {
        &self.sessions
    }

    /// Insert a row built from the allow-listed columns of `input` and return it with
    /// its plan applied. Owning parents already loaded on the row are re-read.
    #[instrument(skip(self, input), fields(entity = %E::KIND))]
    pub async fn create(&self, input: Fields) -> Result<W, ServiceError> {
        let am = E::KIND.schema().active_model::<E>(input)?;

        let mut session = self.sessions.open().await?;
        let inserted = session.add(am).await.map_err(|e| match e {
            ServiceError::MissingParent(msg) => {
                ServiceError::MissingParent(format!("{} references a missing parent: {msg}", E::KIND))
            }
            other => other,
        })?;
        session.commit().await?;
        let id = inserted.id();
        info!(entity = %E::KIND, id, "created");

        let mut node = self.read(&mut session, id).await?;
        session.refresh(&self.plan, std::slice::from_mut(&mut node)).await?;
        session.close().await?;
        Ok((self.convert)(&node.row, &node.relations))
    }

    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn get(&self, id: i32) -> Result<W, ServiceError> {
        let mut session = self.sessions.open().await?;
        let out = self.get_in(&mut session, id).await?;
        session.close().await?;
        Ok(out)
    }

    /// All rows, ascending by identity.
    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn list(&self) -> Result<Vec<W>, ServiceError> {
        let mut session = self.sessions.open().await?;
        let mut nodes: Vec<Node<E::Model>> =
            session.find::<E>(Condition::all()).await?.into_iter().map(Node::new).collect();
        session.load(&self.plan, &mut nodes).await?;
        session.close().await?;
        Ok(nodes.iter().map(|node| (self.convert)(&node.row, &node.relations)).collect())
    }

    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let mut session = self.sessions.open().await?;
        // Write before any read: SQLite cannot upgrade a read lock while another connection writes.
        if session.delete::<E>(id).await? == 0 {
            return Err(ServiceError::not_found(E::KIND));
        }
        session.commit().await?;
        session.close().await?;
        info!(entity = %E::KIND, id, "deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        let mut session = self.sessions.open().await?;
        let n = session.count::<E>().await?;
        session.close().await?;
        Ok(n)
    }

    /// Get inside a session the caller already holds.
    pub async fn get_in(&self, session: &mut Session, id: i32) -> Result<W, ServiceError> {
        let node = self.read(session, id).await?;
        Ok((self.convert)(&node.row, &node.relations))
    }

    async fn read(&self, session: &mut Session, id: i32) -> Result<Node<E::Model>, ServiceError> {
        let model = session
            .find_by_id::<E>(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(E::KIND))?;
        let mut nodes = [Node::new(model)];
        session.load(&self.plan, &mut nodes).await?;
        let [node] = nodes;
        Ok(node)
    }
}
