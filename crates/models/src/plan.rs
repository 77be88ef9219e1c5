//! Eager-load plans and the loaded relationship graph.
//!
//! A [`Plan`] names the relationship paths a kind needs before conversion.
//! Paths are walked level by level: every hop issues one `IN (...)` query for
//! all nodes at that depth, so round trips depend on the plan and not on how
//! many rows come back.

use std::collections::{BTreeMap, HashMap};

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Iterable, PrimaryKeyToColumn, QueryFilter,
    QueryOrder, Select,
};

use crate::schema::{CatalogEntity, Cardinality, EntityKind, Relationship, Via};
use crate::{
    config, product, project, project_template, service, service_dependency,
    service_dependency_template, task, team, template,
};

/// Any catalog row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Product(product::Model),
    Team(team::Model),
    Service(service::Model),
    Config(config::Model),
    ServiceDependency(service_dependency::Model),
    Project(project::Model),
    Template(template::Model),
    ServiceDependencyTemplate(service_dependency_template::Model),
    Task(task::Model),
}

/// A stored row the planner can navigate from.
pub trait Record: Clone + Send + Sync + 'static {
    fn kind(&self) -> EntityKind;

    fn id(&self) -> i32;

    /// Value of an integer foreign key column, `None` when null or unknown.
    fn key(&self, column: &str) -> Option<i32>;

    fn from_row(row: &Row) -> Option<&Self>
    where
        Self: Sized;
}

macro_rules! catalog_record {
    ($module:ident, $variant:ident $(, $column:literal => $field:ident)*) => {
        impl CatalogEntity for $module::Entity {
            const KIND: EntityKind = EntityKind::$variant;
        }

        impl From<$module::Model> for Row {
            fn from(model: $module::Model) -> Row {
                Row::$variant(model)
            }
        }

        impl Record for $module::Model {
            fn kind(&self) -> EntityKind {
                EntityKind::$variant
            }

            fn id(&self) -> i32 {
                self.id
            }

            #[allow(unused_variables)]
            fn key(&self, column: &str) -> Option<i32> {
                match column {
                    $($column => self.$field,)*
                    _ => None,
                }
            }

            fn from_row(row: &Row) -> Option<&Self> {
                match row {
                    Row::$variant(model) => Some(model),
                    _ => None,
                }
            }
        }
    };
}

catalog_record!(product, Product);
catalog_record!(team, Team, "product_id" => product_id);
catalog_record!(service, Service, "team_id" => team_id);
catalog_record!(config, Config, "service_id" => service_id);
catalog_record!(
    service_dependency,
    ServiceDependency,
    "project_id" => project_id,
    "service_id" => service_id,
    "depends_on_service_id" => depends_on_service_id,
    "config_id" => config_id
);
catalog_record!(project, Project);
catalog_record!(template, Template);
catalog_record!(
    service_dependency_template,
    ServiceDependencyTemplate,
    "template_id" => template_id,
    "base_service_id" => base_service_id,
    "dependent_service_id" => dependent_service_id
);
catalog_record!(task, Task, "project_id" => project_id, "team_id" => team_id);

macro_rules! each_row {
    ($row:expr, $model:ident => $body:expr) => {
        match $row {
            Row::Product($model) => $body,
            Row::Team($model) => $body,
            Row::Service($model) => $body,
            Row::Config($model) => $body,
            Row::ServiceDependency($model) => $body,
            Row::Project($model) => $body,
            Row::Template($model) => $body,
            Row::ServiceDependencyTemplate($model) => $body,
            Row::Task($model) => $body,
        }
    };
}

impl Record for Row {
    fn kind(&self) -> EntityKind {
        each_row!(self, m => m.kind())
    }

    fn id(&self) -> i32 {
        each_row!(self, m => m.id)
    }

    fn key(&self, column: &str) -> Option<i32> {
        each_row!(self, m => m.key(column))
    }

    fn from_row(row: &Row) -> Option<&Self> {
        Some(row)
    }
}

/// A row plus whatever relationships have been loaded under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<R = Row> {
    pub row: R,
    pub relations: Relations,
}

impl<R> Node<R> {
    pub fn new(row: R) -> Self {
        Self { row, relations: Relations::default() }
    }
}

/// Loaded children keyed by relationship. Unloaded reads as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relations {
    loaded: BTreeMap<Relationship, Vec<Node>>,
}

impl Relations {
    pub fn is_loaded(&self, rel: Relationship) -> bool {
        self.loaded.contains_key(&rel)
    }

    pub fn nodes(&self, rel: Relationship) -> &[Node] {
        self.loaded.get(&rel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Children of `rel` typed as `M`, with their own loaded relations.
    pub fn many<M: Record>(&self, rel: Relationship) -> impl Iterator<Item = (&M, &Relations)> + '_ {
        self.nodes(rel)
            .iter()
            .filter_map(|node| M::from_row(&node.row).map(|model| (model, &node.relations)))
    }

    pub fn one<M: Record>(&self, rel: Relationship) -> Option<(&M, &Relations)> {
        self.many(rel).next()
    }

    pub fn insert(&mut self, rel: Relationship, nodes: Vec<Node>) {
        self.loaded.insert(rel, nodes);
    }

    pub fn forget(&mut self, rel: Relationship) -> Option<Vec<Node>> {
        self.loaded.remove(&rel)
    }

    fn nodes_mut(&mut self, rel: Relationship) -> std::slice::IterMut<'_, Node> {
        match self.loaded.get_mut(&rel) {
            Some(nodes) => nodes.iter_mut(),
            None => Default::default(),
        }
    }
}

/// Relationship paths to load before conversion, plus the owning parents to
/// reload after a create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plan {
    pub eager: &'static [&'static [Relationship]],
    pub refresh: &'static [Relationship],
}

impl Plan {
    pub const EMPTY: Plan = Plan { eager: &[], refresh: &[] };

    /// Load every eager path onto `nodes`. Already-loaded hops are kept.
    pub async fn apply<C, R>(&self, db: &C, nodes: &mut [Node<R>]) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
        R: Record,
    {
        for path in self.eager {
            load_path(db, nodes, path).await?;
        }
        Ok(())
    }

    /// Re-read the owning parents of freshly written rows, for nodes that
    /// already carry them. Parents that were never loaded stay unloaded.
    pub async fn refresh<C, R>(&self, db: &C, nodes: &mut [Node<R>]) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
        R: Record,
    {
        for &rel in self.refresh {
            let mut stale: Vec<&mut Node<R>> = nodes
                .iter_mut()
                .filter_map(|node| node.relations.forget(rel).map(|_| node))
                .collect();
            if !stale.is_empty() {
                load_hop(db, rel, &mut stale).await?;
            }
        }
        Ok(())
    }
}

impl EntityKind {
    pub fn plan(self) -> Plan {
        use Relationship as R;
        match self {
            EntityKind::Product => Plan {
                eager: &[&[R::ProductTeams, R::TeamServices]],
                refresh: &[],
            },
            EntityKind::Team => Plan {
                eager: &[&[R::TeamServices, R::ServiceConfigs]],
                refresh: &[R::TeamProduct],
            },
            EntityKind::Service => Plan {
                eager: &[&[R::ServiceConfigs], &[R::ServiceDependencies]],
                refresh: &[R::ServiceTeam],
            },
            EntityKind::Config => Plan { eager: &[], refresh: &[R::ConfigService] },
            EntityKind::ServiceDependency => Plan {
                eager: &[],
                refresh: &[
                    R::ServiceDependencyProject,
                    R::ServiceDependencyService,
                    R::ServiceDependencyDependsOn,
                    R::ServiceDependencyConfig,
                ],
            },
            EntityKind::Project => Plan {
                eager: &[
                    &[R::ProjectServiceDependencies],
                    &[R::ProjectTemplates, R::TemplateServiceDependencyTemplates],
                    &[R::ProjectTasks],
                ],
                refresh: &[],
            },
            EntityKind::Template => Plan {
                eager: &[&[R::TemplateServiceDependencyTemplates]],
                refresh: &[],
            },
            EntityKind::ServiceDependencyTemplate => Plan {
                eager: &[],
                refresh: &[
                    R::ServiceDependencyTemplateTemplate,
                    R::ServiceDependencyTemplateBaseService,
                    R::ServiceDependencyTemplateDependentService,
                ],
            },
            EntityKind::Task => Plan {
                eager: &[],
                refresh: &[R::TaskProject, R::TaskTeam],
            },
        }
    }
}

/// `SELECT * FROM <table> ORDER BY <primary key> ASC`.
pub fn select_ordered<E: EntityTrait>() -> Select<E> {
    let mut select = E::find();
    for key in E::PrimaryKey::iter() {
        select = select.order_by_asc(key.into_column());
    }
    select
}

/// Walk one relationship path from `nodes`, one query per hop.
pub async fn load_path<C, R>(db: &C, nodes: &mut [Node<R>], path: &[Relationship]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    R: Record,
{
    let Some((&first, rest)) = path.split_first() else {
        return Ok(());
    };
    let mut roots: Vec<&mut Node<R>> = nodes.iter_mut().collect();
    load_hop(db, first, &mut roots).await?;

    let mut frontier: Vec<&mut Node> =
        roots.into_iter().flat_map(|node| node.relations.nodes_mut(first)).collect();
    for &rel in rest {
        load_hop(db, rel, &mut frontier).await?;
        frontier = frontier.into_iter().flat_map(|node| node.relations.nodes_mut(rel)).collect();
    }
    Ok(())
}

async fn load_hop<C, R>(db: &C, rel: Relationship, nodes: &mut [&mut Node<R>]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    R: Record,
{
    let def = rel.def();
    if let Some(node) = nodes.iter().find(|node| node.row.kind() != def.owner) {
        return Err(DbErr::Custom(format!(
            "relationship {rel:?} does not apply to {}",
            node.row.kind()
        )));
    }

    let pending: Vec<(usize, Option<i32>)> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| !node.relations.is_loaded(rel))
        .map(|(i, node)| (i, rel.lookup_key(&node.row)))
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let mut keys: Vec<i32> = pending.iter().filter_map(|(_, key)| *key).collect();
    keys.sort_unstable();
    keys.dedup();
    let found = if keys.is_empty() { HashMap::new() } else { rel.fetch(db, &keys).await? };

    for (i, key) in pending {
        let children = key
            .and_then(|key| found.get(&key))
            .map(|rows| rows.iter().cloned().map(Node::new).collect())
            .unwrap_or_default();
        nodes[i].relations.insert(rel, children);
    }
    Ok(())
}

type Grouped = HashMap<i32, Vec<Row>>;

impl Relationship {
    /// Key a parent contributes to the batched query.
    fn lookup_key<R: Record>(self, row: &R) -> Option<i32> {
        let def = self.def();
        match (def.cardinality, def.via) {
            (Cardinality::ManyToOne, Via::Column(column)) => row.key(column),
            _ => Some(row.id()),
        }
    }

    /// Rows reachable through this relationship, grouped by lookup key.
    async fn fetch<C: ConnectionTrait>(self, db: &C, keys: &[i32]) -> Result<Grouped, DbErr> {
        use Relationship as R;
        match self {
            R::ProductTeams => {
                fetch_grouped::<_, team::Entity>(db, team::Column::ProductId, keys, |m| m.product_id).await
            }
            R::TeamProduct => {
                fetch_grouped::<_, product::Entity>(db, product::Column::Id, keys, |m| Some(m.id)).await
            }
            R::TeamServices => {
                fetch_grouped::<_, service::Entity>(db, service::Column::TeamId, keys, |m| m.team_id).await
            }
            R::TeamTasks => fetch_grouped::<_, task::Entity>(db, task::Column::TeamId, keys, |m| m.team_id).await,
            R::ServiceTeam => fetch_grouped::<_, team::Entity>(db, team::Column::Id, keys, |m| Some(m.id)).await,
            R::ServiceConfigs => {
                fetch_grouped::<_, config::Entity>(db, config::Column::ServiceId, keys, |m| m.service_id).await
            }
            R::ServiceDependencies => {
                fetch_grouped::<_, service_dependency::Entity>(
                    db,
                    service_dependency::Column::ServiceId,
                    keys,
                    |m| m.service_id,
                )
                .await
            }
            R::ServiceDependents => {
                fetch_grouped::<_, service_dependency::Entity>(
                    db,
                    service_dependency::Column::DependsOnServiceId,
                    keys,
                    |m| m.depends_on_service_id,
                )
                .await
            }
            R::ConfigService | R::ServiceDependencyService | R::ServiceDependencyDependsOn => {
                fetch_grouped::<_, service::Entity>(db, service::Column::Id, keys, |m| Some(m.id)).await
            }
            R::ServiceDependencyTemplateBaseService | R::ServiceDependencyTemplateDependentService => {
                fetch_grouped::<_, service::Entity>(db, service::Column::Id, keys, |m| Some(m.id)).await
            }
            R::ConfigServiceDependencies => {
                fetch_grouped::<_, service_dependency::Entity>(
                    db,
                    service_dependency::Column::ConfigId,
                    keys,
                    |m| m.config_id,
                )
                .await
            }
            R::ServiceDependencyProject | R::TaskProject => {
                fetch_grouped::<_, project::Entity>(db, project::Column::Id, keys, |m| Some(m.id)).await
            }
            R::ServiceDependencyConfig => {
                fetch_grouped::<_, config::Entity>(db, config::Column::Id, keys, |m| Some(m.id)).await
            }
            R::ProjectServiceDependencies => {
                fetch_grouped::<_, service_dependency::Entity>(
                    db,
                    service_dependency::Column::ProjectId,
                    keys,
                    |m| m.project_id,
                )
                .await
            }
            R::ProjectTasks => {
                fetch_grouped::<_, task::Entity>(db, task::Column::ProjectId, keys, |m| m.project_id).await
            }
            R::TemplateServiceDependencyTemplates => {
                fetch_grouped::<_, service_dependency_template::Entity>(
                    db,
                    service_dependency_template::Column::TemplateId,
                    keys,
                    |m| m.template_id,
                )
                .await
            }
            R::ServiceDependencyTemplateTemplate => {
                fetch_grouped::<_, template::Entity>(db, template::Column::Id, keys, |m| Some(m.id)).await
            }
            R::TaskTeam => fetch_grouped::<_, team::Entity>(db, team::Column::Id, keys, |m| Some(m.id)).await,
            R::ProjectTemplates => fetch_templates_of_projects(db, keys).await,
            R::TemplateProjects => fetch_projects_of_templates(db, keys).await,
        }
    }
}

async fn fetch_grouped<C, E>(
    db: &C,
    column: E::Column,
    keys: &[i32],
    group_key: fn(&E::Model) -> Option<i32>,
) -> Result<Grouped, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Into<Row>,
{
    let models = select_ordered::<E>()
        .filter(column.is_in(keys.iter().copied()))
        .all(db)
        .await?;
    let mut grouped = Grouped::new();
    for model in models {
        if let Some(key) = group_key(&model) {
            grouped.entry(key).or_default().push(model.into());
        }
    }
    Ok(grouped)
}

async fn fetch_templates_of_projects<C: ConnectionTrait>(db: &C, keys: &[i32]) -> Result<Grouped, DbErr> {
    let links = project_template::Entity::find()
        .filter(project_template::Column::ProjectId.is_in(keys.iter().copied()))
        .all(db)
        .await?;
    let pairs = links.into_iter().map(|l| (l.project_id, l.template_id));
    through_association::<_, template::Entity>(db, template::Column::Id, pairs).await
}

async fn fetch_projects_of_templates<C: ConnectionTrait>(db: &C, keys: &[i32]) -> Result<Grouped, DbErr> {
    let links = project_template::Entity::find()
        .filter(project_template::Column::TemplateId.is_in(keys.iter().copied()))
        .all(db)
        .await?;
    let pairs = links.into_iter().map(|l| (l.template_id, l.project_id));
    through_association::<_, project::Entity>(db, project::Column::Id, pairs).await
}

/// Resolve `(owner, target)` association pairs into target rows per owner.
async fn through_association<C, E>(
    db: &C,
    target_id: E::Column,
    pairs: impl Iterator<Item = (i32, i32)>,
) -> Result<Grouped, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Into<Row>,
{
    let mut owners: HashMap<i32, Vec<i32>> = HashMap::new();
    for (owner, target) in pairs {
        owners.entry(target).or_default().push(owner);
    }
    if owners.is_empty() {
        return Ok(Grouped::new());
    }

    let targets = select_ordered::<E>()
        .filter(target_id.is_in(owners.keys().copied().collect::<Vec<_>>()))
        .all(db)
        .await?;
    let mut grouped = Grouped::new();
    for model in targets {
        let row: Row = model.into();
        if let Some(owner_ids) = owners.get(&row.id()) {
            for owner in owner_ids {
                grouped.entry(*owner).or_default().push(row.clone());
            }
        }
    }
    Ok(grouped)
}
