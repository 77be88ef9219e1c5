//! Static description of the nine catalog entities.
//!
//! Each [`EntitySchema`] carries the allow-list of columns a create call may
//! write and the relationship fields the entity exposes. Inbound field maps
//! are always passed through [`EntitySchema::restrict`] before they reach an
//! `ActiveModel`, so relationship-shaped or unknown names never get written.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use sea_orm::{ActiveModelTrait, EntityTrait, Value};
use tracing::debug;

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Product,
    Team,
    Service,
    Config,
    ServiceDependency,
    Project,
    Template,
    ServiceDependencyTemplate,
    Task,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Product,
        EntityKind::Team,
        EntityKind::Service,
        EntityKind::Config,
        EntityKind::ServiceDependency,
        EntityKind::Project,
        EntityKind::Template,
        EntityKind::ServiceDependencyTemplate,
        EntityKind::Task,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Product => "Product",
            EntityKind::Team => "Team",
            EntityKind::Service => "Service",
            EntityKind::Config => "Config",
            EntityKind::ServiceDependency => "ServiceDependency",
            EntityKind::Project => "Project",
            EntityKind::Template => "Template",
            EntityKind::ServiceDependencyTemplate => "ServiceDependencyTemplate",
            EntityKind::Task => "Task",
        }
    }

    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityKind::Product => &PRODUCT,
            EntityKind::Team => &TEAM,
            EntityKind::Service => &SERVICE,
            EntityKind::Config => &CONFIG,
            EntityKind::ServiceDependency => &SERVICE_DEPENDENCY,
            EntityKind::Project => &PROJECT,
            EntityKind::Template => &TEMPLATE,
            EntityKind::ServiceDependencyTemplate => &SERVICE_DEPENDENCY_TEMPLATE,
            EntityKind::Task => &TASK,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Implemented by every sea-orm entity that takes part in the catalog.
pub trait CatalogEntity: EntityTrait {
    const KIND: EntityKind;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Required, must not be blank.
    Text,
    OptionalText,
    /// Nullable reference to another entity's identity.
    ForeignKey(EntityKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn text(name: &'static str) -> FieldDef {
    FieldDef { name, kind: FieldKind::Text }
}

const fn optional_text(name: &'static str) -> FieldDef {
    FieldDef { name, kind: FieldKind::OptionalText }
}

const fn foreign_key(name: &'static str, target: EntityKind) -> FieldDef {
    FieldDef { name, kind: FieldKind::ForeignKey(target) }
}

impl FieldDef {
    fn check(&self, entity: EntityKind, value: &Value) -> Result<(), ModelError> {
        match (self.kind, value) {
            (FieldKind::Text, Value::String(Some(s))) if !s.trim().is_empty() => Ok(()),
            (FieldKind::Text, Value::String(_)) => Err(ModelError::Validation(format!(
                "{entity}.{} must not be blank",
                self.name
            ))),
            (FieldKind::OptionalText, Value::String(_)) => Ok(()),
            (FieldKind::ForeignKey(_), Value::Int(_)) => Ok(()),
            _ => Err(ModelError::Validation(format!(
                "{entity}.{} has the wrong type",
                self.name
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    OneToMany,
    ManyToOne,
    ManyToMany,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Via {
    /// The foreign key column. Lives on the target for one-to-many and on the
    /// owner for many-to-one.
    Column(&'static str),
    /// Association table joining both sides.
    Association(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelationshipDef {
    pub name: &'static str,
    pub owner: EntityKind,
    pub target: EntityKind,
    pub cardinality: Cardinality,
    pub via: Via,
}

/// Every relationship field of every entity.
///
/// A service is referenced twice by `service_dependency` and twice by
/// `service_dependency_template`; each role is a separate variant keyed on
/// its own column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relationship {
    ProductTeams,
    TeamProduct,
    TeamServices,
    TeamTasks,
    ServiceTeam,
    ServiceConfigs,
    ServiceDependencies,
    ServiceDependents,
    ConfigService,
    ConfigServiceDependencies,
    ServiceDependencyProject,
    ServiceDependencyService,
    ServiceDependencyDependsOn,
    ServiceDependencyConfig,
    ProjectServiceDependencies,
    ProjectTemplates,
    ProjectTasks,
    TemplateProjects,
    TemplateServiceDependencyTemplates,
    ServiceDependencyTemplateTemplate,
    ServiceDependencyTemplateBaseService,
    ServiceDependencyTemplateDependentService,
    TaskProject,
    TaskTeam,
}

impl Relationship {
    pub const ALL: [Relationship; 24] = [
        Relationship::ProductTeams,
        Relationship::TeamProduct,
        Relationship::TeamServices,
        Relationship::TeamTasks,
        Relationship::ServiceTeam,
        Relationship::ServiceConfigs,
        Relationship::ServiceDependencies,
        Relationship::ServiceDependents,
        Relationship::ConfigService,
        Relationship::ConfigServiceDependencies,
        Relationship::ServiceDependencyProject,
        Relationship::ServiceDependencyService,
        Relationship::ServiceDependencyDependsOn,
        Relationship::ServiceDependencyConfig,
        Relationship::ProjectServiceDependencies,
        Relationship::ProjectTemplates,
        Relationship::ProjectTasks,
        Relationship::TemplateProjects,
        Relationship::TemplateServiceDependencyTemplates,
        Relationship::ServiceDependencyTemplateTemplate,
        Relationship::ServiceDependencyTemplateBaseService,
        Relationship::ServiceDependencyTemplateDependentService,
        Relationship::TaskProject,
        Relationship::TaskTeam,
    ];

    pub const fn def(self) -> RelationshipDef {
        use Cardinality::*;
        use EntityKind as K;
        use Relationship as R;

        const fn many(name: &'static str, owner: EntityKind, target: EntityKind, column: &'static str) -> RelationshipDef {
            RelationshipDef { name, owner, target, cardinality: OneToMany, via: Via::Column(column) }
        }
        const fn one(name: &'static str, owner: EntityKind, target: EntityKind, column: &'static str) -> RelationshipDef {
            RelationshipDef { name, owner, target, cardinality: ManyToOne, via: Via::Column(column) }
        }

        match self {
            R::ProductTeams => many("teams", K::Product, K::Team, "product_id"),
            R::TeamProduct => one("product", K::Team, K::Product, "product_id"),
            R::TeamServices => many("services", K::Team, K::Service, "team_id"),
            R::TeamTasks => many("tasks", K::Team, K::Task, "team_id"),
            R::ServiceTeam => one("team", K::Service, K::Team, "team_id"),
            R::ServiceConfigs => many("configs", K::Service, K::Config, "service_id"),
            R::ServiceDependencies => many("dependencies", K::Service, K::ServiceDependency, "service_id"),
            R::ServiceDependents => many("dependents", K::Service, K::ServiceDependency, "depends_on_service_id"),
            R::ConfigService => one("service", K::Config, K::Service, "service_id"),
            R::ConfigServiceDependencies => many("service_dependencies", K::Config, K::ServiceDependency, "config_id"),
            R::ServiceDependencyProject => one("project", K::ServiceDependency, K::Project, "project_id"),
            R::ServiceDependencyService => one("service", K::ServiceDependency, K::Service, "service_id"),
            R::ServiceDependencyDependsOn => one("depends_on", K::ServiceDependency, K::Service, "depends_on_service_id"),
            R::ServiceDependencyConfig => one("config", K::ServiceDependency, K::Config, "config_id"),
            R::ProjectServiceDependencies => many("service_dependencies", K::Project, K::ServiceDependency, "project_id"),
            R::ProjectTemplates => RelationshipDef {
                name: "templates",
                owner: K::Project,
                target: K::Template,
                cardinality: ManyToMany,
                via: Via::Association("project_template"),
            },
            R::ProjectTasks => many("tasks", K::Project, K::Task, "project_id"),
            R::TemplateProjects => RelationshipDef {
                name: "projects",
                owner: K::Template,
                target: K::Project,
                cardinality: ManyToMany,
                via: Via::Association("project_template"),
            },
            R::TemplateServiceDependencyTemplates => {
                many("service_dependency_templates", K::Template, K::ServiceDependencyTemplate, "template_id")
            }
            R::ServiceDependencyTemplateTemplate => one("template", K::ServiceDependencyTemplate, K::Template, "template_id"),
            R::ServiceDependencyTemplateBaseService => {
                one("base_service", K::ServiceDependencyTemplate, K::Service, "base_service_id")
            }
            R::ServiceDependencyTemplateDependentService => {
                one("dependent_service", K::ServiceDependencyTemplate, K::Service, "dependent_service_id")
            }
            R::TaskProject => one("project", K::Task, K::Project, "project_id"),
            R::TaskTeam => one("team", K::Task, K::Team, "team_id"),
        }
    }
}

#[derive(Debug)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub table: &'static str,
    /// Columns a create call may set. Never contains `id`.
    pub fields: &'static [FieldDef],
    pub relationships: &'static [Relationship],
}

pub static PRODUCT: EntitySchema = EntitySchema {
    kind: EntityKind::Product,
    table: "product",
    fields: &[text("name")],
    relationships: &[Relationship::ProductTeams],
};

pub static TEAM: EntitySchema = EntitySchema {
    kind: EntityKind::Team,
    table: "team",
    fields: &[text("name"), optional_text("url"), foreign_key("product_id", EntityKind::Product)],
    relationships: &[Relationship::TeamProduct, Relationship::TeamServices, Relationship::TeamTasks],
};

pub static SERVICE: EntitySchema = EntitySchema {
    kind: EntityKind::Service,
    table: "service",
    fields: &[text("name"), foreign_key("team_id", EntityKind::Team)],
    relationships: &[
        Relationship::ServiceTeam,
        Relationship::ServiceConfigs,
        Relationship::ServiceDependencies,
        Relationship::ServiceDependents,
    ],
};

pub static CONFIG: EntitySchema = EntitySchema {
    kind: EntityKind::Config,
    table: "config",
    fields: &[text("name"), optional_text("url"), foreign_key("service_id", EntityKind::Service)],
    relationships: &[Relationship::ConfigService, Relationship::ConfigServiceDependencies],
};

pub static SERVICE_DEPENDENCY: EntitySchema = EntitySchema {
    kind: EntityKind::ServiceDependency,
    table: "service_dependency",
    fields: &[
        text("name"),
        optional_text("task_template"),
        foreign_key("project_id", EntityKind::Project),
        foreign_key("service_id", EntityKind::Service),
        foreign_key("depends_on_service_id", EntityKind::Service),
        foreign_key("config_id", EntityKind::Config),
    ],
    relationships: &[
        Relationship::ServiceDependencyProject,
        Relationship::ServiceDependencyService,
        Relationship::ServiceDependencyDependsOn,
        Relationship::ServiceDependencyConfig,
    ],
};

pub static PROJECT: EntitySchema = EntitySchema {
    kind: EntityKind::Project,
    table: "project",
    fields: &[text("name")],
    relationships: &[
        Relationship::ProjectServiceDependencies,
        Relationship::ProjectTemplates,
        Relationship::ProjectTasks,
    ],
};

pub static TEMPLATE: EntitySchema = EntitySchema {
    kind: EntityKind::Template,
    table: "template",
    fields: &[text("name")],
    relationships: &[Relationship::TemplateProjects, Relationship::TemplateServiceDependencyTemplates],
};

pub static SERVICE_DEPENDENCY_TEMPLATE: EntitySchema = EntitySchema {
    kind: EntityKind::ServiceDependencyTemplate,
    table: "service_dependency_template",
    fields: &[
        text("name"),
        foreign_key("template_id", EntityKind::Template),
        foreign_key("base_service_id", EntityKind::Service),
        foreign_key("dependent_service_id", EntityKind::Service),
        // placeholder text, not a reference to `config`
        optional_text("config_name"),
    ],
    relationships: &[
        Relationship::ServiceDependencyTemplateTemplate,
        Relationship::ServiceDependencyTemplateBaseService,
        Relationship::ServiceDependencyTemplateDependentService,
    ],
};

pub static TASK: EntitySchema = EntitySchema {
    kind: EntityKind::Task,
    table: "task",
    fields: &[
        text("name"),
        foreign_key("project_id", EntityKind::Project),
        foreign_key("team_id", EntityKind::Team),
    ],
    relationships: &[Relationship::TaskProject, Relationship::TaskTeam],
};

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<Relationship> {
        self.relationships.iter().copied().find(|r| r.def().name == name)
    }

    /// Keep only allow-listed columns and check their values.
    ///
    /// Relationship and unknown names are dropped. Every required text
    /// column must be present and non-blank.
    pub fn restrict(&self, fields: Fields) -> Result<Fields, ModelError> {
        let mut accepted = Fields::new();
        for (name, value) in fields {
            match self.field(&name) {
                Some(def) => {
                    def.check(self.kind, &value)?;
                    accepted.insert(name, value);
                }
                None if self.relationship(&name).is_some() => {
                    debug!(entity = %self.kind, field = %name, "ignoring relationship field on create");
                }
                None => {
                    debug!(entity = %self.kind, field = %name, "ignoring unknown field on create");
                }
            }
        }
        if let Some(missing) = self
            .fields
            .iter()
            .find(|f| f.kind == FieldKind::Text && accepted.get(f.name).is_none())
        {
            return Err(ModelError::Validation(format!("{}.{} is required", self.kind, missing.name)));
        }
        Ok(accepted)
    }

    /// Build a fresh `ActiveModel` from inbound fields.
    ///
    /// Only restricted columns are set; everything else, `id` included, stays
    /// `NotSet` for the database to fill.
    pub fn active_model<E>(&self, fields: Fields) -> Result<E::ActiveModel, ModelError>
    where
        E: EntityTrait,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
        E::Column: FromStr,
    {
        let mut am = <E::ActiveModel as ActiveModelTrait>::default();
        for (name, value) in self.restrict(fields)? {
            let column = <E::Column as FromStr>::from_str(&name).map_err(|_| {
                ModelError::Validation(format!("{} has no column {name}", self.table))
            })?;
            am.set(column, value);
        }
        Ok(am)
    }
}

/// Column name → value map handed to [`EntitySchema::restrict`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, Value::from(value.into()));
        self
    }

    pub fn optional_text(mut self, name: &str, value: Option<String>) -> Self {
        self.insert(name, Value::from(value));
        self
    }

    pub fn key(mut self, name: &str, value: Option<i32>) -> Self {
        self.insert(name, Value::from(value));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team;

    #[test]
    fn identity_is_never_writable() {
        for kind in EntityKind::ALL {
            assert!(kind.schema().field("id").is_none(), "{kind} exposes id");
            assert_eq!(kind.schema().kind, kind);
        }
    }

    #[test]
    fn relationships_belong_to_their_owner() {
        for rel in Relationship::ALL {
            let def = rel.def();
            assert!(
                def.owner.schema().relationships.contains(&rel),
                "{rel:?} missing from {} schema",
                def.owner
            );
        }
        let listed: usize = EntityKind::ALL.iter().map(|k| k.schema().relationships.len()).sum();
        assert_eq!(listed, Relationship::ALL.len());
    }

    #[test]
    fn many_to_one_columns_are_allow_listed_keys() {
        for rel in Relationship::ALL {
            let def = rel.def();
            if let (Cardinality::ManyToOne, Via::Column(column)) = (def.cardinality, def.via) {
                let field = def.owner.schema().field(column).expect("fk column in allow-list");
                assert_eq!(field.kind, FieldKind::ForeignKey(def.target));
            }
        }
    }

    #[test]
    fn dual_roles_use_distinct_columns() {
        assert_ne!(
            Relationship::ServiceDependencyService.def().via,
            Relationship::ServiceDependencyDependsOn.def().via
        );
        assert_ne!(
            Relationship::ServiceDependencyTemplateBaseService.def().via,
            Relationship::ServiceDependencyTemplateDependentService.def().via
        );
        assert_eq!(Relationship::ServiceDependents.def().via, Via::Column("depends_on_service_id"));
    }

    #[test]
    fn restrict_drops_relationship_and_unknown_names() {
        let mut fields = Fields::new().text("name", "Data Engineering").key("product_id", Some(1));
        fields.insert("services", Value::from(7));
        fields.insert("id", Value::from(99));
        fields.insert("owner", Value::from("mallory".to_string()));

        let kept = TEAM.restrict(fields).unwrap();
        let names: Vec<&str> = kept.names().collect();
        assert_eq!(names, vec!["name", "product_id"]);
    }

    #[test]
    fn restrict_requires_non_blank_name() {
        let err = PRODUCT.restrict(Fields::new().text("name", "   ")).unwrap_err();
        assert!(matches!(err, ModelError::Validation(msg) if msg.contains("Product.name")));

        let err = PRODUCT.restrict(Fields::new()).unwrap_err();
        assert!(matches!(err, ModelError::Validation(msg) if msg.contains("required")));
    }

    #[test]
    fn restrict_rejects_mistyped_values() {
        let mut fields = Fields::new().text("name", "x");
        fields.insert("product_id", Value::from("1".to_string()));
        assert!(TEAM.restrict(fields).is_err());
    }

    #[test]
    fn restrict_accepts_null_optionals() {
        let fields = Fields::new()
            .text("name", "Analytics")
            .optional_text("url", None)
            .key("product_id", None);
        assert_eq!(TEAM.restrict(fields).unwrap().len(), 3);
    }

    #[test]
    fn active_model_sets_only_restricted_columns() {
        use sea_orm::ActiveValue;

        let mut fields = Fields::new().text("name", "Analytics").key("product_id", Some(3));
        fields.insert("id", Value::from(42));
        let am = TEAM.active_model::<team::Entity>(fields).unwrap();
        assert_eq!(am.id, ActiveValue::NotSet);
        assert_eq!(am.name, ActiveValue::Set("Analytics".to_string()));
        assert_eq!(am.product_id, ActiveValue::Set(Some(3)));
        assert_eq!(am.url, ActiveValue::NotSet);
    }

    #[test]
    fn display_uses_type_name() {
        assert_eq!(EntityKind::ServiceDependencyTemplate.to_string(), "ServiceDependencyTemplate");
    }
}
