use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IdenStatic,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait, TryIntoModel,
};

use crate::entity::composition::{ActiveModel, Column, Entity};
use crate::entity::{Composition, CompositionCreate, CompositionUpdate, MealType};
use crate::errors::StoreError;
use crate::filter::build_query_condition;
use crate::query::QueryParameters;
use crate::sort::parse_sorting;

/// A pending write, applied on [`CompositionStore::save`].
#[derive(Debug)]
enum StagedChange {
    Insert(ActiveModel),
    Update(ActiveModel),
    Delete(i32),
}

/// Outcome of committing staged changes.
#[derive(Debug, Default)]
pub struct SaveReport {
    /// Rows touched by the commit. Zero is a successful save.
    pub rows_affected: u64,
    /// Stored state of inserted and updated rows, in staging order.
    pub persisted: Vec<Composition>,
}

/// Data access over the composition catalog.
///
/// Reads go straight to the database. Writes are staged with [`add`],
/// [`update`] and [`delete`] and only reach the database, in one transaction,
/// when [`save`] is called. Dropping the store discards anything unsaved.
///
/// [`add`]: CompositionStore::add
/// [`update`]: CompositionStore::update
/// [`delete`]: CompositionStore::delete
/// [`save`]: CompositionStore::save
pub struct CompositionStore<'a> {
    db: &'a DatabaseConnection,
    staged: Vec<StagedChange>,
}

impl<'a> CompositionStore<'a> {
    #[must_use]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            staged: Vec::new(),
        }
    }

    fn filtered(&self, params: &QueryParameters) -> Select<Entity> {
        let mut select = Entity::find();
        if params.has_query() {
            let query = params.query.as_deref().unwrap_or_default();
            select = select.filter(build_query_condition(query, self.db.get_database_backend()));
        }
        select
    }

    /// One page of compositions, ordered and filtered as `params` describes.
    ///
    /// Rows with equal sort keys are ordered by id so pages never overlap.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidPaging` or `InvalidSortField` for bad parameters, and
    /// with `Database` when the query fails.
    pub async fn get_all(&self, params: &QueryParameters) -> Result<Vec<Composition>, StoreError> {
        params.validate()?;
        let (order_column, order_direction) =
            parse_sorting(params, &Composition::sortable_columns(), Column::Id)?;

        tracing::debug!(
            column = order_column.as_str(),
            ?order_direction,
            offset = params.offset(),
            limit = params.limit(),
            query = params.query.as_deref(),
            "listing compositions"
        );

        let models = self
            .filtered(params)
            .order_by(order_column, order_direction)
            .order_by_asc(Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(self.db)
            .await?;
        Ok(models.into_iter().map(Composition::from).collect())
    }

    /// Number of compositions passing the text filter of `params`, ignoring paging.
    ///
    /// # Errors
    ///
    /// Fails with `Database` when the count query fails.
    pub async fn count_matching(&self, params: &QueryParameters) -> Result<u64, StoreError> {
        Ok(self.filtered(params).count(self.db).await?)
    }

    /// Total number of stored compositions.
    ///
    /// # Errors
    ///
    /// Fails with `Database` when the count query fails.
    pub async fn count(&self) -> Result<u64, StoreError> {
        Ok(Entity::find().count(self.db).await?)
    }

    /// Look up one composition; `None` when no row has this id.
    ///
    /// # Errors
    ///
    /// Fails with `Database` when the lookup fails.
    pub async fn get_single(&self, id: i32) -> Result<Option<Composition>, StoreError> {
        let model = Entity::find_by_id(id).one(self.db).await?;
        Ok(model.map(Composition::from))
    }

    /// Stage a new composition. Its id is assigned when saved.
    ///
    /// # Errors
    ///
    /// Fails with `Validation` when the payload is invalid; nothing is staged.
    pub fn add(&mut self, item: CompositionCreate) -> Result<(), StoreError> {
        let active = ActiveModel::try_from(item)?;
        self.staged.push(StagedChange::Insert(active));
        Ok(())
    }

    /// Stage the removal of an existing composition.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` when no composition has this id.
    pub async fn delete(&mut self, id: i32) -> Result<(), StoreError> {
        if self.get_single(id).await?.is_none() {
            return Err(not_found(id));
        }
        self.staged.push(StagedChange::Delete(id));
        Ok(())
    }

    /// Stage a full replacement of the composition stored under `id`.
    ///
    /// Returns the composition as it will be stored once saved.
    ///
    /// # Errors
    ///
    /// Fails with `Conflict` when the payload carries a different id, `NotFound`
    /// when no composition has this id, and `Validation` for an invalid payload.
    pub async fn update(&mut self, id: i32, item: CompositionUpdate) -> Result<Composition, StoreError> {
        if let Some(body_id) = item.id {
            if body_id != id {
                return Err(StoreError::Conflict(format!(
                    "Body id {body_id} does not match composition id {id}"
                )));
            }
        }

        let existing = Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| not_found(id))?;
        let active = item.merge_into_active_model(existing)?;
        let staged_view = active.clone().try_into_model()?;

        self.staged.push(StagedChange::Update(active));
        Ok(Composition::from(staged_view))
    }

    /// Number of staged changes not yet saved.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Commit every staged change in one transaction.
    ///
    /// Any number of affected rows, including zero, is a successful save. On
    /// failure the transaction is rolled back and the staged changes are gone.
    ///
    /// # Errors
    ///
    /// Fails with `Persistence` when the transaction cannot be opened, a write
    /// fails, or the commit fails.
    pub async fn save(&mut self) -> Result<SaveReport, StoreError> {
        let staged = std::mem::take(&mut self.staged);
        let mut report = SaveReport::default();
        if staged.is_empty() {
            return Ok(report);
        }

        let txn = self.db.begin().await.map_err(StoreError::Persistence)?;
        for change in staged {
            match change {
                StagedChange::Insert(active) => {
                    let model = active.insert(&txn).await.map_err(StoreError::Persistence)?;
                    report.rows_affected += 1;
                    report.persisted.push(model.into());
                }
                StagedChange::Update(active) => {
                    let model = active.update(&txn).await.map_err(StoreError::Persistence)?;
                    report.rows_affected += 1;
                    report.persisted.push(model.into());
                }
                StagedChange::Delete(id) => {
                    let result = Entity::delete_by_id(id)
                        .exec(&txn)
                        .await
                        .map_err(StoreError::Persistence)?;
                    report.rows_affected += result.rows_affected;
                }
            }
        }
        txn.commit().await.map_err(StoreError::Persistence)?;

        tracing::info!(rows_affected = report.rows_affected, "saved composition changes");
        Ok(report)
    }

    /// One randomly chosen composition per course: starter, main, dessert.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` naming the first course that has no compositions.
    pub async fn get_random_meal(&self) -> Result<Vec<Composition>, StoreError> {
        let mut meal = Vec::with_capacity(MealType::COURSES.len());
        for course in MealType::COURSES {
            let item = self.get_random_item(course).await?.ok_or_else(|| {
                StoreError::not_found(format!("{course} composition"), None)
            })?;
            meal.push(item);
        }
        Ok(meal)
    }

    /// A uniformly random composition of the given type, `None` if there is none.
    ///
    /// # Errors
    ///
    /// Fails with `Database` when a query fails.
    pub async fn get_random_item(&self, meal_type: MealType) -> Result<Option<Composition>, StoreError> {
        let candidates = Entity::find().filter(Column::MealType.eq(meal_type));
        let total = candidates.clone().count(self.db).await?;
        if total == 0 {
            return Ok(None);
        }

        let index = rand::thread_rng().gen_range(0..total);
        let model = candidates
            .order_by_asc(Column::Id)
            .offset(index)
            .one(self.db)
            .await?;
        Ok(model.map(Composition::from))
    }
}

fn not_found(id: i32) -> StoreError {
    StoreError::not_found("Composition", Some(id.to_string()))
}
