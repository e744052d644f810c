use std::cmp::Ordering;

use async_trait::async_trait;
use ais_common::types::conditions::{Condition, SortDirection, SortKey, compare_values, lookup_path};
use parking_lot::RwLock;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::super::{EntityPage, EntityStore, StoreError};

/// Entity store evaluating the condition grammar over JSON views of the
/// records it holds. Cursors are row offsets into the sorted result set.
pub struct MemoryEntityStore<T> {
    entities: RwLock<Vec<T>>,
}

impl<T> MemoryEntityStore<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    fn to_view(entity: &T) -> Result<Value, StoreError> {
        serde_json::to_value(entity).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn entity_id(view: &Value) -> Result<String, StoreError> {
        view.get("id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| StoreError::Serialization("entity has no string `id`".to_owned()))
    }
}

#[async_trait]
impl<T> EntityStore<T> for MemoryEntityStore<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    async fn set(&self, entity: T) -> Result<(), StoreError> {
        let id = Self::entity_id(&Self::to_view(&entity)?)?;
        let mut entities = self.entities.write();
        for existing in entities.iter_mut() {
            if Self::entity_id(&Self::to_view(existing)?)? == id {
                *existing = entity;
                return Ok(());
            }
        }
        entities.push(entity);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        for entity in self.entities.read().iter() {
            if Self::entity_id(&Self::to_view(entity)?)? == id {
                return Ok(Some(entity.clone()));
            }
        }
        Ok(None)
    }

    async fn query(
        &self,
        conditions: &[Condition],
        sort: &[SortKey],
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<EntityPage<T>, StoreError> {
        let offset = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| StoreError::Cursor(cursor.to_owned()))?,
            None => 0,
        };

        let mut matches: Vec<(Value, T)> = Vec::new();
        for entity in self.entities.read().iter() {
            let view = Self::to_view(entity)?;
            if conditions.iter().all(|condition| condition.matches(&view)) {
                matches.push((view, entity.clone()));
            }
        }

        matches.sort_by(|(a, _), (b, _)| {
            for key in sort {
                let ordering = match (
                    lookup_path(a, &key.property),
                    lookup_path(b, &key.property),
                ) {
                    (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Greater,
                    (None, Some(_)) => Ordering::Less,
                    (None, None) => Ordering::Equal,
                };
                let ordering = match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        let entities: Vec<T> = matches
            .into_iter()
            .skip(offset)
            .take(page_size + 1)
            .map(|(_, entity)| entity)
            .collect();
        let has_more = entities.len() > page_size;
        let mut entities = entities;
        entities.truncate(page_size);
        let cursor = has_more.then(|| (offset + page_size).to_string());

        Ok(EntityPage { entities, cursor })
    }
}
