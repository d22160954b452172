//! MongoDB implementations of EventRepository and OwnerRepository

use async_trait::async_trait;
use database::mongodb::uuid_to_bson;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::Event;
use crate::repository::{EventRepository, OwnerRepository};

pub const EVENTS_COLLECTION: &str = "events";
pub const USERS_COLLECTION: &str = "users";

fn id_filter(id: &Uuid) -> Document {
    doc! { "_id": uuid_to_bson(id) }
}

/// MongoDB implementation of the EventRepository
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    /// Create a new MongoEventRepository
    ///
    /// ```ignore
    /// let client = database::mongodb::connect_from_config(&config).await?;
    /// let repo = MongoEventRepository::new(client.database("event_planner"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, EVENTS_COLLECTION)
    }

    /// Create a new MongoEventRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Event>(collection_name);
        Self { collection }
    }

    /// Create the indexes used by owner listings
    pub async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "ownerUserId": 1, "createdAt": 1 })
                .options(
                    IndexOptions::builder()
                        .name("owner_created_idx".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Event collection indexes created");
        Ok(())
    }

    fn owner_filter(owner: &Uuid) -> Document {
        doc! { "ownerUserId": uuid_to_bson(owner) }
    }

    fn versioned_filter(id: &Uuid, version: i64) -> Document {
        doc! { "_id": uuid_to_bson(id), "version": version }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn insert(&self, event: &Event) -> EventResult<()> {
        self.collection.insert_one(event).await?;
        tracing::info!(event_id = %event.id, "Event stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let event = self.collection.find_one(id_filter(&id)).await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner: Uuid) -> EventResult<Vec<Event>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": 1 })
            .build();

        let cursor = self
            .collection
            .find(Self::owner_filter(&owner))
            .with_options(options)
            .await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn replace(&self, event: &Event, expected_version: i64) -> EventResult<bool> {
        let filter = Self::versioned_filter(&event.id, expected_version);
        let result = self.collection.replace_one(filter, event).await?;

        if result.matched_count == 0 {
            tracing::warn!(
                event_id = %event.id,
                expected_version,
                "Event replace matched no document"
            );
        }
        Ok(result.matched_count == 1)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> EventResult<bool> {
        let result = self.collection.delete_one(id_filter(&id)).await?;
        Ok(result.deleted_count > 0)
    }
}

/// Owner lookups against the `users` collection.
///
/// Works on raw documents so this crate does not depend on the users domain.
pub struct MongoOwnerRepository {
    collection: Collection<Document>,
}

impl MongoOwnerRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<Document>(USERS_COLLECTION),
        }
    }

    fn push_update(event_id: &Uuid) -> Document {
        doc! { "$addToSet": { "events": uuid_to_bson(event_id) } }
    }

    fn pull_update(event_id: &Uuid) -> Document {
        doc! { "$pull": { "events": uuid_to_bson(event_id) } }
    }
}

#[async_trait]
impl OwnerRepository for MongoOwnerRepository {
    #[instrument(skip(self))]
    async fn exists(&self, user_id: Uuid) -> EventResult<bool> {
        let count = self.collection.count_documents(id_filter(&user_id)).await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn attach_event(&self, user_id: Uuid, event_id: Uuid) -> EventResult<bool> {
        let result = self
            .collection
            .update_one(id_filter(&user_id), Self::push_update(&event_id))
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn detach_event(&self, user_id: Uuid, event_id: Uuid) -> EventResult<()> {
        self.collection
            .update_one(id_filter(&user_id), Self::pull_update(&event_id))
            .await?;
        Ok(())
    }
}
