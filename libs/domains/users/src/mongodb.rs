//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use database::mongodb::uuid_to_bson;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    error::{ErrorKind, WriteFailure},
    options::{Collation, CollationStrength, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<User>(USERS_COLLECTION),
        }
    }

    /// Strength 2 compares without regard to case
    fn case_insensitive() -> Collation {
        Collation::builder()
            .locale("en".to_string())
            .strength(CollationStrength::Secondary)
            .build()
    }

    /// Unique, case-insensitive indexes on username and email
    pub async fn create_indexes(&self) -> UserResult<()> {
        let unique = |name: &str| {
            IndexOptions::builder()
                .name(name.to_string())
                .unique(true)
                .collation(Self::case_insensitive())
                .build()
        };

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(unique("username_unique_idx"))
                .build(),
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique("email_unique_idx"))
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User collection indexes created");
        Ok(())
    }

    fn id_filter(id: &Uuid) -> Document {
        doc! { "_id": uuid_to_bson(id) }
    }

    /// Map a unique-index violation onto the field that caused it.
    fn map_insert_error(err: mongodb::error::Error, user: &User) -> UserError {
        if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
            if write_error.code == DUPLICATE_KEY {
                return if write_error.message.contains("email") {
                    UserError::EmailTaken(user.email.clone())
                } else {
                    UserError::UsernameTaken(user.username.clone())
                };
            }
        }
        err.into()
    }

    async fn exists(&self, filter: Document) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(filter)
            .collation(Self::case_insensitive())
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: User) -> UserResult<User> {
        self.collection
            .insert_one(&user)
            .await
            .map_err(|e| Self::map_insert_error(e, &user))?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let user = self.collection.find_one(Self::id_filter(&id)).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> UserResult<bool> {
        self.exists(doc! { "username": username }).await
    }

    #[instrument(skip(self, email))]
    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        self.exists(doc! { "email": email }).await
    }
}
