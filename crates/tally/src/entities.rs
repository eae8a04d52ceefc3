//! Entity documents and their creation workflows.
//!
//! Each entity kind draws its primary identifier from its own named
//! sequence. Creation is a two-step flow with a fixed order: validate the
//! typed input first, then allocate. A rejected input therefore never
//! consumes a sequence value, and an allocated value is embedded in
//! exactly one document.
//!
//! Identifiers are stored as plain strings and embedded as foreign-key
//! style references in sibling documents (a user's pantry list holds
//! pantry ids, a pantry's collaborator list holds user ids). Nothing at
//! the storage layer enforces those references; per-name uniqueness of
//! the allocator is what keeps them from silently colliding.

use crate::{Error, Result, SequenceAllocator, SequenceStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequence name for user identifiers.
pub const USER_ID_COUNTER: &str = "UserIdCounter";
/// Sequence name for pantry identifiers.
pub const PANTRY_ID_COUNTER: &str = "pantryIdCounter";
/// Sequence name for badge identifiers.
pub const BADGE_ID_COUNTER: &str = "badgeIdCounter";
/// Sequence name for allergy identifiers.
pub const ALLERGY_ID_COUNTER: &str = "allergyIdCounter";

/// A user account document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub name: String,
    pub email: String,
    /// Absent for accounts created through an external identity provider.
    pub password: Option<String>,
    /// Badge ids earned by this user.
    pub badges: Vec<String>,
    /// Allergy ids linked to this user's profile.
    pub allergies: Vec<String>,
    /// Pantry ids this user owns or collaborates on.
    pub pantries: Vec<String>,
    /// Uids of this user's friends.
    pub friends: Vec<String>,
}

/// A pantry document, embedding its ingredient records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pantry {
    pub pantry_id: String,
    pub name: String,
    /// Uid of the owning user.
    pub owner_id: String,
    pub collaborators: Vec<Collaborator>,
    pub ingredients: Vec<Ingredient>,
}

/// A user granted access to someone else's pantry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub uid: String,
}

/// One ingredient line inside a pantry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub purchase_date: Option<DateTime<Utc>>,
    pub exp_date: Option<DateTime<Utc>>,
}

/// An achievement badge, referenced from user profiles by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub badge_id: String,
    pub name: String,
    pub description: String,
}

/// A food allergy, referenced from user profiles by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allergy {
    pub allergy_id: String,
    pub name: String,
    pub description: String,
}

/// Input for creating a [`User`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Supplied by external identity providers; allocated from
    /// [`USER_ID_COUNTER`] when absent.
    pub uid: Option<String>,
    pub name: String,
    pub email: String,
    /// May be absent for external identity provider sign-ons.
    pub password: Option<String>,
}

impl NewUser {
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.email.is_empty() {
            return Err(Error::InvalidInput {
                reason: "`name` and `email` fields are required".to_owned(),
            });
        }
        if !self.email.contains('@') {
            return Err(Error::InvalidInput {
                reason: "`email` is not an email address".to_owned(),
            });
        }
        Ok(())
    }
}

/// Input for creating a [`Pantry`].
///
/// Collaborators and ingredients are not accepted at creation time;
/// pantries always start empty and are filled in afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPantry {
    pub name: String,
    pub owner_id: String,
}

impl NewPantry {
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.owner_id.is_empty() {
            return Err(Error::InvalidInput {
                reason: "`name` of pantry and `ownerId` fields are required".to_owned(),
            });
        }
        Ok(())
    }
}

/// Input for creating a [`Badge`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBadge {
    pub name: String,
    pub description: String,
}

/// Input for creating an [`Allergy`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllergy {
    pub name: String,
    pub description: String,
}

fn validate_named_description(name: &str, description: &str) -> Result<()> {
    if name.is_empty() || description.is_empty() {
        return Err(Error::InvalidInput {
            reason: "`name` and `description` fields are required".to_owned(),
        });
    }
    Ok(())
}

/// Creates a [`User`], allocating a uid from [`USER_ID_COUNTER`] unless
/// the input carries one from an external identity provider.
pub async fn create_user<S>(allocator: &SequenceAllocator<S>, input: NewUser) -> Result<User>
where
    S: SequenceStore,
{
    input.validate()?;
    let uid = match input.uid {
        Some(uid) => uid,
        None => allocator.allocate(USER_ID_COUNTER).await?,
    };
    Ok(User {
        uid,
        name: input.name,
        email: input.email,
        password: input.password,
        badges: Vec::new(),
        allergies: Vec::new(),
        pantries: Vec::new(),
        friends: Vec::new(),
    })
}

/// Creates a [`Pantry`] with a fresh id from [`PANTRY_ID_COUNTER`].
pub async fn create_pantry<S>(allocator: &SequenceAllocator<S>, input: NewPantry) -> Result<Pantry>
where
    S: SequenceStore,
{
    input.validate()?;
    let pantry_id = allocator.allocate(PANTRY_ID_COUNTER).await?;
    Ok(Pantry {
        pantry_id,
        name: input.name,
        owner_id: input.owner_id,
        collaborators: Vec::new(),
        ingredients: Vec::new(),
    })
}

/// Creates a [`Badge`] with a fresh id from [`BADGE_ID_COUNTER`].
pub async fn create_badge<S>(allocator: &SequenceAllocator<S>, input: NewBadge) -> Result<Badge>
where
    S: SequenceStore,
{
    validate_named_description(&input.name, &input.description)?;
    let badge_id = allocator.allocate(BADGE_ID_COUNTER).await?;
    Ok(Badge {
        badge_id,
        name: input.name,
        description: input.description,
    })
}

/// Creates an [`Allergy`] with a fresh id from [`ALLERGY_ID_COUNTER`].
pub async fn create_allergy<S>(
    allocator: &SequenceAllocator<S>,
    input: NewAllergy,
) -> Result<Allergy>
where
    S: SequenceStore,
{
    validate_named_description(&input.name, &input.description)?;
    let allergy_id = allocator.allocate(ALLERGY_ID_COUNTER).await?;
    Ok(Allergy {
        allergy_id,
        name: input.name,
        description: input.description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn allocator() -> SequenceAllocator<MemoryStore> {
        SequenceAllocator::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn pantry_creation_embeds_allocated_id_and_starts_empty() {
        let allocator = allocator();
        let pantry = create_pantry(
            &allocator,
            NewPantry {
                name: "ThorPantry".to_owned(),
                owner_id: "12345".to_owned(),
            },
        )
        .await
        .unwrap();

        assert_eq!(pantry.pantry_id, "1");
        assert_eq!(pantry.owner_id, "12345");
        assert!(pantry.collaborators.is_empty());
        assert!(pantry.ingredients.is_empty());
    }

    #[tokio::test]
    async fn rejected_input_consumes_no_sequence_value() {
        let allocator = allocator();
        let err = create_pantry(
            &allocator,
            NewPantry {
                name: String::new(),
                owner_id: "12345".to_owned(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));

        // The failed creation above must not have burned a value.
        let pantry = create_pantry(
            &allocator,
            NewPantry {
                name: "ThorPantry".to_owned(),
                owner_id: "12345".to_owned(),
            },
        )
        .await
        .unwrap();
        assert_eq!(pantry.pantry_id, "1");
    }

    #[tokio::test]
    async fn provided_uid_skips_allocation() {
        let allocator = allocator();
        let user = create_user(
            &allocator,
            NewUser {
                uid: Some("google-117".to_owned()),
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
                password: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(user.uid, "google-117");

        // The user counter is untouched, so the next local sign-up gets 1.
        let local = create_user(
            &allocator,
            NewUser {
                uid: None,
                name: "Grace".to_owned(),
                email: "grace@example.com".to_owned(),
                password: Some("hopper".to_owned()),
            },
        )
        .await
        .unwrap();
        assert_eq!(local.uid, "1");
        assert!(local.pantries.is_empty() && local.friends.is_empty());
    }

    #[tokio::test]
    async fn badge_and_allergy_ids_come_from_distinct_sequences() {
        let allocator = allocator();
        let badge = create_badge(
            &allocator,
            NewBadge {
                name: "First Pantry".to_owned(),
                description: "Created a pantry".to_owned(),
            },
        )
        .await
        .unwrap();
        let allergy = create_allergy(
            &allocator,
            NewAllergy {
                name: "Peanuts".to_owned(),
                description: "Tree nut allergy".to_owned(),
            },
        )
        .await
        .unwrap();

        // Independent identifier spaces: both start at 1.
        assert_eq!(badge.badge_id, "1");
        assert_eq!(allergy.allergy_id, "1");
    }

    #[tokio::test]
    async fn missing_required_fields_are_rejected() {
        let allocator = allocator();
        assert!(
            create_badge(
                &allocator,
                NewBadge {
                    name: "First Pantry".to_owned(),
                    description: String::new(),
                },
            )
            .await
            .is_err()
        );
        assert!(
            create_user(
                &allocator,
                NewUser {
                    uid: None,
                    name: "Ada".to_owned(),
                    email: "not-an-email".to_owned(),
                    password: None,
                },
            )
            .await
            .is_err()
        );
    }

    #[test]
    fn documents_serialize_with_camel_case_field_names() {
        let pantry = Pantry {
            pantry_id: "7".to_owned(),
            name: "ThorPantry".to_owned(),
            owner_id: "12345".to_owned(),
            collaborators: vec![Collaborator {
                uid: "2".to_owned(),
            }],
            ingredients: Vec::new(),
        };
        let json = serde_json::to_value(&pantry).unwrap();
        assert_eq!(json["pantryId"], "7");
        assert_eq!(json["ownerId"], "12345");
        assert_eq!(json["collaborators"][0]["uid"], "2");
    }
}
