//! In-memory datastore.
//!
//! Implements both repository traits over ordered maps guarded by a
//! `tokio::sync::RwLock`. Unique usernames and emails are enforced on insert
//! exactly like the `PostgreSQL` indexes, so the registration race surfaces as
//! `RepositoryError::Conflict` here too. Titles sort by byte order, matching
//! the `COLLATE "C"` ordering of the SQL repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use ecommerce_core::{Email, MemberId, ProductId, Username};

use super::{MemberRepository, ProductRepository, RepositoryError, UniqueKey};
use crate::models::{Member, MemberCredentials, NewMember, Product, ProductFilter, ProductInput};

#[derive(Default)]
struct Tables {
    products: BTreeMap<ProductId, Product>,
    members: BTreeMap<MemberId, MemberCredentials>,
    product_seq: i32,
    member_seq: i32,
}

/// Products and members held in process memory.
#[derive(Default)]
pub struct MemoryDatastore {
    tables: RwLock<Tables>,
}

impl MemoryDatastore {
    /// Create an empty datastore.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl ProductRepository for MemoryDatastore {
    async fn count(&self, filter: &ProductFilter) -> Result<u64, RepositoryError> {
        let tables = self.tables.read().await;
        let count = tables.products.values().filter(|p| filter.matches(p)).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Product> = tables
            .products
            .values()
            .filter(|p| filter.matches(p))
            .collect();
        matching.sort_by(|a, b| {
            a.title
                .as_str()
                .cmp(b.title.as_str())
                .then(a.id.cmp(&b.id))
        });

        Ok(matching
            .into_iter()
            .skip(to_usize(offset))
            .take(to_usize(limit))
            .cloned()
            .collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.product_seq += 1;
        let product = Product {
            id: ProductId::new(tables.product_seq),
            title: input.title.clone(),
            price: input.price,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.products.get_mut(&id).map(|product| {
            product.title = input.title.clone();
            product.price = input.price;
            product.clone()
        }))
    }

    async fn delete(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.write().await.products.remove(&id))
    }
}

#[async_trait]
impl MemberRepository for MemoryDatastore {
    async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .values()
            .any(|c| c.member.username == *username))
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.members.values().any(|c| c.member.email == *email))
    }

    async fn create(&self, new: &NewMember) -> Result<Member, RepositoryError> {
        let mut tables = self.tables.write().await;

        // Username index first, then email, whatever the row order
        let rows = || tables.members.values().map(|c| &c.member);
        if rows().any(|m| m.username == new.username) {
            return Err(RepositoryError::Conflict(UniqueKey::Username));
        }
        if rows().any(|m| m.email == new.email) {
            return Err(RepositoryError::Conflict(UniqueKey::Email));
        }

        tables.member_seq += 1;
        let member = Member {
            id: MemberId::new(tables.member_seq),
            username: new.username.clone(),
            email: new.email.clone(),
            date_of_birth: new.date_of_birth,
            created_at: Utc::now(),
        };
        tables.members.insert(
            member.id,
            MemberCredentials {
                member: member.clone(),
                password_hash: new.password_hash.clone(),
            },
        );
        Ok(member)
    }

    async fn find_by_login(
        &self,
        identifier: &str,
    ) -> Result<Vec<MemberCredentials>, RepositoryError> {
        let tables = self.tables.read().await;
        // BTreeMap iteration is already in id order
        Ok(tables
            .members
            .values()
            .filter(|c| {
                c.member.username.as_str() == identifier || c.member.email.as_str() == identifier
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use ecommerce_core::{Price, ProductTitle};

    use super::*;

    fn input(title: &str, price: &str) -> ProductInput {
        ProductInput {
            title: ProductTitle::parse(title).unwrap(),
            price: Price::new(price.parse().unwrap()).unwrap(),
        }
    }

    fn new_member(username: &str, email: &str) -> NewMember {
        NewMember {
            username: Username::parse(username).unwrap(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let store = MemoryDatastore::new();
        let a = ProductRepository::create(&store, &input("A", "1")).await.unwrap();
        let b = ProductRepository::create(&store, &input("B", "2")).await.unwrap();
        assert_eq!(a.id, ProductId::new(1));
        assert_eq!(b.id, ProductId::new(2));
    }

    #[tokio::test]
    async fn test_list_orders_by_title_then_id() {
        let store = MemoryDatastore::new();
        for title in ["beta", "Alpha", "alpha", "Alpha"] {
            ProductRepository::create(&store, &input(title, "1")).await.unwrap();
        }

        let listed = store
            .list(&ProductFilter::default(), 0, 10)
            .await
            .unwrap();
        let order: Vec<(i32, &str)> = listed
            .iter()
            .map(|p| (p.id.as_i32(), p.title.as_str()))
            .collect();

        // Byte order puts uppercase first; equal titles fall back to id
        assert_eq!(
            order,
            vec![(2, "Alpha"), (4, "Alpha"), (3, "alpha"), (1, "beta")]
        );
    }

    #[tokio::test]
    async fn test_delete_returns_removed_product() {
        let store = MemoryDatastore::new();
        let created = ProductRepository::create(&store, &input("A", "1")).await.unwrap();

        assert_eq!(store.delete(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(store.delete(created.id).await.unwrap(), None);
        assert_eq!(store.get(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_member_unique_indexes() {
        let store = MemoryDatastore::new();
        MemberRepository::create(&store, &new_member("bob", "bob@x.com"))
            .await
            .unwrap();

        let same_username = MemberRepository::create(&store, &new_member("bob", "other@x.com")).await;
        assert!(matches!(
            same_username,
            Err(RepositoryError::Conflict(UniqueKey::Username))
        ));

        let same_email = MemberRepository::create(&store, &new_member("robert", "bob@x.com")).await;
        assert!(matches!(
            same_email,
            Err(RepositoryError::Conflict(UniqueKey::Email))
        ));
    }

    #[tokio::test]
    async fn test_username_conflict_reported_before_email_regardless_of_row_order() {
        let store = MemoryDatastore::new();
        // The email clash sits on the earlier row, the username clash on the later one
        MemberRepository::create(&store, &new_member("alice", "carol@x.com"))
            .await
            .unwrap();
        MemberRepository::create(&store, &new_member("carol", "c2@x.com"))
            .await
            .unwrap();

        let both = MemberRepository::create(&store, &new_member("carol", "carol@x.com")).await;
        assert!(matches!(
            both,
            Err(RepositoryError::Conflict(UniqueKey::Username))
        ));
    }

    #[tokio::test]
    async fn test_find_by_login_matches_username_or_email() {
        let store = MemoryDatastore::new();
        MemberRepository::create(&store, &new_member("bob", "bob@x.com"))
            .await
            .unwrap();

        assert_eq!(store.find_by_login("bob").await.unwrap().len(), 1);
        assert_eq!(store.find_by_login("bob@x.com").await.unwrap().len(), 1);
        assert!(store.find_by_login("Bob").await.unwrap().is_empty());
    }
}
