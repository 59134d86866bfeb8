//! Owner-scoped document operations.
//!
//! Every operation takes the request's resolved `Principal` explicitly. The
//! owner is never read from client input, and a document owned by someone
//! else is reported exactly like a document that does not exist.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::Error;
use crate::store::{Document, DocumentId, Principal, Store};
use crate::time::Clock;
use crate::validation::{validate_content, validate_title};

/// Body of a create request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
}

/// Body of an update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl DocumentUpdate {
    const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

pub struct DocumentService {
    store: Arc<Store>,
    clock: Arc<dyn Clock>,
}

impl DocumentService {
    #[must_use]
    pub const fn new(store: Arc<Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn create(&self, principal: &Principal, new: &NewDocument) -> Result<Document, Error> {
        validate_title(&new.title)?;
        validate_content(&new.content)?;

        let document =
            self.store
                .insert_document(principal.id, &new.title, &new.content, self.clock.now())?;
        tracing::debug!(
            principal_id = principal.id,
            document_id = document.id,
            "created document"
        );
        Ok(document)
    }

    /// The caller's documents, most recently updated first.
    pub fn list(&self, principal: &Principal) -> Result<Vec<Document>, Error> {
        Ok(self.store.list_documents(principal.id)?)
    }

    pub fn get(&self, principal: &Principal, id: DocumentId) -> Result<Document, Error> {
        self.store
            .get_document(id, principal.id)?
            .ok_or(Error::NotFound)
    }

    /// Apply a partial update.
    ///
    /// An update with no fields changes nothing, including `updated_at`.
    pub fn update(
        &self,
        principal: &Principal,
        id: DocumentId,
        update: &DocumentUpdate,
    ) -> Result<Document, Error> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(content) = &update.content {
            validate_content(content)?;
        }
        if update.is_empty() {
            return self.get(principal, id);
        }

        let document = self
            .store
            .update_document(
                id,
                principal.id,
                update.title.as_deref(),
                update.content.as_deref(),
                self.clock.now(),
            )?
            .ok_or(Error::NotFound)?;
        tracing::debug!(
            principal_id = principal.id,
            document_id = document.id,
            "updated document"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::testing::TestServices;

    fn new_document(title: &str, content: &str) -> NewDocument {
        NewDocument {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn register(services: &TestServices, email: &str) -> Principal {
        services.auth.register(email, "pw123456").expect("register")
    }

    #[test]
    fn test_create_sets_owner_from_principal() {
        let services = TestServices::new();
        let alice = register(&services, "a@x.com");

        let document = services
            .documents
            .create(&alice, &new_document("T", "C"))
            .expect("create");

        assert_eq!(document.id, 1);
        assert_eq!(document.owner_id, alice.id);
        assert_eq!(document.title, "T");
        assert_eq!(document.content, "C");
        assert_eq!(document.created_at, services.clock.now());
        assert_eq!(document.updated_at, document.created_at);
    }

    #[test]
    fn test_create_validates_input() {
        let services = TestServices::new();
        let alice = register(&services, "a@x.com");

        for (title, content) in [("", "C"), ("T", ""), (&*"t".repeat(201), "C")] {
            assert!(matches!(
                services.documents.create(&alice, &new_document(title, content)),
                Err(Error::Validation(_))
            ));
        }
        assert!(services.documents.list(&alice).expect("list").is_empty());
    }

    #[test]
    fn test_other_principal_cannot_read_list_or_update() {
        let services = TestServices::new();
        let alice = register(&services, "a@x.com");
        let bob = register(&services, "b@x.com");
        let document = services
            .documents
            .create(&alice, &new_document("Secret", "Alice only"))
            .expect("create");

        assert_eq!(
            services.documents.get(&bob, document.id).err(),
            Some(Error::NotFound)
        );
        assert!(services.documents.list(&bob).expect("list").is_empty());

        let update = DocumentUpdate {
            title: Some("Hijacked".to_string()),
            content: None,
        };
        assert_eq!(
            services.documents.update(&bob, document.id, &update).err(),
            Some(Error::NotFound)
        );
        assert_eq!(
            services.documents.get(&alice, document.id).expect("get"),
            document
        );
    }

    #[test]
    fn test_missing_and_foreign_documents_look_the_same() {
        let services = TestServices::new();
        let alice = register(&services, "a@x.com");
        let bob = register(&services, "b@x.com");
        let document = services
            .documents
            .create(&alice, &new_document("T", "C"))
            .expect("create");

        let foreign = services.documents.get(&bob, document.id).err();
        let missing = services.documents.get(&bob, document.id + 100).err();
        assert_eq!(foreign, missing);
    }

    #[test]
    fn test_update_touches_updated_at() {
        let services = TestServices::new();
        let alice = register(&services, "a@x.com");
        let document = services
            .documents
            .create(&alice, &new_document("T", "C"))
            .expect("create");

        services.clock.advance(TimeDelta::seconds(30));
        let updated = services
            .documents
            .update(
                &alice,
                document.id,
                &DocumentUpdate {
                    title: None,
                    content: Some("C2".to_string()),
                },
            )
            .expect("update");

        assert_eq!(updated.title, "T");
        assert_eq!(updated.content, "C2");
        assert_eq!(updated.created_at, document.created_at);
        assert_eq!(updated.updated_at, document.created_at + TimeDelta::seconds(30));
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let services = TestServices::new();
        let alice = register(&services, "a@x.com");
        let document = services
            .documents
            .create(&alice, &new_document("T", "C"))
            .expect("create");

        services.clock.advance(TimeDelta::seconds(30));
        let unchanged = services
            .documents
            .update(&alice, document.id, &DocumentUpdate::default())
            .expect("update");
        assert_eq!(unchanged, document);

        assert_eq!(
            services
                .documents
                .update(&alice, 404, &DocumentUpdate::default())
                .err(),
            Some(Error::NotFound)
        );
    }

    #[test]
    fn test_update_validates_present_fields() {
        let services = TestServices::new();
        let alice = register(&services, "a@x.com");
        let document = services
            .documents
            .create(&alice, &new_document("T", "C"))
            .expect("create");

        let result = services.documents.update(
            &alice,
            document.id,
            &DocumentUpdate {
                title: Some(String::new()),
                content: None,
            },
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_list_most_recently_updated_first() {
        let services = TestServices::new();
        let alice = register(&services, "a@x.com");
        let first = services
            .documents
            .create(&alice, &new_document("first", "1"))
            .expect("create");
        services.clock.advance(TimeDelta::seconds(1));
        let second = services
            .documents
            .create(&alice, &new_document("second", "2"))
            .expect("create");

        services.clock.advance(TimeDelta::seconds(1));
        services
            .documents
            .update(
                &alice,
                first.id,
                &DocumentUpdate {
                    title: Some("first, edited".to_string()),
                    content: None,
                },
            )
            .expect("update");

        let titles: Vec<_> = services
            .documents
            .list(&alice)
            .expect("list")
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["first, edited", "second"]);
        assert_ne!(first.id, second.id);
    }
}
