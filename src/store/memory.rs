use crate::{
    data::student::{Student, StudentDraft},
    error::RollbookResult,
    store::{Page, PageQuery, StudentStore},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Keeps the whole roll in process memory. Backs the test suite and lets the
/// server run without a database.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    students: BTreeMap<i32, Student>,
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn get(&self, id: i32) -> RollbookResult<Option<Student>> {
        Ok(self.inner.read().await.students.get(&id).cloned())
    }

    async fn list(&self) -> RollbookResult<Vec<Student>> {
        Ok(self.inner.read().await.students.values().cloned().collect())
    }

    async fn page(&self, query: PageQuery) -> RollbookResult<Page<Student>> {
        let (page, page_size) = query.clamped();
        let inner = self.inner.read().await;

        let skipped = usize::try_from((page - 1) * page_size).unwrap_or(usize::MAX);
        let taken = usize::try_from(page_size).unwrap_or(usize::MAX);
        let items = inner
            .students
            .values()
            .skip(skipped)
            .take(taken)
            .cloned()
            .collect();

        Ok(Page {
            page_index: page,
            page_size,
            total_count: i64::try_from(inner.students.len()).unwrap_or(i64::MAX),
            items,
        })
    }

    async fn create(&self, draft: StudentDraft) -> RollbookResult<Student> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;

        let student = draft.with_id(id);
        inner.students.insert(id, student.clone());
        Ok(student)
    }

    async fn update(&self, id: i32, draft: StudentDraft) -> RollbookResult<Option<Student>> {
        let mut inner = self.inner.write().await;
        if !inner.students.contains_key(&id) {
            return Ok(None);
        }

        let student = draft.with_id(id);
        inner.students.insert(id, student.clone());
        Ok(Some(student))
    }

    async fn delete(&self, id: i32) -> RollbookResult<Option<Student>> {
        Ok(self.inner.write().await.students.remove(&id))
    }

    async fn exists(&self, id: i32) -> RollbookResult<bool> {
        Ok(self.inner.read().await.students.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::{SaveAddress, SaveStudent};

    fn draft(name: &str) -> StudentDraft {
        SaveStudent {
            id: None,
            name: name.to_string(),
            email: Some(format!(
                "{}@example.com",
                name.to_lowercase().replace(' ', ".")
            )),
            phone: None,
            gender: "F".to_string(),
            blood_group: "O+".to_string(),
            address: Some(SaveAddress {
                street: "1 Main".to_string(),
                city: "London".to_string(),
                state: None,
                country: "UK".to_string(),
            }),
        }
        .validate()
        .expect("test draft should be valid")
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryStudentStore::default();
        let created = store.create(draft("Ada Lovelace")).await.unwrap();
        assert!(created.id > 0);

        let fetched = store.get(created.id).await.unwrap().expect("just created");
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn ids_are_assigned_in_increasing_order() {
        let store = MemoryStudentStore::default();
        let a = store.create(draft("A")).await.unwrap();
        let b = store.create(draft("B")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn list_returns_every_created_record() {
        let store = MemoryStudentStore::default();
        let mut ids = vec![
            store.create(draft("A")).await.unwrap().id,
            store.create(draft("B")).await.unwrap().id,
            store.create(draft("C")).await.unwrap().id,
        ];

        let mut listed: Vec<i32> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        ids.sort_unstable();
        listed.sort_unstable();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let store = MemoryStudentStore::default();
        let created = store.create(draft("Ada Lovelace")).await.unwrap();

        let mut replacement = draft("Grace Hopper");
        replacement.phone = Some("+1 555 0100".to_string());
        replacement.blood_group = "AB-".to_string();
        replacement.address.city = "New York".to_string();

        let updated = store
            .update(created.id, replacement)
            .await
            .unwrap()
            .expect("record exists");
        assert_eq!(updated.id, created.id);

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Grace Hopper");
        assert_eq!(fetched.phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(fetched.blood_group, "AB-");
        assert_eq!(fetched.address.city, "New York");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none_and_creates_nothing() {
        let store = MemoryStudentStore::default();
        assert!(store.update(42, draft("A")).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let store = MemoryStudentStore::default();
        let created = store.create(draft("A")).await.unwrap();

        let deleted = store
            .delete(created.id)
            .await
            .unwrap()
            .expect("record exists");
        assert_eq!(deleted, created);

        assert!(store.get(created.id).await.unwrap().is_none());
        assert!(!store.exists(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn second_delete_is_none() {
        let store = MemoryStudentStore::default();
        let created = store.create(draft("A")).await.unwrap();
        assert!(store.delete(created.id).await.unwrap().is_some());
        assert!(store.delete(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = MemoryStudentStore::default();
        let first = store.create(draft("A")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(draft("B")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn paging_walks_the_roll() {
        let store = MemoryStudentStore::default();
        for i in 0..25 {
            store.create(draft(&format!("Student {i}"))).await.unwrap();
        }

        let first = store
            .page(PageQuery {
                page: 0,
                page_size: 0,
            })
            .await
            .unwrap();
        assert_eq!(first.page_index, 1);
        assert_eq!(first.page_size, 10);
        assert_eq!(first.total_count, 25);
        assert_eq!(first.total_pages(), 3);
        assert_eq!(first.items.len(), 10);
        assert!(!first.has_previous_page());
        assert!(first.has_next_page());

        let last = store
            .page(PageQuery {
                page: 3,
                page_size: 10,
            })
            .await
            .unwrap();
        assert_eq!(last.items.len(), 5);
        assert!(last.has_previous_page());
        assert!(!last.has_next_page());

        let beyond = store
            .page(PageQuery {
                page: 4,
                page_size: 10,
            })
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
    }
}
