use chrono::NaiveDate;
use ourdays_core::db::open_db_in_memory;
use ourdays_core::{
    Memory, MemoryListQuery, MemoryRepository, NewMemory, RepoError, SqliteMemoryRepository,
    TimelineService,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn memory_with_fixed_id(id: &str, title: &str, happened_on: NaiveDate) -> Memory {
    Memory::with_id(Uuid::parse_str(id).unwrap(), title, happened_on)
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    let mut memory = Memory::new("first trip together", date(2025, 11, 2));
    memory.note = Some("the lake was frozen".to_string());
    memory.photo_path = Some("photos/lake.jpg".to_string());
    let id = repo.create_memory(&memory).unwrap();

    let loaded = repo.get_memory(id, false).unwrap().unwrap();
    assert_eq!(loaded.uuid, memory.uuid);
    assert_eq!(loaded.title, "first trip together");
    assert_eq!(loaded.note.as_deref(), Some("the lake was frozen"));
    assert_eq!(loaded.happened_on, date(2025, 11, 2));
    assert_eq!(loaded.photo_path.as_deref(), Some("photos/lake.jpg"));
    assert!(!loaded.is_deleted);
}

#[test]
fn update_existing_memory() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    let mut memory = Memory::new("draft", date(2025, 11, 2));
    repo.create_memory(&memory).unwrap();

    memory.title = "anniversary dinner".to_string();
    memory.happened_on = date(2025, 12, 24);
    repo.update_memory(&memory).unwrap();

    let loaded = repo.get_memory(memory.uuid, false).unwrap().unwrap();
    assert_eq!(loaded.title, "anniversary dinner");
    assert_eq!(loaded.happened_on, date(2025, 12, 24));
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    let memory = Memory::new("missing", date(2025, 11, 2));
    let err = repo.update_memory(&memory).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "memory", .. }));
}

#[test]
fn timeline_orders_by_happened_on_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    let older = memory_with_fixed_id(
        "00000000-0000-4000-8000-000000000001",
        "older",
        date(2025, 10, 10),
    );
    let newest = memory_with_fixed_id(
        "00000000-0000-4000-8000-000000000002",
        "newest",
        date(2026, 1, 1),
    );
    let middle = memory_with_fixed_id(
        "00000000-0000-4000-8000-000000000003",
        "middle",
        date(2025, 12, 1),
    );
    repo.create_memory(&older).unwrap();
    repo.create_memory(&newest).unwrap();
    repo.create_memory(&middle).unwrap();

    let listed = repo.list_memories(&MemoryListQuery::default()).unwrap();
    let titles: Vec<&str> = listed.iter().map(|memory| memory.title.as_str()).collect();
    assert_eq!(titles, vec!["newest", "middle", "older"]);
}

#[test]
fn timeline_pagination_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    for (index, day) in [(1, 10), (2, 11), (3, 12), (4, 13)] {
        let memory = memory_with_fixed_id(
            &format!("00000000-0000-4000-8000-00000000000{index}"),
            &format!("memory {index}"),
            date(2025, 10, day),
        );
        repo.create_memory(&memory).unwrap();
    }

    let query = MemoryListQuery {
        limit: Some(2),
        offset: 1,
        ..MemoryListQuery::default()
    };
    let page = repo.list_memories(&query).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].title, "memory 3");
    assert_eq!(page[1].title, "memory 2");
}

#[test]
fn soft_delete_hides_but_keeps_the_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    let memory = Memory::new("fleeting", date(2025, 11, 2));
    repo.create_memory(&memory).unwrap();

    repo.soft_delete_memory(memory.uuid).unwrap();
    repo.soft_delete_memory(memory.uuid).unwrap();

    assert!(repo.get_memory(memory.uuid, false).unwrap().is_none());
    let tombstone = repo.get_memory(memory.uuid, true).unwrap().unwrap();
    assert!(tombstone.is_deleted);

    let visible = repo.list_memories(&MemoryListQuery::default()).unwrap();
    assert!(visible.is_empty());
}

#[test]
fn validation_failure_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    let blank = Memory::new("   ", date(2025, 11, 2));
    let err = repo.create_memory(&blank).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn service_wraps_repository_and_builds_the_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();
    let service = TimelineService::new(repo);

    let created = service
        .add_memory(&NewMemory {
            title: "first snow".to_string(),
            note: None,
            happened_on: date(2025, 12, 5),
            photo_path: None,
        })
        .unwrap();

    let fetched = service.get_memory(created.uuid).unwrap().unwrap();
    assert_eq!(fetched, created);

    service.remove_memory(created.uuid).unwrap();
    assert!(service.get_memory(created.uuid).unwrap().is_none());
}
