use chrono::NaiveDate;
use ourdays_core::db::open_db_in_memory;
use ourdays_core::{RepoError, SqliteWishRepository, Wish, WishListQuery, WishRepository, WishService};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWishRepository::try_new(&conn).unwrap();

    let mut wish = Wish::new("see the northern lights");
    wish.note = Some("somewhere in Norway".to_string());
    let id = repo.create_wish(&wish).unwrap();

    let loaded = repo.get_wish(id, false).unwrap().unwrap();
    assert_eq!(loaded.title, "see the northern lights");
    assert_eq!(loaded.note.as_deref(), Some("somewhere in Norway"));
    assert!(!loaded.is_fulfilled);
    assert!(loaded.fulfilled_on.is_none());
}

#[test]
fn fulfill_sets_the_date_once_and_stays_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWishRepository::try_new(&conn).unwrap();

    let wish = Wish::new("cook dumplings together");
    repo.create_wish(&wish).unwrap();

    let first = repo.fulfill_wish(wish.uuid, date(2026, 1, 10)).unwrap();
    assert!(first.is_fulfilled);
    assert_eq!(first.fulfilled_on, Some(date(2026, 1, 10)));

    // A later call must not move the original date.
    let second = repo.fulfill_wish(wish.uuid, date(2026, 2, 2)).unwrap();
    assert_eq!(second.fulfilled_on, Some(date(2026, 1, 10)));
}

#[test]
fn fulfill_unknown_wish_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWishRepository::try_new(&conn).unwrap();

    let err = repo
        .fulfill_wish(Uuid::new_v4(), date(2026, 1, 10))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "wish", .. }));
}

#[test]
fn open_wish_listing_excludes_fulfilled_and_deleted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWishRepository::try_new(&conn).unwrap();

    let open = Wish::new("open wish");
    let done = Wish::new("done wish");
    let gone = Wish::new("deleted wish");
    repo.create_wish(&open).unwrap();
    repo.create_wish(&done).unwrap();
    repo.create_wish(&gone).unwrap();

    repo.fulfill_wish(done.uuid, date(2026, 1, 10)).unwrap();
    repo.soft_delete_wish(gone.uuid).unwrap();

    let only_open = repo
        .list_wishes(&WishListQuery {
            only_open: true,
            ..WishListQuery::default()
        })
        .unwrap();
    assert_eq!(only_open.len(), 1);
    assert_eq!(only_open[0].uuid, open.uuid);

    let visible = repo.list_wishes(&WishListQuery::default()).unwrap();
    assert_eq!(visible.len(), 2);
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWishRepository::try_new(&conn).unwrap();

    let blank = Wish::new("  ");
    assert!(matches!(
        repo.create_wish(&blank).unwrap_err(),
        RepoError::Validation(_)
    ));

    let mut wish = Wish::new("valid");
    repo.create_wish(&wish).unwrap();
    wish.title = String::new();
    assert!(matches!(
        repo.update_wish(&wish).unwrap_err(),
        RepoError::Validation(_)
    ));
}

#[test]
fn service_add_fulfill_and_remove_flow() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWishRepository::try_new(&conn).unwrap();
    let service = WishService::new(repo);

    let wish = service
        .add_wish("ride the ferris wheel", Some("at night".to_string()))
        .unwrap();
    assert_eq!(service.open_wishes().unwrap().len(), 1);

    let fulfilled = service.fulfill_wish(wish.uuid, date(2026, 3, 1)).unwrap();
    assert!(fulfilled.is_fulfilled);
    assert!(service.open_wishes().unwrap().is_empty());
    assert_eq!(service.all_wishes().unwrap().len(), 1);

    service.remove_wish(wish.uuid).unwrap();
    assert!(service.all_wishes().unwrap().is_empty());
}
