use ourdays_core::db::open_db_in_memory;
use ourdays_core::{
    Dish, DishListQuery, DishRepository, NewDish, MenuService, OrderDraft, OrderLine,
    OrderListQuery, OrderRepository, OrderService, OrderStatus, PointsRepository, RepoError,
    SqliteDishRepository, SqliteOrderRepository, SqlitePointsRepository,
};
use rusqlite::Connection;

fn grant(conn: &mut Connection, member: &str, amount: i64) {
    let mut points = SqlitePointsRepository::try_new(conn).unwrap();
    points.grant(member, amount, "allowance").unwrap();
}

fn balance(conn: &mut Connection, member: &str) -> i64 {
    let points = SqlitePointsRepository::try_new(conn).unwrap();
    points.balance(member).unwrap()
}

fn two_line_draft(member: &str) -> OrderDraft {
    let mut draft = OrderDraft::new(member);
    draft.lines.push(OrderLine::custom("fried rice", 30, 2));
    draft.lines.push(OrderLine::custom("seaweed soup", 15, 1));
    draft
}

#[test]
fn menu_listing_filters_availability_and_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDishRepository::try_new(&conn).unwrap();

    let mains = Dish::new("braised pork", 40, "main");
    let mut dessert = Dish::new("mango pudding", 20, "dessert");
    dessert.is_available = false;
    repo.create_dish(&mains).unwrap();
    repo.create_dish(&dessert).unwrap();

    let orderable = repo
        .list_dishes(&DishListQuery {
            available_only: true,
            ..DishListQuery::default()
        })
        .unwrap();
    assert_eq!(orderable.len(), 1);
    assert_eq!(orderable[0].name, "braised pork");

    let desserts = repo
        .list_dishes(&DishListQuery {
            category: Some("dessert".to_string()),
            ..DishListQuery::default()
        })
        .unwrap();
    assert_eq!(desserts.len(), 1);
    assert_eq!(desserts[0].name, "mango pudding");
}

#[test]
fn availability_flip_keeps_the_dish() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDishRepository::try_new(&conn).unwrap();
    let service = MenuService::new(repo);

    let dish = service
        .add_dish(&NewDish {
            name: "tomato egg noodles".to_string(),
            price_points: 25,
            category: "main".to_string(),
            photo_path: None,
        })
        .unwrap();

    service.set_available(dish.uuid, false).unwrap();
    assert!(service.menu().unwrap().is_empty());
    assert_eq!(service.full_menu().unwrap().len(), 1);

    service.set_available(dish.uuid, true).unwrap();
    assert_eq!(service.menu().unwrap().len(), 1);
}

#[test]
fn dish_validation_rejects_negative_price() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDishRepository::try_new(&conn).unwrap();

    let bad = Dish::new("impossible", -5, "main");
    assert!(matches!(
        repo.create_dish(&bad).unwrap_err(),
        RepoError::Validation(_)
    ));
}

#[test]
fn placing_an_order_debits_the_payer_atomically() {
    let mut conn = open_db_in_memory().unwrap();
    grant(&mut conn, "noah", 100);

    let order_id = {
        let mut orders = SqliteOrderRepository::try_new(&mut conn).unwrap();
        let id = orders.place_order(&two_line_draft("noah")).unwrap();

        let record = orders.get_order(id).unwrap().unwrap();
        assert_eq!(record.status, OrderStatus::Pending);
        assert_eq!(record.total_points, 75);
        assert_eq!(record.lines.len(), 2);
        assert_eq!(record.lines[0].name, "fried rice");
        assert_eq!(record.lines[0].quantity, 2);
        id
    };

    assert_eq!(balance(&mut conn, "noah"), 25);

    // The debit landed in the ledger, pointing at the order.
    let points = SqlitePointsRepository::try_new(&mut conn).unwrap();
    let ledger = points.ledger("noah", 10).unwrap();
    let debit = ledger.iter().find(|entry| entry.delta < 0).unwrap();
    assert_eq!(debit.delta, -75);
    assert_eq!(debit.reason, "order");
    assert_eq!(debit.order, Some(order_id));
}

#[test]
fn insufficient_points_leave_no_trace() {
    let mut conn = open_db_in_memory().unwrap();
    grant(&mut conn, "noah", 50);

    {
        let mut orders = SqliteOrderRepository::try_new(&mut conn).unwrap();
        let err = orders.place_order(&two_line_draft("noah")).unwrap_err();
        assert!(matches!(
            err,
            RepoError::InsufficientPoints {
                balance: 50,
                required: 75,
                ..
            }
        ));

        assert!(orders
            .list_orders(&OrderListQuery::default())
            .unwrap()
            .is_empty());
    }

    // Balance untouched and no stray ledger rows.
    assert_eq!(balance(&mut conn, "noah"), 50);
    let points = SqlitePointsRepository::try_new(&mut conn).unwrap();
    assert_eq!(points.ledger("noah", 10).unwrap().len(), 1);
}

#[test]
fn zero_total_orders_skip_the_ledger() {
    let mut conn = open_db_in_memory().unwrap();

    let mut orders = SqliteOrderRepository::try_new(&mut conn).unwrap();
    let mut draft = OrderDraft::new("aria");
    draft.lines.push(OrderLine::custom("a glass of water", 0, 1));
    let id = orders.place_order(&draft).unwrap();

    let record = orders.get_order(id).unwrap().unwrap();
    assert_eq!(record.total_points, 0);
    drop(orders);

    let points = SqlitePointsRepository::try_new(&mut conn).unwrap();
    assert!(points.ledger("aria", 10).unwrap().is_empty());
    assert_eq!(points.balance("aria").unwrap(), 0);
}

#[test]
fn lifecycle_happy_path_counts_toward_savings() {
    let mut conn = open_db_in_memory().unwrap();
    grant(&mut conn, "noah", 100);

    let mut orders = SqliteOrderRepository::try_new(&mut conn).unwrap();
    let id = orders.place_order(&two_line_draft("noah")).unwrap();

    let accepted = orders.update_order_status(id, OrderStatus::Accepted).unwrap();
    assert_eq!(accepted.status, OrderStatus::Accepted);

    let served = orders.update_order_status(id, OrderStatus::Served).unwrap();
    assert_eq!(served.status, OrderStatus::Served);

    assert_eq!(orders.served_points_total(Some("noah")).unwrap(), 75);
    assert_eq!(orders.served_points_total(None).unwrap(), 75);
    assert_eq!(orders.served_points_total(Some("aria")).unwrap(), 0);
}

#[test]
fn illegal_transitions_are_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    grant(&mut conn, "noah", 100);

    let mut orders = SqliteOrderRepository::try_new(&mut conn).unwrap();
    let id = orders.place_order(&two_line_draft("noah")).unwrap();

    // Pending cannot jump straight to served.
    let err = orders.update_order_status(id, OrderStatus::Served).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidStatusChange {
            from: OrderStatus::Pending,
            to: OrderStatus::Served,
        }
    ));

    orders.update_order_status(id, OrderStatus::Accepted).unwrap();
    orders.update_order_status(id, OrderStatus::Served).unwrap();

    // Served is terminal.
    let err = orders
        .update_order_status(id, OrderStatus::Cancelled)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidStatusChange { .. }));
}

#[test]
fn cancelling_a_paid_order_refunds_the_points() {
    let mut conn = open_db_in_memory().unwrap();
    grant(&mut conn, "noah", 100);

    {
        let mut orders = SqliteOrderRepository::try_new(&mut conn).unwrap();
        let id = orders.place_order(&two_line_draft("noah")).unwrap();
        let cancelled = orders
            .update_order_status(id, OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    assert_eq!(balance(&mut conn, "noah"), 100);

    let points = SqlitePointsRepository::try_new(&mut conn).unwrap();
    let refund = points
        .ledger("noah", 10)
        .unwrap()
        .into_iter()
        .find(|entry| entry.reason == "order_cancelled")
        .unwrap();
    assert_eq!(refund.delta, 75);
}

#[test]
fn order_listing_filters_by_member_and_status() {
    let mut conn = open_db_in_memory().unwrap();
    grant(&mut conn, "noah", 200);
    grant(&mut conn, "aria", 200);

    let mut orders = SqliteOrderRepository::try_new(&mut conn).unwrap();
    let first = orders.place_order(&two_line_draft("noah")).unwrap();
    orders.place_order(&two_line_draft("aria")).unwrap();
    orders.update_order_status(first, OrderStatus::Accepted).unwrap();

    let noahs = orders
        .list_orders(&OrderListQuery {
            member: Some("noah".to_string()),
            ..OrderListQuery::default()
        })
        .unwrap();
    assert_eq!(noahs.len(), 1);
    assert_eq!(noahs[0].uuid, first);

    let pending = orders
        .list_orders(&OrderListQuery {
            status: Some(OrderStatus::Pending),
            ..OrderListQuery::default()
        })
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].ordered_by, "aria");
}

#[test]
fn grant_rejects_non_positive_amounts() {
    let mut conn = open_db_in_memory().unwrap();
    let mut points = SqlitePointsRepository::try_new(&mut conn).unwrap();

    assert!(matches!(
        points.grant("noah", 0, "nothing").unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(matches!(
        points.grant("noah", -5, "oops").unwrap_err(),
        RepoError::Validation(_)
    ));
}

#[test]
fn balance_of_unknown_member_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let points = SqlitePointsRepository::try_new(&mut conn).unwrap();

    assert!(matches!(
        points.balance("stranger").unwrap_err(),
        RepoError::NotFound {
            entity: "point_account",
            ..
        }
    ));
}

#[test]
fn order_service_reads_back_and_reports_savings() {
    let mut conn = open_db_in_memory().unwrap();
    grant(&mut conn, "noah", 100);

    let repo = SqliteOrderRepository::try_new(&mut conn).unwrap();
    let mut service = OrderService::new(repo);

    let record = service.place(&two_line_draft("noah")).unwrap();
    assert_eq!(record.status, OrderStatus::Pending);

    service.accept(record.uuid).unwrap();
    let served = service.serve(record.uuid).unwrap();
    assert_eq!(served.status, OrderStatus::Served);
    assert_eq!(service.savings(Some("noah")).unwrap(), 75);
}
