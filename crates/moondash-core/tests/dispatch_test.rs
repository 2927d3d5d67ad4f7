#![allow(clippy::unwrap_used)]

mod support;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use moondash_core::{
    BadgeCategory, Collection, CoreError, EntityId, Gateway, OrderStatus, RoleDispatcher, RoleView,
    RoverStatus, User, order_rows, rover_badge,
};
use support::FakeGateway;

fn dispatcher(gateway: &Arc<FakeGateway>) -> RoleDispatcher {
    RoleDispatcher::new(Arc::clone(gateway) as Arc<dyn Gateway>)
}

fn user(raw: serde_json::Value) -> User {
    serde_json::from_value(raw).unwrap()
}

#[tokio::test]
async fn customer_loads_outposts_and_own_orders() {
    let gw = FakeGateway::new();
    gw.set_listing(
        Collection::LunarOutpost,
        vec![
            json!({"id": "o-1", "name": "Crater Cafe", "cuisine": "Lunar fusion", "menuImage": null}),
            json!({"id": "o-2", "name": "Mare Grill", "menuImage": {"url": "https://img/mare.png"}}),
        ],
    );
    gw.set_listing(
        Collection::Order,
        vec![
            json!({"id": "a1b2c3d4e5", "customerId": "cust-1", "status": "placed", "rover": null}),
            json!({"id": "f6e5d4c3b2", "customerId": "cust-1", "status": "delivered",
                   "rover": {"id": "r-1", "name": "Rover-01", "status": "idle"}}),
        ],
    );

    let view = dispatcher(&gw)
        .load_for_role(&user(support::customer()))
        .await
        .unwrap();

    let RoleView::Customer(customer) = view else {
        panic!("expected customer view");
    };
    assert_eq!(customer.outposts.len(), 2);
    assert_eq!(customer.outposts[1].image_url(), "https://img/mare.png");
    assert_eq!(customer.outposts[0].image_url(), moondash_core::PLACEHOLDER_IMAGE_URL);

    let badges: Vec<_> = order_rows(&customer.orders)
        .into_iter()
        .map(|row| (row.short_id, row.badge.category))
        .collect();
    assert_eq!(
        badges,
        vec![
            ("a1b2c3d4".to_owned(), BadgeCategory::Info),
            ("f6e5d4c3".to_owned(), BadgeCategory::Success),
        ]
    );

    let finds = gw.finds();
    assert_eq!(finds.len(), 2);
    let (_, orders_query) = finds
        .iter()
        .find(|(c, _)| *c == Collection::Order)
        .unwrap();
    assert_eq!(orders_query.filter.get("customerId"), Some(&json!("cust-1")));
    assert_eq!(orders_query.relations, vec!["rover".to_owned()]);
    assert!(finds.iter().any(|(c, q)| *c == Collection::LunarOutpost && q.filter.is_empty()));
}

#[tokio::test]
async fn driver_with_rover_loads_its_deliveries() {
    let gw = FakeGateway::new();
    gw.set_listing(
        Collection::LunarRover,
        vec![
            support::rover("r-1", json!(7), "delivering"),
            support::rover("r-2", json!(7), "idle"),
        ],
    );
    gw.set_listing(
        Collection::Order,
        vec![json!({
            "id": "ord-9", "roverId": "r-1", "status": "in_transit",
            "customer": {"id": "cust-1", "name": "Neil", "role": "customer", "lunarAddress": "Tranquility Base"}
        })],
    );

    let view = dispatcher(&gw)
        .load_for_role(&user(support::driver()))
        .await
        .unwrap();
    let driver = view.as_driver().unwrap();

    // First match wins.
    assert_eq!(driver.rover.as_ref().unwrap().id, EntityId::from("r-1"));
    assert_eq!(driver.deliveries.len(), 1);
    assert_eq!(driver.deliveries[0].status, OrderStatus::InTransit);
    assert_eq!(order_rows(&driver.deliveries)[0].address, "Tranquility Base");

    let finds = gw.finds();
    assert_eq!(finds.len(), 2);
    assert_eq!(finds[0].0, Collection::LunarRover);
    assert_eq!(finds[0].1.filter.get("operatorId"), Some(&json!(7)));
    assert_eq!(finds[0].1.limit, Some(1));
    assert_eq!(finds[1].0, Collection::Order);
    assert_eq!(finds[1].1.filter.get("roverId"), Some(&json!("r-1")));
    assert_eq!(finds[1].1.relations, vec!["customer".to_owned()]);
}

#[tokio::test]
async fn driver_without_rover_issues_no_order_query() {
    let gw = FakeGateway::new();

    let view = dispatcher(&gw)
        .load_for_role(&user(support::driver()))
        .await
        .unwrap();
    let driver = view.as_driver().unwrap();

    assert!(driver.rover.is_none());
    assert!(driver.deliveries.is_empty());
    let finds = gw.finds();
    assert_eq!(finds.len(), 1);
    assert_eq!(finds[0].0, Collection::LunarRover);
}

#[tokio::test]
async fn admin_loads_only_driver_operators() {
    let gw = FakeGateway::new();
    gw.set_listing(Collection::User, vec![support::driver()]);

    let view = dispatcher(&gw)
        .load_for_role(&user(support::admin()))
        .await
        .unwrap();
    let admin = view.as_admin().unwrap();

    assert_eq!(admin.operators.len(), 1);
    assert_eq!(admin.operators[0].label(), "Valentina (val@moon.io)");
    assert!(admin.draft.is_blank());

    let finds = gw.finds();
    assert_eq!(finds.len(), 1);
    assert_eq!(finds[0].0, Collection::User);
    assert_eq!(finds[0].1.filter.get("role"), Some(&json!("driver")));
}

#[tokio::test]
async fn failed_query_is_reported_per_collection() {
    let gw = FakeGateway::new();
    gw.fail_find(Collection::Order);

    let err = dispatcher(&gw)
        .load_for_role(&user(support::customer()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::QueryFailure { ref collection, .. } if collection == "order"),
        "{err:?}"
    );
}

#[tokio::test]
async fn unknown_order_status_does_not_fail_the_load() {
    let gw = FakeGateway::new();
    gw.set_listing(
        Collection::Order,
        vec![json!({"id": "x", "status": "abducted", "customerId": "cust-1"})],
    );

    let view = dispatcher(&gw)
        .load_for_role(&user(support::customer()))
        .await
        .unwrap();
    let rows = order_rows(&view.as_customer().unwrap().orders);
    assert_eq!(rows[0].badge.category, BadgeCategory::Unstyled);
    assert_eq!(rows[0].badge.label, "ABDUCTED");
}

#[tokio::test]
async fn unexpected_rover_status_still_loads_the_driver_view() {
    let gw = FakeGateway::new();
    gw.set_listing(
        Collection::LunarRover,
        vec![support::rover("r-9", json!(7), "maintenance")],
    );

    let view = dispatcher(&gw)
        .load_for_role(&user(support::driver()))
        .await
        .unwrap();
    let rover = view.as_driver().unwrap().rover.clone().unwrap();
    assert_eq!(rover.id, EntityId::from("r-9"));
    assert_eq!(rover.status, RoverStatus::Unknown);
    assert_eq!(rover_badge(rover.status).category, BadgeCategory::Unstyled);
}

#[tokio::test]
async fn malformed_outposts_do_not_fail_the_customer_view() {
    let gw = FakeGateway::new();
    gw.set_listing(
        Collection::LunarOutpost,
        vec![
            json!({"id": 1, "name": "Crater Cafe"}),
            json!({"id": 2, "name": null}),
            json!({"name": "no id at all"}),
        ],
    );

    let view = dispatcher(&gw)
        .load_for_role(&user(support::customer()))
        .await
        .unwrap();
    let outposts = &view.as_customer().unwrap().outposts;
    assert_eq!(outposts.len(), 2);
    assert_eq!(outposts[0].name, "Crater Cafe");
    assert_eq!(outposts[1].name, "");
}
