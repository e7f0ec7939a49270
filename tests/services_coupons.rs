use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::services::errors::ServiceError;
use pushkind_shop_admin::SERVICE_ACCESS_ROLE;
use pushkind_shop_admin::forms::coupons::CouponForm;
use pushkind_shop_admin::repository::DieselRepository;
use pushkind_shop_admin::services::coupons::{
    CouponsQuery, create_coupon, list_coupons, load_coupons_page, modify_coupon, remove_coupon,
};

mod common;

fn admin(hub_id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "admin".to_string(),
        email: "admin@example.com".to_string(),
        hub_id,
        name: "Admin".to_string(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        exp: 0,
    }
}

fn form(code: &str) -> CouponForm {
    CouponForm {
        code: code.to_string(),
        discount_type: "percentage".to_string(),
        discount_value: "10".to_string(),
        start_date: "2024-01-01".to_string(),
        end_date: "2024-01-31".to_string(),
        ..CouponForm::default()
    }
}

#[test]
fn test_coupon_lifecycle_through_services() {
    let test_db = common::TestDb::new("test_coupon_lifecycle.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = admin(1);

    let created = create_coupon(&repo, &user, form("SAVE10")).unwrap();
    assert_eq!(created.record.discount_value, 10.0);
    assert!(created.record.max_discount_amount.is_none());
    assert!(created.record.usage_limit.is_none());
    assert!(created.record.is_active);

    let duplicate = create_coupon(&repo, &user, form("SAVE10"));
    assert!(matches!(duplicate, Err(ServiceError::Conflict)));

    let mut reversed = form("LATE");
    reversed.start_date = "2024-02-01".to_string();
    reversed.end_date = "2024-01-01".to_string();
    assert!(matches!(
        create_coupon(&repo, &user, reversed),
        Err(ServiceError::Form(_))
    ));

    let mut edit = form("SAVE15");
    edit.discount_value = "15".to_string();
    edit.applicable_products = Some("specific".to_string());
    edit.product_ids = Some("123, 456 ,789".to_string());
    let updated = modify_coupon(&repo, &user, created.id, edit).unwrap();
    assert_eq!(updated.record.code, "SAVE15");
    assert_eq!(updated.record.product_ids, vec!["123", "456", "789"]);

    let page = load_coupons_page(&repo, &user, CouponsQuery::default()).unwrap();
    let serialized = serde_json::to_value(&page.coupons).unwrap();
    assert_eq!(serialized["items"][0]["product_ids"], "123, 456, 789");
    assert_eq!(serialized["items"][0]["end_date"], "2024-01-31");

    let other_hub = admin(2);
    assert!(list_coupons(&repo, &other_hub, CouponsQuery::default())
        .unwrap()
        .is_empty());
    assert!(matches!(
        modify_coupon(&repo, &other_hub, created.id, form("HIJACK")),
        Err(ServiceError::NotFound)
    ));

    remove_coupon(&repo, &user, created.id).unwrap();
    assert!(list_coupons(&repo, &user, CouponsQuery::default())
        .unwrap()
        .is_empty());
}
