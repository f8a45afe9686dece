/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 公開ルートと、許可ロールごとの guard を掛けたグループを merge する
 * - 許可ロールは AccessPolicy (設定値) から取る
 * - guard 付きメソッドと共有するパスは公開側で 405 fallback を持つ
 */
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post, put},
};

use crate::api::v1::handlers::{addresses, catalog, health::health, roles, sales, users};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let policy = &state.policy;

    let public = Router::new()
        .route("/health", get(health))
        .route("/users", post(users::create_user).fallback(method_not_allowed))
        .route("/roles", get(roles::list_roles).fallback(method_not_allowed))
        .route("/roles/{role_id}", get(roles::get_role))
        .route(
            "/regions",
            get(addresses::list_regions).fallback(method_not_allowed),
        )
        .route(
            "/communes",
            get(addresses::list_communes).fallback(method_not_allowed),
        )
        .route(
            "/communes/region/{region_id}",
            get(addresses::list_communes_by_region),
        )
        .route(
            "/categories",
            get(catalog::list_categories).fallback(method_not_allowed),
        )
        .route(
            "/products",
            get(catalog::list_products).fallback(method_not_allowed),
        )
        .route(
            "/products/{product_id}",
            get(catalog::get_product).fallback(method_not_allowed),
        );

    let user_read = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/email/{email}", get(users::get_user_by_email))
        .route("/users/nickname/{nickname}", get(users::get_user_by_nickname))
        .route("/addresses", get(addresses::list_addresses));

    let user_admin = Router::new()
        .route(
            "/users/{user_id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/roles", post(roles::create_role));

    // 所有者チェックは handler 側 (policy::ensure_owner_or)
    let account = Router::new()
        .route("/users/password/{email}", put(users::change_password))
        .route(
            "/addresses/user/{user_id}",
            get(addresses::list_user_addresses),
        )
        .route("/sales/user/{user_id}", get(sales::list_user_sales))
        .route("/sales/{sale_id}/products", get(sales::list_sale_products));

    let address_write = Router::new().route("/addresses", post(addresses::create_address));

    let catalog_admin = Router::new()
        .route("/regions", post(addresses::create_region))
        .route("/communes", post(addresses::create_commune))
        .route("/categories", post(catalog::create_category))
        .route("/products", post(catalog::create_product))
        .route(
            "/products/{product_id}",
            put(catalog::update_product).delete(catalog::delete_product),
        );

    let checkout = Router::new().route("/sales", post(sales::checkout));

    let sales_read = Router::new()
        .route("/sales", get(sales::list_sales))
        .route("/sales/details", get(sales::list_sale_details))
        .route(
            "/sales/address/{address_id}",
            get(sales::list_address_sales),
        );

    let delivery = Router::new().route("/sales/{sale_id}/proof", put(sales::upload_proof));

    public
        .merge(access::apply(user_read, state, policy.user_read.clone()))
        .merge(access::apply(user_admin, state, policy.user_admin.clone()))
        .merge(access::apply(account, state, policy.account.clone()))
        .merge(access::apply(address_write, state, policy.address_write.clone()))
        .merge(access::apply(catalog_admin, state, policy.catalog_admin.clone()))
        .merge(access::apply(checkout, state, policy.checkout.clone()))
        .merge(access::apply(sales_read, state, policy.sales_read.clone()))
        .merge(access::apply(delivery, state, policy.delivery.clone()))
}

// 公開側の 405。merge 後もこちらが残り、guard を通らない
async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}
