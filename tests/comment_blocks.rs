use swagdoc::{comment_blocks, ModelProperty, ModelRegistry, PackageContext, ParseContext};

const CONTROLLER: &str = r#"
package controllers

import "shop/model"

type WishlistController struct {
	beego.Controller
}

// @Title getWishlist
// @Description get one wishlist by id
// @Param wishlist_id path string true "wishlist id"
// @Success 200 {object} model.Wishlist "ok"
// @Failure 404 {string} string "wishlist not found"
// @Accept json
// @router /customer/get-wishlist/{wishlist_id} [get]
func (c *WishlistController) Get() {
}

// Prepare runs before every action.
func (c *WishlistController) Prepare() {
}
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("swagdoc=trace")
        .with_test_writer()
        .try_init();
}

#[test]
fn compiles_blocks_found_in_source() {
    init_tracing();

    let registry = ModelRegistry::new();
    registry.define("model", "Wishlist", vec![ModelProperty::new("id", "string")]);
    let package = PackageContext::new("controllers");
    let ctx = ParseContext::new(&package, &registry);

    let blocks = comment_blocks(CONTROLLER);
    assert_eq!(blocks.len(), 2);

    let routed: Vec<_> = blocks.iter().filter(|b| b.has_router()).collect();
    assert_eq!(routed.len(), 1);
    assert_eq!(routed[0].declaration, "func (c *WishlistController) Get() {");

    let op = routed[0].compile(&ctx).unwrap();
    assert_eq!(op.nickname, "getWishlist");
    assert_eq!(op.summary, "get one wishlist by id");
    assert_eq!(op.http_method, "GET");
    assert_eq!(op.consumes, vec!["application/json"]);
    assert_eq!(op.response_messages.len(), 2);
    assert_eq!(op.models()[0].id, "model.Wishlist");
}

#[test]
fn block_without_router_fails_to_compile() {
    let registry = ModelRegistry::new();
    let package = PackageContext::new("controllers");
    let ctx = ParseContext::new(&package, &registry);

    let blocks = comment_blocks(CONTROLLER);
    let prepare = blocks
        .iter()
        .find(|b| b.declaration.contains("Prepare"))
        .unwrap();
    assert!(prepare.compile(&ctx).is_err());
}
