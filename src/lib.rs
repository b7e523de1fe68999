//! Compiles annotation comments on route handlers into Swagger operation records.
//!
//! A comment block such as
//!
//! ```text
//! // @Title getWishlist
//! // @Description fetch one wishlist
//! // @Param wishlist_id path string true "wishlist id"
//! // @Success 200 {object} Wishlist "ok"
//! // @Failure 404 {string} string "not found"
//! // @Accept json
//! // @router /customer/get-wishlist/{wishlist_id} [get]
//! ```
//!
//! becomes one [`Operation`]. Response types marked `{object}` or `{array}` are
//! resolved through a [`ModelResolver`]; the resolved models are collected on the
//! operation for the caller to merge into its own registry.
//!
//! # Example
//! ```ignore
//! use swagdoc::{compile_comment, ModelProperty, ModelRegistry, PackageContext, ParseContext};
//!
//! let registry = ModelRegistry::new();
//! registry.define("shop", "Wishlist", vec![ModelProperty::new("id", "int64")]);
//!
//! let package = PackageContext::new("shop");
//! let ctx = ParseContext::new(&package, &registry);
//! let operation = compile_comment(
//!     ["// @router /wishlist/{id} [get]", "// @Success 200 {object} Wishlist \"ok\""],
//!     &ctx,
//! )?;
//! println!("{}", operation.to_json()?);
//! ```

pub mod parser;
pub mod resolver;
pub mod scan;

pub use parser::{
    Aborted, ContentType, Operation, OperationItems, Parameter, ParseContext, ParseError,
    ResponseMessage, ResponseRole, ResponseShape,
};
pub use resolver::{
    is_basic_type, Model, ModelProperty, ModelRegistry, ModelResolver, PackageContext,
    Resolution, ResolveError,
};
pub use scan::{comment_blocks, CommentBlock};

/// Compile one comment block into an operation.
///
/// Partial results are discarded on failure; use [`Operation::parse_comment`]
/// to keep them.
pub fn compile_comment<I>(block: I, ctx: &ParseContext<'_>) -> Result<Operation, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Operation::new()
        .parse_comment(block, ctx)
        .map_err(ParseError::from)
}
