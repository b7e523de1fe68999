use thiserror::Error;

use super::types::Operation;
use crate::resolver::ResolveError;

/// Reasons a comment block fails to compile into an operation.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No comment block, or a block without a `@router` line.
    #[error(
        "Comment has no @router annotation\n\
         help: every documented operation needs '@router <path> [<method>]'"
    )]
    EmptyComment,

    #[error(
        "Can not parse router comment \"{line}\"\n\
         help: expected '@router <path> [<method>]'\n\
         note: example '@router /customer/get-wishlist/{{wishlist_id}} [get]'"
    )]
    InvalidRouter { line: String },

    #[error(
        "Can not parse param comment \"{line}\"\n\
         help: expected '@Param <name> <location> <type> <required> \"<description>\"'\n\
         note: example '@Param wishlist_id path string true \"wishlist id\"'"
    )]
    InvalidParam { line: String },

    #[error(
        "Can not parse response comment \"{line}\"\n\
         help: expected '<code> <kind> <type> \"<message>\"'\n\
         note: example '@Success 200 {{object}} model.OrderRow \"ok\"'"
    )]
    InvalidResponse { line: String },

    #[error("Invalid status code '{code}'\nhelp: response code must be an integer")]
    InvalidStatusCode { code: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A comment block that stopped at its first failing tag.
///
/// Lines before the failure stay applied to `operation`.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Aborted {
    pub error: ParseError,
    pub operation: Operation,
}

impl From<Aborted> for ParseError {
    fn from(aborted: Aborted) -> Self {
        aborted.error
    }
}
