mod annotations;
mod error;
mod types;

pub use annotations::{parse_accept, parse_param, parse_response, parse_router};
pub use error::{Aborted, ParseError};
pub use types::{
    ContentType, Operation, OperationItems, Parameter, ResponseFragment, ResponseMessage,
    ResponseRole, ResponseShape, Route,
};

use tracing::{debug, trace};
use types::Fragment;

use crate::resolver::{ModelResolver, PackageContext};

/// Everything a comment block needs from its surroundings
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub package: &'a PackageContext,
    pub resolver: &'a dyn ModelResolver,
}

impl<'a> ParseContext<'a> {
    pub fn new(package: &'a PackageContext, resolver: &'a dyn ModelResolver) -> Self {
        Self { package, resolver }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Router,
    Title,
    Description,
    Success,
    Param,
    Failure,
    Accept,
}

/// Recognized tag keywords, tested top to bottom. The first prefix match wins.
const TAGS: &[(&str, Tag)] = &[
    ("@router", Tag::Router),
    ("@Title", Tag::Title),
    ("@Description", Tag::Description),
    ("@Success", Tag::Success),
    ("@Param", Tag::Param),
    ("@Failure", Tag::Failure),
    ("@Accept", Tag::Accept),
];

/// Strip comment markers and surrounding whitespace from a raw comment line
pub fn normalize_line(raw: &str) -> &str {
    raw.trim_start().trim_start_matches('/').trim()
}

fn classify(line: &str) -> Option<(Tag, &str)> {
    TAGS.iter()
        .find_map(|&(keyword, tag)| line.strip_prefix(keyword).map(|rest| (tag, rest.trim())))
}

/// Whether a raw comment line carries a `@router` tag
pub fn is_router_line(raw: &str) -> bool {
    matches!(classify(normalize_line(raw)), Some((Tag::Router, _)))
}

fn parse_tag(tag: Tag, text: &str, ctx: &ParseContext<'_>) -> Result<Fragment, ParseError> {
    let fragment = match tag {
        Tag::Router => Fragment::Route(annotations::parse_router(text)?),
        Tag::Title => Fragment::Title(text.to_string()),
        Tag::Description => Fragment::Summary(text.to_string()),
        Tag::Success => Fragment::Response(annotations::parse_response(
            text,
            ResponseRole::Success,
            ctx,
        )?),
        Tag::Failure => Fragment::Response(annotations::parse_response(
            text,
            ResponseRole::Failure,
            ctx,
        )?),
        Tag::Param => Fragment::Parameter(annotations::parse_param(text)?),
        Tag::Accept => Fragment::ContentTypes(annotations::parse_accept(text)),
    };
    Ok(fragment)
}

impl Operation {
    /// Fold every line of a comment block into this operation.
    ///
    /// Lines without a recognized tag are skipped. The first failing tag stops
    /// the fold and the operation built so far comes back inside [`Aborted`].
    /// A block with no lines or no `@router` line fails with
    /// [`ParseError::EmptyComment`].
    pub fn parse_comment<I>(self, block: I, ctx: &ParseContext<'_>) -> Result<Self, Aborted>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut operation = self;

        for raw in block {
            let line = normalize_line(raw.as_ref());
            let Some((tag, text)) = classify(line) else {
                trace!(line, "skipping line without a known tag");
                continue;
            };

            debug!(?tag, text, "parsing annotation");
            match parse_tag(tag, text, ctx) {
                Ok(fragment) => operation = operation.apply(fragment),
                Err(error) => {
                    debug!(%error, "aborting comment block");
                    return Err(Aborted { error, operation });
                }
            }
        }

        if operation.path.is_empty() {
            return Err(Aborted {
                error: ParseError::EmptyComment,
                operation,
            });
        }

        Ok(operation)
    }
}
