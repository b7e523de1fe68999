use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::error::ParseError;
use super::types::{
    ContentType, Parameter, ResponseFragment, ResponseMessage, ResponseRole, ResponseShape, Route,
};
use super::ParseContext;

// Static regex patterns to avoid recompilation
static ROUTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\w./\-{}]+)[^\[]+\[([^\]]+)").unwrap());
static PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)\s+(\w+)\s+(\w+)\s+(\w+)\s+"([^"]+)""#).unwrap());
static RESPONSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\d+)\s+([\w{}]+)\s+([\w./]+)[^"]*(.*)?"#).unwrap());

const OBJECT_MARKER: &str = "{object}";
const ARRAY_MARKER: &str = "{array}";

/// Parse the text after `@router`: `<path> [<method>]`
pub fn parse_router(text: &str) -> Result<Route, ParseError> {
    let captures = ROUTER_RE
        .captures(text)
        .ok_or_else(|| ParseError::InvalidRouter {
            line: text.to_string(),
        })?;

    Ok(Route {
        path: captures[1].to_string(),
        method: captures[2].to_uppercase(),
    })
}

/// Parse the text after `@Param`: `<name> <location> <type> <required> "<description>"`
pub fn parse_param(text: &str) -> Result<Parameter, ParseError> {
    let captures = PARAM_RE
        .captures(text)
        .ok_or_else(|| ParseError::InvalidParam {
            line: text.to_string(),
        })?;

    // Non-basic types are kept by name; they are not resolved into models here.
    Ok(Parameter {
        name: captures[1].to_string(),
        location: captures[2].to_string(),
        data_type: captures[3].to_string(),
        required: captures[4].eq_ignore_ascii_case("true"),
        description: captures[5].to_string(),
    })
}

/// Parse the text after `@Accept`: a comma separated list of content type shorthands.
///
/// Unknown shorthands are dropped. Whitespace around each token is ignored, so
/// `json, xml` yields both types.
pub fn parse_accept(text: &str) -> Vec<ContentType> {
    text.split(',')
        .filter_map(|token| ContentType::from_token(token.trim()))
        .collect()
}

/// Parse the text after `@Success` or `@Failure`: `<code> <kind> <type> "<message>"`.
///
/// An `{object}` or `{array}` kind resolves the type through the context's
/// resolver; any other kind names a scalar and resolves nothing.
pub fn parse_response(
    text: &str,
    role: ResponseRole,
    ctx: &ParseContext<'_>,
) -> Result<ResponseFragment, ParseError> {
    let captures = RESPONSE_RE
        .captures(text)
        .ok_or_else(|| ParseError::InvalidResponse {
            line: text.to_string(),
        })?;

    let code = captures[1]
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidStatusCode {
            code: captures[1].to_string(),
        })?;
    let kind = &captures[2];
    let type_ref = &captures[3];
    let message = captures
        .get(4)
        .map_or("", |m| m.as_str())
        .trim_matches('"')
        .to_string();

    let mut fragment = ResponseFragment {
        message: ResponseMessage {
            code,
            message,
            response_model: None,
            role,
        },
        shape: None,
        models: Vec::new(),
    };

    if kind == OBJECT_MARKER || kind == ARRAY_MARKER {
        debug!(type_ref, package = ctx.package.name(), "resolving response model");
        let resolution = ctx.resolver.resolve(type_ref, ctx.package)?;
        let id = resolution.model.id.clone();

        fragment.shape = Some(if kind == ARRAY_MARKER {
            ResponseShape::array_of(&id)
        } else {
            ResponseShape::Model(id.clone())
        });
        fragment.message.response_model = Some(id);
        fragment.models.push(resolution.model);
        fragment.models.extend(resolution.nested);
    }

    Ok(fragment)
}
