use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::Serialize;

use crate::resolver::{is_basic_type, Model};

/// Content types selectable with `@Accept`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Xml,
    Plain,
    Html,
}

impl ContentType {
    /// Look up the shorthand used in `@Accept` lines
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "plain" => Some(Self::Plain),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Plain => "text/plain",
            Self::Html => "text/html",
        }
    }
}

/// Element type of an array response: a model reference or a scalar name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OperationItems {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl OperationItems {
    pub fn for_type(type_name: &str) -> Self {
        if is_basic_type(type_name) {
            Self {
                reference: None,
                type_name: Some(type_name.to_string()),
            }
        } else {
            Self {
                reference: Some(type_name.to_string()),
                type_name: None,
            }
        }
    }
}

/// What an operation returns.
///
/// The last typed `@Success`/`@Failure` line on a block decides the shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// A scalar type name. Annotation parsing never produces this; it is for
    /// hosts that build an [`Operation`] directly.
    Basic(String),
    Model(String),
    Array(OperationItems),
}

impl ResponseShape {
    pub fn array_of(model_id: &str) -> Self {
        Self::Array(OperationItems::for_type(model_id))
    }
}

impl Serialize for ResponseShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Basic(name) | Self::Model(name) => map.serialize_entry("type", name)?,
            Self::Array(items) => {
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Where the value travels: `path`, `query`, `form`, `header`, `body`...
    pub location: String,
    pub data_type: String,
    pub required: bool,
    pub description: String,
}

impl Serialize for Parameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Parameter", 6)?;
        state.serialize_field("paramType", &self.location)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("dataType", &self.data_type)?;
        state.serialize_field("type", &self.data_type)?;
        state.serialize_field("required", &self.required)?;
        state.end()
    }
}

/// Which annotation produced a response message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseRole {
    #[default]
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_model: Option<String>,
    #[serde(skip)]
    pub role: ResponseRole,
}

/// Parsed `@router` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub method: String,
}

/// Parsed `@Success`/`@Failure` line together with what its type resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFragment {
    pub message: ResponseMessage,
    pub shape: Option<ResponseShape>,
    pub models: Vec<Model>,
}

/// Result of one tag parser, folded into the operation by the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fragment {
    Route(Route),
    Title(String),
    Summary(String),
    Parameter(Parameter),
    ContentTypes(Vec<ContentType>),
    Response(ResponseFragment),
}

/// One documented API operation, serialized as a Swagger 1.2 operation object
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub http_method: String,
    pub nickname: String,
    #[serde(flatten)]
    pub shape: Option<ResponseShape>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_messages: Vec<ResponseMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    pub path: String,
    #[serde(skip)]
    models: Vec<Model>,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Models discovered while resolving this operation's responses, in discovery order
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn into_models(self) -> Vec<Model> {
        self.models
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.path = route.path;
        self.http_method = route.method;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.nickname = title.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Each content type is both consumed and produced
    pub fn with_content_types(mut self, content_types: &[ContentType]) -> Self {
        for content_type in content_types {
            self.consumes.push(content_type.mime().to_string());
            self.produces.push(content_type.mime().to_string());
        }
        self
    }

    pub fn with_response(mut self, response: ResponseFragment) -> Self {
        if let Some(shape) = response.shape {
            self.shape = Some(shape);
        }
        for model in response.models {
            self.discover(model);
        }
        self.response_messages.push(response.message);
        self
    }

    fn discover(&mut self, model: Model) {
        if !self.models.iter().any(|known| known.id == model.id) {
            self.models.push(model);
        }
    }

    pub(crate) fn apply(self, fragment: Fragment) -> Self {
        match fragment {
            Fragment::Route(route) => self.with_route(route),
            Fragment::Title(title) => self.with_title(title),
            Fragment::Summary(summary) => self.with_summary(summary),
            Fragment::Parameter(parameter) => self.with_parameter(parameter),
            Fragment::ContentTypes(content_types) => self.with_content_types(&content_types),
            Fragment::Response(response) => self.with_response(response),
        }
    }

    /// Render the operation as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "yaml")]
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
