//! Immutable API contract snapshot types.
//!
//! A [`Contract`] maps route templates to per-verb [`Operation`]s. Each
//! operation carries ordered [`ParameterDecl`]s and a set of
//! [`ResponseDecl`]s keyed by status code. The wire-side `type`/`format`
//! string pairs of the source definition are collapsed at build time into the
//! tagged [`ParamKind`] and [`ResponseSchema`] variants, so downstream code
//! dispatches with an exhaustive match instead of re-inspecting strings.
//!
//! # Example
//!
//! ```
//! use proteus_contract::{Contract, Operation, ParamKind, ParameterDecl, ResponseDecl,
//!     ResponseSchema, Route};
//! use http::Method;
//!
//! let contract = Contract::builder("petstore")
//!     .version("1.0.0")
//!     .route(
//!         Route::builder("/pets/{PetName}/photos/{ID}")
//!             .operation(
//!                 Operation::builder(Method::GET)
//!                     .parameter(ParameterDecl::path("PetName").kind(ParamKind::String))
//!                     .parameter(ParameterDecl::path("ID").kind(ParamKind::Integer))
//!                     .response(ResponseDecl::new(200).schema(ResponseSchema::File))
//!                     .build(),
//!             )
//!             .build(),
//!     )
//!     .build();
//!
//! let route = contract.route("/pets/{PetName}/photos/{ID}").unwrap();
//! assert!(route.is_resource());
//! assert!(contract.operation("/pets/{PetName}/photos/{ID}", &Method::GET).is_some());
//! ```

use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable snapshot of an API definition.
///
/// Contracts are value types: once built they are never mutated. Runtime
/// replacement happens by building a new `Contract` and swapping it in via
/// [`crate::ContractRegistry::init`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ContractData")]
pub struct Contract {
    /// The API name this contract defines.
    name: String,
    /// The contract version.
    version: String,
    /// Routes defined in this contract.
    routes: Vec<Route>,
    /// Route lookup by template for fast access.
    #[serde(skip)]
    route_index: HashMap<String, usize>,
}

impl Contract {
    /// Creates a new contract builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name)
    }

    /// Creates an empty contract with no routes.
    ///
    /// This is the start state of a [`crate::ContractRegistry`]: requests
    /// routed against an empty contract take the pass-through path.
    #[must_use]
    pub fn empty() -> Self {
        Self::builder("").build()
    }

    /// Returns the API name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contract version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns all routes defined in this contract.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Looks up a route by its template.
    #[must_use]
    pub fn route(&self, template: &str) -> Option<&Route> {
        self.route_index
            .get(template)
            .map(|&idx| &self.routes[idx])
    }

    /// Looks up the operation declared for `(template, method)`.
    ///
    /// Returns `None` when the contract has no such route or the route has no
    /// operation for the verb; callers treat that as "the API doesn't know
    /// this route".
    #[must_use]
    pub fn operation(&self, template: &str, method: &Method) -> Option<&Operation> {
        self.route(template).and_then(|r| r.operation(method))
    }

    /// Rebuilds the route index after deserialization.
    fn rebuild_index(&mut self) {
        self.route_index.clear();
        for (idx, route) in self.routes.iter().enumerate() {
            self.route_index.insert(route.template.clone(), idx);
        }
    }
}

/// Serde shadow for [`Contract`]; rebuilds the route index on deserialize.
#[derive(Deserialize)]
struct ContractData {
    name: String,
    version: String,
    routes: Vec<Route>,
}

impl From<ContractData> for Contract {
    fn from(data: ContractData) -> Self {
        let mut contract = Self {
            name: data.name,
            version: data.version,
            routes: data.routes,
            route_index: HashMap::new(),
        };
        contract.rebuild_index();
        contract
    }
}

/// Builder for creating [`Contract`] instances.
#[derive(Debug)]
pub struct ContractBuilder {
    name: String,
    version: String,
    routes: Vec<Route>,
}

impl ContractBuilder {
    /// Creates a new contract builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.0.0".to_string(),
            routes: Vec::new(),
        }
    }

    /// Sets the contract version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds a route to the contract.
    #[must_use]
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Adds multiple routes to the contract.
    #[must_use]
    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Builds the contract.
    #[must_use]
    pub fn build(self) -> Contract {
        let mut contract = Contract {
            name: self.name,
            version: self.version,
            routes: self.routes,
            route_index: HashMap::new(),
        };
        contract.rebuild_index();
        contract
    }
}

/// A route template and the operations declared on it.
///
/// Templates use `{name}`-style placeholders: `/pets/{PetName}`. The template
/// is parsed into segments once at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RouteData")]
pub struct Route {
    /// The route template, e.g. `/pets/{PetName}/photos/{ID}`.
    template: String,
    /// Parsed template segments.
    #[serde(skip)]
    segments: Vec<PathSegment>,
    /// Operations declared on this route, at most one per verb.
    operations: Vec<Operation>,
}

impl Route {
    /// Creates a new route builder for the given template.
    #[must_use]
    pub fn builder(template: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(template)
    }

    /// Returns the route template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns all operations declared on this route.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the operation declared for the given verb, if any.
    #[must_use]
    pub fn operation(&self, method: &Method) -> Option<&Operation> {
        self.operations.iter().find(|op| op.method() == method)
    }

    /// Returns `true` when this route addresses a single resource.
    ///
    /// A route whose final segment is a parameter (`/pets/{PetName}`)
    /// identifies one resource; otherwise the route addresses the whole
    /// collection (`/pets`).
    #[must_use]
    pub fn is_resource(&self) -> bool {
        matches!(self.segments.last(), Some(PathSegment::Parameter(_)))
    }

    /// Returns the parameter names in template order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|seg| match seg {
            PathSegment::Parameter(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }

    /// Renders the concrete request path by substituting captured values.
    ///
    /// `lookup` resolves a parameter name to its captured raw value. A
    /// parameter with no capture renders as its placeholder, leaving the
    /// template recognizable in logs.
    #[must_use]
    pub fn render_path<'a>(&self, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                PathSegment::Literal(lit) => path.push_str(lit),
                PathSegment::Parameter(name) => match lookup(name) {
                    Some(value) => path.push_str(value),
                    None => {
                        path.push('{');
                        path.push_str(name);
                        path.push('}');
                    }
                },
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }

    /// Parses a route template into segments.
    fn parse_template(template: &str) -> Vec<PathSegment> {
        template
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                if segment.starts_with('{') && segment.ends_with('}') {
                    PathSegment::Parameter(segment[1..segment.len() - 1].to_string())
                } else {
                    PathSegment::Literal(segment.to_string())
                }
            })
            .collect()
    }
}

/// Builder for creating [`Route`] instances.
#[derive(Debug)]
pub struct RouteBuilder {
    template: String,
    operations: Vec<Operation>,
}

impl RouteBuilder {
    /// Creates a new route builder.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            operations: Vec::new(),
        }
    }

    /// Adds an operation to the route.
    ///
    /// Declaring two operations for the same verb keeps the first; the route
    /// lookup never reaches the duplicate.
    #[must_use]
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Builds the route.
    #[must_use]
    pub fn build(self) -> Route {
        let segments = Route::parse_template(&self.template);
        Route {
            template: self.template,
            segments,
            operations: self.operations,
        }
    }
}

/// Serde shadow for [`Route`]; reparses template segments on deserialize.
#[derive(Deserialize)]
struct RouteData {
    template: String,
    operations: Vec<Operation>,
}

impl From<RouteData> for Route {
    fn from(data: RouteData) -> Self {
        let segments = Route::parse_template(&data.template);
        Self {
            template: data.template,
            segments,
            operations: data.operations,
        }
    }
}

/// A path segment in a route template.
#[derive(Debug, Clone)]
enum PathSegment {
    /// A literal segment (e.g. `pets`).
    Literal(String),
    /// A `{name}` placeholder segment.
    Parameter(String),
}

/// One operation (verb) declared on a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// HTTP verb for this operation.
    #[serde(with = "http_method_serde")]
    method: Method,
    /// Ordered parameter declarations.
    parameters: Vec<ParameterDecl>,
    /// Response declarations, at most one per status plus one default.
    responses: Vec<ResponseDecl>,
}

impl Operation {
    /// Creates a new operation builder for the given verb.
    #[must_use]
    pub fn builder(method: Method) -> OperationBuilder {
        OperationBuilder::new(method)
    }

    /// Returns the HTTP verb.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the ordered parameter declarations.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDecl] {
        &self.parameters
    }

    /// Looks up a parameter declaration by location and name.
    ///
    /// Parameter names are unique per location within one operation, so the
    /// first match is the only match.
    #[must_use]
    pub fn parameter(&self, location: ParamLocation, name: &str) -> Option<&ParameterDecl> {
        self.parameters
            .iter()
            .find(|p| p.location() == location && p.name() == name)
    }

    /// Looks up a `path`-location parameter declaration by name.
    #[must_use]
    pub fn path_parameter(&self, name: &str) -> Option<&ParameterDecl> {
        self.parameter(ParamLocation::Path, name)
    }

    /// Returns the `body`-location parameter declaration, if any.
    #[must_use]
    pub fn body_parameter(&self) -> Option<&ParameterDecl> {
        self.parameters
            .iter()
            .find(|p| p.location() == ParamLocation::Body)
    }

    /// Returns all response declarations.
    #[must_use]
    pub fn responses(&self) -> &[ResponseDecl] {
        &self.responses
    }

    /// Returns the response declaration the mock engine shapes against.
    ///
    /// The lowest declared 2xx/3xx status wins; the `default` declaration is
    /// the fallback when no success status is declared.
    #[must_use]
    pub fn success_response(&self) -> Option<&ResponseDecl> {
        self.responses
            .iter()
            .filter(|r| matches!(r.status(), Some(code) if (200..400).contains(&code)))
            .min_by_key(|r| r.status())
            .or_else(|| self.responses.iter().find(|r| r.status().is_none()))
    }
}

/// Builder for creating [`Operation`] instances.
#[derive(Debug)]
pub struct OperationBuilder {
    method: Method,
    parameters: Vec<ParameterDecl>,
    responses: Vec<ResponseDecl>,
}

impl OperationBuilder {
    /// Creates a new operation builder.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            parameters: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// Adds a parameter declaration.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds multiple parameter declarations.
    #[must_use]
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = ParameterDecl>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Adds a response declaration.
    #[must_use]
    pub fn response(mut self, response: ResponseDecl) -> Self {
        self.responses.push(response);
        self
    }

    /// Builds the operation.
    #[must_use]
    pub fn build(self) -> Operation {
        Operation {
            method: self.method,
            parameters: self.parameters,
            responses: self.responses,
        }
    }
}

/// Where a declared parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamLocation {
    /// A `{name}` path segment.
    Path,
    /// The query string.
    Query,
    /// An HTTP header.
    Header,
    /// A decoded multipart form field.
    FormData,
    /// The request body.
    Body,
}

impl std::fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::FormData => write!(f, "formData"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// The semantic kind of a declared parameter.
///
/// Collapses the wire-side `type`/`format` string pair into one tagged
/// variant, resolved once at contract build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    /// `string` with no format: identity conversion.
    String,
    /// `string`/`byte`: base64-encoded bytes.
    Byte,
    /// `string`/`date`: ISO-8601 calendar date.
    Date,
    /// `string`/`date-time`: ISO-8601 timestamp with offset.
    DateTime,
    /// `integer` (any integer format): base-10 whole number.
    Integer,
    /// `number` (any float format): decimal literal.
    Number,
    /// `boolean`: case-sensitive `true`/`false`.
    Boolean,
}

impl ParamKind {
    /// Resolves a wire-side `type`/`format` pair into a kind.
    ///
    /// Unknown types yield `None`, which downstream code treats as "no type
    /// info declared" (the raw string passes through untouched). Unknown
    /// formats on a known type fall back to the type's bare kind.
    #[must_use]
    pub fn from_type_format(ty: &str, format: Option<&str>) -> Option<Self> {
        match ty {
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "string" => Some(match format {
                Some("byte") => Self::Byte,
                Some("date") => Self::Date,
                Some("date-time") => Self::DateTime,
                _ => Self::String,
            }),
            _ => None,
        }
    }

    /// Returns the human-readable kind used in coercion error messages.
    #[must_use]
    pub const fn expected(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Byte => "base64 string",
            Self::Date => "date",
            Self::DateTime => "date & time",
            Self::Integer => "whole number",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// A declared request parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// Parameter name as it appears in the template or request.
    name: String,
    /// Where the parameter is carried.
    location: ParamLocation,
    /// Semantic kind; `None` means no type info was declared.
    kind: Option<ParamKind>,
    /// Whether the parameter must be present.
    required: bool,
    /// Declared default value, used when an optional parameter is absent.
    default: Option<serde_json::Value>,
}

impl ParameterDecl {
    /// Creates a declaration for the given name and location.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParamLocation) -> Self {
        Self {
            name: name.into(),
            location,
            kind: None,
            required: false,
            default: None,
        }
    }

    /// Creates a `path`-location declaration (always required).
    #[must_use]
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Path).required()
    }

    /// Creates a `body`-location declaration.
    #[must_use]
    pub fn body(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Body)
    }

    /// Sets the semantic kind.
    #[must_use]
    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Marks the parameter as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the parameter as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the declared default value.
    #[must_use]
    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter location.
    #[must_use]
    pub fn location(&self) -> ParamLocation {
        self.location
    }

    /// Returns the semantic kind, if type info was declared.
    #[must_use]
    pub fn param_kind(&self) -> Option<ParamKind> {
        self.kind
    }

    /// Returns whether the parameter is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the declared default value, if any.
    #[must_use]
    pub fn default_value_ref(&self) -> Option<&serde_json::Value> {
        self.default.as_ref()
    }
}

/// The declared shape of a response body.
///
/// Drives output encoding via exhaustive match, independent of how the data
/// happens to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseSchema {
    /// Structured data returned as-is.
    Object,
    /// The whole ordered collection.
    Array,
    /// A plain string.
    String,
    /// A decimal number.
    Number,
    /// A whole number.
    Integer,
    /// A boolean.
    Boolean,
    /// A calendar date, rendered canonical ISO-8601.
    Date,
    /// A timestamp, rendered canonical ISO-8601.
    DateTime,
    /// A binary payload.
    File,
}

impl ResponseSchema {
    /// Resolves a wire-side `type`/`format` pair into a response schema.
    #[must_use]
    pub fn from_type_format(ty: &str, format: Option<&str>) -> Option<Self> {
        match ty {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "file" => Some(Self::File),
            "string" => Some(match format {
                Some("date") => Self::Date,
                Some("date-time") => Self::DateTime,
                _ => Self::String,
            }),
            _ => None,
        }
    }
}

/// A declared response for one status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDecl {
    /// Status code; `None` is the `default` declaration.
    status: Option<u16>,
    /// Declared body schema; `None` means the response has no body.
    schema: Option<ResponseSchema>,
    /// Declared response header names, lowercase.
    headers: Vec<String>,
}

impl ResponseDecl {
    /// Creates a declaration for a specific status code.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status: Some(status),
            schema: None,
            headers: Vec::new(),
        }
    }

    /// Creates the `default` declaration.
    #[must_use]
    pub fn default_response() -> Self {
        Self {
            status: None,
            schema: None,
            headers: Vec::new(),
        }
    }

    /// Sets the declared body schema.
    #[must_use]
    pub fn schema(mut self, schema: ResponseSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Declares a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>) -> Self {
        self.headers.push(name.into().to_ascii_lowercase());
        self
    }

    /// Returns the status code (`None` for the `default` declaration).
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the declared body schema, if any.
    #[must_use]
    pub fn body_schema(&self) -> Option<ResponseSchema> {
        self.schema
    }

    /// Returns whether the given header name is declared (case-insensitive).
    #[must_use]
    pub fn declares_header(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Serde support for HTTP methods.
mod http_method_serde {
    use http::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(method: &Method, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Method, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
