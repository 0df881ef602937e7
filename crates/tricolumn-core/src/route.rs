//! Navigation events and route classification.
//!
//! The router is an external collaborator. It reports pattern matches as
//! [`NavigationEvent`]s carrying the route name and the extracted string
//! parameters; [`NavigationEvent::classify`] turns those into a typed
//! [`RouteMatch`] the layout state machine can act on.

use std::{collections::BTreeMap, fmt, time::SystemTime};

use thiserror::Error;

/// Parameter carrying the object identifier on `object` and `product` routes.
pub const OBJECT_ID: &str = "objectId";

/// Parameter carrying the product identifier on the `product` route.
pub const PRODUCT_ID: &str = "productId";

/// Named route patterns known to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    /// List-only view.
    List,
    /// List plus the object detail.
    Object,
    /// Sub-detail for one product of an object.
    Product,
}

impl RouteName {
    /// Pattern name as registered with the router.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Object => "object",
            Self::Product => "product",
        }
    }

    /// Look up a route by its pattern name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "list" => Some(Self::List),
            "object" => Some(Self::Object),
            "product" => Some(Self::Product),
            _ => None,
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while classifying a navigation event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The router reported a pattern the shell does not know.
    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    /// A required parameter was not part of the match.
    #[error("route '{route}' matched without parameter '{name}'")]
    MissingParameter {
        /// Route that matched
        route: RouteName,
        /// Name of the missing parameter
        name: &'static str,
    },

    /// A required parameter was present but empty.
    #[error("route '{route}' matched with empty parameter '{name}'")]
    EmptyParameter {
        /// Route that matched
        route: RouteName,
        /// Name of the empty parameter
        name: &'static str,
    },
}

/// Typed result of classifying a [`NavigationEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// The list route matched.
    List,
    /// The object route matched.
    Object {
        /// Identifier of the object to show.
        object_id: String,
    },
    /// The product route matched.
    Product {
        /// Identifier of the owning object.
        object_id: String,
        /// Identifier of the product to show.
        product_id: String,
    },
    /// No pattern matched.
    Bypassed,
}

/// A route match (or bypass) reported by the router.
///
/// Consumed once by the shell, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    /// Matched pattern name; `None` when no pattern matched.
    pub route_name: Option<String>,
    /// Parameters extracted from the URL.
    pub parameters: BTreeMap<String, String>,
    /// When the router reported the match.
    pub timestamp: SystemTime,
}

impl NavigationEvent {
    /// A match of `route_name` with the given parameters, stamped now.
    pub fn matched<I, K, V>(route_name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            route_name: Some(route_name.into()),
            parameters: parameters.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            timestamp: SystemTime::now(),
        }
    }

    /// The router found no matching pattern.
    pub fn bypassed() -> Self {
        Self { route_name: None, parameters: BTreeMap::new(), timestamp: SystemTime::now() }
    }

    /// Classify this event into a [`RouteMatch`].
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] for unknown route names and for object or
    /// product matches lacking their identifiers.
    pub fn classify(&self) -> Result<RouteMatch, RouteError> {
        let Some(name) = self.route_name.as_deref() else {
            return Ok(RouteMatch::Bypassed);
        };

        let route =
            RouteName::from_name(name).ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;

        match route {
            RouteName::List => Ok(RouteMatch::List),
            RouteName::Object => Ok(RouteMatch::Object { object_id: self.param(route, OBJECT_ID)? }),
            RouteName::Product => Ok(RouteMatch::Product {
                object_id: self.param(route, OBJECT_ID)?,
                product_id: self.param(route, PRODUCT_ID)?,
            }),
        }
    }

    fn param(&self, route: RouteName, name: &'static str) -> Result<String, RouteError> {
        let value =
            self.parameters.get(name).ok_or(RouteError::MissingParameter { route, name })?;

        if value.trim().is_empty() {
            return Err(RouteError::EmptyParameter { route, name });
        }

        Ok(value.clone())
    }
}

/// A navigation the shell asks the router to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Target route.
    pub route: RouteName,
    /// Route parameters.
    pub params: BTreeMap<String, String>,
    /// Replace the current history entry instead of pushing a new one.
    pub replace_history: bool,
}

impl NavigationRequest {
    /// Navigate to the list route, pushing a history entry.
    pub fn to_list() -> Self {
        Self { route: RouteName::List, params: BTreeMap::new(), replace_history: false }
    }

    /// Navigate to the list route, replacing the current history entry.
    pub fn to_list_replacing() -> Self {
        Self { replace_history: true, ..Self::to_list() }
    }

    /// Navigate to the object route for `object_id`.
    pub fn to_object(object_id: impl Into<String>, replace_history: bool) -> Self {
        let params = BTreeMap::from([(OBJECT_ID.to_string(), object_id.into())]);
        Self { route: RouteName::Object, params, replace_history }
    }

    /// Navigate to the product route, pushing a history entry.
    pub fn to_product(object_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        let params = BTreeMap::from([
            (OBJECT_ID.to_string(), object_id.into()),
            (PRODUCT_ID.to_string(), product_id.into()),
        ]);
        Self { route: RouteName::Product, params, replace_history: false }
    }
}
