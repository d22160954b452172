//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Planner API",
        version = "0.1.0",
        description = "Plan weddings and other events: budgets, checklists, guests and supplier payments",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3500", description = "Local development server")
    ),
    nest(
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    tags(
        (name = "Users", description = "Signup and profile endpoints"),
        (name = "Events", description = "Event planning endpoints, JWT protected")
    )
)]
pub struct ApiDoc;
