use domain_users::{CreateUser, EditUser, EmailQuery, UserView};
use utoipa::OpenApi;

/// Schemas of the user endpoint. Paths depend on `USERS_BASE_PATH`, so only
/// components are published.
#[derive(OpenApi)]
#[openapi(
    info(title = "Accounts API", description = "User management"),
    components(schemas(CreateUser, EditUser, EmailQuery, UserView)),
    tags((name = "users", description = "Create, edit and look up users"))
)]
pub struct ApiDoc;
