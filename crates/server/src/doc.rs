use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation, paths are collected from the routers
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    components(schemas(crate::error::ErrorBody)),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration and authentication"),
        (name = "Courses", description = "Course catalogue"),
        (name = "Favorites", description = "Favorite courses of the authenticated user"),
        (name = "Tickets", description = "Course enrollment"),
    ),
    info(
        title = "Courses API",
        version = "1.0.0",
        description = "Online courses marketplace API",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
