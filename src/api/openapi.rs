//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{account_handler, auth_handler, bot_handler};
use crate::domain::{Account, AccountInfo, AccountRole, Bot, BotPatch, NewBot};
use crate::services::{
    AuthResponse, BulkCreated, BulkDeleted, BulkModified, TokenResponse, VerifyResponse,
};
use crate::types::MessageResponse;

/// OpenAPI documentation for the CRUD API skeleton
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRUD API Skeleton",
        version = "0.1.0",
        description = "Account management, authentication and generic CRUD over bots",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::verify,
        auth_handler::forgot_password,
        auth_handler::reset_password,
        auth_handler::refresh_token,
        auth_handler::me,
        // Account endpoints
        account_handler::list_accounts,
        account_handler::get_account,
        account_handler::create_account,
        account_handler::update_account,
        account_handler::delete_account,
        // Bot endpoints
        bot_handler::list_bots,
        bot_handler::list_all_bots,
        bot_handler::get_bot,
        bot_handler::create_bot,
        bot_handler::update_bot,
        bot_handler::delete_bot,
        bot_handler::bulk_create_bots,
        bot_handler::bulk_update_bots,
        bot_handler::bulk_delete_bots,
    ),
    components(
        schemas(
            // Domain types
            Account,
            AccountInfo,
            AccountRole,
            Bot,
            NewBot,
            BotPatch,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::RegisterResponse,
            auth_handler::LoginRequest,
            auth_handler::VerifyRequest,
            auth_handler::ForgotPasswordRequest,
            auth_handler::ResetPasswordRequest,
            AuthResponse,
            TokenResponse,
            VerifyResponse,
            MessageResponse,
            // Account handler types
            account_handler::CreateAccountRequest,
            account_handler::UpdateAccountRequest,
            // Bot handler types
            bot_handler::BulkCreateRequest,
            bot_handler::BulkUpdateRequest,
            bot_handler::BulkDeleteRequest,
            bot_handler::BotUpdate,
            BulkCreated,
            BulkModified,
            BulkDeleted,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and account recovery"),
        (name = "Users", description = "Account administration"),
        (name = "Bots", description = "Bot management, single and bulk")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /auth/login or /auth/register"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes_and_security() {
        let doc = ApiDoc::openapi();
        for path in ["/auth/login", "/users/{id}", "/bots/bulk", "/bots/all"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
