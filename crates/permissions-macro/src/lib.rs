//! # Permissions Macro
//!
//! Procedural macros for team-scoped permission checks in Sirius service operations.
//! Supports the `#[with_permission(...)]` attribute for automatic permission validation.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input,
    Expr,
    Ident,
    ItemFn,
    Token,
};

/// Arguments for the with_permission macro
#[derive(Debug)]
enum PermissionMode {
    /// All specified permissions must be granted (AND logic)
    All(Vec<Expr>),
    /// At least one specified permission must be granted (OR logic)
    Any(Vec<Expr>),
}

impl Parse for PermissionMode {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        // Check if we have a mode specifier (all/any) followed by =
        if input.peek(Ident) && input.peek2(Token![=]) {
            let ident: Ident = input.parse()?;
            let mode_name = ident.to_string();
            input.parse::<Token![=]>()?; // consume the =

            match mode_name.as_str() {
                "all" => {
                    let permissions = parse_permission_list(input)?;
                    Ok(Self::All(permissions))
                },
                "any" => {
                    let permissions = parse_permission_list(input)?;
                    Ok(Self::Any(permissions))
                },
                _ => {
                    Err(syn::Error::new(
                        ident.span(),
                        "Expected 'all' or 'any' before '='",
                    ))
                },
            }
        }
        else {
            // No mode specifier, default to 'all' and parse permission list
            let permissions = parse_permission_list(input)?;
            Ok(Self::All(permissions))
        }
    }
}

/// Parses a comma-separated list of permission expressions from the token stream.
///
/// # Arguments
///
/// * `input` - The parse stream to read permission expressions from
///
/// # Returns
///
/// A vector of parsed `Expr` representing the permissions, or an error if parsing fails
fn parse_permission_list(input: ParseStream) -> syn::Result<Vec<Expr>> {
    let mut permissions = Vec::new();

    loop {
        if input.is_empty() {
            break;
        }

        let expr: Expr = input.parse()?;
        permissions.push(expr);

        if input.is_empty() {
            break;
        }

        input.parse::<Token![,]>()?;
    }

    if permissions.is_empty() {
        return Err(input.error("at least one permission is required"));
    }

    Ok(permissions)
}

/// Attribute macro for checking team-scoped permissions on service operations.
///
/// Injects the permission check at the top of the function body. The check
/// runs against the team the operation is scoped to.
///
/// # Requirements
///
/// The function must have in scope:
/// - `state: &AppState` - Contains the database connection for permission checks
/// - `user: &AuthenticatedUser` - Provides the acting user's ID
/// - `team_id: Uuid` - The team the permissions are scoped to
///
/// # Arguments
///
/// Accepts `Permission` values, usually built with `Permission::new(Action::.., ResourceType::..)`.
///
/// # Modes
///
/// - **all** (default): ALL permissions must be granted (AND logic)
/// - **any**: At least ONE permission must be granted (OR logic)
///
/// # Examples
///
/// ```ignore
/// use auth::permissions::{Action, Permission, ResourceType};
/// use permissions_macro::with_permission;
///
/// // Default mode (all)
/// #[with_permission(Permission::new(Action::Read, ResourceType::Class))]
/// pub async fn timetable(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<TimetableView> {
///     // ...
/// }
///
/// // 'any' mode - the detail page rule
/// #[with_permission(any =
///     Permission::new(Action::Read, ResourceType::Event),
///     Permission::new(Action::Update, ResourceType::Event),
///     Permission::new(Action::Delete, ResourceType::Event)
/// )]
/// pub async fn event_detail(state: &AppState, user: &AuthenticatedUser, team_id: Uuid, event_id: Uuid) -> Result<EventView> {
///     // ...
/// }
/// ```
///
/// # Generated Code
///
/// The macro generates code that:
/// 1. Collects the required permissions
/// 2. Instantiates a PermissionService from state.db
/// 3. Checks permissions according to the specified mode (all/any)
/// 4. Returns `Forbidden` if the requirements are not met, failing closed on database errors
#[proc_macro_attribute]
pub fn with_permission(args: TokenStream, input: TokenStream) -> TokenStream {
    let mode = parse_macro_input!(args as PermissionMode);
    let mut input_fn = parse_macro_input!(input as ItemFn);

    let permission_check = match mode {
        PermissionMode::All(permissions) => generate_all_permission_check(&permissions),
        PermissionMode::Any(permissions) => generate_any_permission_check(&permissions),
    };

    let original_block = input_fn.block;
    let new_block: syn::Block = match syn::parse2(quote! {
        {
            #permission_check
            #original_block
        }
    }) {
        Ok(block) => block,
        Err(err) => return err.to_compile_error().into(),
    };

    input_fn.block = Box::new(new_block);

    quote!(#input_fn).into()
}

/// Generate permission checking code for ALL mode (AND logic)
fn generate_all_permission_check(permissions: &[Expr]) -> proc_macro2::TokenStream {
    let permission_exprs = permissions.iter().map(|expr| quote! { #expr });

    quote! {
        let required_permissions: Vec<auth::permissions::Permission> = vec![
            #(#permission_exprs),*
        ];

        let permission_service = auth::permissions::PermissionService::new(state.db.clone());

        for perm in &required_permissions {
            match permission_service.check_permission(user.id, team_id, *perm).await {
                Ok(auth::permissions::PermissionCheckResult::Allowed) => {},
                Ok(denied) => {
                    return Err(error::AppError::forbidden(
                        format!("Permission {} denied in team {} ({})", perm, team_id, denied)
                    ));
                },
                Err(e) => {
                    tracing::error!(error = %e, "Failed to check permission");
                    return Err(error::AppError::internal("Permission check failed"));
                },
            }
        }
    }
}

/// Generate permission checking code for ANY mode (OR logic)
fn generate_any_permission_check(permissions: &[Expr]) -> proc_macro2::TokenStream {
    let permission_exprs = permissions.iter().map(|expr| quote! { #expr });

    quote! {
        let required_permissions: Vec<auth::permissions::Permission> = vec![
            #(#permission_exprs),*
        ];

        let permission_service = auth::permissions::PermissionService::new(state.db.clone());

        match permission_service.check_any_permission(user.id, team_id, &required_permissions).await {
            Ok(auth::permissions::PermissionCheckResult::Allowed) => {},
            Ok(denied) => {
                let names: Vec<String> = required_permissions.iter().map(|p| p.to_string()).collect();
                return Err(error::AppError::forbidden(
                    format!("None of [{}] granted in team {} ({})", names.join(", "), team_id, denied)
                ));
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to check permission");
                return Err(error::AppError::internal("Permission check failed"));
            },
        }
    }
}
