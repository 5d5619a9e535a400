use crate::routes;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KFZ-Teile Hennes Westermann",
        description = "Public blog, contact relay and editorial admin API"
    ),
    paths(
        routes::health_check::health_check,
        routes::blog::get_published_posts,
        routes::blog::get_post_by_slug,
        routes::auth::auth_state,
        routes::auth::signup,
        routes::auth::signin,
        routes::auth::signout,
        routes::initial_admin::initial_admin,
        routes::site::submit_contact_request,
        routes::admin::blog::admin_get_all_posts,
        routes::admin::blog::admin_get_post_by_id,
        routes::admin::blog::admin_create_post,
        routes::admin::blog::admin_update_post,
        routes::admin::blog::admin_delete_post,
        routes::admin::blog::admin_suggest_slug,
        routes::admin::blog::admin_seo_check,
        routes::admin::blog::admin_preview,
        routes::admin::blog::admin_autosave_post,
        routes::admin::blog::admin_upload_image,
        routes::admin::blog::admin_export_csv,
        routes::admin::users::admin_list_users,
        routes::admin::users::admin_grant_admin,
        routes::admin::users::admin_revoke_admin,
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "blog", description = "Published posts for readers"),
        (name = "auth", description = "Sign-up, sign-in and session state"),
        (name = "site", description = "Contact requests forwarded to the relay"),
        (name = "admin-blog", description = "Editorial post management"),
        (name = "admin-users", description = "Role management"),
    )
)]
pub struct ApiDoc;
