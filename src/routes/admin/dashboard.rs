use crate::domain::{BlogPostStatus, BlogPostSummary};
use crate::flash_messages::{FlashMessageSender, IncomingFlashMessages};
use crate::routes::blog::queries;
use crate::routes::constants::DASHBOARD_PATH;
use crate::routes::site::{HeadExtras, page};
use crate::session_state::{SessionUser, TypedSession};
use crate::startup::AppState;
use ammonia::clean_text;
use axum::Extension;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::fmt::Write;
use uuid::Uuid;

fn admin_page(title: &str, body: &str) -> String {
    page(
        &format!("{} | Admin", title),
        "Redaktionsbereich",
        &HeadExtras {
            noindex: true,
            ..Default::default()
        },
        body,
    )
}

fn status_label(status: BlogPostStatus) -> &'static str {
    match status {
        BlogPostStatus::Draft => "Entwurf",
        BlogPostStatus::Published => "Veröffentlicht",
    }
}

pub fn render_dashboard(email: &str, posts: &[BlogPostSummary], notices: &str) -> String {
    let mut rows = String::new();
    for post in posts {
        let _ = write!(
            rows,
            r#"<tr>
  <td>{title}</td>
  <td><span class="status status-{status}">{label}</span></td>
  <td>{views}</td>
  <td>{created}</td>
  <td>
    <a href="/admin/editor/{id}">Bearbeiten</a>
    <a href="/admin/posts/{id}/delete">Löschen</a>
  </td>
</tr>
"#,
            title = clean_text(&post.title),
            status = post.status.as_str(),
            label = status_label(post.status),
            views = post.view_count,
            created = post.created_at.format("%d.%m.%Y"),
            id = post.id,
        );
    }
    if posts.is_empty() {
        rows.push_str(r#"<tr><td colspan="5">Noch keine Beiträge vorhanden.</td></tr>"#);
    }

    admin_page(
        "Dashboard",
        &format!(
            r#"<section class="dashboard">
  <h1>Dashboard</h1>
  <p>Angemeldet als {email}</p>
  {notices}
  <nav class="actions">
    <a class="button" href="/admin/editor">Neuer Beitrag</a>
    <a class="button" href="/api/admin/blog/export.csv">CSV exportieren</a>
    <form action="/admin/logout" method="post"><button type="submit">Abmelden</button></form>
  </nav>
  <table class="posts">
    <thead><tr><th>Titel</th><th>Status</th><th>Aufrufe</th><th>Erstellt am</th><th></th></tr></thead>
    <tbody>
{rows}    </tbody>
  </table>
</section>"#,
            email = clean_text(email),
        ),
    )
}

pub fn render_delete_confirmation(post_id: Uuid, title: &str) -> String {
    admin_page(
        "Beitrag löschen",
        &format!(
            r#"<section class="confirm">
  <h1>Beitrag löschen?</h1>
  <p>Soll der Beitrag „{title}“ wirklich gelöscht werden? Dies kann nicht rückgängig gemacht werden.</p>
  <form action="/admin/posts/{id}/delete" method="post">
    <button type="submit" class="danger">Löschen</button>
    <a href="/admin/dashboard">Abbrechen</a>
  </form>
</section>"#,
            title = clean_text(title),
            id = post_id,
        ),
    )
}

fn error_page(e: &anyhow::Error) -> Response {
    tracing::error!(error.cause_chain = ?e, "Failed to render admin page");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(admin_page(
            "Fehler",
            "<p>Fehler beim Laden der Beiträge.</p>",
        )),
    )
        .into_response()
}

#[tracing::instrument(name = "Admin dashboard", skip(state, user, flash_messages), fields(user_id = %user.user_id))]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    flash_messages: IncomingFlashMessages,
) -> Response {
    match queries::get_all_posts(&state.db).await {
        Ok(posts) => Html(render_dashboard(&user.email, &posts, &flash_messages.to_html()))
            .into_response(),
        Err(e) => error_page(&anyhow::Error::new(e)),
    }
}

#[tracing::instrument(name = "Confirm post deletion", skip(state))]
pub async fn confirm_delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Response {
    match queries::get_post_by_id(&state.db, post_id).await {
        Ok(Some(post)) => Html(render_delete_confirmation(post.id, &post.title)).into_response(),
        Ok(None) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(e) => error_page(&anyhow::Error::new(e)),
    }
}

/// Deletes and reports the outcome as a flash message on the dashboard.
#[tracing::instrument(name = "Delete post from dashboard", skip(state, session))]
pub async fn delete_post_and_redirect(
    State(state): State<AppState>,
    session: TypedSession,
    Path(post_id): Path<Uuid>,
) -> Redirect {
    state.autosave.remove(post_id);
    let flash = FlashMessageSender::new(session.0);
    let sent = match queries::delete_post(&state.db, post_id).await {
        Ok(result) if result.is_deleted => {
            flash
                .success(format!("Der Beitrag „{}“ wurde gelöscht.", result.title))
                .await
        }
        Ok(_) => flash.error("Der Beitrag existiert nicht mehr.").await,
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to delete post");
            flash.error("Fehler beim Löschen des Beitrags.").await
        }
    };
    if let Err(e) = sent {
        tracing::warn!(error.cause_chain = ?e, "Failed to store flash message");
    }
    Redirect::to(DASHBOARD_PATH)
}
