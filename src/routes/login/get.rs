use crate::flash_messages::IncomingFlashMessages;
use crate::routes::constants::DASHBOARD_PATH;
use crate::routes::site::{HeadExtras, page};
use crate::session_state::TypedSession;
use axum::response::{Html, IntoResponse, Redirect, Response};

pub async fn login_form(session: TypedSession, flash_messages: IncomingFlashMessages) -> Response {
    if let Ok(Some(_)) = session.get_user_id().await {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    let notices = flash_messages.to_html();
    Html(page(
        "Admin Login | KFZ-Teile Hennes Westermann",
        "Anmeldung für Redakteure.",
        &HeadExtras {
            noindex: true,
            ..Default::default()
        },
        &format!(
            r#"<section class="login">
  <h1>Admin Login</h1>
  {notices}
  <form action="/admin/login" method="post">
    <label for="email">E-Mail</label>
    <input id="email" type="email" name="email" required autocomplete="username">
    <label for="password">Passwort</label>
    <input id="password" type="password" name="password" required autocomplete="current-password">
    <button type="submit">Anmelden</button>
  </form>
</section>"#
        ),
    ))
    .into_response()
}
