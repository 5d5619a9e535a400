mod contact;
mod layout;

pub use contact::*;
pub use layout::{HeadExtras, page};

use crate::startup::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;

const HOME_BODY: &str = include_str!("../../../templates/home.html");
const IMPRESSUM_BODY: &str = include_str!("../../../templates/impressum.html");
const DATENSCHUTZ_BODY: &str = include_str!("../../../templates/datenschutz.html");
const NOT_FOUND_BODY: &str = include_str!("../../../templates/not_found.html");

/// The form posts straight to the relay, so it works without JavaScript.
pub fn render_home(form_action: &str) -> String {
    let body = HOME_BODY.replace(
        "{{form_action}}",
        &ammonia::clean_text(form_action),
    );
    page(
        "KFZ-Teile Hennes Westermann | Autoteile in Altenberge",
        "Hochwertige KFZ-Ersatzteile und Autoteile für Privatkunden und Werkstätten im Münsterland.",
        &HeadExtras::default(),
        &body,
    )
}

pub async fn home(State(state): State<AppState>) -> Html<String> {
    Html(render_home(&state.form_action))
}

pub async fn impressum() -> Html<String> {
    Html(page(
        "Impressum | KFZ-Teile Hennes Westermann",
        "Anbieterkennzeichnung von KFZ-Teile Hennes Westermann, Altenberge.",
        &HeadExtras::default(),
        IMPRESSUM_BODY,
    ))
}

pub async fn datenschutz() -> Html<String> {
    Html(page(
        "Datenschutzerklärung | KFZ-Teile Hennes Westermann",
        "Informationen zur Verarbeitung personenbezogener Daten.",
        &HeadExtras::default(),
        DATENSCHUTZ_BODY,
    ))
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(page(
            "Seite nicht gefunden | KFZ-Teile Hennes Westermann",
            "Die angeforderte Seite existiert nicht.",
            &HeadExtras {
                noindex: true,
                ..Default::default()
            },
            NOT_FOUND_BODY,
        )),
    )
}

pub fn render_forbidden() -> String {
    page(
        "Kein Zugriff | KFZ-Teile Hennes Westermann",
        "Kein Zugriff.",
        &HeadExtras {
            noindex: true,
            ..Default::default()
        },
        r#"<section class="not-found">
  <h1>Kein Zugriff</h1>
  <p>Sie haben keine Berechtigung für den Admin-Bereich.</p>
  <a class="button" href="/">Zur Startseite</a>
</section>"#,
    )
}
