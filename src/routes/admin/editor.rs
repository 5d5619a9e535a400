use crate::domain::{BlogPost, BlogPostStatus};
use crate::routes::blog::queries;
use crate::routes::constants::DASHBOARD_PATH;
use crate::routes::site::{HeadExtras, page};
use crate::startup::AppState;
use ammonia::clean_text;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use uuid::Uuid;

/// Talks to the JSON admin API. Existing posts auto-save on every change;
/// new posts get a slug suggestion until the slug field is edited by hand.
/// The preview tab shows the content as readers will get it after sanitizing.
const EDITOR_SCRIPT: &str = r#"<script>
(() => {
  const form = document.getElementById("editor");
  const postId = form.dataset.postId || null;
  const status = document.getElementById("editor-status");
  const list = (value) => value.split(",").map((v) => v.trim()).filter((v) => v.length > 0);
  const readForm = () => {
    const data = Object.fromEntries(new FormData(form).entries());
    data.tags = list(data.tags || "");
    data.seo_keywords = list(data.seo_keywords || "");
    data.read_time_minutes = data.read_time_minutes ? Number(data.read_time_minutes) : null;
    return data;
  };
  const send = (method, url, body) => fetch(url, {
    method,
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  const refreshSeo = async () => {
    const data = readForm();
    const response = await send("POST", "/api/admin/blog/seo-check", {
      seo_title: data.seo_title, meta_description: data.meta_description,
      seo_keywords: data.seo_keywords, featured_image_alt: data.featured_image_alt,
      slug: data.slug, content: data.content,
    });
    if (!response.ok) return;
    const report = await response.json();
    document.getElementById("seo-score").textContent = report.score;
    document.getElementById("seo-checks").innerHTML = "";
    for (const check of report.checks) {
      const item = document.createElement("li");
      item.className = "seo-" + check.outcome;
      item.textContent = check.label + ": " + check.detail;
      document.getElementById("seo-checks").appendChild(item);
    }
  };
  let slugTouched = postId !== null;
  form.slug.addEventListener("input", () => { slugTouched = true; });
  form.title.addEventListener("input", async () => {
    if (slugTouched) return;
    const response = await fetch("/api/admin/blog/slug?" + new URLSearchParams({ title: form.title.value }));
    if (response.ok) form.slug.value = (await response.json()).slug;
  });
  form.addEventListener("input", () => {
    refreshSeo();
    if (postId) send("PUT", `/api/admin/blog/posts/${postId}/autosave`, readForm());
  });
  const preview = document.getElementById("preview");
  const showTab = (tab) => {
    document.getElementById("content").hidden = tab !== "edit";
    preview.hidden = tab !== "preview";
    for (const button of document.querySelectorAll("[data-tab]")) {
      button.setAttribute("aria-selected", String(button.dataset.tab === tab));
    }
  };
  document.getElementById("tab-edit").addEventListener("click", () => showTab("edit"));
  document.getElementById("tab-preview").addEventListener("click", async () => {
    const response = await send("POST", "/api/admin/blog/preview", { content: form.content.value });
    const result = await response.json();
    if (!response.ok) { status.textContent = result.error; return; }
    preview.innerHTML = result.html;
    document.getElementById("preview-read-time").textContent =
      `Lesezeit ca. ${result.read_time_minutes_hint} Min.`;
    showTab("preview");
  });
  document.getElementById("image-upload").addEventListener("change", async (event) => {
    const body = new FormData();
    body.append("file", event.target.files[0]);
    const response = await fetch("/api/admin/blog/images", { method: "POST", body });
    const result = await response.json();
    if (response.ok) form.featured_image_url.value = result.url;
    else status.textContent = result.error;
  });
  form.addEventListener("submit", async (event) => {
    event.preventDefault();
    const response = postId
      ? await send("PUT", `/api/admin/blog/posts/${postId}`, readForm())
      : await send("POST", "/api/admin/blog/posts", readForm());
    const result = await response.json();
    if (!response.ok) { status.textContent = result.error; return; }
    if (!postId) { window.location = `/admin/editor/${result.id}`; return; }
    status.textContent = "Gespeichert.";
  });
  refreshSeo();
})();
</script>"#;

fn text_input(label: &str, name: &str, value: Option<&str>) -> String {
    format!(
        r#"<label for="{name}">{label}</label>
    <input id="{name}" name="{name}" value="{}">"#,
        clean_text(value.unwrap_or_default())
    )
}

pub fn render_editor(post: Option<&BlogPost>) -> String {
    let heading = if post.is_some() {
        "Beitrag bearbeiten"
    } else {
        "Neuer Beitrag"
    };
    let post_id = post.map(|p| p.id.to_string()).unwrap_or_default();
    let status = post.map_or(BlogPostStatus::Draft, |p| p.status);
    let field = |f: fn(&BlogPost) -> Option<&str>| post.and_then(f);
    let joined = |f: fn(&BlogPost) -> &Vec<String>| post.map(|p| f(p).join(", "));
    let option = |value: BlogPostStatus, label: &str| {
        let selected = if value == status { " selected" } else { "" };
        format!(r#"<option value="{}"{selected}>{label}</option>"#, value.as_str())
    };

    let fields = [
        text_input("Titel", "title", field(|p| Some(p.title.as_str()))),
        text_input("Slug", "slug", field(|p| Some(p.slug.as_str()))),
        text_input("Autor", "author", field(|p| p.author.as_deref())),
        text_input("Auszug", "excerpt", field(|p| p.excerpt.as_deref())),
        text_input("Tags (kommagetrennt)", "tags", joined(|p| &p.tags).as_deref()),
        text_input("SEO-Titel", "seo_title", field(|p| p.seo_title.as_deref())),
        text_input(
            "Meta Description",
            "meta_description",
            field(|p| p.meta_description.as_deref()),
        ),
        text_input(
            "SEO-Keywords (kommagetrennt)",
            "seo_keywords",
            joined(|p| &p.seo_keywords).as_deref(),
        ),
        text_input(
            "Canonical URL",
            "canonical_url",
            field(|p| p.canonical_url.as_deref()),
        ),
        text_input(
            "Beitragsbild URL",
            "featured_image_url",
            field(|p| p.featured_image_url.as_deref()),
        ),
        text_input(
            "Alt-Text Beitragsbild",
            "featured_image_alt",
            field(|p| p.featured_image_alt.as_deref()),
        ),
        text_input("SEO Bild-Tag", "seo_image_tag", field(|p| p.seo_image_tag.as_deref())),
        text_input(
            "Lesezeit (Minuten)",
            "read_time_minutes",
            post.and_then(|p| p.read_time_minutes)
                .map(|m| m.to_string())
                .as_deref(),
        ),
    ]
    .join("\n    ");

    page(
        &format!("{} | Admin", heading),
        "Redaktionsbereich",
        &HeadExtras {
            noindex: true,
            ..Default::default()
        },
        &format!(
            r#"<section class="editor">
  <h1>{heading}</h1>
  <p><a href="/admin/dashboard">Zurück zum Dashboard</a></p>
  <form id="editor" data-post-id="{post_id}">
    {fields}
    <label for="image-upload">Bild hochladen</label>
    <input id="image-upload" type="file" accept="image/*">
    <label for="content">Inhalt</label>
    <div class="tabs" role="tablist">
      <button type="button" id="tab-edit" role="tab" data-tab="edit" aria-selected="true">Bearbeiten</button>
      <button type="button" id="tab-preview" role="tab" data-tab="preview" aria-selected="false">Vorschau</button>
    </div>
    <textarea id="content" name="content" rows="20">{content}</textarea>
    <article id="preview" class="post-content" hidden></article>
    <p id="preview-read-time"></p>
    <label for="status">Status</label>
    <select id="status" name="status">{draft}{published}</select>
    <button type="submit">Speichern</button>
    <p id="editor-status" role="status"></p>
  </form>
  <aside class="seo">
    <h2>SEO-Check <span id="seo-score"></span></h2>
    <ul id="seo-checks"></ul>
  </aside>
</section>
{EDITOR_SCRIPT}"#,
            content = clean_text(post.map(|p| p.content.as_str()).unwrap_or_default()),
            draft = option(BlogPostStatus::Draft, "Entwurf"),
            published = option(BlogPostStatus::Published, "Veröffentlicht"),
        ),
    )
}

pub async fn new_post_editor() -> Html<String> {
    Html(render_editor(None))
}

/// Unknown ids and load failures send the editor back to the dashboard.
#[tracing::instrument(name = "Render post editor", skip(state))]
pub async fn edit_post_editor(State(state): State<AppState>, Path(post_id): Path<Uuid>) -> Response {
    match queries::get_post_by_id(&state.db, post_id).await {
        Ok(Some(post)) => Html(render_editor(Some(&post))).into_response(),
        Ok(None) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to load post for editing");
            Redirect::to(DASHBOARD_PATH).into_response()
        }
    }
}
