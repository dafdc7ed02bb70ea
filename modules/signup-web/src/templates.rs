//! Pure renderers from page state to markup. Nothing here touches the network
//! or a live document; every list render rebuilds its container from scratch.

use tokio::time::Instant;

use signup_common::{Activity, ActivityCatalog};

use crate::controller::LOAD_FAILED;
use crate::messages::MessageArea;
use crate::page::{ActivityDraft, EditForm, ListState, Page, SignupForm, ViewMode};

/// Element ids whose contents are re-rendered after every event.
pub const REGIONS: [&str; 6] = [
    "admin-message",
    "admin-login",
    "admin-panel",
    "activities-list",
    "signup-form",
    "message",
];

/// Render the full document for a freshly loaded page.
pub fn render_page(page: &Page, page_id: &str, now: Instant) -> String {
    let content = format!(
        r#"<div id="app" data-page="{page_id}">
<header class="header"><h1>Activity Sign-up</h1></header>
<main class="container">
    <section id="admin-section" class="card">
        <h3>Administration</h3>
        <div id="admin-message">{admin_message}</div>
        <div id="admin-login">{login}</div>
        <div id="admin-panel">{panel}</div>
    </section>
    <section id="activities-container" class="card">
        <h3>Available Activities</h3>
        <div id="activities-list">{public_list}</div>
    </section>
    <section id="signup-container" class="card">
        <h3>Sign Up for an Activity</h3>
        <div id="signup-form">{signup}</div>
        <div id="message">{message}</div>
    </section>
</main>
</div>"#,
        page_id = html_escape(page_id),
        admin_message = render_message(&page.admin_message, now),
        login = render_login(page),
        panel = render_admin_panel(page),
        public_list = render_public_list(page),
        signup = render_signup_form(&page.signup_form, &page.activity_options),
        message = render_message(&page.message, now),
    );

    build_page("Activities", &content)
}

/// Inner HTML of every region, keyed by element id.
pub fn render_regions(page: &Page, now: Instant) -> Vec<(&'static str, String)> {
    REGIONS
        .iter()
        .map(|&id| {
            let html = match id {
                "admin-message" => render_message(&page.admin_message, now),
                "admin-login" => render_login(page),
                "admin-panel" => render_admin_panel(page),
                "activities-list" => render_public_list(page),
                "signup-form" => render_signup_form(&page.signup_form, &page.activity_options),
                _ => render_message(&page.message, now),
            };
            (id, html)
        })
        .collect()
}

// --- Lists ---

/// One card per activity, in catalog order.
pub fn render_catalog(catalog: &ActivityCatalog, mode: ViewMode) -> String {
    render_catalog_with(catalog, mode, None)
}

/// Render a list container from its state. `editing` places the edit form
/// before the card it replaces and hides that card.
pub fn render_list(state: &ListState, mode: ViewMode, editing: Option<&EditForm>) -> String {
    match state {
        ListState::Loading => r#"<p class="loading">Loading activities...</p>"#.to_string(),
        ListState::Failed => format!(r#"<p class="load-failed">{LOAD_FAILED}</p>"#),
        ListState::Loaded(catalog) if catalog.is_empty() => {
            r#"<p class="empty">No activities yet.</p>"#.to_string()
        }
        ListState::Loaded(catalog) => render_catalog_with(catalog, mode, editing),
    }
}

fn render_catalog_with(
    catalog: &ActivityCatalog,
    mode: ViewMode,
    editing: Option<&EditForm>,
) -> String {
    let mut html = String::new();
    for (name, activity) in catalog.iter() {
        let edit = editing.filter(|e| e.activity == name);
        if let Some(edit) = edit {
            html.push_str(&render_edit_form(edit));
        }
        html.push_str(&render_activity_card(name, activity, mode, edit.is_some()));
    }
    html
}

fn render_public_list(page: &Page) -> String {
    render_list(&page.public_list, ViewMode::Public, None)
}

fn render_admin_list(page: &Page) -> String {
    let create = page
        .create_form
        .as_ref()
        .map(render_create_form)
        .unwrap_or_default();
    let list = render_list(&page.admin_list, ViewMode::Admin, page.edit_form.as_ref());
    format!("{create}{list}")
}

// --- Cards ---

pub fn render_activity_card(name: &str, activity: &Activity, mode: ViewMode, hidden: bool) -> String {
    let actions = if mode.is_admin() {
        format!(
            r#"<div class="activity-actions"><button type="button" class="edit-btn" data-action="edit" data-activity="{n}">Edit</button><button type="button" class="delete-activity-btn" data-action="delete-activity" data-activity="{n}" data-confirm="Delete this activity? This cannot be undone.">Delete</button></div>"#,
            n = html_escape(name),
        )
    } else {
        String::new()
    };
    let hidden = if hidden { " hidden" } else { "" };

    format!(
        r#"<div class="activity-card"{hidden}>
    {actions}
    <h4>{name}</h4>
    <p>{description}</p>
    <p><strong>Schedule:</strong> {schedule}</p>
    <p><strong>Spots left:</strong> <span class="spots-left">{spots}</span></p>
    <div class="participants-container">{participants}</div>
</div>"#,
        name = html_escape(name),
        description = html_escape(&activity.description),
        schedule = html_escape(&activity.schedule),
        spots = activity.spots_left(),
        participants = render_participants(name, activity, mode),
    )
}

/// Participant roster, or the placeholder when nobody has signed up.
pub fn render_participants(name: &str, activity: &Activity, mode: ViewMode) -> String {
    if !activity.has_participants() {
        return r#"<p class="no-participants"><em>No participants yet</em></p>"#.to_string();
    }

    let items: String = activity
        .participants
        .iter()
        .map(|email| {
            let remove = if mode.is_admin() {
                format!(
                    r#"<button type="button" class="delete-btn" data-action="unregister" data-activity="{}" data-email="{}" title="Remove participant">&#x274C;</button>"#,
                    html_escape(name),
                    html_escape(email),
                )
            } else {
                String::new()
            };
            format!(
                r#"<li><span class="participant-email">{}</span>{remove}</li>"#,
                html_escape(email)
            )
        })
        .collect::<Vec<_>>()
        .join("");

    format!(
        r#"<div class="participants-section"><h5>Participants:</h5><ul class="participants-list">{items}</ul></div>"#
    )
}

// --- Forms ---

pub fn render_activity_options(names: &[String], selected: &str) -> String {
    let mut html = String::from(r#"<option value="">-- Select an activity --</option>"#);
    for name in names {
        let sel = if name == selected { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{n}"{sel}>{n}</option>"#,
            n = html_escape(name)
        ));
    }
    html
}

fn render_signup_form(form: &SignupForm, options: &[String]) -> String {
    format!(
        r#"<form id="signup" data-action="signup">
    <div class="form-group">
        <label for="email">Email:</label>
        <input type="email" id="email" name="email" value="{email}" required placeholder="your-email@example.com">
    </div>
    <div class="form-group">
        <label for="activity">Activity:</label>
        <select id="activity" name="activity" required>{options}</select>
    </div>
    <button type="submit">Sign Up</button>
</form>"#,
        email = html_escape(&form.email),
        options = render_activity_options(options, &form.activity),
    )
}

fn render_login(page: &Page) -> String {
    if !page.login_visible {
        return String::new();
    }
    format!(
        r#"<form id="admin-login-form" data-action="login">
    <div class="form-group">
        <label for="admin-username">Username:</label>
        <input type="text" id="admin-username" name="username" value="{}" required>
    </div>
    <div class="form-group">
        <label for="admin-password">Password:</label>
        <input type="password" id="admin-password" name="password" required>
    </div>
    <button type="submit">Log In</button>
</form>"#,
        html_escape(&page.login_username)
    )
}

fn render_admin_panel(page: &Page) -> String {
    if !page.admin_panel_visible {
        return String::new();
    }
    format!(
        r#"<button type="button" id="add-activity" data-action="open-create-form">Add Activity</button>
<div id="admin-activities-list">{}</div>"#,
        render_admin_list(page)
    )
}

pub fn render_create_form(draft: &ActivityDraft) -> String {
    format!(
        r#"<form class="activity-form" data-action="create-activity">
    <h4>New Activity</h4>
    <div class="form-group">
        <label for="activity-name">Name:</label>
        <input type="text" id="activity-name" name="name" value="{name}" required>
    </div>
    <div class="form-group">
        <label for="activity-description">Description:</label>
        <textarea id="activity-description" name="description" required>{description}</textarea>
    </div>
    <div class="form-group">
        <label for="activity-schedule">Schedule:</label>
        <input type="text" id="activity-schedule" name="schedule" value="{schedule}" required>
    </div>
    <div class="form-group">
        <label for="activity-max">Max participants:</label>
        <input type="number" id="activity-max" name="max_participants" min="1" value="{max}" required>
    </div>
    <button type="submit">Save</button>
    <button type="button" class="cancel-btn" data-action="cancel-create-form">Cancel</button>
</form>"#,
        name = html_escape(&draft.name),
        description = html_escape(&draft.description),
        schedule = html_escape(&draft.schedule),
        max = html_escape(&draft.max_participants),
    )
}

pub fn render_edit_form(edit: &EditForm) -> String {
    let draft = &edit.draft;
    format!(
        r#"<form class="activity-form" data-action="save-edit" data-activity="{activity}">
    <h4>Edit {activity}</h4>
    <div class="form-group">
        <label for="edit-description">Description:</label>
        <textarea id="edit-description" name="description" required>{description}</textarea>
    </div>
    <div class="form-group">
        <label for="edit-schedule">Schedule:</label>
        <input type="text" id="edit-schedule" name="schedule" value="{schedule}" required>
    </div>
    <div class="form-group">
        <label for="edit-max">Max participants:</label>
        <input type="number" id="edit-max" name="max_participants" min="1" value="{max}" required>
    </div>
    <button type="submit">Save</button>
    <button type="button" class="cancel-btn" data-action="cancel-edit">Cancel</button>
</form>"#,
        activity = html_escape(&edit.activity),
        description = html_escape(&draft.description),
        schedule = html_escape(&draft.schedule),
        max = html_escape(&draft.max_participants),
    )
}

// --- Messages ---

/// The visible message, tagged with how long it has left so the browser can
/// hide it on time. Empty once the message expired.
pub fn render_message(area: &MessageArea, now: Instant) -> String {
    match (area.visible_at(now), area.remaining_at(now)) {
        (Some(msg), Some(left)) => format!(
            r#"<div class="message {kind}" data-expires-in="{ms}">{text}</div>"#,
            kind = msg.kind.css_class(),
            ms = left.as_millis(),
            text = html_escape(&msg.text),
        ),
        _ => String::new(),
    }
}

// --- Helpers ---

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Activity Sign-up</title>
<style>{STYLE}</style>
</head>
<body>
{content}
<script>{SCRIPT}</script>
</body>
</html>"#,
        title = html_escape(title),
    )
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLE: &str = r#"
*{margin:0;padding:0;box-sizing:border-box;}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1a1a1a;background:#fafafa;}
.header{background:#1a1a1a;color:#fff;padding:12px 24px;}
.header h1{font-size:18px;font-weight:600;}
.container{max-width:960px;margin:0 auto;padding:24px;}
.card{background:#fff;border:1px solid #e0e0e0;border-radius:8px;padding:16px;margin-bottom:16px;}
.card h3{margin-bottom:12px;}
.activity-card{border:1px solid #e0e0e0;border-radius:6px;padding:12px;margin-bottom:10px;}
.activity-card h4{margin-bottom:4px;}
.activity-actions{float:right;display:flex;gap:6px;}
.participants-list{list-style:none;margin-top:4px;}
.participants-list li{display:flex;gap:8px;align-items:center;font-size:13px;}
.delete-btn{border:none;background:none;cursor:pointer;font-size:11px;}
.activity-form{border:1px dashed #999;border-radius:6px;padding:12px;margin-bottom:10px;}
.form-group{margin-bottom:8px;display:flex;flex-direction:column;gap:4px;}
.message{padding:8px 12px;border-radius:4px;margin-top:8px;font-size:14px;}
.message.success{background:#e8f5e9;color:#2e7d32;}
.message.error{background:#fce4ec;color:#c62828;}
"#;

// One delegated listener per event type on the stable #app container. Each
// message area keeps a single hide timer that is reset when a new message
// arrives.
const SCRIPT: &str = r#"
(() => {
  const app = document.getElementById("app");
  const pageId = app.dataset.page;
  const timers = {};

  function scheduleHide(id) {
    const area = document.getElementById(id);
    clearTimeout(timers[id]);
    const msg = area && area.querySelector("[data-expires-in]");
    if (!msg) return;
    timers[id] = setTimeout(() => { area.innerHTML = ""; }, Number(msg.dataset.expiresIn));
  }

  function apply(update) {
    for (const [id, html] of Object.entries(update.regions)) {
      const el = document.getElementById(id);
      if (el) el.innerHTML = html;
    }
    scheduleHide("message");
    scheduleHide("admin-message");
  }

  async function send(payload) {
    try {
      const resp = await fetch(`/ui/${pageId}/events`, {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(payload),
      });
      if (resp.status === 404) {
        window.location.reload();
        return;
      }
      apply(await resp.json());
    } catch (err) {
      console.error("Error dispatching event:", err);
    }
  }

  function payloadFor(el) {
    const payload = { action: el.dataset.action };
    if (el.dataset.activity !== undefined) payload.activity = el.dataset.activity;
    if (el.dataset.email !== undefined) payload.email = el.dataset.email;
    return payload;
  }

  app.addEventListener("click", (event) => {
    const button = event.target.closest("button[data-action]");
    if (!button || !app.contains(button)) return;
    event.preventDefault();
    const payload = payloadFor(button);
    if (button.dataset.confirm !== undefined) {
      payload.confirmed = window.confirm(button.dataset.confirm);
    }
    send(payload);
  });

  app.addEventListener("submit", (event) => {
    const form = event.target.closest("form[data-action]");
    if (!form) return;
    event.preventDefault();
    const payload = payloadFor(form);
    for (const [key, value] of new FormData(form).entries()) payload[key] = value;
    send(payload);
  });

  scheduleHide("message");
  scheduleHide("admin-message");
})();
"#;
