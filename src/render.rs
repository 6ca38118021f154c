use std::collections::HashMap;

use crate::gallery::Tile;
use crate::models::contact::ContactForm;

/// One entry of a technologies row. `icon` is a path or URL; entries
/// without one are drawn as a lettered badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechItem {
    pub label: String,
    pub icon: Option<String>,
}

/// Parse a row setting: comma-separated `Label` or `Label|/static/tech/icon.png`.
pub fn tech_row(value: &str) -> Vec<TechItem> {
    value
        .split(',')
        .filter_map(|entry| {
            let (label, icon) = match entry.split_once('|') {
                Some((l, i)) => (l.trim(), Some(i.trim())),
                None => (entry.trim(), None),
            };
            if label.is_empty() {
                return None;
            }
            Some(TechItem {
                label: label.to_string(),
                icon: icon.filter(|i| !i.is_empty()).map(str::to_string),
            })
        })
        .collect()
}

/// Up to two letters for a badge: word initials, or the start of a single word.
fn monogram(label: &str) -> String {
    let words: Vec<&str> = label.split_whitespace().collect();
    let letters: String = if words.len() > 1 {
        words.iter().filter_map(|w| w.chars().next()).take(2).collect()
    } else {
        label.chars().take(2).collect()
    };
    letters.to_uppercase()
}

/// State of a contact form being rendered: field values and the optional
/// status line `(is_success, message)`.
pub struct ContactView<'a> {
    pub form: &'a ContactForm,
    pub status: Option<(bool, &'a str)>,
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn setting<'a>(settings: &'a HashMap<String, String>, key: &str, def: &'a str) -> &'a str {
    settings.get(key).map(|s| s.as_str()).unwrap_or(def)
}

// ── Pages ──────────────────────────────────────────────

/// Landing page: navbar, hero, gallery, technologies, contact, footer.
pub fn render_home(
    settings: &HashMap<String, String>,
    public_url: &str,
    tiles: &[Tile],
    contact: &ContactView,
) -> String {
    let body = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        render_navbar(settings),
        render_hero(settings),
        render_gallery(settings, tiles),
        render_technologies(settings),
        render_contact_section(settings, contact, "/"),
        render_footer(settings),
    );
    page_shell(settings, public_url, "/", None, &body)
}

/// Standalone contact page with just the form.
pub fn render_contact_page(
    settings: &HashMap<String, String>,
    public_url: &str,
    contact: &ContactView,
) -> String {
    let body = format!(
        "<main class=\"contact-page\"><a href=\"/\" class=\"back-link\">&larr; Home</a>\n{}</main>",
        render_contact_form(contact, "/contact")
    );
    page_shell(settings, public_url, "/contact", Some("Contact"), &body)
}

pub fn render_not_found() -> String {
    "<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>&larr; Home</a></body></html>".to_string()
}

pub fn render_server_error() -> String {
    "<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>&larr; Home</a></body></html>".to_string()
}

fn page_shell(
    settings: &HashMap<String, String>,
    public_url: &str,
    path: &str,
    page_title: Option<&str>,
    body: &str,
) -> String {
    let site_name = setting(settings, "site_name", "Portfolio");
    let site_title = setting(settings, "site_title", "Web Developer Portfolio");
    let title = match page_title {
        Some(t) => format!("{} - {}", t, site_name),
        None => format!("{} - {}", site_name, site_title),
    };
    let description = setting(settings, "site_description", "");
    let og_image = match setting(settings, "site_og_image", "").trim() {
        "" => String::new(),
        path if path.starts_with('/') => format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            html_escape(&format!("{}{}", public_url, path))
        ),
        url => format!("<meta property=\"og:image\" content=\"{}\">\n", html_escape(url)),
    };
    let canonical = format!("{}{}", public_url, path);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<meta name="keywords" content="{keywords}">
<meta name="author" content="{author}">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
{og_image}<meta property="og:url" content="{canonical}">
<link rel="canonical" href="{canonical}">
<link rel="stylesheet" href="/static/css/site.css">
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(&title),
        description = html_escape(description),
        keywords = html_escape(setting(settings, "site_keywords", "")),
        author = html_escape(site_name),
        og_image = og_image,
        canonical = html_escape(&canonical),
        body = body,
    )
}

// ── Sections ───────────────────────────────────────────

fn render_navbar(settings: &HashMap<String, String>) -> String {
    let links = [("#home", "Home"), ("#projects", "Projects"), ("#contact", "Contact")];
    let items: String = links
        .iter()
        .map(|(href, label)| format!("<a href=\"{}\" class=\"nav-link\">{}</a>", href, label))
        .collect();
    format!(
        r#"<nav class="navbar" id="navbar"><span class="brand">{name}</span>
<input type="checkbox" id="nav-toggle" class="nav-toggle" aria-label="Menu"><label for="nav-toggle" class="nav-burger">&#9776;</label>
<div class="nav-links">{items}</div></nav>
<script>window.addEventListener('scroll',function(){{document.getElementById('navbar').classList.toggle('scrolled',window.scrollY>10);}});</script>"#,
        name = html_escape(setting(settings, "site_name", "Portfolio")),
        items = items,
    )
}

fn render_hero(settings: &HashMap<String, String>) -> String {
    let name = setting(settings, "site_name", "Portfolio");
    let image = setting(settings, "hero_image", "").trim();
    let portrait = if image.is_empty() {
        format!(
            "<div class=\"hero-monogram\" aria-hidden=\"true\">{}</div>",
            html_escape(&monogram(name))
        )
    } else {
        format!(
            "<img src=\"{}\" alt=\"{}\" width=\"400\" height=\"400\">",
            html_escape(image),
            html_escape(name)
        )
    };
    format!(
        r#"<section id="home" class="hero">
<div class="hero-text"><p class="hero-greeting">{greeting} <span class="typed" data-text="{name}">{name}</span></p>
<p class="hero-bio">{bio}</p></div>
<div class="hero-image">{portrait}</div>
</section>
<script>
(function(){{
  var el=document.querySelector('.typed');
  if(!el) return;
  var text=el.dataset.text||'', i=text.length, erasing=true;
  function step(){{
    i+=erasing?-1:1;
    el.textContent=text.slice(0,i);
    var delay=erasing?20:70;
    if(!erasing&&i>=text.length){{erasing=true;delay=1500;}}
    else if(erasing&&i<=0){{erasing=false;delay=400;}}
    setTimeout(step,delay);
  }}
  setTimeout(step,1500);
}})();
</script>"#,
        greeting = html_escape(setting(settings, "hero_greeting", "I'm")),
        name = html_escape(name),
        bio = html_escape(setting(settings, "hero_bio", "")),
        portrait = portrait,
    )
}

fn render_tile(tile: &Tile) -> String {
    format!(
        r#"<div class="project-tile"><a href="{link}" target="_blank" rel="noopener noreferrer"><img src="{url}" alt="{link}" loading="lazy"></a></div>"#,
        link = html_escape(&tile.project_link),
        url = html_escape(&tile.url),
    )
}

/// Grid starts as a loading placeholder and is filled from `/api/projects`.
/// The `<noscript>` copy is the server-rendered grid.
fn render_gallery(settings: &HashMap<String, String>, tiles: &[Tile]) -> String {
    let static_grid: String = tiles.iter().map(render_tile).collect();
    format!(
        r#"<section id="projects" class="projects">
<h2 class="section-title">{heading}</h2>
<div id="projects-grid" class="projects-grid" data-source="/api/projects"><p class="loading">Loading projects&hellip;</p></div>
<noscript><div class="projects-grid">{static_grid}</div><style>#projects-grid{{display:none}}</style></noscript>
<script>
(function(){{
  var grid=document.getElementById('projects-grid');
  fetch(grid.dataset.source).then(function(r){{
    if(!r.ok) throw new Error('HTTP '+r.status);
    return r.json();
  }}).then(function(items){{
    grid.textContent='';
    items.forEach(function(item){{
      var tile=document.createElement('div');tile.className='project-tile';
      var a=document.createElement('a');a.href=item.project_link;a.target='_blank';a.rel='noopener noreferrer';
      var img=document.createElement('img');img.src=item.url;img.alt=item.project_link;img.loading='lazy';
      a.appendChild(img);tile.appendChild(a);grid.appendChild(tile);
    }});
  }}).catch(function(e){{
    console.error('Error fetching projects:',e);
    grid.textContent='';
  }});
}})();
</script>
</section>"#,
        heading = html_escape(setting(settings, "projects_heading", "My Latest Projects")),
        static_grid = static_grid,
    )
}

fn render_tech_item(item: &TechItem) -> String {
    let label = html_escape(&item.label);
    let visual = match &item.icon {
        Some(icon) => format!(
            "<img src=\"{}\" alt=\"{}\" width=\"128\" height=\"128\">",
            html_escape(icon),
            label
        ),
        None => format!(
            "<span class=\"tech-badge\" aria-hidden=\"true\">{}</span>",
            html_escape(&monogram(&item.label))
        ),
    };
    format!("<div class=\"tech-item\">{}<p>{}</p></div>", visual, label)
}

fn render_marquee_row(row: &[TechItem], reverse: bool) -> String {
    if row.is_empty() {
        return String::new();
    }
    let items: String = row.iter().map(render_tech_item).collect();
    let class = if reverse { "marquee marquee-reverse" } else { "marquee" };
    // Items are repeated so the loop has no visible seam
    format!(
        "<div class=\"{}\"><div class=\"marquee-track\">{}{}</div></div>",
        class, items, items
    )
}

fn render_technologies(settings: &HashMap<String, String>) -> String {
    format!(
        r#"<section id="technologies" class="technologies">
<h2 class="section-title">{heading}</h2>
{row_one}
{row_two}
</section>"#,
        heading = html_escape(setting(settings, "technologies_heading", "Technologies")),
        row_one = render_marquee_row(&tech_row(setting(settings, "technologies_row_one", "")), false),
        row_two = render_marquee_row(&tech_row(setting(settings, "technologies_row_two", "")), true),
    )
}

fn render_contact_form(contact: &ContactView, return_to: &str) -> String {
    let status_html = match contact.status {
        Some((ok, msg)) => format!(
            "<p class=\"contact-status {}\">{}</p>",
            if ok { "contact-status-success" } else { "contact-status-error" },
            html_escape(msg)
        ),
        None => String::new(),
    };
    format!(
        r#"<form method="post" action="/contact" class="contact-form">
{status_html}
<input type="hidden" name="return_to" value="{return_to}">
<input type="text" name="name" value="{name}" required placeholder="Enter your name ...">
<input type="email" name="email" value="{email}" required placeholder="Enter your email ...">
<textarea name="message" required placeholder="Enter your message ...">{message}</textarea>
<button type="submit" class="contact-submit">Submit</button>
</form>"#,
        status_html = status_html,
        return_to = html_escape(return_to),
        name = html_escape(&contact.form.name),
        email = html_escape(&contact.form.email),
        message = html_escape(&contact.form.message),
    )
}

fn render_contact_section(
    settings: &HashMap<String, String>,
    contact: &ContactView,
    return_to: &str,
) -> String {
    let mut details = String::new();
    for (key, class) in [
        ("contact_location", "contact-location"),
        ("contact_phone", "contact-phone"),
        ("contact_email", "contact-email"),
    ] {
        let value = setting(settings, key, "");
        if !value.is_empty() {
            details.push_str(&format!(
                "<div class=\"contact-detail {}\"><p>{}</p></div>",
                class,
                html_escape(value)
            ));
        }
    }
    format!(
        r#"<section id="contact" class="contact">
<h2 class="section-title">{heading}</h2>
<div class="contact-columns"><div class="contact-details">{details}</div>
{form}</div>
</section>"#,
        heading = html_escape(setting(settings, "contact_heading", "Contact Us!")),
        details = details,
        form = render_contact_form(contact, return_to),
    )
}

fn render_footer(settings: &HashMap<String, String>) -> String {
    let mut social = String::new();
    for (key, label) in [
        ("social_facebook", "Facebook"),
        ("social_instagram", "Instagram"),
        ("social_whatsapp", "WhatsApp"),
    ] {
        let href = setting(settings, key, "");
        if !href.is_empty() {
            social.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"social-link\">{}</a>",
                html_escape(href),
                label
            ));
        }
    }
    format!(
        r#"<footer class="footer"><div class="footer-name">{name}</div>
<div class="footer-social">{social}</div>
<div class="footer-copy">Copyrights Ⓒ {year} . {copy}</div></footer>"#,
        name = html_escape(setting(settings, "site_name", "Portfolio")),
        social = social,
        year = chrono::Utc::now().format("%Y"),
        copy = html_escape(setting(settings, "footer_copyright", "All rights reserved")),
    )
}
