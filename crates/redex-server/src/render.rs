//! HTML for the page and the htmx fragments swapped into it.

use redex_core::validation::{DEFAULT_GUESTS, MAX_GUESTS};
use redex_core::{
    time_slots, Catalog, CatalogFilter, Cocktail, CocktailId, FormErrors, Reservation,
    Subscription,
};

use crate::submissions::SubmissionStatus;

/// Escape text for HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn selected(current: &str, value: &str) -> &'static str {
    if current == value {
        " selected"
    } else {
        ""
    }
}

fn facet_name<T: serde::Serialize>(facet: &T) -> String {
    serde_json::to_value(facet)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Heart toggle. htmx swaps it for the server's fresh copy.
pub fn favorite_button(id: CocktailId, is_favorite: bool) -> String {
    let (label, class) = if is_favorite {
        ("Remove from favorites", "favorite-btn active")
    } else {
        ("Add to favorites", "favorite-btn")
    };
    format!(
        r#"<button type="button" class="{class}" hx-post="/favorites/{id}" hx-swap="outerHTML" aria-label="{label}">&#9829;</button>"#
    )
}

pub fn render_card(cocktail: &Cocktail, is_favorite: bool) -> String {
    format!(
        r##"<article class="cocktail-card" data-id="{id}">
    <img src="{image}" alt="{name}" loading="lazy">
    <div class="card-body">
        <h3 hx-get="/cocktails/{id}" hx-target="#modal" hx-swap="innerHTML">{name}</h3>
        <p class="subtitle">{title}</p>
        <p class="meta"><span class="category">{category}</span> <span class="price">{price}</span> <span class="abv">{abv}</span></p>
        {button}
    </div>
</article>"##,
        id = cocktail.id,
        image = escape(&cocktail.image),
        name = escape(&cocktail.name),
        title = escape(&cocktail.title),
        category = cocktail.category.as_str(),
        price = escape(&cocktail.price),
        abv = escape(&cocktail.alcohol_content),
        button = favorite_button(cocktail.id, is_favorite),
    )
}

/// Card grid with the "Showing N of M" line, or the empty state.
pub fn render_gallery(visible: &[&Cocktail], total: usize, favorites: &[CocktailId]) -> String {
    let summary = format!(
        r#"<p class="gallery-summary">Showing {} of {} cocktails</p>"#,
        visible.len(),
        total
    );

    if visible.is_empty() {
        return format!(
            r##"{summary}
<div class="gallery-empty">
    <h3>No cocktails found</h3>
    <p>Try adjusting your search terms or filters to find what you're looking for.</p>
    <a class="button" href="/#cocktails">Clear All</a>
</div>"##
        );
    }

    let cards: String = visible
        .iter()
        .map(|c| render_card(c, favorites.contains(&c.id)))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{summary}\n<div class=\"gallery-grid\">\n{cards}\n</div>")
}

/// The favorites overlay: saved cocktails in menu order, or the empty state.
pub fn render_favorites(favorites: &[&Cocktail]) -> String {
    let count = favorites.len();
    let close = r#"<button type="button" class="close" onclick="document.getElementById('favorites').innerHTML=''" aria-label="Close favorites">&times;</button>"#;

    if favorites.is_empty() {
        return format!(
            r##"<div class="favorites-panel" role="dialog">
    {close}
    <h2>Your Favorites</h2>
    <div class="favorites-empty">
        <h3>No favorites yet</h3>
        <p>Start exploring our cocktails and add your favorites by clicking the heart button!</p>
        <a class="button" href="#cocktails" onclick="document.getElementById('favorites').innerHTML=''">Explore Cocktails</a>
    </div>
</div>"##
        );
    }

    let cards: String = favorites
        .iter()
        .map(|c| render_card(c, true))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"<div class="favorites-panel" role="dialog">
    {close}
    <h2>Your Favorites</h2>
    <p class="subtitle">{count} cocktail{plural} saved</p>
    <button type="button" class="clear-favorites" hx-delete="/favorites" hx-target="#favorites">Clear All</button>
    <div class="gallery-grid">
{cards}
    </div>
</div>"##,
        plural = if count == 1 { "" } else { "s" },
    )
}

/// Modal body for one cocktail.
pub fn render_detail(cocktail: &Cocktail, is_favorite: bool) -> String {
    let ingredients: String = cocktail
        .ingredients
        .iter()
        .map(|i| format!("<li>{}</li>", escape(i)))
        .collect();

    format!(
        r#"<div class="cocktail-modal" role="dialog" aria-modal="true">
    <button type="button" class="close" onclick="this.closest('.cocktail-modal').remove()" aria-label="Close">&times;</button>
    <img src="{image}" alt="{name}">
    <h2>{name}</h2>
    <p class="subtitle">{title}</p>
    <p>{description}</p>
    <p class="meta">{category} &middot; {price} &middot; {abv}</p>
    <h3>Ingredients</h3>
    <ul>{ingredients}</ul>
    <h3>Preparation</h3>
    <p>{preparation}</p>
    {button}
</div>"#,
        image = escape(&cocktail.image),
        name = escape(&cocktail.name),
        title = escape(&cocktail.title),
        description = escape(&cocktail.description),
        category = cocktail.category.as_str(),
        price = escape(&cocktail.price),
        abv = escape(&cocktail.alcohol_content),
        preparation = escape(&cocktail.preparation),
        button = favorite_button(cocktail.id, is_favorite),
    )
}

pub fn render_form_errors(errors: &FormErrors) -> String {
    let items: String = errors
        .iter()
        .map(|(field, e)| {
            format!(
                r#"<li data-field="{}">{}</li>"#,
                field,
                escape(&e.to_string())
            )
        })
        .collect();
    format!(r#"<ul class="form-errors">{items}</ul>"#)
}

/// Fragment for a pending submission. It polls its ticket until confirmed.
pub fn render_pending(path: &str, status: &SubmissionStatus<impl Sized>) -> String {
    format!(
        r#"<div class="submission pending" hx-get="/{path}/{ticket}" hx-trigger="every 1s" hx-swap="outerHTML">Submitting&hellip;</div>"#,
        ticket = status.ticket,
    )
}

pub fn render_reservation_status(status: &SubmissionStatus<Reservation>) -> String {
    match &status.confirmation {
        Some(r) => format!(
            r#"<div class="submission confirmed">
    <h3>Reservation Confirmed!</h3>
    <p><strong>Date:</strong> {date}</p>
    <p><strong>Time:</strong> {time}</p>
    <p><strong>Guests:</strong> {guests}</p>
    <p>We've sent a confirmation email to {email}. We look forward to serving you!</p>
</div>"#,
            date = r.date.format("%A, %B %-d, %Y"),
            time = r.time.format("%H:%M"),
            guests = r.guests,
            email = escape(&r.email),
        ),
        None => render_pending("reservations", status),
    }
}

pub fn render_subscription_status(status: &SubmissionStatus<Subscription>) -> String {
    match &status.confirmation {
        Some(s) => format!(
            r#"<div class="submission confirmed">
    <h3>Welcome to the club!</h3>
    <p>Thanks for subscribing. Watch {email} for new recipes and events.</p>
</div>"#,
            email = escape(&s.email),
        ),
        None => render_pending("newsletter", status),
    }
}

fn render_filters(filter: &CatalogFilter) -> String {
    let category = facet_name(&filter.category);
    let price = facet_name(&filter.price_range);
    let abv = facet_name(&filter.alcohol_content);

    format!(
        r##"<form id="filters" hx-get="/gallery" hx-target="#gallery" hx-trigger="input changed delay:300ms from:input, change">
    <input type="search" name="search" value="{search}" placeholder="Search cocktails by name, ingredient, or description...">
    <select name="category">
        <option value="all"{c_all}>All Categories</option>
        <option value="cocktail"{c_cocktail}>Cocktails</option>
        <option value="mocktail"{c_mocktail}>Mocktails</option>
    </select>
    <select name="price_range">
        <option value="all"{p_all}>All Prices</option>
        <option value="budget"{p_budget}>Under $15</option>
        <option value="mid"{p_mid}>$15 - $20</option>
        <option value="premium"{p_premium}>Over $20</option>
    </select>
    <select name="alcohol_content">
        <option value="all"{a_all}>All Strengths</option>
        <option value="light"{a_light}>Light (0-10%)</option>
        <option value="medium"{a_medium}>Medium (11-15%)</option>
        <option value="strong"{a_strong}>Strong (16%+)</option>
    </select>
    <span class="filter-status">{status}</span>
</form>"##,
        search = escape(&filter.search),
        c_all = selected(&category, "all"),
        c_cocktail = selected(&category, "cocktail"),
        c_mocktail = selected(&category, "mocktail"),
        p_all = selected(&price, "all"),
        p_budget = selected(&price, "budget"),
        p_mid = selected(&price, "mid"),
        p_premium = selected(&price, "premium"),
        a_all = selected(&abv, "all"),
        a_light = selected(&abv, "light"),
        a_medium = selected(&abv, "medium"),
        a_strong = selected(&abv, "strong"),
        status = if filter.is_active() {
            "Filters active"
        } else {
            "No filters"
        },
    )
}

fn render_reservation_form() -> String {
    let slots: String = time_slots()
        .iter()
        .map(|t| format!(r#"<option value="{t}">{t}</option>"#))
        .collect();
    let guests: String = (1..=MAX_GUESTS)
        .map(|n| {
            let label = if n == 1 { "Guest" } else { "Guests" };
            let sel = if n == DEFAULT_GUESTS { " selected" } else { "" };
            format!(r#"<option value="{n}"{sel}>{n} {label}</option>"#)
        })
        .collect();

    format!(
        r##"<form id="reservation-form" hx-post="/reservations" hx-target="#reservation-result">
    <input name="name" placeholder="Full name *">
    <input name="email" type="email" placeholder="Email *">
    <input name="phone" type="tel" placeholder="Phone *">
    <input name="date" type="date">
    <select name="time"><option value="">Select time</option>{slots}</select>
    <select name="guests">{guests}</select>
    <textarea name="special_requests" placeholder="Special requests"></textarea>
    <button type="submit">Reserve Table</button>
</form>
<div id="reservation-result"></div>"##
    )
}

/// The whole page.
pub fn render_index(catalog: &Catalog, filter: &CatalogFilter, favorites: &[CocktailId]) -> String {
    let visible = catalog.filter(filter);
    let gallery = render_gallery(&visible, catalog.len(), favorites);
    let filters = render_filters(filter);
    let reservation = render_reservation_form();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>REDEX Cocktail Bar</title>
    <link rel="stylesheet" href="/static/style.css">
    <script src="https://unpkg.com/htmx.org@2.0.4"></script>
</head>
<body>
    <header id="hero">
        <h1>REDEX</h1>
        <p>Handcrafted cocktails, shaken with care.</p>
        <a href="#favorites" class="favorites-badge" hx-get="/favorites" hx-target="#favorites">Favorites <span id="favorites-count" hx-get="/favorites/count" hx-target="this" hx-trigger="favoritesChanged from:body">{favorites_count}</span></a>
    </header>

    <main>
        <section id="cocktails">
            <h2 class="gallery-title">Our Cocktails</h2>
            {filters}
            <div id="gallery" hx-get="/gallery" hx-include="#filters" hx-trigger="favoritesChanged from:body">
{gallery}
            </div>
            <div id="modal"></div>
        </section>

        <aside id="favorites"></aside>

        <section id="reservations">
            <h2>Reserve a Table</h2>
            {reservation}
        </section>

        <section id="newsletter">
            <h2>Stay in the loop</h2>
            <form hx-post="/newsletter" hx-target="#newsletter-result">
                <input name="email" type="email" placeholder="Enter your email">
                <button type="submit">Subscribe to Newsletter</button>
            </form>
            <div id="newsletter-result"></div>
        </section>
    </main>
</body>
</html>"##,
        favorites_count = favorites.len(),
    )
}
